use crate::error::{PlanError, Result};
use crate::models::{Coordinates, TransportMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const MAPBOX_DIRECTIONS_BASE_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

/// One travel leg as reported by the directions collaborator.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub duration: Duration,
    pub distance_meters: f64,
}

/// Directions/ETA collaborator. An `Err` from `leg` means the service could
/// not produce a route (timeout, no-route, HTTP error); the travel estimator
/// recovers with its speed-model fallback, so failures here never surface.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn leg(
        &self,
        from: &Coordinates,
        to: &Coordinates,
        mode: &TransportMode,
    ) -> Result<RouteLeg>;
}

/// Mapbox Directions implementation.
#[derive(Clone)]
pub struct MapboxDirections {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MapboxDirections {
    pub fn new(api_key: String) -> Self {
        MapboxDirections {
            client: Client::new(),
            api_key,
            base_url: MAPBOX_DIRECTIONS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        MapboxDirections {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl DirectionsProvider for MapboxDirections {
    async fn leg(
        &self,
        from: &Coordinates,
        to: &Coordinates,
        mode: &TransportMode,
    ) -> Result<RouteLeg> {
        let profile = mode.routing_profile().ok_or_else(|| {
            PlanError::Directions(format!("No routing profile for mode '{}'", mode))
        })?;

        let url = format!(
            "{}/{}/{},{};{},{}",
            self.base_url, profile, from.lng, from.lat, to.lng, to.lat
        );

        tracing::debug!(profile = profile, "Directions request: {} -> {}", from, to);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.api_key.as_str()),
                ("overview", "false"),
                ("steps", "false"),
            ])
            .send()
            .await
            .map_err(|e| PlanError::Directions(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Directions HTTP error: {}", error_text);
            return Err(PlanError::Directions(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: MapboxDirectionsApiResponse = response
            .json()
            .await
            .map_err(|e| PlanError::Directions(format!("Failed to parse response: {}", e)))?;

        let route = directions
            .routes
            .first()
            .ok_or_else(|| PlanError::Directions("No routes found".to_string()))?;

        Ok(RouteLeg {
            duration: Duration::from_secs_f64(route.duration.max(0.0)),
            distance_meters: route.distance,
        })
    }
}

// Mapbox API response types

#[derive(Debug, Deserialize)]
struct MapboxDirectionsApiResponse {
    routes: Vec<MapboxRoute>,
}

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    distance: f64, // meters
    duration: f64, // seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_base_url() {
        let client = MapboxDirections::new("pk.test123".to_string());
        assert_eq!(client.base_url, MAPBOX_DIRECTIONS_BASE_URL);
    }

    #[test]
    fn test_with_base_url_override() {
        let client = MapboxDirections::with_base_url(
            "my-key".to_string(),
            "http://localhost:4000/directions".to_string(),
        );
        assert_eq!(client.base_url, "http://localhost:4000/directions");
    }

    #[tokio::test]
    async fn test_transit_has_no_profile() {
        let client = MapboxDirections::new("pk.test123".to_string());
        let a = Coordinates::new(48.85, 2.35).unwrap();
        let b = Coordinates::new(48.86, 2.36).unwrap();

        let result = client.leg(&a, &b, &TransportMode::Transit).await;
        assert!(matches!(result, Err(PlanError::Directions(_))));
    }
}
