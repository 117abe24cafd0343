use crate::error::{PlanError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const NOMINATIM_RESULT_LIMIT: usize = 5;

/// A single geocoding result: a coordinate plus whatever address components
/// the collaborator could determine.
#[derive(Debug, Clone)]
pub struct Placemark {
    pub coordinates: Coordinates,
    pub name: Option<String>,
    pub street: Option<String>,
    pub locality: Option<String>,
    pub country: Option<String>,
}

/// Forward geocoding collaborator: free text -> candidate placemarks.
/// An empty result vector means "nothing matched"; an `Err` means the
/// service itself failed (network, timeout, HTTP error).
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Vec<Placemark>>;
}

/// Reverse geocoding collaborator: coordinate -> human-readable placemark.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(&self, point: &Coordinates) -> Result<Placemark>;
}

/// Nominatim-backed implementation of both geocoding directions.
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(user_agent: String) -> Self {
        NominatimClient {
            client: Client::new(),
            base_url: NOMINATIM_BASE_URL.to_string(),
            user_agent,
        }
    }

    pub fn with_base_url(user_agent: String, base_url: String) -> Self {
        NominatimClient {
            client: Client::new(),
            base_url,
            user_agent,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Vec<Placemark>> {
        let url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            NOMINATIM_RESULT_LIMIT
        );

        tracing::debug!(query = query, "Geocoding request");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| PlanError::Geocoding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, query = query, "Geocoding HTTP error");
            return Err(PlanError::Geocoding(format!("HTTP {}", status)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| PlanError::Geocoding(format!("Failed to parse response: {}", e)))?;

        Ok(places.into_iter().filter_map(|p| p.into_placemark()).collect())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse_geocode(&self, point: &Coordinates) -> Result<Placemark> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1",
            self.base_url, point.lat, point.lng
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| PlanError::Geocoding(format!("Reverse request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PlanError::Geocoding(format!(
                "Reverse HTTP {}",
                response.status()
            )));
        }

        let place: NominatimPlace = response
            .json()
            .await
            .map_err(|e| PlanError::Geocoding(format!("Failed to parse response: {}", e)))?;

        place
            .into_placemark()
            .ok_or_else(|| PlanError::Geocoding("Reverse result had no coordinate".to_string()))
    }
}

// Nominatim API response types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    name: Option<String>,
    display_name: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl NominatimPlace {
    fn into_placemark(self) -> Option<Placemark> {
        let lat: f64 = self.lat.parse().ok()?;
        let lng: f64 = self.lon.parse().ok()?;
        let coordinates = Coordinates::new(lat, lng).ok()?;

        let (street, locality, country) = match self.address {
            Some(addr) => (addr.road, addr.city.or(addr.town).or(addr.village), addr.country),
            None => (None, None, None),
        };

        // Nominatim's `name` is often empty for pure addresses; fall back to
        // the first display_name segment.
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.display_name
                    .as_deref()
                    .and_then(|d| d.split(',').next())
                    .map(|s| s.trim().to_string())
            });

        Some(Placemark {
            coordinates,
            name,
            street,
            locality,
            country,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_base_url() {
        let client = NominatimClient::new("daytripper-tests".to_string());
        assert_eq!(client.base_url, NOMINATIM_BASE_URL);
    }

    #[test]
    fn test_place_mapping() {
        let place = NominatimPlace {
            lat: "48.8566".to_string(),
            lon: "2.3522".to_string(),
            name: Some("".to_string()),
            display_name: Some("Hotel de Ville, Paris, France".to_string()),
            address: Some(NominatimAddress {
                road: Some("Place de l'Hotel de Ville".to_string()),
                city: Some("Paris".to_string()),
                town: None,
                village: None,
                country: Some("France".to_string()),
            }),
        };

        let pm = place.into_placemark().unwrap();
        assert_eq!(pm.name.as_deref(), Some("Hotel de Ville"));
        assert_eq!(pm.locality.as_deref(), Some("Paris"));
        assert_eq!(pm.country.as_deref(), Some("France"));
        assert!((pm.coordinates.lat - 48.8566).abs() < 1e-9);
    }

    #[test]
    fn test_place_mapping_rejects_bad_coordinates() {
        let place = NominatimPlace {
            lat: "not-a-number".to_string(),
            lon: "2.3522".to_string(),
            name: None,
            display_name: None,
            address: None,
        };
        assert!(place.into_placemark().is_none());
    }

    #[test]
    fn test_locality_prefers_city_over_village() {
        let place = NominatimPlace {
            lat: "45.0".to_string(),
            lon: "5.0".to_string(),
            name: None,
            display_name: None,
            address: Some(NominatimAddress {
                road: None,
                city: None,
                town: Some("Vienne".to_string()),
                village: Some("Hameau".to_string()),
                country: None,
            }),
        };
        let pm = place.into_placemark().unwrap();
        assert_eq!(pm.locality.as_deref(), Some("Vienne"));
    }
}
