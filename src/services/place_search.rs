use crate::error::{PlanError, Result};
use crate::models::{Coordinates, PlaceCandidate, PlaceCategory};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
const OVERPASS_QUERY_TIMEOUT_SECONDS: u64 = 25;
const OVERPASS_RESULT_LIMIT: usize = 50;

/// Place search collaborator: candidates of one category around a center.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(
        &self,
        category: &PlaceCategory,
        center: &Coordinates,
        radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>>;
}

/// Overpass-backed place search over OpenStreetMap data.
#[derive(Clone)]
pub struct OverpassPlaceSearch {
    client: Client,
    endpoint: String,
}

impl OverpassPlaceSearch {
    pub fn new() -> Self {
        OverpassPlaceSearch {
            client: Client::new(),
            endpoint: OVERPASS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        OverpassPlaceSearch {
            client: Client::new(),
            endpoint,
        }
    }

    /// Overpass QL tag filter for a category, e.g. `["amenity"="restaurant"]`.
    fn category_filter(category: &PlaceCategory) -> &'static str {
        match category {
            PlaceCategory::Restaurant => "[\"amenity\"=\"restaurant\"]",
            PlaceCategory::Cafe => "[\"amenity\"=\"cafe\"]",
            PlaceCategory::Bar => "[\"amenity\"=\"bar\"]",
            PlaceCategory::Bakery => "[\"shop\"=\"bakery\"]",
            PlaceCategory::Brewery => "[\"craft\"=\"brewery\"]",
            PlaceCategory::Winery => "[\"craft\"=\"winery\"]",
            PlaceCategory::Museum => "[\"tourism\"=\"museum\"]",
            PlaceCategory::Gallery => "[\"tourism\"=\"gallery\"]",
            PlaceCategory::Theatre => "[\"amenity\"=\"theatre\"]",
            PlaceCategory::Cinema => "[\"amenity\"=\"cinema\"]",
            PlaceCategory::Library => "[\"amenity\"=\"library\"]",
            PlaceCategory::Monument => "[\"historic\"=\"monument\"]",
            PlaceCategory::Church => "[\"building\"=\"church\"]",
            PlaceCategory::Castle => "[\"historic\"=\"castle\"]",
            PlaceCategory::Park => "[\"leisure\"=\"park\"]",
            PlaceCategory::Garden => "[\"leisure\"=\"garden\"]",
            PlaceCategory::Viewpoint => "[\"tourism\"=\"viewpoint\"]",
            PlaceCategory::Beach => "[\"natural\"=\"beach\"]",
            PlaceCategory::Lake => "[\"natural\"=\"water\"]",
            PlaceCategory::Zoo => "[\"tourism\"=\"zoo\"]",
            PlaceCategory::Market => "[\"amenity\"=\"marketplace\"]",
            PlaceCategory::Aquarium => "[\"tourism\"=\"aquarium\"]",
        }
    }

    fn build_query(category: &PlaceCategory, center: &Coordinates, radius_meters: f64) -> String {
        format!(
            "[out:json][timeout:{}];node{}(around:{:.0},{},{});out body {};",
            OVERPASS_QUERY_TIMEOUT_SECONDS,
            Self::category_filter(category),
            radius_meters,
            center.lat,
            center.lng,
            OVERPASS_RESULT_LIMIT
        )
    }

    fn convert_elements(
        elements: Vec<OverpassElement>,
        category: &PlaceCategory,
    ) -> Vec<PlaceCandidate> {
        elements
            .into_iter()
            .filter_map(|el| {
                let name = el.tags.get("name")?.clone();
                let coordinates = Coordinates::new(el.lat, el.lon).ok()?;

                let rating = el
                    .tags
                    .get("stars")
                    .and_then(|s| s.parse::<f32>().ok())
                    .map(|s| s.clamp(0.0, 5.0));

                let tags = el
                    .tags
                    .get("description")
                    .map(|d| {
                        d.split_whitespace()
                            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
                            .filter(|w| !w.is_empty())
                            .collect()
                    })
                    .unwrap_or_default();

                let mut candidate = PlaceCandidate::new(name, *category, coordinates).with_tags(tags);
                if let Some(r) = rating {
                    candidate.rating = Some(r);
                }
                Some(candidate)
            })
            .collect()
    }
}

impl Default for OverpassPlaceSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaceSearch for OverpassPlaceSearch {
    async fn search(
        &self,
        category: &PlaceCategory,
        center: &Coordinates,
        radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>> {
        let query = Self::build_query(category, center, radius_meters);

        tracing::debug!(category = %category, "Overpass place query: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(format!("data={}", urlencoding::encode(&query)))
            .timeout(std::time::Duration::from_secs(
                OVERPASS_QUERY_TIMEOUT_SECONDS + 5,
            ))
            .send()
            .await
            .map_err(|e| PlanError::PlaceSearch(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, category = %category, "Place search HTTP error");
            return Err(PlanError::PlaceSearch(format!("HTTP {}", status)));
        }

        let api_response: OverpassResponse = response
            .json()
            .await
            .map_err(|e| PlanError::PlaceSearch(format!("Failed to parse response: {}", e)))?;

        let candidates = Self::convert_elements(api_response.elements, category);
        tracing::debug!(
            category = %category,
            count = candidates.len(),
            "Place search returned {} candidates",
            candidates.len()
        );
        Ok(candidates)
    }
}

// Overpass API response types

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}
