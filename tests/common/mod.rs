//! Canned-response collaborators and fixture builders shared by the
//! integration suites. Everything here is deterministic, so planning flows
//! can be asserted exactly.

#![allow(dead_code)]

use async_trait::async_trait;
use daytripper::error::{PlanError, Result};
use daytripper::models::{Coordinates, PlaceCandidate, PlaceCategory, TransportMode};
use daytripper::resolver::LocationSource;
use daytripper::services::directions::{DirectionsProvider, RouteLeg};
use daytripper::services::geocoding::{Geocoder, Placemark, ReverseGeocoder};
use daytripper::services::place_search::PlaceSearch;
use daytripper::PlannerConfig;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn test_config() -> PlannerConfig {
    PlannerConfig {
        geocode_retry_delay_ms: 0,
        location_fix_timeout_secs: 1,
        ..PlannerConfig::default()
    }
}

pub fn paris() -> Coordinates {
    Coordinates::new(48.8566, 2.3522).unwrap()
}

pub fn place(name: &str, category: PlaceCategory, lat: f64, lng: f64) -> PlaceCandidate {
    PlaceCandidate::new(
        name.to_string(),
        category,
        Coordinates::new(lat, lng).unwrap(),
    )
}

pub fn placemark(
    point: Coordinates,
    name: Option<&str>,
    street: Option<&str>,
    locality: Option<&str>,
    country: Option<&str>,
) -> Placemark {
    Placemark {
        coordinates: point,
        name: name.map(String::from),
        street: street.map(String::from),
        locality: locality.map(String::from),
        country: country.map(String::from),
    }
}

/// Geocoder answering from a fixed query -> placemarks table. Unknown
/// queries return an empty result (a live "no match"), and every call is
/// recorded so tests can assert attempt order.
pub struct ScriptedGeocoder {
    responses: HashMap<String, Vec<Placemark>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new(responses: Vec<(&str, Vec<Placemark>)>) -> Self {
        ScriptedGeocoder {
            responses: responses
                .into_iter()
                .map(|(q, p)| (q.to_string(), p))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Placemark>> {
        self.calls.lock().unwrap().push(query.to_string());
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

/// Geocoder that fails a fixed number of times before delegating. Used to
/// exercise the single-retry-per-attempt behaviour.
pub struct FlakyGeocoder {
    failures_remaining: Mutex<u32>,
    inner: ScriptedGeocoder,
}

impl FlakyGeocoder {
    pub fn new(failures: u32, inner: ScriptedGeocoder) -> Self {
        FlakyGeocoder {
            failures_remaining: Mutex::new(failures),
            inner,
        }
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.inner.recorded_calls()
    }
}

#[async_trait]
impl Geocoder for FlakyGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Placemark>> {
        {
            let mut remaining = self.failures_remaining.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                self.inner.calls.lock().unwrap().push(query.to_string());
                return Err(PlanError::Geocoding("transient network error".to_string()));
            }
        }
        self.inner.geocode(query).await
    }
}

/// Reverse geocoder returning one fixed placemark for any coordinate.
pub struct FixedReverse(pub Option<Placemark>);

impl FixedReverse {
    pub fn none() -> Self {
        FixedReverse(None)
    }
}

#[async_trait]
impl ReverseGeocoder for FixedReverse {
    async fn reverse_geocode(&self, _point: &Coordinates) -> Result<Placemark> {
        self.0
            .clone()
            .ok_or_else(|| PlanError::Geocoding("reverse unavailable".to_string()))
    }
}

/// Place search answering from a per-category table.
pub struct StaticPlaceSearch {
    by_category: HashMap<PlaceCategory, Vec<PlaceCandidate>>,
}

impl StaticPlaceSearch {
    pub fn new(candidates: Vec<PlaceCandidate>) -> Self {
        let mut by_category: HashMap<PlaceCategory, Vec<PlaceCandidate>> = HashMap::new();
        for candidate in candidates {
            by_category.entry(candidate.category).or_default().push(candidate);
        }
        StaticPlaceSearch { by_category }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PlaceSearch for StaticPlaceSearch {
    async fn search(
        &self,
        category: &PlaceCategory,
        _center: &Coordinates,
        _radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>> {
        Ok(self.by_category.get(category).cloned().unwrap_or_default())
    }
}

/// Directions provider that always fails, forcing the speed-model fallback.
pub struct FailingDirections;

#[async_trait]
impl DirectionsProvider for FailingDirections {
    async fn leg(
        &self,
        _from: &Coordinates,
        _to: &Coordinates,
        _mode: &TransportMode,
    ) -> Result<RouteLeg> {
        Err(PlanError::Directions("no route".to_string()))
    }
}

/// Directions provider returning a fixed duration for every leg.
pub struct FixedDirections(pub Duration);

#[async_trait]
impl DirectionsProvider for FixedDirections {
    async fn leg(
        &self,
        from: &Coordinates,
        to: &Coordinates,
        _mode: &TransportMode,
    ) -> Result<RouteLeg> {
        Ok(RouteLeg {
            duration: self.0,
            distance_meters: from.distance_meters_to(to),
        })
    }
}

/// Location source that never produces a fix.
pub struct NeverFix;

#[async_trait]
impl LocationSource for NeverFix {
    async fn current_fix(&self) -> Result<Coordinates> {
        std::future::pending().await
    }
}

/// Location source with an immediate fix.
pub struct InstantFix(pub Coordinates);

#[async_trait]
impl LocationSource for InstantFix {
    async fn current_fix(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}
