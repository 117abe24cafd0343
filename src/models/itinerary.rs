use crate::constants::DEFAULT_TOLERANCE_MARGIN_SECS;
use crate::models::{PlaceCandidate, PlaceCategory, ResolvedAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Walk,
    Bike,
    Drive,
    Transit,
}

impl TransportMode {
    /// Routing profile name for the directions collaborator.
    /// Public transport has no directions profile; those legs always use the
    /// fallback speed model.
    pub fn routing_profile(&self) -> Option<&str> {
        match self {
            TransportMode::Walk => Some("walking"),
            TransportMode::Bike => Some("cycling"),
            TransportMode::Drive => Some("driving"),
            TransportMode::Transit => None,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Walk => write!(f, "walk"),
            TransportMode::Bike => write!(f, "bike"),
            TransportMode::Drive => write!(f, "drive"),
            TransportMode::Transit => write!(f, "transit"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" | "walking" => Ok(TransportMode::Walk),
            "bike" | "cycling" | "bicycle" => Ok(TransportMode::Bike),
            "drive" | "driving" | "car" => Ok(TransportMode::Drive),
            "transit" | "public_transport" | "bus" => Ok(TransportMode::Transit),
            _ => Err(format!("Invalid transport mode: '{}'", s)),
        }
    }
}

/// Caller-supplied planning constraints.
///
/// `radius_km` bounds each candidate's distance from the start and, in the
/// mandatory selection pass, the cumulative distance budget. `tolerance`
/// allows the fill-in pass a small overshoot of the time budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripBudget {
    pub time_budget: Duration,
    pub radius_km: f64,
    pub tolerance: Duration,
}

impl TripBudget {
    pub fn new(time_budget: Duration, radius_km: f64) -> Self {
        TripBudget {
            time_budget,
            radius_km,
            tolerance: Duration::from_secs(DEFAULT_TOLERANCE_MARGIN_SECS),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// One stop in a planned itinerary, with offsets from departure time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryStop {
    pub place: PlaceCandidate,
    /// 1-based position in visiting order.
    pub order: u32,
    /// Cumulative travel+visit time elapsed when arriving here.
    pub arrival_offset: Duration,
    /// Cumulative travel+visit time elapsed when leaving here.
    pub departure_offset: Duration,
}

/// A planned multi-stop visit itinerary. Immutable once built; replacement
/// and re-ordering produce new values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: Uuid,
    pub start: ResolvedAddress,
    pub stops: Vec<ItineraryStop>,
    pub total_visit_time: Duration,
    pub total_travel_time: Duration,
    pub total_distance_km: f64,
}

impl Itinerary {
    pub fn new(
        start: ResolvedAddress,
        stops: Vec<ItineraryStop>,
        total_visit_time: Duration,
        total_travel_time: Duration,
        total_distance_km: f64,
    ) -> Self {
        Itinerary {
            id: Uuid::new_v4(),
            start,
            stops,
            total_visit_time,
            total_travel_time,
            total_distance_km,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Categories represented among the stops.
    pub fn categories(&self) -> HashSet<PlaceCategory> {
        self.stops.iter().map(|s| s.place.category).collect()
    }

    /// The places in visiting order, without timing information.
    pub fn places(&self) -> Vec<PlaceCandidate> {
        self.stops.iter().map(|s| s.place.clone()).collect()
    }
}
