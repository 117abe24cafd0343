//! Multi-stop visit itinerary planning.
//!
//! Given a noisy free-text starting address, a set of desired place
//! categories and a time/distance budget, this library resolves the address
//! to a coordinate, chooses which candidate places to visit so every
//! requested category is covered when possible, orders the visits with a
//! nearest-neighbor heuristic and estimates travel and visit time against
//! the budget.
//!
//! Geocoding, place search and directions are injectable collaborators
//! ([`services`]); production HTTP implementations are provided, and canned
//! in-memory implementations make every planning flow deterministic in
//! tests. No component holds shared mutable state across requests.

pub mod cities;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod planner;
pub mod resolver;
pub mod services;

pub use config::{PlannerConfig, TravelSpeeds};
pub use error::{PlanError, Result};
pub use models::{
    Coordinates, Itinerary, ItineraryStop, PlaceCandidate, PlaceCategory, ResolvedAddress,
    TransportMode, TripBudget,
};
pub use planner::{Tour, TripPlanner};
pub use resolver::{AddressResolver, LocationSource};
