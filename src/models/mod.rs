pub mod address;
pub mod coordinates;
pub mod itinerary;
pub mod place;

pub use address::ResolvedAddress;
pub use coordinates::Coordinates;
pub use itinerary::{Itinerary, ItineraryStop, TransportMode, TripBudget};
pub use place::{PlaceCandidate, PlaceCategory};
