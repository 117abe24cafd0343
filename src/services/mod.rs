pub mod directions;
pub mod geocoding;
pub mod place_search;

pub use directions::{DirectionsProvider, MapboxDirections, RouteLeg};
pub use geocoding::{Geocoder, NominatimClient, Placemark, ReverseGeocoder};
pub use place_search::{OverpassPlaceSearch, PlaceSearch};
