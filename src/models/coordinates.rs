use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Great-circle distance to another point using the Haversine formula.
    /// Returns kilometres. Never Euclidean on raw degrees.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Great-circle distance in metres.
    pub fn distance_meters_to(&self, other: &Coordinates) -> f64 {
        self.distance_to(other) * 1000.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Parses a literal "lat,lng" pair, e.g. `"48.8566, 2.3522"`.
/// Used by the address resolver to short-circuit geocoding.
impl FromStr for Coordinates {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat_str, lng_str) = s
            .split_once(',')
            .ok_or_else(|| format!("Not a coordinate pair: '{}'", s))?;
        let lat: f64 = lat_str
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: '{}'", lat_str.trim()))?;
        let lng: f64 = lng_str
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: '{}'", lng_str.trim()))?;
        Coordinates::new(lat, lng)
    }
}
