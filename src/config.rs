use crate::constants::*;
use crate::models::TransportMode;
use std::env;

/// Average speeds (km/h) per transport mode, used by the deterministic
/// travel-time fallback when the directions collaborator fails.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelSpeeds {
    pub walk_kmh: f64,
    pub bike_kmh: f64,
    pub drive_kmh: f64,
    pub transit_kmh: f64,
}

impl Default for TravelSpeeds {
    fn default() -> Self {
        Self {
            walk_kmh: DEFAULT_WALK_SPEED_KMH,
            bike_kmh: DEFAULT_BIKE_SPEED_KMH,
            drive_kmh: DEFAULT_DRIVE_SPEED_KMH,
            transit_kmh: DEFAULT_TRANSIT_SPEED_KMH,
        }
    }
}

impl TravelSpeeds {
    pub fn for_mode(&self, mode: &TransportMode) -> f64 {
        match mode {
            TransportMode::Walk => self.walk_kmh,
            TransportMode::Bike => self.bike_kmh,
            TransportMode::Drive => self.drive_kmh,
            TransportMode::Transit => self.transit_kmh,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Whether itinerary travel totals include a return leg back to the
    /// start point. One-way by default.
    pub round_trip: bool,

    /// Delay (ms) before retrying a transiently failed geocoding attempt.
    pub geocode_retry_delay_ms: u64,

    /// Bound (seconds) on waiting for a device location fix.
    pub location_fix_timeout_secs: u64,

    /// City used by the synthetic resolver fallback when no known city name
    /// appears in the input text.
    pub default_city: String,

    /// Fallback speed model per transport mode.
    pub speeds: TravelSpeeds,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            round_trip: false,
            geocode_retry_delay_ms: DEFAULT_GEOCODE_RETRY_DELAY_MS,
            location_fix_timeout_secs: DEFAULT_LOCATION_FIX_TIMEOUT_SECS,
            default_city: crate::cities::DEFAULT_CITY.to_string(),
            speeds: TravelSpeeds::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            round_trip: env::var("TRIP_ROUND_TRIP")
                .unwrap_or_else(|_| defaults.round_trip.to_string())
                .parse()
                .map_err(|_| "Invalid TRIP_ROUND_TRIP")?,

            geocode_retry_delay_ms: env::var("TRIP_GEOCODE_RETRY_DELAY_MS")
                .unwrap_or_else(|_| defaults.geocode_retry_delay_ms.to_string())
                .parse()
                .map_err(|_| "Invalid TRIP_GEOCODE_RETRY_DELAY_MS")?,

            location_fix_timeout_secs: env::var("TRIP_LOCATION_FIX_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.location_fix_timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid TRIP_LOCATION_FIX_TIMEOUT_SECS")?,

            default_city: env::var("TRIP_DEFAULT_CITY").unwrap_or(defaults.default_city),

            speeds: TravelSpeeds {
                walk_kmh: env::var("TRIP_WALK_SPEED_KMH")
                    .unwrap_or_else(|_| defaults.speeds.walk_kmh.to_string())
                    .parse()
                    .map_err(|_| "Invalid TRIP_WALK_SPEED_KMH")?,

                bike_kmh: env::var("TRIP_BIKE_SPEED_KMH")
                    .unwrap_or_else(|_| defaults.speeds.bike_kmh.to_string())
                    .parse()
                    .map_err(|_| "Invalid TRIP_BIKE_SPEED_KMH")?,

                drive_kmh: env::var("TRIP_DRIVE_SPEED_KMH")
                    .unwrap_or_else(|_| defaults.speeds.drive_kmh.to_string())
                    .parse()
                    .map_err(|_| "Invalid TRIP_DRIVE_SPEED_KMH")?,

                transit_kmh: env::var("TRIP_TRANSIT_SPEED_KMH")
                    .unwrap_or_else(|_| defaults.speeds.transit_kmh.to_string())
                    .parse()
                    .map_err(|_| "Invalid TRIP_TRANSIT_SPEED_KMH")?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_speeds_match_constants() {
        let speeds = TravelSpeeds::default();
        assert_eq!(speeds.for_mode(&TransportMode::Walk), 5.0);
        assert_eq!(speeds.for_mode(&TransportMode::Bike), 15.0);
        assert_eq!(speeds.for_mode(&TransportMode::Drive), 35.0);
        assert_eq!(speeds.for_mode(&TransportMode::Transit), 22.0);
    }

    #[test]
    fn test_default_config_is_one_way() {
        let config = PlannerConfig::default();
        assert!(!config.round_trip);
        assert_eq!(config.location_fix_timeout_secs, 10);
    }
}
