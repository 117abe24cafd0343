//! Stable library-wide constants.
//!
//! Values here are algorithm coefficients and default fallbacks for
//! env-var-based configuration. They should rarely change. Runtime tuning
//! knobs live in [`PlannerConfig`](crate::config::PlannerConfig) instead.

// --- Travel speed defaults (km/h, used when env vars are absent) ---
// These feed the deterministic duration fallback when the directions
// collaborator is unavailable for a leg.

/// Default walking speed. Overridden by `TRIP_WALK_SPEED_KMH`.
pub const DEFAULT_WALK_SPEED_KMH: f64 = 5.0;
/// Default cycling speed. Overridden by `TRIP_BIKE_SPEED_KMH`.
pub const DEFAULT_BIKE_SPEED_KMH: f64 = 15.0;
/// Default driving speed (urban). Overridden by `TRIP_DRIVE_SPEED_KMH`.
pub const DEFAULT_DRIVE_SPEED_KMH: f64 = 35.0;
/// Default public-transport speed. Overridden by `TRIP_TRANSIT_SPEED_KMH`.
pub const DEFAULT_TRANSIT_SPEED_KMH: f64 = 22.0;

// --- Address resolution ---

/// Minimum relevance score for a geocoding result to be accepted before the
/// last live attempt. The last live attempt accepts any returned placemark
/// regardless of score, so the fallback chain always terminates.
pub const RELEVANCE_ACCEPT_THRESHOLD: f64 = 0.3;
/// Confidence assigned to synthetic city-centroid fallback results.
pub const SYNTHETIC_CONFIDENCE: f64 = 0.1;
/// Minimum confidence for an address to count as "reliable" in multi-address
/// flows. Synthetic results are never reliable regardless of this value.
pub const RELIABLE_CONFIDENCE_THRESHOLD: f64 = 0.3;
/// Default delay before retrying a transiently failed geocoding attempt.
/// Overridden by `TRIP_GEOCODE_RETRY_DELAY_MS`.
pub const DEFAULT_GEOCODE_RETRY_DELAY_MS: u64 = 500;
/// Default bound on waiting for a device location fix.
/// Overridden by `TRIP_LOCATION_FIX_TIMEOUT_SECS`.
pub const DEFAULT_LOCATION_FIX_TIMEOUT_SECS: u64 = 10;

// --- Relevance scoring weights ---
// Contributions are summed per placemark and clamped to [0, 1].

/// Returned name equals the query.
pub const SCORE_NAME_EXACT: f64 = 1.0;
/// Returned name contains the query, or the query contains the name.
pub const SCORE_NAME_PARTIAL: f64 = 0.7;
/// Returned street appears verbatim in the query.
pub const SCORE_STREET_EXACT: f64 = 0.9;
/// Returned street shares a word with the query.
pub const SCORE_STREET_PARTIAL: f64 = 0.4;
/// Returned locality appears verbatim in the query.
pub const SCORE_LOCALITY_EXACT: f64 = 0.7;
/// Returned locality shares a word with the query.
pub const SCORE_LOCALITY_PARTIAL: f64 = 0.3;
/// Returned country appears in the query.
pub const SCORE_COUNTRY_PARTIAL: f64 = 0.2;
/// Name, street and locality are all present on the placemark.
pub const SCORE_COMPLETENESS_BONUS: f64 = 0.3;
/// No query word overlaps the returned locality.
pub const SCORE_LOCALITY_MISS_PENALTY: f64 = 0.2;

// --- Budget selection ---

/// Default overshoot allowance for the fill-in pass: 10 minutes.
pub const DEFAULT_TOLERANCE_MARGIN_SECS: u64 = 600;

// --- Suggestion scoring coefficients ---

/// Base score every candidate starts from.
pub const SUGGESTION_BASE_SCORE: f64 = 100.0;
/// Score added per rating point.
pub const SUGGESTION_RATING_WEIGHT: f64 = 10.0;
/// Score removed per kilometre from the start point.
pub const SUGGESTION_DISTANCE_PENALTY_PER_KM: f64 = 5.0;
/// Bonus for candidates tagged "unique" or "original".
pub const SUGGESTION_NOVELTY_BONUS: f64 = 20.0;

// --- Adventure generation ---

/// Hard upper bound on stops in a surprise itinerary.
pub const MAX_ADVENTURE_STOPS: usize = 3;
