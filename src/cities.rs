//! Static city-centroid table.
//!
//! Consumed only by the address resolver: attempt 4 retries geocoding with a
//! recognised city name, and attempt 5 synthesises a low-confidence result
//! directly from a centroid. Route optimisation and budget selection never
//! touch this table.

use crate::models::Coordinates;

/// City used when no known city name appears in the input text.
pub const DEFAULT_CITY: &str = "Paris";

/// Known city names and their approximate centroids.
const CITY_CENTROIDS: &[(&str, f64, f64)] = &[
    ("Paris", 48.8566, 2.3522),
    ("Lyon", 45.7640, 4.8357),
    ("Marseille", 43.2965, 5.3698),
    ("Toulouse", 43.6047, 1.4442),
    ("Bordeaux", 44.8378, -0.5792),
    ("Lille", 50.6292, 3.0573),
    ("Nantes", 47.2184, -1.5536),
    ("Strasbourg", 48.5734, 7.7521),
    ("Nice", 43.7102, 7.2620),
    ("Montpellier", 43.6108, 3.8767),
    ("Rennes", 48.1173, -1.6778),
    ("London", 51.5074, -0.1278),
    ("Brussels", 50.8503, 4.3517),
    ("Geneva", 46.2044, 6.1432),
    ("Barcelona", 41.3874, 2.1686),
    ("Amsterdam", 52.3676, 4.9041),
];

/// Find a known city whose name appears in `text` (case-insensitive).
/// Returns the canonical name and its centroid.
pub fn find_city(text: &str) -> Option<(&'static str, Coordinates)> {
    let haystack = text.to_lowercase();
    CITY_CENTROIDS
        .iter()
        .find(|(name, _, _)| haystack.contains(&name.to_lowercase()))
        .map(|(name, lat, lng)| (*name, Coordinates { lat: *lat, lng: *lng }))
}

/// Look up a city centroid by exact name (case-insensitive).
pub fn centroid_of(name: &str) -> Option<Coordinates> {
    CITY_CENTROIDS
        .iter()
        .find(|(city, _, _)| city.eq_ignore_ascii_case(name))
        .map(|(_, lat, lng)| Coordinates { lat: *lat, lng: *lng })
}

/// Centroid for the synthetic fallback: a city matched in `text`, or the
/// configured default city, or the built-in default as a last resort.
pub fn centroid_for_fallback(text: &str, default_city: &str) -> (String, Coordinates) {
    if let Some((name, point)) = find_city(text) {
        return (name.to_string(), point);
    }
    if let Some(point) = centroid_of(default_city) {
        return (default_city.to_string(), point);
    }
    // The configured default city is free text, so it may not be in the
    // table. DEFAULT_CITY always is.
    let point = centroid_of(DEFAULT_CITY).unwrap_or(Coordinates {
        lat: 48.8566,
        lng: 2.3522,
    });
    (DEFAULT_CITY.to_string(), point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_city_substring_match() {
        let (name, point) = find_city("Musee des Beaux-Arts, lyon centre").unwrap();
        assert_eq!(name, "Lyon");
        assert!((point.lat - 45.764).abs() < 0.01);
    }

    #[test]
    fn test_find_city_no_match() {
        assert!(find_city("somewhere unrecognisable").is_none());
    }

    #[test]
    fn test_fallback_prefers_matched_city() {
        let (name, _) = centroid_for_fallback("vieux port marseille", "Paris");
        assert_eq!(name, "Marseille");
    }

    #[test]
    fn test_fallback_uses_default_city() {
        let (name, point) = centroid_for_fallback("nowhere in particular", "Bordeaux");
        assert_eq!(name, "Bordeaux");
        assert!((point.lat - 44.8378).abs() < 0.001);
    }

    #[test]
    fn test_fallback_unknown_default_degrades_to_builtin() {
        let (name, _) = centroid_for_fallback("nowhere", "Atlantis");
        assert_eq!(name, DEFAULT_CITY);
    }
}
