use crate::constants::RELIABLE_CONFIDENCE_THRESHOLD;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A free-text address resolved to a coordinate.
///
/// `confidence` is a best-effort relevance heuristic in `[0, 1]`, not a
/// probability. Synthetic results come from the city-centroid fallback and
/// never count as reliable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// The original input text.
    pub query: String,
    pub coordinates: Coordinates,
    pub display_name: String,
    pub confidence: f64,
    /// True when the result was synthesised from the city-centroid table
    /// rather than returned by the geocoding collaborator.
    pub synthetic: bool,
}

impl ResolvedAddress {
    pub fn new(
        query: String,
        coordinates: Coordinates,
        display_name: String,
        confidence: f64,
        synthetic: bool,
    ) -> Self {
        ResolvedAddress {
            query,
            coordinates,
            display_name,
            confidence: confidence.clamp(0.0, 1.0),
            synthetic,
        }
    }

    /// Whether multi-address flows may count on this resolution.
    pub fn is_reliable(&self) -> bool {
        !self.synthetic && self.confidence >= RELIABLE_CONFIDENCE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Coordinates {
        Coordinates::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn test_confidence_is_clamped() {
        let addr = ResolvedAddress::new("x".to_string(), point(), "X".to_string(), 1.7, false);
        assert_eq!(addr.confidence, 1.0);

        let addr = ResolvedAddress::new("x".to_string(), point(), "X".to_string(), -0.5, false);
        assert_eq!(addr.confidence, 0.0);
    }

    #[test]
    fn test_synthetic_is_never_reliable() {
        let addr = ResolvedAddress::new("x".to_string(), point(), "X".to_string(), 0.9, true);
        assert!(!addr.is_reliable());
    }

    #[test]
    fn test_low_confidence_is_unreliable() {
        let addr = ResolvedAddress::new("x".to_string(), point(), "X".to_string(), 0.1, false);
        assert!(!addr.is_reliable());

        let addr = ResolvedAddress::new("x".to_string(), point(), "X".to_string(), 0.5, false);
        assert!(addr.is_reliable());
    }
}
