//! Interest scoring for suggestion ranking.
//!
//! Scores order candidates for display; they are never used as a
//! feasibility gate.

use crate::constants::{
    SUGGESTION_BASE_SCORE, SUGGESTION_DISTANCE_PENALTY_PER_KM, SUGGESTION_NOVELTY_BONUS,
    SUGGESTION_RATING_WEIGHT,
};
use crate::models::{Coordinates, PlaceCandidate};
use std::cmp::Ordering;

/// Interest score combining rating, distance and novelty. Always `>= 0`.
pub fn suggestion_score(candidate: &PlaceCandidate, distance_from_start_km: f64) -> f64 {
    let rating = f64::from(candidate.rating.unwrap_or(0.0));
    let novelty = if candidate.has_novelty_tag() {
        SUGGESTION_NOVELTY_BONUS
    } else {
        0.0
    };

    let score = SUGGESTION_BASE_SCORE + rating * SUGGESTION_RATING_WEIGHT
        - distance_from_start_km * SUGGESTION_DISTANCE_PENALTY_PER_KM
        + novelty;

    score.max(0.0)
}

/// Candidates sorted by descending interest score from `start`.
/// Equal scores keep their input order.
pub fn rank_by_interest(
    candidates: &[PlaceCandidate],
    start: &Coordinates,
) -> Vec<(f64, PlaceCandidate)> {
    let mut ranked: Vec<(f64, PlaceCandidate)> = candidates
        .iter()
        .map(|c| {
            let distance = start.distance_to(&c.coordinates);
            (suggestion_score(c, distance), c.clone())
        })
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaceCategory;

    fn place(name: &str, lat: f64, lng: f64) -> PlaceCandidate {
        PlaceCandidate::new(
            name.to_string(),
            PlaceCategory::Museum,
            Coordinates::new(lat, lng).unwrap(),
        )
    }

    #[test]
    fn test_score_formula() {
        let candidate = place("Musee", 48.86, 2.33).with_rating(4.0);
        // 100 + 4*10 - 2*5 = 130
        assert_eq!(suggestion_score(&candidate, 2.0), 130.0);
    }

    #[test]
    fn test_missing_rating_counts_as_zero() {
        let candidate = place("Unrated", 48.86, 2.33);
        assert_eq!(suggestion_score(&candidate, 0.0), 100.0);
    }

    #[test]
    fn test_novelty_bonus() {
        let plain = place("Plain", 48.86, 2.33);
        let novel = place("Novel", 48.86, 2.33).with_tags(vec!["original".to_string()]);
        assert_eq!(
            suggestion_score(&novel, 1.0) - suggestion_score(&plain, 1.0),
            20.0
        );
    }

    #[test]
    fn test_score_never_negative() {
        let candidate = place("Remote", 48.86, 2.33);
        // 500 km distance penalty would push far below zero.
        assert_eq!(suggestion_score(&candidate, 500.0), 0.0);
    }

    #[test]
    fn test_ranking_is_descending() {
        let start = Coordinates::new(48.8566, 2.3522).unwrap();
        let near_good = place("Near good", 48.8570, 2.3530).with_rating(5.0);
        let far_plain = place("Far plain", 48.95, 2.50);

        let ranked = rank_by_interest(&[far_plain, near_good], &start);
        assert_eq!(ranked[0].1.name, "Near good");
        assert!(ranked[0].0 > ranked[1].0);
    }
}
