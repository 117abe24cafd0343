//! Greedy nearest-neighbor stop ordering.
//!
//! Result quality is good but not provably shortest; the order is never
//! re-optimised afterwards (no 2-opt pass).

use crate::models::{Coordinates, PlaceCandidate};

/// Order stops by repeatedly visiting the nearest unvisited one, starting
/// from `start`. O(n^2) distance evaluations; ties go to the earliest
/// occurrence in the input, so the result is deterministic.
pub fn order_stops(start: &Coordinates, stops: &[PlaceCandidate]) -> Vec<PlaceCandidate> {
    order_by_nearest(start, stops, |c| &c.coordinates)
}

/// Nearest-neighbor ordering over any item carrying a coordinate.
pub fn order_by_nearest<T, F>(start: &Coordinates, items: &[T], point_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &Coordinates,
{
    let mut remaining: Vec<T> = items.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = *start;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_distance = current.distance_to(point_of(&remaining[0]));

        for (idx, item) in remaining.iter().enumerate().skip(1) {
            let distance = current.distance_to(point_of(item));
            // Strict comparison keeps the first occurrence on ties.
            if distance < best_distance {
                best_distance = distance;
                best_idx = idx;
            }
        }

        let next = remaining.remove(best_idx);
        current = *point_of(&next);
        ordered.push(next);
    }

    ordered
}
