//! Surprise ("adventure") itinerary generation.
//!
//! A specialised selector for the surprise flow: closest-first greedy pick of
//! up to three stops under cumulative budget checks, plus a single-stop
//! replacement operation.

use crate::constants::MAX_ADVENTURE_STOPS;
use crate::models::{
    Coordinates, Itinerary, PlaceCandidate, PlaceCategory, TransportMode, TripBudget,
};
use crate::planner::travel_estimator::TravelEstimator;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Duration;

/// Pick up to three stops for a surprise itinerary and describe them.
///
/// Candidates of the excluded category, or individually over budget, are
/// filtered out first; the rest are taken closest-first while both the time
/// and distance budgets still fit, each decremented cumulatively.
pub fn generate_surprise(
    start: &Coordinates,
    pool: &[PlaceCandidate],
    excluded: &PlaceCategory,
    budget: &TripBudget,
) -> (Vec<PlaceCandidate>, String) {
    let mut eligible: Vec<&PlaceCandidate> = pool
        .iter()
        .filter(|c| {
            c.category != *excluded
                && c.visit_duration() <= budget.time_budget
                && start.distance_to(&c.coordinates) <= budget.radius_km
        })
        .collect();
    eligible.sort_by(|a, b| {
        start
            .distance_to(&a.coordinates)
            .partial_cmp(&start.distance_to(&b.coordinates))
            .unwrap_or(Ordering::Equal)
    });

    let mut chosen = Vec::new();
    let mut remaining_time = budget.time_budget;
    let mut remaining_radius_km = budget.radius_km;

    for candidate in eligible {
        if chosen.len() >= MAX_ADVENTURE_STOPS {
            break;
        }
        let distance = start.distance_to(&candidate.coordinates);
        if candidate.visit_duration() <= remaining_time && distance <= remaining_radius_km {
            remaining_time -= candidate.visit_duration();
            remaining_radius_km -= distance;
            chosen.push(candidate.clone());
        }
    }

    let description = describe(&chosen);
    tracing::debug!(
        stops = chosen.len(),
        description = %description,
        "Surprise selection complete"
    );
    (chosen, description)
}

/// Human-readable summary of the chosen stops.
fn describe(stops: &[PlaceCandidate]) -> String {
    if stops.is_empty() {
        return "an open-ended wander".to_string();
    }
    if stops.len() == 1 {
        return format!("a surprise visit to {}", stops[0].name);
    }

    let mut categories: Vec<String> = Vec::new();
    for stop in stops {
        let label = stop.category.to_string();
        if !categories.contains(&label) {
            categories.push(label);
        }
    }

    if categories.len() == 1 {
        format!("an immersion in {}", categories[0])
    } else {
        let (last, rest) = categories.split_last().unwrap_or((&categories[0], &[]));
        format!("a journey through {} and {}", rest.join(", "), last)
    }
}

/// Swap the stop at `index` for the first pool candidate of a category not
/// already present that fits the time left in the budget. When nothing
/// qualifies, the itinerary is returned unchanged; that is not an error.
pub async fn replace_stop(
    estimator: &TravelEstimator,
    itinerary: &Itinerary,
    index: usize,
    pool: &[PlaceCandidate],
    budget: &TripBudget,
    mode: &TransportMode,
    round_trip: bool,
) -> Itinerary {
    if index >= itinerary.stops.len() {
        tracing::warn!(
            index = index,
            stops = itinerary.stops.len(),
            "Replacement index out of range, itinerary unchanged"
        );
        return itinerary.clone();
    }

    let retained: Vec<PlaceCandidate> = itinerary
        .stops
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, s)| s.place.clone())
        .collect();

    let retained_visit: Duration = retained.iter().map(|p| p.visit_duration()).sum();
    let remaining_time = budget.time_budget.saturating_sub(retained_visit);

    let present: HashSet<PlaceCategory> = retained.iter().map(|p| p.category).collect();
    let retained_ids: HashSet<_> = retained.iter().map(|p| p.id).collect();

    let replacement = pool.iter().find(|c| {
        !present.contains(&c.category)
            && !retained_ids.contains(&c.id)
            && c.visit_duration() <= remaining_time
    });

    let Some(replacement) = replacement else {
        tracing::info!(
            index = index,
            "No replacement candidate fits the remaining budget, itinerary unchanged"
        );
        return itinerary.clone();
    };

    let mut places = retained;
    places.push(replacement.clone());

    super::assemble_itinerary(estimator, &itinerary.start, places, mode, round_trip).await
}
