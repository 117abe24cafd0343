//! Budget-constrained, category-covering candidate selection.
//!
//! Two passes: a mandatory pass honouring the requested categories first,
//! then an opportunistic fill-in pass spending whatever time remains. A
//! single greedy pass over all candidates would not guarantee category
//! coverage, which is why the passes are separate.

use crate::models::{Coordinates, PlaceCandidate, PlaceCategory, TransportMode, TripBudget};
use crate::planner::travel_estimator::TravelEstimator;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Duration;
use uuid::Uuid;

pub struct BudgetSelector<'a> {
    estimator: &'a TravelEstimator,
}

struct MandatoryOutcome {
    selected: Vec<PlaceCandidate>,
    used_ids: HashSet<Uuid>,
    visit_time: Duration,
    remaining_time: Duration,
    remaining_radius_km: f64,
}

impl<'a> BudgetSelector<'a> {
    pub fn new(estimator: &'a TravelEstimator) -> Self {
        BudgetSelector { estimator }
    }

    /// Choose candidates to include, unordered (ordering is the route
    /// optimizer's job). Returns an empty or partial list rather than
    /// erroring; "nothing fits the budget" is a normal outcome.
    pub async fn select(
        &self,
        candidates: &[PlaceCandidate],
        requested: &[PlaceCategory],
        start: &Coordinates,
        budget: &TripBudget,
        mode: &TransportMode,
    ) -> Vec<PlaceCandidate> {
        let outcome = mandatory_pass(candidates, requested, start, budget);

        tracing::debug!(
            mandatory = outcome.selected.len(),
            requested = requested.len(),
            remaining_min = %format!("{:.0}", outcome.remaining_time.as_secs_f64() / 60.0),
            remaining_radius_km = %format!("{:.1}", outcome.remaining_radius_km),
            "Mandatory pass complete"
        );

        self.fill_in_pass(candidates, requested, start, budget, mode, outcome)
            .await
    }

    /// Spend the remaining time opportunistically: repeatedly try the
    /// candidate nearest to the last-added stop, accept it if the projected
    /// total stays within the budget plus tolerance, otherwise discard it
    /// and keep trying until the pool is exhausted.
    async fn fill_in_pass(
        &self,
        candidates: &[PlaceCandidate],
        requested: &[PlaceCategory],
        start: &Coordinates,
        budget: &TripBudget,
        mode: &TransportMode,
        outcome: MandatoryOutcome,
    ) -> Vec<PlaceCandidate> {
        let MandatoryOutcome {
            mut selected,
            mut used_ids,
            mut visit_time,
            ..
        } = outcome;

        let mut pool: Vec<PlaceCandidate> = candidates
            .iter()
            .filter(|c| requested.contains(&c.category) && !used_ids.contains(&c.id))
            .cloned()
            .collect();

        let mut travel_time = Duration::ZERO;
        let mut last_point = selected.last().map(|c| c.coordinates).unwrap_or(*start);
        let cap = budget.time_budget + budget.tolerance;

        while !pool.is_empty() {
            let nearest_idx = nearest_index(&pool, &last_point);
            let candidate = pool.remove(nearest_idx);

            let eta = self
                .estimator
                .estimate(&last_point, &candidate.coordinates, mode)
                .await;
            let projected = visit_time + travel_time + eta + candidate.visit_duration();

            if projected <= cap {
                visit_time += candidate.visit_duration();
                travel_time += eta;
                last_point = candidate.coordinates;
                used_ids.insert(candidate.id);
                tracing::debug!(place = %candidate.name, "Fill-in accepted");
                selected.push(candidate);
            } else {
                tracing::debug!(
                    place = %candidate.name,
                    projected_min = %format!("{:.0}", projected.as_secs_f64() / 60.0),
                    "Fill-in candidate exceeds budget, discarding"
                );
            }
        }

        selected
    }
}

/// Mandatory pass: one nearest fitting candidate per requested category, in
/// caller order, with both budgets decremented as stops are taken. A
/// category with no fitting candidate is skipped, not an error.
fn mandatory_pass(
    candidates: &[PlaceCandidate],
    requested: &[PlaceCategory],
    start: &Coordinates,
    budget: &TripBudget,
) -> MandatoryOutcome {
    let mut selected = Vec::new();
    let mut used_ids: HashSet<Uuid> = HashSet::new();
    let mut used_categories: HashSet<PlaceCategory> = HashSet::new();
    let mut visit_time = Duration::ZERO;
    let mut remaining_time = budget.time_budget;
    let mut remaining_radius_km = budget.radius_km;

    for category in requested {
        if used_categories.contains(category) {
            continue;
        }

        let mut of_category: Vec<&PlaceCandidate> = candidates
            .iter()
            .filter(|c| c.category == *category && !used_ids.contains(&c.id))
            .collect();
        of_category.sort_by(|a, b| {
            start
                .distance_to(&a.coordinates)
                .partial_cmp(&start.distance_to(&b.coordinates))
                .unwrap_or(Ordering::Equal)
        });

        let pick = of_category.into_iter().find(|c| {
            c.visit_duration() <= remaining_time
                && start.distance_to(&c.coordinates) <= remaining_radius_km
        });

        match pick {
            Some(candidate) => {
                remaining_time -= candidate.visit_duration();
                remaining_radius_km -= start.distance_to(&candidate.coordinates);
                visit_time += candidate.visit_duration();
                used_ids.insert(candidate.id);
                used_categories.insert(*category);
                selected.push(candidate.clone());
            }
            None => {
                tracing::debug!(
                    category = %category,
                    "No candidate fits the remaining budget, skipping category"
                );
            }
        }
    }

    MandatoryOutcome {
        selected,
        used_ids,
        visit_time,
        remaining_time,
        remaining_radius_km,
    }
}

fn nearest_index(pool: &[PlaceCandidate], point: &Coordinates) -> usize {
    let mut best_idx = 0;
    let mut best_distance = point.distance_to(&pool[0].coordinates);
    for (idx, candidate) in pool.iter().enumerate().skip(1) {
        let distance = point.distance_to(&candidate.coordinates);
        if distance < best_distance {
            best_distance = distance;
            best_idx = idx;
        }
    }
    best_idx
}
