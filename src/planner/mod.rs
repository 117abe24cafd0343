pub mod adventure;
pub mod budget_selector;
pub mod route_optimizer;
pub mod scoring;
pub mod travel_estimator;

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::models::{
    Coordinates, Itinerary, ItineraryStop, PlaceCandidate, PlaceCategory, ResolvedAddress,
    TransportMode, TripBudget,
};
use crate::resolver::AddressResolver;
use crate::services::directions::DirectionsProvider;
use crate::services::geocoding::{Geocoder, ReverseGeocoder};
use crate::services::place_search::PlaceSearch;
use budget_selector::BudgetSelector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use travel_estimator::TravelEstimator;

/// A multi-address guided tour: resolved addresses in visiting order with
/// aggregate travel figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub addresses: Vec<ResolvedAddress>,
    pub total_travel_time: Duration,
    pub total_distance_km: f64,
}

/// Top-level planning facade tying the resolver, selector, optimizer and
/// estimator together. All external collaborators are injected, so the whole
/// planner is deterministic under canned responses.
pub struct TripPlanner {
    resolver: AddressResolver,
    places: Arc<dyn PlaceSearch>,
    estimator: TravelEstimator,
    config: PlannerConfig,
}

impl TripPlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        reverse: Arc<dyn ReverseGeocoder>,
        places: Arc<dyn PlaceSearch>,
        directions: Arc<dyn DirectionsProvider>,
        config: PlannerConfig,
    ) -> Self {
        let resolver = AddressResolver::new(geocoder, reverse, config.clone());
        let estimator = TravelEstimator::new(directions, config.speeds.clone());
        TripPlanner {
            resolver,
            places,
            estimator,
            config,
        }
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    pub fn estimator(&self) -> &TravelEstimator {
        &self.estimator
    }

    /// Plan a day trip from a free-text starting address.
    ///
    /// Candidate search failures per category degrade to partial pools; an
    /// empty itinerary is a valid outcome, not an error.
    pub async fn plan_day_trip(
        &self,
        start_text: &str,
        requested: &[PlaceCategory],
        budget: &TripBudget,
        mode: &TransportMode,
    ) -> Result<Itinerary> {
        let start = self.resolver.resolve(start_text).await?;
        self.plan_day_trip_from(start, requested, budget, mode).await
    }

    /// Same as [`plan_day_trip`](Self::plan_day_trip) but with an already
    /// resolved start, e.g. from a device location fix.
    pub async fn plan_day_trip_from(
        &self,
        start: ResolvedAddress,
        requested: &[PlaceCategory],
        budget: &TripBudget,
        mode: &TransportMode,
    ) -> Result<Itinerary> {
        tracing::info!(
            start = %start.display_name,
            categories = requested.len(),
            budget_min = %format!("{:.0}", budget.time_budget.as_secs_f64() / 60.0),
            "Planning day trip"
        );

        let candidates = self
            .search_candidates(&start.coordinates, requested, budget.radius_km)
            .await;

        let selector = BudgetSelector::new(&self.estimator);
        let chosen = selector
            .select(&candidates, requested, &start.coordinates, budget, mode)
            .await;
        let ordered = route_optimizer::order_stops(&start.coordinates, &chosen);

        let itinerary =
            assemble_itinerary(&self.estimator, &start, ordered, mode, self.config.round_trip)
                .await;

        tracing::info!(
            stops = itinerary.stops.len(),
            travel_min = %format!("{:.0}", itinerary.total_travel_time.as_secs_f64() / 60.0),
            visit_min = %format!("{:.0}", itinerary.total_visit_time.as_secs_f64() / 60.0),
            "Day trip planned"
        );
        Ok(itinerary)
    }

    /// Rank a candidate pool by interest score from a start point, best
    /// first. Display ordering only.
    pub fn rank_suggestions(
        &self,
        candidates: &[PlaceCandidate],
        start: &Coordinates,
    ) -> Vec<(f64, PlaceCandidate)> {
        scoring::rank_by_interest(candidates, start)
    }

    /// Plan a surprise itinerary of up to three stops, avoiding one category.
    pub async fn plan_adventure(
        &self,
        start_text: &str,
        excluded: &PlaceCategory,
        budget: &TripBudget,
        mode: &TransportMode,
    ) -> Result<(Itinerary, String)> {
        let start = self.resolver.resolve(start_text).await?;

        let pool_categories: Vec<PlaceCategory> = PlaceCategory::adventure_pool()
            .into_iter()
            .filter(|c| c != excluded)
            .collect();
        let pool = self
            .search_candidates(&start.coordinates, &pool_categories, budget.radius_km)
            .await;

        let (stops, description) =
            adventure::generate_surprise(&start.coordinates, &pool, excluded, budget);

        // The surprise selection is already closest-first from the start, so
        // its order is kept as the visiting order.
        let itinerary =
            assemble_itinerary(&self.estimator, &start, stops, mode, self.config.round_trip).await;

        Ok((itinerary, description))
    }

    /// Swap one stop of an itinerary for a fitting candidate of a category
    /// not already present. Unchanged itinerary when nothing qualifies.
    pub async fn replace_stop(
        &self,
        itinerary: &Itinerary,
        index: usize,
        pool: &[PlaceCandidate],
        budget: &TripBudget,
        mode: &TransportMode,
    ) -> Itinerary {
        adventure::replace_stop(
            &self.estimator,
            itinerary,
            index,
            pool,
            budget,
            mode,
            self.config.round_trip,
        )
        .await
    }

    /// Plan a guided tour over several free-text addresses. Resolution is
    /// sequential in input order; fewer than two reliable addresses is fatal.
    /// The first address anchors the route; the rest are visited
    /// nearest-neighbor.
    pub async fn plan_tour(&self, address_texts: &[String], mode: &TransportMode) -> Result<Tour> {
        let resolved = self.resolver.resolve_many(address_texts).await?;

        let Some((first, rest)) = resolved.split_first() else {
            return Ok(Tour {
                addresses: Vec::new(),
                total_travel_time: Duration::ZERO,
                total_distance_km: 0.0,
            });
        };

        let ordered_rest =
            route_optimizer::order_by_nearest(&first.coordinates, rest, |a| &a.coordinates);

        let mut addresses = vec![first.clone()];
        addresses.extend(ordered_rest);

        let mut total_travel_time = Duration::ZERO;
        let mut total_distance_km = 0.0;
        for pair in addresses.windows(2) {
            let eta = self
                .estimator
                .estimate(&pair[0].coordinates, &pair[1].coordinates, mode)
                .await;
            total_travel_time += eta;
            total_distance_km += pair[0].coordinates.distance_to(&pair[1].coordinates);
        }

        Ok(Tour {
            addresses,
            total_travel_time,
            total_distance_km,
        })
    }

    /// Gather candidates per requested category from the search
    /// collaborator. Per-category failures are logged and skipped; duplicate
    /// ids across categories are dropped.
    async fn search_candidates(
        &self,
        center: &Coordinates,
        requested: &[PlaceCategory],
        radius_km: f64,
    ) -> Vec<PlaceCandidate> {
        let radius_meters = radius_km * 1000.0;
        let mut seen_ids = HashSet::new();
        let mut seen_categories = HashSet::new();
        let mut candidates = Vec::new();

        for category in requested {
            if !seen_categories.insert(*category) {
                continue;
            }
            match self.places.search(category, center, radius_meters).await {
                Ok(found) => {
                    for candidate in found {
                        if seen_ids.insert(candidate.id) {
                            candidates.push(candidate);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        category = %category,
                        error = %e,
                        "Place search failed for category, continuing without it"
                    );
                }
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            categories = requested.len(),
            "Candidate discovery complete"
        );
        candidates
    }
}

/// Build an immutable itinerary from ordered stops: per-leg travel
/// estimation, cumulative arrival/departure offsets and totals. With
/// `round_trip` the return leg back to the start counts towards travel time
/// and distance.
pub(crate) async fn assemble_itinerary(
    estimator: &TravelEstimator,
    start: &ResolvedAddress,
    places: Vec<PlaceCandidate>,
    mode: &TransportMode,
    round_trip: bool,
) -> Itinerary {
    let mut stops = Vec::with_capacity(places.len());
    let mut clock = Duration::ZERO;
    let mut total_travel_time = Duration::ZERO;
    let mut total_visit_time = Duration::ZERO;
    let mut total_distance_km = 0.0;
    let mut current = start.coordinates;

    for (idx, place) in places.into_iter().enumerate() {
        let eta = estimator.estimate(&current, &place.coordinates, mode).await;
        total_travel_time += eta;
        total_distance_km += current.distance_to(&place.coordinates);

        clock += eta;
        let arrival_offset = clock;
        let visit = place.visit_duration();
        clock += visit;
        total_visit_time += visit;

        current = place.coordinates;
        stops.push(ItineraryStop {
            place,
            order: idx as u32 + 1,
            arrival_offset,
            departure_offset: clock,
        });
    }

    if round_trip {
        if let Some(last) = stops.last() {
            let eta = estimator
                .estimate(&last.place.coordinates, &start.coordinates, mode)
                .await;
            total_travel_time += eta;
            total_distance_km += last.place.coordinates.distance_to(&start.coordinates);
        }
    }

    Itinerary::new(
        start.clone(),
        stops,
        total_visit_time,
        total_travel_time,
        total_distance_km,
    )
}
