use crate::config::TravelSpeeds;
use crate::models::{Coordinates, TransportMode};
use crate::services::directions::DirectionsProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Per-leg travel-time estimation.
///
/// Prefers the live directions collaborator; on any failure falls back to a
/// deterministic `distance / average_speed(mode)` model. Never raises to the
/// caller. Degraded legs are logged and counted for observability.
pub struct TravelEstimator {
    directions: Arc<dyn DirectionsProvider>,
    speeds: TravelSpeeds,
    degraded_legs: AtomicU64,
}

impl TravelEstimator {
    pub fn new(directions: Arc<dyn DirectionsProvider>, speeds: TravelSpeeds) -> Self {
        TravelEstimator {
            directions,
            speeds,
            degraded_legs: AtomicU64::new(0),
        }
    }

    /// Expected travel time for one leg. Always returns a usable duration.
    pub async fn estimate(
        &self,
        from: &Coordinates,
        to: &Coordinates,
        mode: &TransportMode,
    ) -> Duration {
        match self.directions.leg(from, to, mode).await {
            Ok(leg) => leg.duration,
            Err(e) => {
                self.degraded_legs.fetch_add(1, Ordering::Relaxed);
                let fallback = self.fallback_estimate(from, to, mode);
                tracing::warn!(
                    error = %e,
                    mode = %mode,
                    fallback_min = %format!("{:.0}", fallback.as_secs_f64() / 60.0),
                    "Directions leg failed, using speed-model fallback"
                );
                fallback
            }
        }
    }

    /// Deterministic speed-model estimate for a leg.
    pub fn fallback_estimate(
        &self,
        from: &Coordinates,
        to: &Coordinates,
        mode: &TransportMode,
    ) -> Duration {
        self.duration_for_distance(from.distance_to(to), mode)
    }

    /// Travel time for a known distance under the configured average speed.
    pub fn duration_for_distance(&self, distance_km: f64, mode: &TransportMode) -> Duration {
        let speed_kmh = self.speeds.for_mode(mode);
        Duration::from_secs_f64(distance_km / speed_kmh * 3600.0)
    }

    /// How many legs have fallen back to the speed model so far.
    pub fn degraded_leg_count(&self) -> u64 {
        self.degraded_legs.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlanError, Result};
    use crate::services::directions::RouteLeg;
    use async_trait::async_trait;

    struct FailingDirections;

    #[async_trait]
    impl DirectionsProvider for FailingDirections {
        async fn leg(
            &self,
            _from: &Coordinates,
            _to: &Coordinates,
            _mode: &TransportMode,
        ) -> Result<RouteLeg> {
            Err(PlanError::Directions("no route".to_string()))
        }
    }

    struct FixedDirections(Duration);

    #[async_trait]
    impl DirectionsProvider for FixedDirections {
        async fn leg(
            &self,
            _from: &Coordinates,
            _to: &Coordinates,
            _mode: &TransportMode,
        ) -> Result<RouteLeg> {
            Ok(RouteLeg {
                duration: self.0,
                distance_meters: 1000.0,
            })
        }
    }

    #[test]
    fn test_ten_km_walking_fallback_is_two_hours() {
        let estimator =
            TravelEstimator::new(Arc::new(FailingDirections), TravelSpeeds::default());
        let eta = estimator.duration_for_distance(10.0, &TransportMode::Walk);
        assert_eq!(eta, Duration::from_secs(2 * 3600));
    }

    #[test]
    fn test_failing_provider_degrades_and_counts() {
        let estimator =
            TravelEstimator::new(Arc::new(FailingDirections), TravelSpeeds::default());
        let from = Coordinates::new(48.0, 2.0).unwrap();
        let to = Coordinates::new(48.05, 2.0).unwrap();

        let eta = tokio_test::block_on(estimator.estimate(&from, &to, &TransportMode::Walk));
        let expected = estimator.fallback_estimate(&from, &to, &TransportMode::Walk);

        assert_eq!(eta, expected);
        assert_eq!(estimator.degraded_leg_count(), 1);
    }

    #[test]
    fn test_live_provider_is_preferred() {
        let estimator = TravelEstimator::new(
            Arc::new(FixedDirections(Duration::from_secs(1234))),
            TravelSpeeds::default(),
        );
        let from = Coordinates::new(48.0, 2.0).unwrap();
        let to = Coordinates::new(48.05, 2.0).unwrap();

        let eta = tokio_test::block_on(estimator.estimate(&from, &to, &TransportMode::Bike));
        assert_eq!(eta, Duration::from_secs(1234));
        assert_eq!(estimator.degraded_leg_count(), 0);
    }
}
