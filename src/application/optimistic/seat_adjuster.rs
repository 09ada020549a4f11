//! SeatAdjuster - optimistic seat availability changes on the company
//! dashboard.

use std::sync::{Arc, Mutex, PoisonError};

use super::{MutationError, OptimisticController};
use crate::application::flight_view::FlightListView;
use crate::domain::booking::{clamp_seats, SeatSnapshot};
use crate::domain::foundation::FlightId;
use crate::ports::{BroadcastBus, BroadcastEvent, CompanyFlightApi, CompanyStats};

/// Applies seat deltas to the dashboard immediately and reconciles with the
/// server afterwards.
pub struct SeatAdjuster {
    api: Arc<dyn CompanyFlightApi>,
    view: Arc<FlightListView>,
    bus: Arc<dyn BroadcastBus>,
    stats: Mutex<Option<CompanyStats>>,
    controller: OptimisticController<FlightId, i64>,
}

impl SeatAdjuster {
    pub fn new(
        api: Arc<dyn CompanyFlightApi>,
        view: Arc<FlightListView>,
        bus: Arc<dyn BroadcastBus>,
    ) -> Self {
        Self {
            api,
            view,
            bus,
            stats: Mutex::new(None),
            controller: OptimisticController::new(),
        }
    }

    /// Adjusts a flight's available seats by `delta`.
    ///
    /// The clamped value is shown at once. On success the server's value is
    /// broadcast to every view and stats are refreshed; on failure the
    /// previous value is restored, the list is refetched and the server's
    /// message is returned.
    pub async fn adjust_seats(&self, flight_id: FlightId, delta: i64) -> Result<i64, MutationError> {
        if self.controller.is_pending(&flight_id) {
            return Err(MutationError::InFlight(flight_id.to_string()));
        }
        let flight = self
            .view
            .get(flight_id)
            .ok_or_else(|| MutationError::UnknownRecord(format!("flight {flight_id}")))?;

        let previous = flight.seats_available;
        let applied = clamp_seats(previous, delta, flight.seats_total);
        let _pending = self.controller.begin(flight_id, previous, applied)?;
        self.view.set_seats(flight_id, applied);

        match self.api.adjust_seats(flight_id, delta).await {
            Ok(adjustment) => {
                let confirmed = adjustment.seats_available;
                self.view.set_seats(flight_id, confirmed);
                self.bus.publish(BroadcastEvent::FlightSeats(SeatSnapshot {
                    flight_id,
                    seats_available: confirmed,
                }));
                tracing::info!(%flight_id, delta, seats_available = confirmed, "Seat adjustment confirmed");
                self.refresh_stats().await;
                Ok(confirmed)
            }
            Err(e) => {
                tracing::warn!(%flight_id, delta, error = %e, "Seat adjustment rejected; rolling back");
                self.view.set_seats(flight_id, previous);
                self.refetch_flights().await;
                Err(MutationError::rejected(e))
            }
        }
    }

    /// Whether the flight's adjust controls should be disabled.
    pub fn is_pending(&self, flight_id: FlightId) -> bool {
        self.controller.is_pending(&flight_id)
    }

    /// Last successfully fetched company stats.
    pub fn stats(&self) -> Option<CompanyStats> {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Refetches company stats; failures are logged only.
    pub async fn refresh_stats(&self) {
        match self.api.stats().await {
            Ok(stats) => {
                *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = Some(stats);
            }
            Err(e) => tracing::warn!(error = %e, "Company stats refresh failed"),
        }
    }

    async fn refetch_flights(&self) {
        if let Err(e) = self.view.load(self.api.as_ref()).await {
            tracing::warn!(error = %e, "Company flight refetch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryBroadcastBus;
    use crate::adapters::mock::MockFlightApi;
    use crate::domain::booking::FlightSeats;
    use crate::ports::{ApiError, BroadcastSubscriber, Topic};
    use std::time::Duration;

    fn flight(id: i64, total: i64, available: i64) -> FlightSeats {
        FlightSeats {
            id: FlightId::new(id),
            airline: "DemoAir".to_string(),
            flight_number: format!("DA{id}"),
            price: 150.0,
            seats_total: total,
            seats_available: available,
        }
    }

    struct Fixture {
        api: MockFlightApi,
        view: Arc<FlightListView>,
        bus: Arc<InMemoryBroadcastBus>,
        adjuster: Arc<SeatAdjuster>,
    }

    fn fixture(api: MockFlightApi, rows: Vec<FlightSeats>) -> Fixture {
        let view = Arc::new(FlightListView::with_flights("dashboard", rows));
        let bus = Arc::new(InMemoryBroadcastBus::new());
        let adjuster = Arc::new(SeatAdjuster::new(
            Arc::new(api.clone()),
            view.clone(),
            bus.clone(),
        ));
        Fixture {
            api,
            view,
            bus,
            adjuster,
        }
    }

    #[tokio::test]
    async fn success_broadcasts_server_value_and_refreshes_stats() {
        let rows = vec![flight(1, 100, 50)];
        let api = MockFlightApi::new()
            .with_flights(rows.clone())
            .with_stats(CompanyStats {
                flights: 1,
                ..Default::default()
            });
        let f = fixture(api, rows);
        let search = Arc::new(FlightListView::with_flights("search", vec![flight(1, 100, 50)]));
        let _sub = f.bus.subscribe(Topic::FlightSeats, search.clone());

        let confirmed = f.adjuster.adjust_seats(FlightId::new(1), -3).await.unwrap();

        assert_eq!(confirmed, 47);
        assert_eq!(f.view.seats_available(FlightId::new(1)), Some(47));
        assert_eq!(search.seats_available(FlightId::new(1)), Some(47));
        assert_eq!(f.adjuster.stats().map(|s| s.flights), Some(1));
        assert!(!f.adjuster.is_pending(FlightId::new(1)));
    }

    #[tokio::test]
    async fn server_value_wins_over_optimistic_guess() {
        let api = MockFlightApi::new().with_flights(vec![flight(1, 100, 60)]);
        // The dashboard is stale: it still shows 50.
        let f = fixture(api, vec![flight(1, 100, 50)]);

        let confirmed = f.adjuster.adjust_seats(FlightId::new(1), 1).await.unwrap();

        assert_eq!(confirmed, 61);
        assert_eq!(f.view.seats_available(FlightId::new(1)), Some(61));
    }

    #[tokio::test]
    async fn rejection_rolls_back_and_refetches() {
        let api = MockFlightApi::new().with_flights(vec![flight(1, 100, 50)]);
        api.fail_next(ApiError::rejected(403, "Not your company flight"));
        let f = fixture(api, vec![flight(1, 100, 50)]);

        let err = f.adjuster.adjust_seats(FlightId::new(1), 5).await.unwrap_err();

        assert_eq!(err.user_message(), "Not your company flight");
        assert_eq!(f.view.seats_available(FlightId::new(1)), Some(50));
        assert_eq!(f.api.call_count("list_flights"), 1);
        assert_eq!(f.bus.published_count(), 0);
    }

    #[tokio::test]
    async fn refetch_reflects_concurrent_server_change() {
        let api = MockFlightApi::new().with_flights(vec![flight(1, 100, 50)]);
        let f = fixture(api, vec![flight(1, 100, 50)]);
        f.api.set_seats(FlightId::new(1), 2);

        // Server sees 2 - 5 < 0 and refuses.
        let err = f.adjuster.adjust_seats(FlightId::new(1), -5).await.unwrap_err();

        assert!(matches!(err, MutationError::Rejected { .. }));
        assert_eq!(f.view.seats_available(FlightId::new(1)), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn optimistic_value_is_clamped() {
        let api = MockFlightApi::new()
            .with_flights(vec![flight(1, 10, 8)])
            .with_delay(Duration::from_millis(50));
        let f = fixture(api, vec![flight(1, 10, 8)]);

        let adjuster = f.adjuster.clone();
        let task = tokio::spawn(async move { adjuster.adjust_seats(FlightId::new(1), 5).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(f.view.seats_available(FlightId::new(1)), Some(10));
        assert!(f.adjuster.is_pending(FlightId::new(1)));

        // 8 + 5 exceeds the total on the server too.
        assert!(task.await.unwrap().is_err());
        assert_eq!(f.view.seats_available(FlightId::new(1)), Some(8));
    }

    #[tokio::test(start_paused = true)]
    async fn second_adjust_while_pending_is_refused() {
        let api = MockFlightApi::new()
            .with_flights(vec![flight(1, 100, 50)])
            .with_delay(Duration::from_secs(1));
        let f = fixture(api, vec![flight(1, 100, 50)]);

        let adjuster = f.adjuster.clone();
        let first = tokio::spawn(async move { adjuster.adjust_seats(FlightId::new(1), 1).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = f.adjuster.adjust_seats(FlightId::new(1), 1).await;
        assert!(matches!(second, Err(MutationError::InFlight(_))));

        assert_eq!(first.await.unwrap().unwrap(), 51);
        assert_eq!(f.api.seats(FlightId::new(1)), Some(51));
    }

    #[tokio::test]
    async fn unknown_flight_is_refused_without_request() {
        let f = fixture(MockFlightApi::new(), vec![]);

        let err = f.adjuster.adjust_seats(FlightId::new(9), 1).await.unwrap_err();

        assert!(matches!(err, MutationError::UnknownRecord(_)));
        assert_eq!(f.api.call_count("adjust_seats"), 0);
    }

    #[tokio::test]
    async fn stats_failure_does_not_fail_adjustment() {
        let api = MockFlightApi::new().with_flights(vec![flight(1, 100, 50)]);
        api.fail_next_on("stats", ApiError::network("offline"));
        let f = fixture(api, vec![flight(1, 100, 50)]);

        let confirmed = f.adjuster.adjust_seats(FlightId::new(1), 1).await.unwrap();

        assert_eq!(confirmed, 51);
        assert!(f.adjuster.stats().is_none());
        assert_eq!(f.api.call_count("stats"), 1);
    }
}
