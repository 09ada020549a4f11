//! FlightListView - a screen's flight list kept fresh by seat broadcasts.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::booking::{FlightBoard, FlightSeats};
use crate::domain::foundation::FlightId;
use crate::ports::{ApiError, BroadcastEvent, BroadcastHandler, CompanyFlightApi};

/// One view's flight rows.
///
/// Search results and the company dashboard each own one and subscribe it
/// to `Topic::FlightSeats`; they converge only through the snapshots they
/// both receive.
#[derive(Debug)]
pub struct FlightListView {
    name: &'static str,
    board: Mutex<FlightBoard>,
}

impl FlightListView {
    pub fn new(name: &'static str) -> Self {
        Self::with_flights(name, Vec::new())
    }

    pub fn with_flights(name: &'static str, flights: Vec<FlightSeats>) -> Self {
        Self {
            name,
            board: Mutex::new(FlightBoard::new(flights)),
        }
    }

    /// Loads the company flight list into the view.
    pub async fn load(&self, api: &dyn CompanyFlightApi) -> Result<usize, ApiError> {
        let flights = api.list_flights().await?;
        let count = flights.len();
        self.replace_all(flights);
        Ok(count)
    }

    pub fn flights(&self) -> Vec<FlightSeats> {
        self.lock().flights().to_vec()
    }

    pub fn get(&self, id: FlightId) -> Option<FlightSeats> {
        self.lock().get(id).cloned()
    }

    pub fn seats_available(&self, id: FlightId) -> Option<i64> {
        self.lock().seats_available(id)
    }

    pub fn set_seats(&self, id: FlightId, seats_available: i64) -> Option<i64> {
        self.lock().set_seats(id, seats_available)
    }

    pub fn replace_all(&self, flights: Vec<FlightSeats>) {
        self.lock().replace_all(flights);
    }

    fn lock(&self) -> MutexGuard<'_, FlightBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BroadcastHandler for FlightListView {
    fn handle(&self, event: &BroadcastEvent) {
        match event {
            BroadcastEvent::FlightSeats(snapshot) => {
                if self.lock().merge_seats(snapshot) {
                    tracing::debug!(
                        view = self.name,
                        flight_id = %snapshot.flight_id,
                        seats_available = snapshot.seats_available,
                        "Seat availability updated"
                    );
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryBroadcastBus;
    use crate::adapters::mock::MockFlightApi;
    use crate::domain::booking::SeatSnapshot;
    use crate::ports::{BroadcastPublisher, BroadcastSubscriber, Topic};
    use std::sync::Arc;

    fn flight(id: i64, available: i64) -> FlightSeats {
        FlightSeats {
            id: FlightId::new(id),
            airline: "DemoAir".to_string(),
            flight_number: format!("DA{id}"),
            price: 99.0,
            seats_total: 100,
            seats_available: available,
        }
    }

    #[test]
    fn two_views_both_see_one_snapshot() {
        let bus = InMemoryBroadcastBus::new();
        let search = Arc::new(FlightListView::with_flights("search", vec![flight(7, 42)]));
        let dashboard = Arc::new(FlightListView::with_flights(
            "dashboard",
            vec![flight(7, 42), flight(8, 10)],
        ));
        let _a = bus.subscribe(Topic::FlightSeats, search.clone());
        let _b = bus.subscribe(Topic::FlightSeats, dashboard.clone());

        let delivered = bus.publish(BroadcastEvent::FlightSeats(SeatSnapshot {
            flight_id: FlightId::new(7),
            seats_available: 41,
        }));

        assert_eq!(delivered, 2);
        assert_eq!(search.seats_available(FlightId::new(7)), Some(41));
        assert_eq!(dashboard.seats_available(FlightId::new(7)), Some(41));
        assert_eq!(dashboard.seats_available(FlightId::new(8)), Some(10));
    }

    #[tokio::test]
    async fn load_replaces_rows_from_api() {
        let api = MockFlightApi::new().with_flights(vec![flight(1, 5), flight(2, 6)]);
        let view = FlightListView::with_flights("dashboard", vec![flight(9, 1)]);

        assert_eq!(view.load(&api).await.unwrap(), 2);
        assert!(view.get(FlightId::new(9)).is_none());
        assert_eq!(view.seats_available(FlightId::new(2)), Some(6));
    }
}
