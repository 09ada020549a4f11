//! Seat availability types and the view-owned flight board.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::FlightId;

/// A propagated seat-count change. Carried by `flight_seats` pushes and by
/// confirmed seat adjustments; there is no central store for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub flight_id: FlightId,
    pub seats_available: i64,
}

/// The fields of a flight row that seat sync reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSeats {
    pub id: FlightId,
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub price: f64,
    pub seats_total: i64,
    pub seats_available: i64,
}

/// Applies `delta` to `current` and clamps into `[0, seats_total]`.
pub fn clamp_seats(current: i64, delta: i64, seats_total: i64) -> i64 {
    current.saturating_add(delta).clamp(0, seats_total.max(0))
}

/// A view's own list of flights, merged by flight id.
///
/// Each screen (search results, company dashboard) owns one; they stay in
/// agreement only through the snapshots they all receive.
#[derive(Debug, Clone, Default)]
pub struct FlightBoard {
    flights: Vec<FlightSeats>,
}

impl FlightBoard {
    pub fn new(flights: Vec<FlightSeats>) -> Self {
        Self { flights }
    }

    pub fn flights(&self) -> &[FlightSeats] {
        &self.flights
    }

    pub fn get(&self, id: FlightId) -> Option<&FlightSeats> {
        self.flights.iter().find(|f| f.id == id)
    }

    pub fn seats_available(&self, id: FlightId) -> Option<i64> {
        self.get(id).map(|f| f.seats_available)
    }

    /// Merges a snapshot into the matching row. Returns true if a row changed;
    /// snapshots for flights this view does not show are ignored.
    pub fn merge_seats(&mut self, snapshot: &SeatSnapshot) -> bool {
        self.set_seats(snapshot.flight_id, snapshot.seats_available)
            .is_some_and(|previous| previous != snapshot.seats_available)
    }

    /// Overwrites a row's availability, returning the previous value.
    pub fn set_seats(&mut self, id: FlightId, seats_available: i64) -> Option<i64> {
        let flight = self.flights.iter_mut().find(|f| f.id == id)?;
        let previous = flight.seats_available;
        flight.seats_available = seats_available;
        Some(previous)
    }

    pub fn replace_all(&mut self, flights: Vec<FlightSeats>) {
        self.flights = flights;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flight(id: i64, total: i64, available: i64) -> FlightSeats {
        FlightSeats {
            id: FlightId::new(id),
            airline: "DemoAir".to_string(),
            flight_number: format!("DA{id}"),
            price: 120.0,
            seats_total: total,
            seats_available: available,
        }
    }

    #[test]
    fn merge_updates_matching_row_only() {
        let mut board = FlightBoard::new(vec![flight(1, 100, 50), flight(2, 80, 10)]);

        let changed = board.merge_seats(&SeatSnapshot {
            flight_id: FlightId::new(2),
            seats_available: 9,
        });

        assert!(changed);
        assert_eq!(board.seats_available(FlightId::new(1)), Some(50));
        assert_eq!(board.seats_available(FlightId::new(2)), Some(9));
    }

    #[test]
    fn merge_for_unknown_flight_is_ignored() {
        let mut board = FlightBoard::new(vec![flight(1, 100, 50)]);
        assert!(!board.merge_seats(&SeatSnapshot {
            flight_id: FlightId::new(99),
            seats_available: 1,
        }));
        assert_eq!(board.flights().len(), 1);
    }

    #[test]
    fn merge_with_same_value_reports_unchanged() {
        let mut board = FlightBoard::new(vec![flight(1, 100, 50)]);
        assert!(!board.merge_seats(&SeatSnapshot {
            flight_id: FlightId::new(1),
            seats_available: 50,
        }));
    }

    #[test]
    fn deserializes_company_flight_row_ignoring_extra_fields() {
        let row: FlightSeats = serde_json::from_str(
            r#"{"id":4,"airline":"DemoAir","flight_number":"DA4","origin":"SVO","price":120.5,"seats_total":180,"seats_available":12,"revenue_est":20376.0}"#,
        )
        .unwrap();
        assert_eq!(row.id, FlightId::new(4));
        assert_eq!(row.seats_available, 12);
    }

    #[test]
    fn clamp_examples() {
        assert_eq!(clamp_seats(5, -10, 100), 0);
        assert_eq!(clamp_seats(95, 10, 100), 100);
        assert_eq!(clamp_seats(50, 1, 100), 51);
        assert_eq!(clamp_seats(i64::MAX, i64::MAX, 10), 10);
    }

    proptest! {
        #[test]
        fn clamp_stays_in_bounds(current in -1_000i64..1_000, delta in any::<i64>(), total in 0i64..1_000) {
            let value = clamp_seats(current, delta, total);
            prop_assert!(value >= 0);
            prop_assert!(value <= total);
        }
    }
}
