//! Mock CompanyFlightApi.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::lock;
use crate::domain::booking::FlightSeats;
use crate::domain::foundation::FlightId;
use crate::ports::{ApiError, CompanyFlightApi, CompanyStats, SeatAdjustment};

/// In-memory company flight server applying the server's seat rules.
#[derive(Debug, Clone, Default)]
pub struct MockFlightApi {
    flights: Arc<Mutex<Vec<FlightSeats>>>,
    stats: Arc<Mutex<CompanyStats>>,
    errors: Arc<Mutex<VecDeque<(Option<&'static str>, ApiError)>>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    delay: Duration,
}

impl MockFlightApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flights(self, flights: Vec<FlightSeats>) -> Self {
        *lock(&self.flights) = flights;
        self
    }

    pub fn with_stats(self, stats: CompanyStats) -> Self {
        *lock(&self.stats) = stats;
        self
    }

    /// Simulated latency for `adjust_seats`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues an error for the next call, whichever operation it is.
    pub fn fail_next(&self, error: ApiError) {
        lock(&self.errors).push_back((None, error));
    }

    /// Queues an error for the next call of `op` only.
    pub fn fail_next_on(&self, op: &'static str, error: ApiError) {
        lock(&self.errors).push_back((Some(op), error));
    }

    /// Changes the server copy behind the client's back.
    pub fn set_seats(&self, id: FlightId, seats_available: i64) {
        if let Some(flight) = lock(&self.flights).iter_mut().find(|f| f.id == id) {
            flight.seats_available = seats_available;
        }
    }

    pub fn seats(&self, id: FlightId) -> Option<i64> {
        lock(&self.flights)
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.seats_available)
    }

    pub fn call_count(&self, op: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == op).count()
    }

    fn begin(&self, op: &'static str) -> Result<(), ApiError> {
        lock(&self.calls).push(op);
        let mut errors = lock(&self.errors);
        let position = errors
            .iter()
            .position(|(target, _)| target.map_or(true, |t| t == op));
        match position.and_then(|i| errors.remove(i)) {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CompanyFlightApi for MockFlightApi {
    async fn list_flights(&self) -> Result<Vec<FlightSeats>, ApiError> {
        self.begin("list_flights")?;
        Ok(lock(&self.flights).clone())
    }

    async fn adjust_seats(&self, id: FlightId, delta: i64) -> Result<SeatAdjustment, ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.begin("adjust_seats")?;

        let mut flights = lock(&self.flights);
        let flight = flights
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))?;

        let next = flight.seats_available + delta;
        if next < 0 {
            return Err(ApiError::rejected(
                400,
                "Resulting seats_available would be negative",
            ));
        }
        if next > flight.seats_total {
            return Err(ApiError::rejected(
                400,
                "Resulting seats_available exceeds seats_total",
            ));
        }
        if delta == 0 {
            return Ok(SeatAdjustment {
                status: "noop".to_string(),
                seats_available: flight.seats_available,
            });
        }
        flight.seats_available = next;
        Ok(SeatAdjustment {
            status: "ok".to_string(),
            seats_available: next,
        })
    }

    async fn stats(&self) -> Result<CompanyStats, ApiError> {
        self.begin("stats")?;
        Ok(lock(&self.stats).clone())
    }
}
