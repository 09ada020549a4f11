//! CompanyFlightApi port - flight management endpoints for company managers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::domain::booking::FlightSeats;
use crate::domain::foundation::FlightId;

/// Server answer to a seat adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAdjustment {
    pub status: String,
    pub seats_available: i64,
}

/// Aggregate dashboard figures for the manager's companies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyStats {
    pub flights: i64,
    pub active: i64,
    pub completed: i64,
    pub passengers: i64,
    pub revenue: f64,
    pub seats_capacity: i64,
    pub seats_sold: i64,
    pub load_factor: f64,
}

/// Port for the company flight dashboard.
#[async_trait]
pub trait CompanyFlightApi: Send + Sync {
    async fn list_flights(&self) -> Result<Vec<FlightSeats>, ApiError>;

    /// Adjusts available seats by `delta`. The server enforces
    /// `0 <= seats_available <= seats_total` and refuses otherwise.
    async fn adjust_seats(&self, id: FlightId, delta: i64) -> Result<SeatAdjustment, ApiError>;

    async fn stats(&self) -> Result<CompanyStats, ApiError>;
}
