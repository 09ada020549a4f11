//! CompanyFlightApi over REST.

use async_trait::async_trait;

use super::RestClient;
use crate::domain::booking::FlightSeats;
use crate::domain::foundation::FlightId;
use crate::ports::{ApiError, CompanyFlightApi, CompanyStats, SeatAdjustment};

#[async_trait]
impl CompanyFlightApi for RestClient {
    async fn list_flights(&self) -> Result<Vec<FlightSeats>, ApiError> {
        self.get_json("/company/flights", &[]).await
    }

    async fn adjust_seats(&self, id: FlightId, delta: i64) -> Result<SeatAdjustment, ApiError> {
        self.post_json(
            &format!("/company/flights/{id}/seats-adjust"),
            &[("delta", delta.to_string())],
        )
        .await
    }

    async fn stats(&self) -> Result<CompanyStats, ApiError> {
        self.get_json("/company/stats", &[("range", "all".to_string())])
            .await
    }
}
