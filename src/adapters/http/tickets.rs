//! TicketApi over REST.

use async_trait::async_trait;

use super::dto::{CancelDto, TicketListDto};
use super::RestClient;
use crate::domain::booking::{Ticket, TicketStatus};
use crate::domain::foundation::ConfirmationId;
use crate::ports::{ApiError, TicketApi};

#[async_trait]
impl TicketApi for RestClient {
    async fn list_my(&self) -> Result<Vec<Ticket>, ApiError> {
        let dto: TicketListDto = self.get_json("/tickets/my", &[]).await?;
        Ok(dto.into_items())
    }

    async fn cancel(&self, id: &ConfirmationId) -> Result<TicketStatus, ApiError> {
        let dto: CancelDto = self
            .post_json(&format!("/tickets/{id}/cancel"), &[])
            .await?;
        Ok(dto.status)
    }
}
