//! TicketApi port - the traveller's own tickets.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::booking::{Ticket, TicketStatus};
use crate::domain::foundation::ConfirmationId;

#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn list_my(&self) -> Result<Vec<Ticket>, ApiError>;

    /// Requests cancellation and returns the status the server settled on.
    async fn cancel(&self, id: &ConfirmationId) -> Result<TicketStatus, ApiError>;
}
