//! TicketCanceller - optimistic ticket cancellation on "my tickets".

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{MutationError, OptimisticController};
use crate::domain::booking::{Ticket, TicketBoard, TicketStatus};
use crate::domain::foundation::ConfirmationId;
use crate::ports::{ApiError, TicketApi};

/// Owns the traveller's ticket list and cancels tickets optimistically.
pub struct TicketCanceller {
    api: Arc<dyn TicketApi>,
    board: Mutex<TicketBoard>,
    controller: OptimisticController<ConfirmationId, TicketStatus>,
}

impl TicketCanceller {
    pub fn new(api: Arc<dyn TicketApi>) -> Self {
        Self {
            api,
            board: Mutex::new(TicketBoard::default()),
            controller: OptimisticController::new(),
        }
    }

    /// Fetches the ticket list into the board.
    pub async fn load(&self) -> Result<usize, ApiError> {
        let tickets = self.api.list_my().await?;
        let count = tickets.len();
        self.lock().replace_all(tickets);
        Ok(count)
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        self.lock().tickets().to_vec()
    }

    pub fn status(&self, id: &ConfirmationId) -> Option<TicketStatus> {
        self.lock().status(id).cloned()
    }

    /// Cancels a ticket.
    ///
    /// The row shows `refunded` at once. On success the server's status is
    /// stored and the list refetched; on failure the previous status is
    /// restored, the list refetched and the server's message returned.
    pub async fn cancel(&self, id: &ConfirmationId) -> Result<TicketStatus, MutationError> {
        if self.controller.is_pending(id) {
            return Err(MutationError::InFlight(id.to_string()));
        }
        let previous = self
            .status(id)
            .ok_or_else(|| MutationError::UnknownRecord(format!("ticket {id}")))?;

        let _pending = self
            .controller
            .begin(id.clone(), previous.clone(), TicketStatus::Refunded)?;
        self.lock().set_status(id, TicketStatus::Refunded);

        let result = self.api.cancel(id).await;
        match result {
            Ok(status) => {
                tracing::info!(confirmation_id = %id, %status, "Ticket cancelled");
                self.lock().set_status(id, status.clone());
                self.refetch().await;
                Ok(status)
            }
            Err(e) => {
                tracing::warn!(confirmation_id = %id, error = %e, "Ticket cancellation rejected; rolling back");
                self.lock().set_status(id, previous);
                self.refetch().await;
                Err(MutationError::rejected(e))
            }
        }
    }

    /// Whether the ticket's cancel control should be disabled.
    pub fn is_pending(&self, id: &ConfirmationId) -> bool {
        self.controller.is_pending(id)
    }

    async fn refetch(&self) {
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "Ticket list refetch failed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, TicketBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
