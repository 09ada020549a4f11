//! Mock TicketApi.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::lock;
use crate::domain::booking::{Ticket, TicketStatus};
use crate::domain::foundation::ConfirmationId;
use crate::ports::{ApiError, TicketApi};

/// In-memory ticket server. Cancelling a known ticket refunds it.
#[derive(Debug, Clone, Default)]
pub struct MockTicketApi {
    tickets: Arc<Mutex<Vec<Ticket>>>,
    errors: Arc<Mutex<VecDeque<(Option<&'static str>, ApiError)>>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    delay: Duration,
}

impl MockTicketApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tickets(self, tickets: Vec<Ticket>) -> Self {
        *lock(&self.tickets) = tickets;
        self
    }

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
impl TicketApi for MockTicketApi {
    async fn list_my(&self) -> Result<Vec<Ticket>, ApiError> {
        self.begin("list_my")?;
        Ok(lock(&self.tickets).clone())
    }

    async fn cancel(&self, id: &ConfirmationId) -> Result<TicketStatus, ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.begin("cancel")?;
        let mut tickets = lock(&self.tickets);
        let ticket = tickets
            .iter_mut()
            .find(|t| &t.confirmation_id == id)
            .ok_or_else(|| ApiError::NotFound("Not found".to_string()))?;
        ticket.status = TicketStatus::Refunded;
        Ok(ticket.status.clone())
    }
}
