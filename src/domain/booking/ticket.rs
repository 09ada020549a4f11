//! Tickets and the view-owned ticket list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ConfirmationId, FlightId};

/// Ticket status as reported by the server.
///
/// Unrecognized statuses are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Paid,
    Refunded,
    Canceled,
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Paid => "paid",
            TicketStatus::Refunded => "refunded",
            TicketStatus::Canceled => "canceled",
            TicketStatus::Other(s) => s,
        }
    }

    /// Whether a cancel request makes sense for this status.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, TicketStatus::Paid)
    }
}

impl From<String> for TicketStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "paid" => TicketStatus::Paid,
            "refunded" => TicketStatus::Refunded,
            "canceled" | "cancelled" => TicketStatus::Canceled,
            _ => TicketStatus::Other(value),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket row as listed under "my tickets".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub confirmation_id: ConfirmationId,
    pub flight_id: FlightId,
    pub status: TicketStatus,
}

/// A view's own list of tickets keyed by confirmation id.
#[derive(Debug, Clone, Default)]
pub struct TicketBoard {
    tickets: Vec<Ticket>,
}

impl TicketBoard {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn status(&self, id: &ConfirmationId) -> Option<&TicketStatus> {
        self.tickets
            .iter()
            .find(|t| &t.confirmation_id == id)
            .map(|t| &t.status)
    }

    /// Overwrites a ticket's status, returning the previous one.
    pub fn set_status(&mut self, id: &ConfirmationId, status: TicketStatus) -> Option<TicketStatus> {
        let ticket = self.tickets.iter_mut().find(|t| &t.confirmation_id == id)?;
        Some(std::mem::replace(&mut ticket.status, status))
    }

    pub fn replace_all(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
    }
}
