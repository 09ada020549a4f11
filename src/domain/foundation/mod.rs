//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types, and the state machine
//! trait that form the vocabulary of the sync core.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConfirmationId, FlightId, NotificationId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
