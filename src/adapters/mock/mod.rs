//! Mock adapters - in-memory doubles of every port.
//!
//! Each mock behaves like a small fake server: it keeps state, applies the
//! same rules the real API applies, records calls, and can be told to fail
//! or stall the next request.

mod flight_api;
mod notification_api;
mod push;
mod ticket_api;

pub use flight_api::MockFlightApi;
pub use notification_api::MockNotificationApi;
pub use push::{ScriptedConnector, ServerSide};
pub use ticket_api::MockTicketApi;

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
