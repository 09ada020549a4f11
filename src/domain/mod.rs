//! Domain layer containing sync state and its invariants.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine)
//! - `notifications` - Notification list and unread counter
//! - `realtime` - Push connection lifecycle, backoff, envelope decoding
//! - `booking` - Seat snapshots, flight/ticket boards, pending mutations

pub mod booking;
pub mod foundation;
pub mod notifications;
pub mod realtime;
