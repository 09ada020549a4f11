//! Adapters - implementations of the ports.
//!
//! - `http` - reqwest REST client for the booking API
//! - `websocket` - tokio-tungstenite push connector
//! - `events` - in-memory broadcast bus
//! - `mock` - in-memory doubles used by tests and demos

pub mod events;
pub mod http;
pub mod mock;
pub mod websocket;
