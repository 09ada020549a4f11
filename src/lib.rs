//! SkyBook Realtime - synchronization core of the flight-booking client
//!
//! Keeps a signed-in user's notification inbox, unread counter, seat
//! availability and ticket states consistent with the server across a
//! push socket, periodic polling and optimistic writes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
