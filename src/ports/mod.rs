//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the sync core and the outside world. Adapters implement these ports.
//!
//! ## REST Ports
//!
//! - `NotificationApi` - Notification list, unread count, read receipts
//! - `CompanyFlightApi` - Company flight list, seat adjustment, stats
//! - `TicketApi` - The traveller's tickets and cancellation
//!
//! ## Realtime Ports
//!
//! - `PushConnector` / `PushStream` - Persistent push socket
//! - `BroadcastPublisher` / `BroadcastSubscriber` - In-process fan-out

mod api_error;
mod broadcast;
mod flight_api;
mod notification_api;
mod push;
mod ticket_api;

pub use api_error::ApiError;
pub use broadcast::{
    handler_fn, BroadcastBus, BroadcastEvent, BroadcastHandler, BroadcastPublisher,
    BroadcastSubscriber, HandlerFn, Subscription, Topic,
};
pub use flight_api::{CompanyFlightApi, CompanyStats, SeatAdjustment};
pub use notification_api::NotificationApi;
pub use push::{PushConnector, PushStream, TransportError};
pub use ticket_api::TicketApi;
