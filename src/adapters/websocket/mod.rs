//! WebSocket adapters - the client side of the push channel.

mod connector;
mod endpoint;

pub use connector::TungstenitePushConnector;
pub use endpoint::{push_endpoint, redacted, DEFAULT_PUSH_PATH};
