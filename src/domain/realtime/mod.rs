//! Realtime - push connection lifecycle, backoff, and envelope decoding.

mod connection_state;
mod machine;
mod push_message;
mod retry_policy;

pub use connection_state::ConnectionState;
pub use machine::{ConnectionMachine, OpenDecision, RetryDecision};
pub use push_message::{kinds, Decoded, EnvelopeError, PushMessage};
pub use retry_policy::RetryPolicy;
