//! Push channel ports - the persistent server-to-client socket.
//!
//! The connection manager only sees text frames and closure; framing,
//! ping/pong and endpoint derivation stay inside the adapter.

use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

/// Failures of the push channel. None of these reach the user; they only
/// drive reconnection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid push endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Opens push connections for a session token.
#[async_trait]
pub trait PushConnector: Send + Sync {
    async fn connect(&self, token: &Secret<String>) -> Result<Box<dyn PushStream>, TransportError>;
}

/// One established push connection.
#[async_trait]
pub trait PushStream: Send {
    /// Next text frame in delivery order. `Ok(None)` means the peer closed.
    async fn next_frame(&mut self) -> Result<Option<String>, TransportError>;

    /// Best-effort close handshake.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn PushConnector, _: &dyn PushStream) {}
}
