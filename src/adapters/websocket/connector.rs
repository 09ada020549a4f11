//! PushConnector over tokio-tungstenite.

use async_trait::async_trait;
use futures::StreamExt;
use secrecy::Secret;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::endpoint::{push_endpoint, redacted, DEFAULT_PUSH_PATH};
use crate::ports::{PushConnector, PushStream, TransportError};

/// Opens the notification socket derived from the REST base URL.
#[derive(Debug, Clone)]
pub struct TungstenitePushConnector {
    base_url: String,
    path: String,
}

impl TungstenitePushConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: DEFAULT_PUSH_PATH.to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[async_trait]
impl PushConnector for TungstenitePushConnector {
    async fn connect(&self, token: &Secret<String>) -> Result<Box<dyn PushStream>, TransportError> {
        let url = push_endpoint(&self.base_url, &self.path, token)?;
        tracing::debug!(endpoint = %redacted(&url), "Opening push socket");

        let (ws, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Box::new(TungstenitePushStream { ws }))
    }
}

struct TungstenitePushStream {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushStream for TungstenitePushStream {
    async fn next_frame(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.ws.next().await {
                None | Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                // Pings are answered by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::Protocol(e.to_string())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!(error = %e, "Push socket close handshake failed");
        }
    }
}
