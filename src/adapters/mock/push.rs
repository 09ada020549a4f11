//! Scripted PushConnector.
//!
//! Every `connect` consumes the next scripted outcome: either a refusal or
//! an accepted connection whose frames the test feeds through a
//! [`ServerSide`] handle.

use async_trait::async_trait;
use secrecy::Secret;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use super::lock;
use crate::ports::{PushConnector, PushStream, TransportError};

enum Frame {
    Text(String),
    Error(String),
}

enum Outcome {
    Accept(mpsc::UnboundedReceiver<Frame>, Arc<AtomicBool>),
    Refuse,
}

/// Server end of a scripted connection. Dropping it closes the socket.
#[derive(Debug, Clone)]
pub struct ServerSide {
    tx: mpsc::UnboundedSender<Frame>,
    closed_by_client: Arc<AtomicBool>,
}

impl ServerSide {
    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.tx.send(Frame::Text(text.into()));
    }

    pub fn send_json(&self, value: serde_json::Value) {
        self.send_text(value.to_string());
    }

    /// Delivers a transport error instead of a frame.
    pub fn fail(&self, message: impl Into<String>) {
        let _ = self.tx.send(Frame::Error(message.into()));
    }

    /// True once the client ran its close handshake.
    pub fn closed_by_client(&self) -> bool {
        self.closed_by_client.load(Ordering::SeqCst)
    }
}

/// Connector whose outcomes are scripted in advance.
#[derive(Default)]
pub struct ScriptedConnector {
    script: Mutex<VecDeque<Outcome>>,
    attempts: AtomicUsize,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next connect to succeed and returns its server end.
    pub fn accept_next(&self) -> ServerSide {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        lock(&self.script).push_back(Outcome::Accept(rx, closed.clone()));
        ServerSide {
            tx,
            closed_by_client: closed,
        }
    }

    /// Scripts the next connect to fail. Unscripted connects fail too.
    pub fn refuse_next(&self) {
        lock(&self.script).push_back(Outcome::Refuse);
    }

    /// Number of connect calls so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushConnector for ScriptedConnector {
    async fn connect(&self, _token: &Secret<String>) -> Result<Box<dyn PushStream>, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match lock(&self.script).pop_front() {
            Some(Outcome::Accept(rx, closed)) => Ok(Box::new(ScriptedStream { rx, closed })),
            Some(Outcome::Refuse) | None => {
                Err(TransportError::Connect("connection refused".to_string()))
            }
        }
    }
}

struct ScriptedStream {
    rx: mpsc::UnboundedReceiver<Frame>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl PushStream for ScriptedStream {
    async fn next_frame(&mut self) -> Result<Option<String>, TransportError> {
        match self.rx.recv().await {
            Some(Frame::Text(text)) => Ok(Some(text)),
            Some(Frame::Error(message)) => Err(TransportError::Protocol(message)),
            None => Ok(None),
        }
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.rx.close();
    }
}
