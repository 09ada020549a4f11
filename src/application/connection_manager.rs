//! ConnectionManager - owns the push socket lifecycle.
//!
//! A background task drives [`ConnectionMachine`] with socket events:
//! connect, pump frames in delivery order, and on close or error back off
//! and reconnect until the retry budget runs out. Permanent loss of the
//! socket is not an error; the counter poll keeps working without it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::Secret;
use tokio::sync::watch;
use tracing::Instrument;

use super::event_reconciler::EventReconciler;
use crate::domain::foundation::SessionId;
use crate::domain::realtime::{
    ConnectionMachine, ConnectionState, Decoded, OpenDecision, PushMessage, RetryDecision,
    RetryPolicy,
};
use crate::ports::{BroadcastBus, BroadcastEvent, PushConnector, PushStream};

/// What happened to one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Applied to the notification inbox (possibly as a no-op).
    Reconciled,
    /// Published on the broadcast bus to this many handlers.
    Broadcast(usize),
    /// Valid envelope with a type this client does not know.
    Unknown(String),
    /// Not a valid envelope; dropped.
    Dropped,
}

/// Dispatches decoded frames to their consumers.
#[derive(Clone)]
pub struct FrameRouter {
    reconciler: Arc<EventReconciler>,
    bus: Arc<dyn BroadcastBus>,
}

impl FrameRouter {
    pub fn new(reconciler: Arc<EventReconciler>, bus: Arc<dyn BroadcastBus>) -> Self {
        Self { reconciler, bus }
    }

    pub fn route(&self, raw: &str) -> RouteOutcome {
        match PushMessage::decode(raw) {
            Ok(Decoded::Known(PushMessage::FlightSeats(snapshot))) => {
                RouteOutcome::Broadcast(self.bus.publish(BroadcastEvent::FlightSeats(snapshot)))
            }
            Ok(Decoded::Known(message)) => {
                tracing::debug!(kind = message.kind(), "Push message received");
                self.reconciler.apply_push(message);
                RouteOutcome::Reconciled
            }
            Ok(Decoded::Unknown(kind)) => {
                tracing::debug!(%kind, "Ignoring push message of unknown type");
                RouteOutcome::Unknown(kind)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed push frame");
                RouteOutcome::Dropped
            }
        }
    }
}

struct Control {
    machine: ConnectionMachine,
    // Bumped on every open/close so a superseded driver cannot touch state.
    generation: u64,
}

struct Shared {
    control: Mutex<Control>,
    state_tx: watch::Sender<ConnectionState>,
    connector: Arc<dyn PushConnector>,
    router: FrameRouter,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `event` if `generation` is still current. Returns `None` for
    /// a superseded driver.
    fn step<R>(&self, generation: u64, event: impl FnOnce(&mut ConnectionMachine) -> R) -> Option<R> {
        let mut control = self.lock();
        if control.generation != generation {
            return None;
        }
        let result = event(&mut control.machine);
        self.publish_state(&control);
        Some(result)
    }

    /// Publishes the machine's state. Called with the control lock held so
    /// the watch value never lags behind a concurrent transition.
    fn publish_state(&self, control: &Control) {
        let state = control.machine.state();
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }
}

// The driver task is detached; it exits once signalled or superseded.
struct Driver {
    shutdown: watch::Sender<bool>,
}

impl Driver {
    fn stop(self) {
        // The driver closes its socket gracefully when it sees the signal;
        // if it has already finished there is nobody to tell.
        let _ = self.shutdown.send(true);
    }
}

/// Push connection owner for one session.
pub struct ConnectionManager {
    shared: Arc<Shared>,
    driver: Mutex<Option<Driver>>,
    session_id: SessionId,
}

impl ConnectionManager {
    pub fn new(
        connector: Arc<dyn PushConnector>,
        router: FrameRouter,
        retry: RetryPolicy,
        session_id: SessionId,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            shared: Arc::new(Shared {
                control: Mutex::new(Control {
                    machine: ConnectionMachine::new(retry),
                    generation: 0,
                }),
                state_tx,
                connector,
                router,
            }),
            driver: Mutex::new(None),
            session_id,
        }
    }

    /// Opens the push connection.
    ///
    /// No-op while `Connecting` or `Open`. From `AwaitingRetry` the pending
    /// backoff is abandoned and the retry budget restored.
    pub fn open(&self, token: Secret<String>) {
        let generation = {
            let mut control = self.shared.lock();
            if control.machine.open_requested() == OpenDecision::AlreadyActive {
                tracing::debug!("Push connection already active");
                return;
            }
            control.generation += 1;
            self.shared.publish_state(&control);
            control.generation
        };

        let (shutdown, shutdown_rx) = watch::channel(false);
        let shared = self.shared.clone();
        let span = tracing::info_span!("push", session = %self.session_id);
        tokio::spawn(drive(shared, token, generation, shutdown_rx).instrument(span));

        if let Some(old) = self.lock_driver().replace(Driver { shutdown }) {
            old.stop();
        }
    }

    /// Closes the socket and cancels any pending reconnect. Idempotent.
    pub fn close(&self) {
        let closed = {
            let mut control = self.shared.lock();
            control.generation += 1;
            let closed = control.machine.close_requested();
            self.shared.publish_state(&control);
            closed
        };
        if let Some(driver) = self.lock_driver().take() {
            driver.stop();
        }
        if closed {
            tracing::info!(session = %self.session_id, "Push connection closed");
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.lock().machine.state()
    }

    /// Retries scheduled since the last successful connection.
    pub fn retry_attempt(&self) -> u32 {
        self.shared.lock().machine.retry_attempt()
    }

    /// Receiver that observes every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    fn lock_driver(&self) -> MutexGuard<'_, Option<Driver>> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ConnectionManager {
    /// Tells the driver to close its socket with a close handshake. The
    /// generation bump keeps a driver that is still connecting from
    /// publishing state for a manager that no longer exists.
    fn drop(&mut self) {
        self.shared.lock().generation += 1;
        if let Some(driver) = self.lock_driver().take() {
            driver.stop();
        }
    }
}

/// Why a pumped connection ended.
enum PumpEnd {
    PeerClosed,
    Failed,
    Shutdown,
}

async fn drive(
    shared: Arc<Shared>,
    token: Secret<String>,
    generation: u64,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let connected = tokio::select! {
            _ = shutdown.changed() => return,
            result = shared.connector.connect(&token) => result,
        };

        match connected {
            Ok(mut stream) => {
                if shared.step(generation, ConnectionMachine::established) != Some(true) {
                    stream.close().await;
                    return;
                }
                tracing::info!("Push connection open");

                match pump(&shared, stream.as_mut(), &mut shutdown).await {
                    PumpEnd::Shutdown => {
                        stream.close().await;
                        return;
                    }
                    PumpEnd::PeerClosed => tracing::info!("Push connection closed by server"),
                    PumpEnd::Failed => {}
                }
            }
            Err(e) => tracing::warn!(error = %e, "Push connect failed"),
        }

        match shared.step(generation, ConnectionMachine::closed) {
            Some(RetryDecision::RetryAfter(delay)) => {
                tracing::info!(delay_ms = delay.as_millis() as u64, "Reconnecting after backoff");
                tokio::select! {
                    _ = shutdown.changed() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                if shared.step(generation, ConnectionMachine::retry_due) != Some(true) {
                    return;
                }
            }
            Some(RetryDecision::GiveUp) => {
                tracing::warn!("Push reconnect attempts exhausted; relying on polling");
                return;
            }
            Some(RetryDecision::Ignored) | None => return,
        }
    }
}

async fn pump(
    shared: &Shared,
    stream: &mut dyn PushStream,
    shutdown: &mut watch::Receiver<bool>,
) -> PumpEnd {
    loop {
        let frame = tokio::select! {
            _ = shutdown.changed() => return PumpEnd::Shutdown,
            frame = stream.next_frame() => frame,
        };
        match frame {
            Ok(Some(raw)) => {
                shared.router.route(&raw);
            }
            Ok(None) => return PumpEnd::PeerClosed,
            Err(e) => {
                tracing::warn!(error = %e, "Push connection failed");
                return PumpEnd::Failed;
            }
        }
    }
}
