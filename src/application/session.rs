//! RealtimeSession - explicit lifecycle for one signed-in user's sync.
//!
//! Everything the realtime core runs (push connection, counter poll,
//! broadcast bus) is owned here and torn down together.

use std::sync::Arc;

use secrecy::Secret;

use super::connection_manager::{ConnectionManager, FrameRouter};
use super::event_reconciler::{EventReconciler, PollHandle};
use crate::config::RealtimeConfig;
use crate::domain::foundation::SessionId;
use crate::domain::realtime::ConnectionState;
use crate::ports::{BroadcastBus, NotificationApi, PushConnector};

/// Ports a session runs against.
pub struct SessionPorts {
    pub notifications: Arc<dyn NotificationApi>,
    pub connector: Arc<dyn PushConnector>,
    pub bus: Arc<dyn BroadcastBus>,
}

/// A running realtime session.
///
/// Dropping the session performs the same teardown as [`shutdown`].
///
/// [`shutdown`]: RealtimeSession::shutdown
pub struct RealtimeSession {
    id: SessionId,
    token: Secret<String>,
    reconciler: Arc<EventReconciler>,
    bus: Arc<dyn BroadcastBus>,
    connection: ConnectionManager,
    poll: Option<PollHandle>,
}

impl RealtimeSession {
    /// Builds the session, loads the notification list, starts the counter
    /// poll and opens the push connection.
    ///
    /// A failed initial list load is logged; the poll and push channel
    /// still start.
    pub async fn start(config: &RealtimeConfig, token: Secret<String>, ports: SessionPorts) -> Self {
        let id = SessionId::new();
        let reconciler = Arc::new(EventReconciler::new(
            ports.notifications,
            config.notification_capacity,
        ));
        let router = FrameRouter::new(reconciler.clone(), ports.bus.clone());
        let connection =
            ConnectionManager::new(ports.connector, router, config.retry_policy(), id);

        if let Err(e) = reconciler.refresh_list().await {
            tracing::warn!(session = %id, error = %e, "Initial notification load failed");
        }
        let poll = reconciler.spawn_counter_poll(config.poll_interval());
        connection.open(token.clone());
        tracing::info!(session = %id, "Realtime session started");

        Self {
            id,
            token,
            reconciler,
            bus: ports.bus,
            connection,
            poll: Some(poll),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn reconciler(&self) -> &Arc<EventReconciler> {
        &self.reconciler
    }

    /// The bus views subscribe to for seat updates.
    pub fn bus(&self) -> &Arc<dyn BroadcastBus> {
        &self.bus
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Asks for a fresh connection, e.g. from a "reconnect" control.
    /// Restores the retry budget if reconnecting had given up.
    pub fn reconnect(&self) {
        self.connection.open(self.token.clone());
    }

    /// Closes the push connection and stops the counter poll. Idempotent.
    pub fn shutdown(&mut self) {
        self.connection.close();
        if let Some(poll) = self.poll.take() {
            poll.stop();
            tracing::info!(session = %self.id, "Realtime session stopped");
        }
    }
}

impl Drop for RealtimeSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryBroadcastBus;
    use crate::adapters::mock::{MockNotificationApi, ScriptedConnector};
    use crate::ports::ApiError;
    use std::time::Duration;
    use tokio::time;

    fn ports(api: &MockNotificationApi, connector: &Arc<ScriptedConnector>) -> SessionPorts {
        SessionPorts {
            notifications: Arc::new(api.clone()),
            connector: connector.clone(),
            bus: Arc::new(InMemoryBroadcastBus::new()),
        }
    }

    fn token() -> Secret<String> {
        Secret::new("tok".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn start_opens_connection_and_polls() {
        let api = MockNotificationApi::new();
        api.set_unread(4);
        let connector = Arc::new(ScriptedConnector::new());
        let _server = connector.accept_next();

        let session = RealtimeSession::start(&RealtimeConfig::default(), token(), ports(&api, &connector)).await;
        time::sleep(Duration::from_millis(5)).await;

        assert_eq!(session.connection_state(), ConnectionState::Open);
        assert_eq!(session.reconciler().unread_count(), 4);
        assert_eq!(api.call_count("list"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_initial_load_still_starts() {
        let api = MockNotificationApi::new();
        api.fail_next(ApiError::network("offline"));
        let connector = Arc::new(ScriptedConnector::new());
        let _server = connector.accept_next();

        let session = RealtimeSession::start(&RealtimeConfig::default(), token(), ports(&api, &connector)).await;
        time::sleep(Duration::from_millis(5)).await;

        assert_eq!(session.connection_state(), ConnectionState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_retries_and_polling() {
        let api = MockNotificationApi::new();
        let connector = Arc::new(ScriptedConnector::new());

        let mut session = RealtimeSession::start(&RealtimeConfig::default(), token(), ports(&api, &connector)).await;
        time::sleep(Duration::from_millis(5)).await;
        assert_eq!(session.connection_state(), ConnectionState::AwaitingRetry);

        session.shutdown();
        session.shutdown();
        let attempts = connector.attempts();
        let polls = api.call_count("unread_count");
        time::sleep(Duration::from_secs(600)).await;

        assert_eq!(session.connection_state(), ConnectionState::Disconnected);
        assert_eq!(connector.attempts(), attempts);
        assert_eq!(api.call_count("unread_count"), polls);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_tears_down() {
        let api = MockNotificationApi::new();
        let connector = Arc::new(ScriptedConnector::new());

        let session = RealtimeSession::start(&RealtimeConfig::default(), token(), ports(&api, &connector)).await;
        time::sleep(Duration::from_millis(5)).await;
        drop(session);

        let attempts = connector.attempts();
        let polls = api.call_count("unread_count");
        time::sleep(Duration::from_secs(600)).await;
        assert_eq!(connector.attempts(), attempts);
        assert_eq!(api.call_count("unread_count"), polls);
    }
}
