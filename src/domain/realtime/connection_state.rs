//! Push connection lifecycle states.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle of the single push connection owned by a session.
///
/// ```text
/// Disconnected --open--> Connecting --established--> Open
///                          |                           |
///                          +------closed/error---------+--> AwaitingRetry
/// AwaitingRetry --retry due / open--> Connecting
/// any --close--> Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    AwaitingRetry,
}

impl ConnectionState {
    /// True while a socket exists or is being established.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Open)
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Disconnected, Connecting)
                | (Connecting, Open)
                | (Connecting, AwaitingRetry)
                | (Open, AwaitingRetry)
                | (AwaitingRetry, Connecting)
                | (Connecting, Disconnected)
                | (Open, Disconnected)
                | (AwaitingRetry, Disconnected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Disconnected => vec![Connecting],
            Connecting => vec![Open, AwaitingRetry, Disconnected],
            Open => vec![AwaitingRetry, Disconnected],
            AwaitingRetry => vec![Connecting, Disconnected],
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::AwaitingRetry => "awaiting_retry",
        };
        f.write_str(s)
    }
}
