//! Sans-IO connection state machine.
//!
//! Socket callbacks become named events fed into [`ConnectionMachine`]; the
//! machine answers with what the driver should do next. Nothing here
//! touches a socket or a timer, so every path is testable with synthetic
//! events.

use std::time::Duration;

use super::{ConnectionState, RetryPolicy};
use crate::domain::foundation::StateMachine;

/// Answer to an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDecision {
    /// Start connecting now.
    Connect,
    /// A connection is already open or being established.
    AlreadyActive,
}

/// Answer to a close/error of the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Reconnect after the delay.
    RetryAfter(Duration),
    /// Attempt limit reached; stay in `AwaitingRetry` without a timer.
    GiveUp,
    /// The event did not apply to the current state (e.g. already closed).
    Ignored,
}

/// Connection lifecycle plus backoff bookkeeping.
#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    retry: RetryPolicy,
}

impl ConnectionMachine {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            retry,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn retry_attempt(&self) -> u32 {
        self.retry.attempt()
    }

    /// An owner asked for a connection.
    ///
    /// From `AwaitingRetry` this is a fresh user-driven start: the pending
    /// backoff is abandoned and the retry budget is restored.
    pub fn open_requested(&mut self) -> OpenDecision {
        if self.state.is_active() {
            return OpenDecision::AlreadyActive;
        }
        if self.state == ConnectionState::AwaitingRetry {
            self.retry.reset();
        }
        self.state = ConnectionState::Connecting;
        OpenDecision::Connect
    }

    /// The backoff timer fired. Returns false if the machine has moved on.
    pub fn retry_due(&mut self) -> bool {
        if self.state != ConnectionState::AwaitingRetry {
            return false;
        }
        self.advance(ConnectionState::Connecting)
    }

    /// The socket handshake completed.
    pub fn established(&mut self) -> bool {
        let moved = self.advance(ConnectionState::Open);
        if moved {
            self.retry.reset();
        }
        moved
    }

    /// The socket closed or failed, either while connecting or while open.
    pub fn closed(&mut self) -> RetryDecision {
        if !self.advance(ConnectionState::AwaitingRetry) {
            return RetryDecision::Ignored;
        }
        match self.retry.next_delay() {
            Some(delay) => RetryDecision::RetryAfter(delay),
            None => RetryDecision::GiveUp,
        }
    }

    /// The owner tore the connection down. Returns false if already closed.
    pub fn close_requested(&mut self) -> bool {
        if self.state == ConnectionState::Disconnected {
            return false;
        }
        self.state = ConnectionState::Disconnected;
        true
    }

    fn advance(&mut self, target: ConnectionState) -> bool {
        match self.state.transition_to(target) {
            Ok(next) => {
                self.state = next;
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for ConnectionMachine {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
