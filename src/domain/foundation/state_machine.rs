//! State machine trait for lifecycle enums.
//!
//! Lifecycle enums such as the push connection state declare their
//! legal edges once and get a checked `transition_to` for free.

use super::{DomainError, ErrorCode};

/// Trait for enums whose values form a finite state machine.
///
/// # Example
///
/// ```ignore
/// let next = ConnectionState::Disconnected.transition_to(ConnectionState::Connecting)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if an edge from `self` to `target` exists.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all states reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs a checked transition.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Locked,
    }

    impl StateMachine for Door {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Door::Closed => vec![Door::Open, Door::Locked],
                Door::Open => vec![Door::Closed],
                Door::Locked => vec![Door::Closed],
            }
        }
    }

    #[test]
    fn legal_edge_returns_target() {
        assert_eq!(Door::Closed.transition_to(Door::Locked).unwrap(), Door::Locked);
    }

    #[test]
    fn illegal_edge_is_reported_with_state_names() {
        let err = Door::Open.transition_to(Door::Locked).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(err.message.contains("Open"));
        assert!(err.message.contains("Locked"));
    }
}
