//! ApiError - failures of the REST ports.

use thiserror::Error;

/// Errors returned by the REST-backed ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection could not be made or was dropped mid-request.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Session token missing, expired or rejected.
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    /// Server refused the request with a user-facing reason.
    #[error("rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ApiError::Parse(message.into())
    }

    /// True when the request never got a server answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout { .. })
    }

    /// Message suitable for showing next to the control that failed.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::NotFound(message) => message.clone(),
            ApiError::Unauthorized => "Session expired, please sign in again".to_string(),
            ApiError::Network(_) | ApiError::Timeout { .. } => {
                "Network error, please try again".to_string()
            }
            ApiError::Parse(_) => "Unexpected server response".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_identified() {
        assert!(ApiError::network("reset").is_transport());
        assert!(ApiError::Timeout { timeout_secs: 10 }.is_transport());
        assert!(!ApiError::Unauthorized.is_transport());
        assert!(!ApiError::rejected(400, "nope").is_transport());
    }

    #[test]
    fn rejected_surfaces_server_message() {
        let err = ApiError::rejected(400, "Resulting seats_available would be negative");
        assert_eq!(err.user_message(), "Resulting seats_available would be negative");
        assert_eq!(
            err.to_string(),
            "rejected (400): Resulting seats_available would be negative"
        );
    }
}
