//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown voter role: {0}")]
    UnknownVoter(String),

    #[error("Invalid vote value: {0}")]
    InvalidVote(String),

    #[error("Invalid agent role: {0}")]
    InvalidRole(String),

    #[error("Invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("Decision {0} is already resolved")]
    AlreadyResolved(String),
}

impl DomainError {
    /// Protocol-benign errors are logged and dropped, never surfaced to the sender.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownMessageType(_)
                | DomainError::UnknownVoter(_)
                | DomainError::InvalidVote(_)
        )
    }
}
