//! Domain-level error types.

use thiserror::Error;

/// Validation failure while constructing a value object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Errors returned while pushing an event to a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("broadcast reached none of {attempted} connection(s)")]
    NoneDelivered { attempted: usize },
}

/// Errors returned by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("message '{0}' not found")]
    MessageNotFound(String),

    #[error("invalid room: {0}")]
    InvalidRoom(String),

    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}
