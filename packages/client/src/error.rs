//! Error types for the Hiroba client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// WebSocket connection failed or was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP request to the persistence store failed before a response arrived
    #[error("Store request failed: {0}")]
    StoreUnavailable(String),

    /// Persistence store answered with an error status
    #[error("Store rejected the request ({status}): {message}")]
    StoreRejected { status: u16, message: String },

    /// Input line could not be parsed as a command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Command needs a current room
    #[error("No room selected; use /join <room> or /dm <user> first")]
    NoRoomSelected,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ClientError::StoreRejected {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None => ClientError::StoreUnavailable(e.to_string()),
        }
    }
}
