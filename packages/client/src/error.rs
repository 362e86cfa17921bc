//! Error types for the Chalkboard client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay refused to create or join the requested room
    #[error("Room request rejected: {0}")]
    RoomRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors in a typed command line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '/{0}' (try /help)")]
    UnknownCommand(String),

    #[error("/{command} needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("/{0} expects a JSON object")]
    ExpectedObject(&'static str),

    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}
