//! Domain logic for client-side operations.
//!
//! Pure functions and types deciding which room to ask for and whether to
//! reconnect, kept free of I/O so they are easy to test.

use chalkboard_server::infrastructure::dto::websocket::{ClientEvent, CreateRoomRequest};

use crate::error::ClientError;

/// Which room the client asks for after connecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomIntent {
    /// `create-room`, with a generated code unless `code` is set
    Create {
        name: Option<String>,
        code: Option<String>,
    },
    /// `join-room` an existing room
    Join(String),
    /// Back to a room we were admitted to before the connection dropped
    Rejoin(String),
}

impl RoomIntent {
    pub fn to_event(&self) -> ClientEvent {
        match self {
            RoomIntent::Create { name, code } => ClientEvent::CreateRoom(CreateRoomRequest {
                room_name: name.clone(),
                custom_code: code.clone(),
            }),
            RoomIntent::Join(code) | RoomIntent::Rejoin(code) => {
                ClientEvent::JoinRoom(code.clone())
            }
        }
    }

    /// Request to try when this one is answered with `roomError`.
    ///
    /// A rejoin falls back to recreating the room under the same code, since
    /// the room vanishes if everyone dropped at once.
    pub fn fallback(&self) -> Option<RoomIntent> {
        match self {
            RoomIntent::Rejoin(code) => Some(RoomIntent::Create {
                name: None,
                code: Some(code.clone()),
            }),
            RoomIntent::Create { .. } | RoomIntent::Join(_) => None,
        }
    }
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::RoomRejected(_) | ClientError::Encode(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
