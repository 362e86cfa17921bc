//! Factories for server-generated identifiers.

use rand::Rng;
use uuid::Uuid;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, RoomCode},
};

/// Generated room codes are drawn from this alphabet
const ROOM_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a generated room code
pub const GENERATED_ROOM_CODE_LEN: usize = 6;

/// Factory for connection identifiers (UUID v4)
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(Uuid::new_v4().to_string())
    }
}

/// Factory for random room codes.
///
/// Codes are not checked against history, only against rooms that are
/// occupied at admission time (see `CreateRoomUseCase`).
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    pub fn generate() -> Result<RoomCode, ValueObjectError> {
        let mut rng = rand::rng();
        let code: String = (0..GENERATED_ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ROOM_CODE_ALPHABET.len());
                ROOM_CODE_ALPHABET[idx] as char
            })
            .collect();
        RoomCode::new(code)
    }
}
