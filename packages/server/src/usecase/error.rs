//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MessagePushError, ValueObjectError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Failed to allocate connection id: {0}")]
    IdAllocation(#[from] ValueObjectError),
}

/// イベント中継（直接送信）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    Push(#[from] MessagePushError),
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Invalid room code: {0}")]
    InvalidRoomCode(#[from] ValueObjectError),

    #[error("Room not found")]
    RoomNotFound,
}
