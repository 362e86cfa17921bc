//! Domain errors.

use thiserror::Error;

/// 値オブジェクトの生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Connection ID must not be empty")]
    ConnectionIdEmpty,

    #[error("Room code must not be empty")]
    RoomCodeEmpty,

    #[error("Room code must be at most {max} characters (got {actual})")]
    RoomCodeTooLong { max: usize, actual: usize },

    #[error("Room name must be at most {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },
}

/// Room の入室・作成に関するエラー
///
/// `roomError` イベントとして要求元のクライアントにのみ通知されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// カスタムコードが現在使用中の Room と衝突した
    #[error("Room code '{0}' is already in use")]
    CodeInUse(String),

    /// 参加者が一人もいない Room への入室
    #[error("Room '{0}' does not exist")]
    RoomNotFound(String),

    /// Room コードや Room 名の形式が不正
    #[error("{0}")]
    InvalidRequest(#[from] ValueObjectError),

    /// 予期しない内部エラー
    #[error("Internal relay error: {0}")]
    Internal(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
