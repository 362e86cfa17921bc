//! UseCase: 接続処理
//!
//! 接続 ID を払い出し、送信チャンネルを MessagePusher に登録します。
//! この時点ではどの Room にも参加していません。

use std::sync::Arc;

use chalkboard_shared::time::Clock;

use crate::domain::{ConnectionId, ConnectionIdFactory, MessagePusher, PusherChannel, Timestamp};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok((ConnectionId, Timestamp))` - 払い出した接続 ID と接続時刻
    /// * `Err(ConnectError)` - 接続 ID の払い出しに失敗
    pub async fn execute(
        &self,
        sender: PusherChannel,
    ) -> Result<(ConnectionId, Timestamp), ConnectError> {
        let connection_id = ConnectionIdFactory::generate()?;
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        Ok((connection_id, connected_at))
    }
}
