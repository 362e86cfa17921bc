//! UseCase: イベント中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEventUseCase::publish() / push_to() メソッド
//! - 配信範囲（スコープ、送信者を含むか）に応じたブロードキャスト対象の選定
//!
//! ### なぜこのテストが必要か
//! - 送信者を除外する配信で送信者に届かないことを保証する
//! - 空の Room への配信がエラーにならないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者除外 / 送信者を含む配信
//! - エッジケース：空の Room、送信者が既に退室している場合

use std::sync::Arc;

use crate::domain::{Audience, ConnectionId, MessagePusher, RoomCode, RoomRegistry};

use super::error::RelayError;

/// イベント中継のユースケース
///
/// 上位の機能（入室通知、ボード更新、ゲーム、ポモドーロ）は全てこの配信プリミティブを使います。
pub struct RelayEventUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayEventUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Room の参加者にイベントを配信
    ///
    /// ベストエフォート・最大一回の配信で、再送はしません。
    /// 参加者のいない Room への配信は何もしない（エラーではない）。
    ///
    /// # Arguments
    ///
    /// * `code` - 配信先の Room コード
    /// * `sender` - イベントの送信元
    /// * `audience` - 配信範囲（スコープと送信者を含むか）
    /// * `message` - 配信する JSON メッセージ（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// 実際に送信キューに投入できた件数
    pub async fn publish(
        &self,
        code: &RoomCode,
        sender: &ConnectionId,
        audience: Audience,
        message: &str,
    ) -> usize {
        let targets = self.get_broadcast_targets(code, sender, audience).await;
        if targets.is_empty() {
            tracing::debug!("Room '{}' has no recipients, dropping event", code);
            return 0;
        }

        match self.message_pusher.broadcast(targets, message).await {
            Ok(delivered) => {
                tracing::debug!(
                    "Relayed event from '{}' to {} member(s) of '{}'",
                    sender,
                    delivered,
                    code
                );
                delivered
            }
            Err(e) => {
                tracing::warn!("Failed to relay event to room '{}': {}", code, e);
                0
            }
        }
    }

    /// 特定の接続にだけ送信（要求への応答）
    pub async fn push_to(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), RelayError> {
        self.message_pusher
            .push_to(connection_id, message)
            .await
            .map_err(RelayError::from)
    }

    /// ブロードキャスト対象の接続 ID リストを取得
    async fn get_broadcast_targets(
        &self,
        code: &RoomCode,
        sender: &ConnectionId,
        audience: Audience,
    ) -> Vec<ConnectionId> {
        self.registry
            .members(code, audience.scope)
            .await
            .into_iter()
            .filter(|id| audience.include_sender || id != sender)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessagePushError, RoomScope, ScopeFilter, Timestamp};
    use crate::domain::message_pusher::MockMessagePusher;
    use crate::usecase::test_support::{code, conn, pusher, registry};
    use tokio::sync::mpsc;

    async fn three_member_room(
        registry: &dyn RoomRegistry,
        message_pusher: &dyn MessagePusher,
    ) -> Vec<mpsc::UnboundedReceiver<String>> {
        let mut receivers = Vec::new();
        for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
            let (tx, rx) = mpsc::unbounded_channel();
            message_pusher.register_client(conn(id), tx).await;
            registry
                .join_board(code("R1"), conn(id), Timestamp::new(i as i64))
                .await;
            receivers.push(rx);
        }
        receivers
    }

    #[tokio::test]
    async fn test_publish_excludes_sender() {
        // テスト項目: 送信者を除外する配信では、送信者以外の全員に届き送信者には届かない
        // given (前提条件):
        let registry = registry();
        let message_pusher = pusher();
        let mut rx = three_member_room(registry.as_ref(), message_pusher.as_ref()).await;
        let usecase = RelayEventUseCase::new(registry, message_pusher);

        // when (操作):
        let delivered = usecase
            .publish(
                &code("R1"),
                &conn("a"),
                Audience::others_in(ScopeFilter::Only(RoomScope::Board)),
                "stroke",
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert!(rx[0].try_recv().is_err());
        assert_eq!(rx[1].recv().await, Some("stroke".to_string()));
        assert_eq!(rx[2].recv().await, Some("stroke".to_string()));
    }

    #[tokio::test]
    async fn test_publish_including_sender() {
        // テスト項目: 送信者を含む配信では送信者にも届く
        // given (前提条件):
        let registry = registry();
        let message_pusher = pusher();
        let mut rx = three_member_room(registry.as_ref(), message_pusher.as_ref()).await;
        let usecase = RelayEventUseCase::new(registry, message_pusher);

        // when (操作):
        let delivered = usecase
            .publish(
                &code("R1"),
                &conn("a"),
                Audience::everyone_in(ScopeFilter::Any),
                "echo",
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 3);
        for receiver in rx.iter_mut() {
            assert_eq!(receiver.recv().await, Some("echo".to_string()));
        }
    }

    #[tokio::test]
    async fn test_publish_respects_scope() {
        // テスト項目: 指定スコープ外の参加者には届かない
        // given (前提条件):
        let registry = registry();
        let message_pusher = pusher();
        let mut rx = three_member_room(registry.as_ref(), message_pusher.as_ref()).await;
        let usecase = RelayEventUseCase::new(registry, message_pusher);

        // when (操作): Board の参加者しかいない Room に Session スコープで配信
        let delivered = usecase
            .publish(
                &code("R1"),
                &conn("a"),
                Audience::others_in(ScopeFilter::Only(RoomScope::Session)),
                "hello",
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
        assert!(rx[1].try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_to_empty_room_is_noop() {
        // テスト項目: 参加者のいない Room への配信はエラーにならず、Pusher も呼ばれない
        // given (前提条件):
        let mut mock = MockMessagePusher::new();
        mock.expect_broadcast().never();
        let usecase = RelayEventUseCase::new(registry(), Arc::new(mock));

        // when (操作):
        let delivered = usecase
            .publish(
                &code("EMPTY"),
                &conn("a"),
                Audience::others_in(ScopeFilter::Any),
                "anything",
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_publish_hands_targets_to_pusher_without_sender() {
        // テスト項目: Pusher に渡される対象に送信者が含まれない
        // given (前提条件):
        let registry = registry();
        for id in ["a", "b", "c"] {
            registry
                .join_board(code("R1"), conn(id), Timestamp::new(1))
                .await;
        }
        let mut mock = MockMessagePusher::new();
        mock.expect_broadcast()
            .withf(|targets, content| {
                targets.len() == 2
                    && !targets.contains(&conn("a"))
                    && content.contains("strokes")
            })
            .times(1)
            .returning(|targets, _| Ok(targets.len()));
        let usecase = RelayEventUseCase::new(registry, Arc::new(mock));

        // when (操作):
        let delivered = usecase
            .publish(
                &code("R1"),
                &conn("a"),
                Audience::others_in(ScopeFilter::Any),
                r#"{"strokes":[]}"#,
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn test_publish_swallows_pusher_failure() {
        // テスト項目: Pusher の失敗は送信者に伝播しない
        // given (前提条件):
        let registry = registry();
        registry
            .join_board(code("R1"), conn("b"), Timestamp::new(1))
            .await;
        let mut mock = MockMessagePusher::new();
        mock.expect_broadcast()
            .returning(|_, _| Err(MessagePushError::PushFailed("closed".to_string())));
        let usecase = RelayEventUseCase::new(registry, Arc::new(mock));

        // when (操作):
        let delivered = usecase
            .publish(
                &code("R1"),
                &conn("a"),
                Audience::others_in(ScopeFilter::Any),
                "x",
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 未登録の接続への直接送信はエラーになる
        // given (前提条件):
        let usecase = RelayEventUseCase::new(registry(), pusher());

        // when (操作):
        let result = usecase.push_to(&conn("ghost"), "x").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RelayError::Push(MessagePushError::ClientNotFound(
                "ghost".to_string()
            )))
        );
    }
}
