//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 全メンバーシップの暗黙的な削除と、キャッシュの扱い
//!
//! ### どのような状況を想定しているか
//! - 正常系：他の参加者が残る Room からの切断
//! - エッジケース：最後の参加者の切断（Room が消える、キャッシュは既定で残る）
//! - 設定：空になった Room のキャッシュを削除する場合

use std::sync::Arc;

use crate::domain::{
    ConnectionId, FeatureStateCache, MessagePusher, RoomDeparture, RoomRegistry,
};

use super::EmptiedRoomPurge;

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    emptied_room: EmptiedRoomPurge,
}

impl DisconnectClientUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        cache: Arc<dyn FeatureStateCache>,
        message_pusher: Arc<dyn MessagePusher>,
        purge_state_on_empty: bool,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            emptied_room: EmptiedRoomPurge::new(cache, purge_state_on_empty),
        }
    }

    /// 切断を実行
    ///
    /// アプリケーションからの明示的な退室メッセージは不要で、
    /// この呼び出しの直後から全てのメンバーシップ問い合わせに退室が反映されます。
    ///
    /// # Returns
    ///
    /// 退室した Room の一覧
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomDeparture> {
        // 1. 送信先から外す（以降のファンアウトで送信されない）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. 全メンバーシップを削除
        let departures = self.registry.leave_all(connection_id).await;

        // 3. 空になった Room のキャッシュ（設定時のみ）
        self.emptied_room.apply(&departures).await;

        departures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CachedFeatureState, FeatureKind, FeatureState, RoomScope, ScopeFilter, Timestamp,
    };
    use crate::usecase::test_support::{cache, code, conn, pusher, registry};
    use serde_json::json;

    async fn seed_state(cache: &dyn FeatureStateCache, room: &str) {
        cache
            .store(
                code(room),
                CachedFeatureState {
                    feature: FeatureKind::Game,
                    state: FeatureState::new(json!({"activeGameId": "chess"})),
                    published_by: conn("x"),
                    published_at: Timestamp::new(1000),
                },
            )
            .await;
    }

    #[tokio::test]
    async fn test_disconnect_removes_membership_immediately() {
        // テスト項目: 切断直後からメンバーシップの問い合わせに退室が反映される
        // given (前提条件):
        let registry = registry();
        registry
            .create_room(code("R1"), None, conn("a"), Timestamp::new(1))
            .await
            .unwrap();
        registry
            .join_room(&code("R1"), conn("b"), Timestamp::new(2))
            .await
            .unwrap();
        let usecase = DisconnectClientUseCase::new(registry.clone(), cache(), pusher(), false);

        // when (操作):
        let departures = usecase.execute(&conn("a")).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 1);
        assert!(!departures[0].room_removed);
        assert_eq!(
            registry.members(&code("R1"), ScopeFilter::Any).await,
            vec![conn("b")]
        );
    }

    #[tokio::test]
    async fn test_disconnect_last_member_keeps_cache_by_default() {
        // テスト項目: 最後の参加者が切断しても、既定ではキャッシュは残る
        // given (前提条件):
        let registry = registry();
        let cache = cache();
        registry
            .create_room(code("GAMMA"), None, conn("x"), Timestamp::new(1))
            .await
            .unwrap();
        seed_state(cache.as_ref(), "GAMMA").await;
        let usecase =
            DisconnectClientUseCase::new(registry.clone(), cache.clone(), pusher(), false);

        // when (操作):
        let departures = usecase.execute(&conn("x")).await;

        // then (期待する結果):
        assert!(departures[0].room_removed);
        assert!(!registry.is_occupied(&code("GAMMA")).await);
        assert!(cache.load(&code("GAMMA"), FeatureKind::Game).await.is_some());
    }

    #[tokio::test]
    async fn test_disconnect_last_member_purges_cache_when_configured() {
        // テスト項目: 設定により、空になった Room のキャッシュが削除される
        // given (前提条件):
        let registry = registry();
        let cache = cache();
        registry
            .create_room(code("GAMMA"), None, conn("x"), Timestamp::new(1))
            .await
            .unwrap();
        seed_state(cache.as_ref(), "GAMMA").await;
        let usecase = DisconnectClientUseCase::new(registry.clone(), cache.clone(), pusher(), true);

        // when (操作):
        usecase.execute(&conn("x")).await;

        // then (期待する結果):
        assert!(cache.load(&code("GAMMA"), FeatureKind::Game).await.is_none());
    }

    #[tokio::test]
    async fn test_purge_skips_rooms_with_remaining_members() {
        // テスト項目: 他の参加者が残る Room のキャッシュは削除されない
        // given (前提条件):
        let registry = registry();
        let cache = cache();
        registry
            .create_room(code("GAMMA"), None, conn("x"), Timestamp::new(1))
            .await
            .unwrap();
        registry
            .join_board(code("GAMMA"), conn("y"), Timestamp::new(2))
            .await;
        seed_state(cache.as_ref(), "GAMMA").await;
        let usecase = DisconnectClientUseCase::new(registry.clone(), cache.clone(), pusher(), true);

        // when (操作):
        usecase.execute(&conn("x")).await;

        // then (期待する結果):
        assert_eq!(
            registry.count_members(&code("GAMMA"), RoomScope::Board).await,
            1
        );
        assert!(cache.load(&code("GAMMA"), FeatureKind::Game).await.is_some());
    }

    #[tokio::test]
    async fn test_disconnect_without_membership() {
        // テスト項目: どの Room にも参加していない接続の切断も問題なく処理される
        // given (前提条件):
        let usecase = DisconnectClientUseCase::new(registry(), cache(), pusher(), true);

        // when (操作):
        let departures = usecase.execute(&conn("lonely")).await;

        // then (期待する結果):
        assert!(departures.is_empty());
    }
}
