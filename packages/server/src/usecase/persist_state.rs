//! UseCase: フィーチャー状態の保存

use std::sync::Arc;

use chalkboard_shared::time::Clock;

use crate::domain::{
    CachedFeatureState, ConnectionId, FeatureKind, FeatureState, FeatureStateCache, RoomCode,
    Timestamp,
};

/// 状態保存のユースケース
///
/// 発行者の権限は検証しません。後から届いた状態が常に勝ちます。
pub struct PersistStateUseCase {
    cache: Arc<dyn FeatureStateCache>,
    clock: Arc<dyn Clock>,
}

impl PersistStateUseCase {
    pub fn new(cache: Arc<dyn FeatureStateCache>, clock: Arc<dyn Clock>) -> Self {
        Self { cache, clock }
    }

    /// 状態を保存し、置き換えられた古い状態を返す
    pub async fn execute(
        &self,
        publisher: ConnectionId,
        code: RoomCode,
        feature: FeatureKind,
        state: FeatureState,
    ) -> Option<CachedFeatureState> {
        let entry = CachedFeatureState {
            feature,
            state,
            published_by: publisher,
            published_at: Timestamp::new(self.clock.now_millis()),
        };
        tracing::debug!(
            "Persisting {:?} state of room '{}' (published by '{}')",
            feature,
            code,
            entry.published_by
        );
        self.cache.store(code, entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{cache, clock, code, conn, NOW};
    use serde_json::json;

    #[tokio::test]
    async fn test_persist_records_publisher_and_time() {
        // テスト項目: 保存された状態に発行者と時刻が記録される
        // given (前提条件):
        let cache = cache();
        let usecase = PersistStateUseCase::new(cache.clone(), clock());

        // when (操作):
        let replaced = usecase
            .execute(
                conn("alice"),
                code("GAMMA"),
                FeatureKind::Game,
                FeatureState::new(json!({"board": [1, 2, 3]})),
            )
            .await;

        // then (期待する結果):
        assert_eq!(replaced, None);
        let stored = cache.load(&code("GAMMA"), FeatureKind::Game).await.unwrap();
        assert_eq!(stored.published_by, conn("alice"));
        assert_eq!(stored.published_at, Timestamp::new(NOW));
        assert_eq!(stored.state.as_value(), &json!({"board": [1, 2, 3]}));
    }

    #[tokio::test]
    async fn test_last_write_wins_regardless_of_publisher() {
        // テスト項目: 別の接続からの保存でも後から届いた状態が勝つ
        // given (前提条件):
        let cache = cache();
        let usecase = PersistStateUseCase::new(cache.clone(), clock());
        usecase
            .execute(
                conn("alice"),
                code("GAMMA"),
                FeatureKind::Game,
                FeatureState::new(json!({"turn": 1})),
            )
            .await;

        // when (操作):
        let replaced = usecase
            .execute(
                conn("mallory"),
                code("GAMMA"),
                FeatureKind::Game,
                FeatureState::new(json!({"turn": 2})),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            replaced.map(|old| old.state.into_value()),
            Some(json!({"turn": 1}))
        );
        let stored = cache.load(&code("GAMMA"), FeatureKind::Game).await.unwrap();
        assert_eq!(stored.published_by, conn("mallory"));
        assert_eq!(stored.state.as_value(), &json!({"turn": 2}));
    }
}
