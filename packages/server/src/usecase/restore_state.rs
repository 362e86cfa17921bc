//! UseCase: フィーチャー状態の復元

use std::sync::Arc;

use crate::domain::{CachedFeatureState, FeatureKind, FeatureStateCache, RoomCode};

/// 状態復元のユースケース
///
/// 読み取り専用で、何度呼んでも同じ結果を返します。
pub struct RestoreStateUseCase {
    cache: Arc<dyn FeatureStateCache>,
}

impl RestoreStateUseCase {
    pub fn new(cache: Arc<dyn FeatureStateCache>) -> Self {
        Self { cache }
    }

    pub async fn execute(
        &self,
        code: &RoomCode,
        feature: FeatureKind,
    ) -> Option<CachedFeatureState> {
        let restored = self.cache.load(code, feature).await;
        if restored.is_none() {
            tracing::debug!("No {:?} state cached for room '{}'", feature, code);
        }
        restored
    }
}
