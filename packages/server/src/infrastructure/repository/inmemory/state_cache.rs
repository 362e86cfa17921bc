//! InMemory Feature State Cache 実装
//!
//! Room コード × フィーチャーをキーに、最後に届いた状態を一つだけ保持します。
//! サーバー再起動で全て失われます。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CachedFeatureState, FeatureKind, FeatureStateCache, RoomCode};

/// インメモリ Feature State Cache 実装
#[derive(Debug, Default)]
pub struct InMemoryFeatureStateCache {
    entries: Mutex<HashMap<RoomCode, BTreeMap<FeatureKind, CachedFeatureState>>>,
}

impl InMemoryFeatureStateCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeatureStateCache for InMemoryFeatureStateCache {
    async fn store(
        &self,
        code: RoomCode,
        entry: CachedFeatureState,
    ) -> Option<CachedFeatureState> {
        let mut entries = self.entries.lock().await;
        entries.entry(code).or_default().insert(entry.feature, entry)
    }

    async fn load(&self, code: &RoomCode, feature: FeatureKind) -> Option<CachedFeatureState> {
        let entries = self.entries.lock().await;
        entries
            .get(code)
            .and_then(|features| features.get(&feature))
            .cloned()
    }

    async fn features(&self, code: &RoomCode) -> Vec<FeatureKind> {
        let entries = self.entries.lock().await;
        entries
            .get(code)
            .map(|features| features.keys().copied().collect())
            .unwrap_or_default()
    }

    async fn purge_room(&self, code: &RoomCode) -> usize {
        let mut entries = self.entries.lock().await;
        entries.remove(code).map(|features| features.len()).unwrap_or(0)
    }
}
