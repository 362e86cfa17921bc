//! 空になった Room のキャッシュ削除
//!
//! 切断でも、別の Room への移動でも、最後の参加者が抜けた Room は同じ扱いになります。

use std::sync::Arc;

use crate::domain::{FeatureStateCache, RoomDeparture};

/// Purges the cached state of rooms whose last member just left, when enabled.
#[derive(Clone)]
pub struct EmptiedRoomPurge {
    cache: Arc<dyn FeatureStateCache>,
    enabled: bool,
}

impl EmptiedRoomPurge {
    pub fn new(cache: Arc<dyn FeatureStateCache>, enabled: bool) -> Self {
        Self { cache, enabled }
    }

    /// Returns the number of cached states dropped.
    pub async fn apply(&self, departures: &[RoomDeparture]) -> usize {
        if !self.enabled {
            return 0;
        }

        let mut total = 0;
        for departure in departures.iter().filter(|d| d.room_removed) {
            let purged = self.cache.purge_room(&departure.code).await;
            if purged > 0 {
                tracing::info!(
                    "Purged {} cached state(s) of emptied room '{}'",
                    purged,
                    departure.code
                );
            }
            total += purged;
        }
        total
    }
}
