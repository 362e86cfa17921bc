//! UseCase: Room 詳細取得

use std::sync::Arc;

use crate::domain::{FeatureKind, FeatureStateCache, RoomCode, RoomRegistry, RoomSnapshot};

use super::error::GetRoomDetailError;

/// Room の参加者とキャッシュ済みフィーチャーの一覧
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDetail {
    pub room: RoomSnapshot,
    pub cached_features: Vec<FeatureKind>,
}

pub struct GetRoomDetailUseCase {
    registry: Arc<dyn RoomRegistry>,
    cache: Arc<dyn FeatureStateCache>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, cache: Arc<dyn FeatureStateCache>) -> Self {
        Self { registry, cache }
    }

    pub async fn execute(&self, raw_code: String) -> Result<RoomDetail, GetRoomDetailError> {
        let code = RoomCode::new(raw_code)?;
        let room = self
            .registry
            .room(&code)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let cached_features = self.cache.features(&code).await;
        Ok(RoomDetail {
            room,
            cached_features,
        })
    }
}
