//! UseCase: Room 一覧取得

use std::sync::Arc;

use crate::domain::{RoomRegistry, RoomSnapshot};

pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者のいる全 Room をコード順で取得
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        self.registry.rooms().await
    }
}
