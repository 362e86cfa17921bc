//! UseCase: Board スコープへの参加
//!
//! `join` は存在チェックを行いません。参加者のいない Board Room でも作成されます。
//! 参加時には Session と同じくキャッシュ済みのポモドーロ状態が添えられます。

use std::sync::Arc;

use chalkboard_shared::time::Clock;

use crate::domain::{
    ConnectionId, FeatureKind, FeatureStateCache, RoomCode, RoomError, RoomRegistry, Timestamp,
};

use super::{EmptiedRoomPurge, RoomAdmitted};

pub struct JoinBoardUseCase {
    registry: Arc<dyn RoomRegistry>,
    cache: Arc<dyn FeatureStateCache>,
    clock: Arc<dyn Clock>,
    emptied_room: EmptiedRoomPurge,
}

impl JoinBoardUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        cache: Arc<dyn FeatureStateCache>,
        clock: Arc<dyn Clock>,
        purge_state_on_empty: bool,
    ) -> Self {
        Self {
            registry,
            emptied_room: EmptiedRoomPurge::new(cache.clone(), purge_state_on_empty),
            cache,
            clock,
        }
    }

    /// Board スコープに参加する
    ///
    /// コードの形式が不正な場合だけ失敗します。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_code: String,
    ) -> Result<RoomAdmitted, RoomError> {
        let code = RoomCode::new(raw_code)?;
        let at = Timestamp::new(self.clock.now_millis());
        let entered = self
            .registry
            .join_board(code, connection_id.clone(), at)
            .await;
        self.emptied_room.apply(entered.moved_out.as_slice()).await;
        tracing::info!("'{}' joined board '{}'", connection_id, entered.room.code);

        let pomodoro = self
            .cache
            .load(&entered.room.code, FeatureKind::Pomodoro)
            .await;
        Ok(RoomAdmitted {
            room: entered.room,
            pomodoro,
        })
    }
}
