//! UseCase: Room 入室（Session スコープ）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者のいる Room だけに入室でき、入室時にポモドーロ状態が添えられること
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存 Room への入室
//! - 異常系：存在しない Room、最後の参加者が抜けた後の Room
//! - エッジケース：Board スコープだけに参加者がいる Room

use std::sync::Arc;

use chalkboard_shared::time::Clock;

use crate::domain::{
    ConnectionId, FeatureKind, FeatureStateCache, RoomCode, RoomError, RoomRegistry, Timestamp,
};

use super::{EmptiedRoomPurge, RoomAdmitted};

/// Room 入室のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    cache: Arc<dyn FeatureStateCache>,
    clock: Arc<dyn Clock>,
    emptied_room: EmptiedRoomPurge,
}

impl JoinRoomUseCase {
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

    /// 入室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RoomAdmitted)` - 入室後の Room と、キャッシュ済みのポモドーロ状態
    /// * `Err(RoomError::RoomNotFound)` - Session スコープに参加者がいない
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_code: String,
    ) -> Result<RoomAdmitted, RoomError> {
        let code = RoomCode::new(raw_code)?;
        let at = Timestamp::new(self.clock.now_millis());

        let entered = self
            .registry
            .join_room(&code, connection_id.clone(), at)
            .await?;
        self.emptied_room.apply(entered.moved_out.as_slice()).await;
        let room = entered.room;
        tracing::info!(
            "'{}' joined room '{}' ({} in session)",
            connection_id,
            room.code,
            room.count_in(crate::domain::RoomScope::Session)
        );

        let pomodoro = self.cache.load(&room.code, FeatureKind::Pomodoro).await;
        Ok(RoomAdmitted { room, pomodoro })
    }
}
