//! UseCase: Room 作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - カスタムコードの衝突判定、コードの自動生成、作成者の入室
//!
//! ### なぜこのテストが必要か
//! - 作成と作成者の入室は一つの操作で、空の Room を別の接続と奪い合わない
//! - 使用中のコードだけが衝突扱いになり、空いたコードは即座に再利用できる
//!
//! ### どのような状況を想定しているか
//! - 正常系：カスタムコード指定 / 自動生成
//! - 異常系：使用中のカスタムコード、不正なコード
//! - エッジケース：同じコードでの同時作成、空になった後の再作成

use std::sync::Arc;

use chalkboard_shared::time::Clock;

use crate::domain::{
    ConnectionId, FeatureKind, FeatureStateCache, RoomCode, RoomCodeFactory, RoomEntered,
    RoomError, RoomName, RoomRegistry, Timestamp,
};

use super::{EmptiedRoomPurge, RoomAdmitted};

/// Upper bound on attempts to find an unoccupied generated code
pub const MAX_GENERATED_CODE_ATTEMPTS: usize = 16;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    cache: Arc<dyn FeatureStateCache>,
    clock: Arc<dyn Clock>,
    emptied_room: EmptiedRoomPurge,
}

impl CreateRoomUseCase {
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

    /// Room 作成を実行
    ///
    /// # Arguments
    ///
    /// * `creator` - 作成者の接続 ID（作成と同時に入室する）
    /// * `room_name` - 表示名（任意、一意性は検証しない）
    /// * `custom_code` - 指定コード。空の場合は自動生成する
    ///
    /// # Returns
    ///
    /// * `Ok(RoomAdmitted)` - 作成された Room と、キャッシュ済みのポモドーロ状態
    /// * `Err(RoomError::CodeInUse)` - 指定コードの Room に参加者がいる
    /// * `Err(RoomError::InvalidRequest)` - コードや名前の形式が不正
    pub async fn execute(
        &self,
        creator: ConnectionId,
        room_name: Option<String>,
        custom_code: Option<String>,
    ) -> Result<RoomAdmitted, RoomError> {
        let name = RoomName::parse(room_name)?;
        let at = Timestamp::new(self.clock.now_millis());

        let custom_code = custom_code.filter(|c| !c.trim().is_empty());
        let entered = match custom_code {
            Some(raw) => {
                let code = RoomCode::new(raw)?;
                self.registry.create_room(code, name, creator, at).await?
            }
            None => self.create_with_generated_code(name, creator, at).await?,
        };
        self.emptied_room.apply(entered.moved_out.as_slice()).await;
        let room = entered.room;

        tracing::info!(
            "Room '{}' created by '{}'",
            room.code,
            room.members
                .first()
                .map(|m| m.connection_id.as_str())
                .unwrap_or_default()
        );

        let pomodoro = self.cache.load(&room.code, FeatureKind::Pomodoro).await;
        Ok(RoomAdmitted { room, pomodoro })
    }

    async fn create_with_generated_code(
        &self,
        name: Option<RoomName>,
        creator: ConnectionId,
        at: Timestamp,
    ) -> Result<RoomEntered, RoomError> {
        for attempt in 1..=MAX_GENERATED_CODE_ATTEMPTS {
            let code = RoomCodeFactory::generate()?;
            match self
                .registry
                .create_room(code, name.clone(), creator.clone(), at)
                .await
            {
                Err(RoomError::CodeInUse(taken)) => {
                    tracing::debug!("Generated code '{}' is occupied (attempt {})", taken, attempt);
                }
                result => return result,
            }
        }

        Err(RoomError::Internal(format!(
            "no free room code after {} attempts",
            MAX_GENERATED_CODE_ATTEMPTS
        )))
    }
}
