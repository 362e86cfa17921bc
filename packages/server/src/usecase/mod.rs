//! UseCase layer
//!
//! リレーの各操作（接続・切断、Room の作成・入室、イベント中継、状態の保存・復元）を
//! ドメイン層のインターフェースだけに依存して実装します。

mod connect_client;
mod create_room;
mod disconnect_client;
mod emptied_room;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_board;
mod join_room;
mod persist_state;
mod relay_event;
mod restore_state;

pub use connect_client::ConnectClientUseCase;
pub use create_room::{CreateRoomUseCase, MAX_GENERATED_CODE_ATTEMPTS};
pub use disconnect_client::DisconnectClientUseCase;
pub use emptied_room::EmptiedRoomPurge;
pub use error::{ConnectError, GetRoomDetailError, RelayError};
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use get_rooms::GetRoomsUseCase;
pub use join_board::JoinBoardUseCase;
pub use join_room::JoinRoomUseCase;
pub use persist_state::PersistStateUseCase;
pub use relay_event::RelayEventUseCase;
pub use restore_state::RestoreStateUseCase;

use crate::domain::{CachedFeatureState, RoomSnapshot};

/// Result of a successful `create-room` / `join-room` / `join` admission
#[derive(Debug, Clone, PartialEq)]
pub struct RoomAdmitted {
    pub room: RoomSnapshot,
    /// Pomodoro state delivered to every newly admitted member
    pub pomodoro: Option<CachedFeatureState>,
}
