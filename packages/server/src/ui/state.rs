//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, JoinBoardUseCase, JoinRoomUseCase, PersistStateUseCase, RelayEventUseCase,
    RestoreStateUseCase,
};

/// UseCase の集合（ハンドラーはここから各ユースケースを呼び出す）
pub struct AppState {
    /// ConnectClientUseCase（接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// CreateRoomUseCase（Room 作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（Room 入室のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// JoinBoardUseCase（Board 参加のユースケース）
    pub join_board_usecase: Arc<JoinBoardUseCase>,
    /// RelayEventUseCase（イベント中継のユースケース）
    pub relay_event_usecase: Arc<RelayEventUseCase>,
    /// PersistStateUseCase（状態保存のユースケース）
    pub persist_state_usecase: Arc<PersistStateUseCase>,
    /// RestoreStateUseCase（状態復元のユースケース）
    pub restore_state_usecase: Arc<RestoreStateUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
