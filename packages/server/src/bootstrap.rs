//! Dependency wiring.
//!
//! Builds every use case on top of the in-memory registry, cache and
//! WebSocket pusher. Shared by the server binary and the end-to-end tests.

use std::sync::Arc;

use chalkboard_shared::time::{Clock, SystemClock};

use crate::{
    config::RelayConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryFeatureStateCache, InMemoryRoomRegistry},
    },
    ui::state::AppState,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinBoardUseCase, JoinRoomUseCase, PersistStateUseCase,
        RelayEventUseCase, RestoreStateUseCase,
    },
};

/// Build the application state with the system clock
pub fn build_app_state(config: &RelayConfig) -> AppState {
    build_app_state_with_clock(config, Arc::new(SystemClock))
}

/// Build the application state with the given clock
pub fn build_app_state_with_clock(config: &RelayConfig, clock: Arc<dyn Clock>) -> AppState {
    // 1. Repository（in-memory）
    let registry = Arc::new(InMemoryRoomRegistry::new());
    let cache = Arc::new(InMemoryFeatureStateCache::new());

    // 2. MessagePusher（WebSocket）
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. UseCases
    AppState {
        connect_client_usecase: Arc::new(ConnectClientUseCase::new(
            message_pusher.clone(),
            clock.clone(),
        )),
        disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
            registry.clone(),
            cache.clone(),
            message_pusher.clone(),
            config.purge_state_on_empty,
        )),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(
            registry.clone(),
            cache.clone(),
            clock.clone(),
            config.purge_state_on_empty,
        )),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            registry.clone(),
            cache.clone(),
            clock.clone(),
            config.purge_state_on_empty,
        )),
        join_board_usecase: Arc::new(JoinBoardUseCase::new(
            registry.clone(),
            cache.clone(),
            clock.clone(),
            config.purge_state_on_empty,
        )),
        relay_event_usecase: Arc::new(RelayEventUseCase::new(
            registry.clone(),
            message_pusher,
        )),
        persist_state_usecase: Arc::new(PersistStateUseCase::new(cache.clone(), clock)),
        restore_state_usecase: Arc::new(RestoreStateUseCase::new(cache.clone())),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(registry.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(registry, cache)),
    }
}
