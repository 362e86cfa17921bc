//! Per-event routing of inbound client frames.
//!
//! Each client event is turned into use case calls plus the outbound frames
//! they produce. Fan-out audiences come from `ServerEvent::relay_audience`,
//! except for the board `userJoined` notice which uses `BOARD_JOIN_AUDIENCE`.

use thiserror::Error;

use crate::{
    domain::{
        Audience, CachedFeatureState, ConnectionId, FeatureKind, FeatureState, RoomCode,
        RoomError, ValueObjectError,
    },
    infrastructure::dto::websocket::{
        BOARD_JOIN_AUDIENCE, ClientEvent, GameActionPayload, GhostNotice, PomodoroAction,
        PomodoroActionPayload, PomodoroSnapshot, RoomAdmission, ServerEvent, UserJoinedNotice,
    },
    ui::state::AppState,
};

/// Failure while handling one inbound event.
///
/// Never closes the socket: the requester gets `reply()` and the connection
/// keeps going.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error("Invalid board id: {0}")]
    InvalidRoute(#[from] ValueObjectError),

    #[error("Invalid pomodoro state: {0}")]
    InvalidPomodoroState(serde_json::Error),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HandlerError {
    /// Frame sent back to the originator only
    pub fn reply(&self) -> ServerEvent {
        match self {
            HandlerError::Room(e) => ServerEvent::RoomError(e.to_string()),
            other => ServerEvent::RelayError(other.to_string()),
        }
    }
}

pub async fn dispatch(
    state: &AppState,
    sender: &ConnectionId,
    event: ClientEvent,
) -> Result<(), HandlerError> {
    match event {
        ClientEvent::CreateRoom(request) => {
            let admitted = state
                .create_room_usecase
                .execute(sender.clone(), request.room_name, request.custom_code)
                .await?;
            let admission = RoomAdmission::from(&admitted.room);
            reply(state, sender, &ServerEvent::RoomCreated(admission)).await?;
            deliver_pomodoro(state, sender, admitted.pomodoro).await
        }
        ClientEvent::JoinRoom(raw_code) => {
            let admitted = state
                .join_room_usecase
                .execute(sender.clone(), raw_code)
                .await?;
            let admission = RoomAdmission::from(&admitted.room);
            reply(state, sender, &ServerEvent::RoomJoined(admission)).await?;
            publish(state, &admitted.room.code, sender, &user_joined(sender)).await?;
            deliver_pomodoro(state, sender, admitted.pomodoro).await
        }
        ClientEvent::Join(board_id) => {
            let admitted = state
                .join_board_usecase
                .execute(sender.clone(), board_id)
                .await?;
            publish_to(
                state,
                &admitted.room.code,
                sender,
                BOARD_JOIN_AUDIENCE,
                &user_joined(sender),
            )
            .await?;
            deliver_pomodoro(state, sender, admitted.pomodoro).await
        }
        ClientEvent::BoardUpdate(payload) => {
            let code = RoomCode::new(payload.board_id.clone())?;
            publish(state, &code, sender, &ServerEvent::BoardUpdate(payload)).await
        }
        ClientEvent::GameAction(payload) => handle_game_action(state, sender, payload).await,
        ClientEvent::GamePersistState(payload) => {
            let code = RoomCode::new(payload.board_id)?;
            state
                .persist_state_usecase
                .execute(
                    sender.clone(),
                    code,
                    FeatureKind::Game,
                    FeatureState::new(payload.full_state),
                )
                .await;
            Ok(())
        }
        ClientEvent::PomodoroAction(payload) => handle_pomodoro(state, sender, payload).await,
        ClientEvent::UserGhost(payload) => {
            let code = RoomCode::new(payload.board_id)?;
            let notice = ServerEvent::UserGhost(GhostNotice {
                user_id: payload.user_id,
                is_ghost: payload.is_ghost,
            });
            publish(state, &code, sender, &notice).await
        }
        ClientEvent::ChatMessage(payload) => {
            let code = RoomCode::new(payload.board_id.clone())?;
            publish(state, &code, sender, &ServerEvent::ChatMessage(payload)).await
        }
    }
}

/// Relays the action; a `*_STATE_REQ` action additionally pulls the cached game.
async fn handle_game_action(
    state: &AppState,
    sender: &ConnectionId,
    payload: GameActionPayload,
) -> Result<(), HandlerError> {
    let code = RoomCode::new(payload.board_id.clone())?;
    let is_state_request = payload.is_state_request();

    publish(state, &code, sender, &ServerEvent::GameAction(payload)).await?;

    if is_state_request
        && let Some(cached) = state
            .restore_state_usecase
            .execute(&code, FeatureKind::Game)
            .await
    {
        let restore = ServerEvent::GameRestore(cached.state.into_value());
        reply(state, sender, &restore).await?;
    }
    Ok(())
}

async fn handle_pomodoro(
    state: &AppState,
    sender: &ConnectionId,
    payload: PomodoroActionPayload,
) -> Result<(), HandlerError> {
    let code = RoomCode::new(payload.board_id.clone())?;

    match (payload.action, payload.payload) {
        (PomodoroAction::Sync, Some(timer)) => {
            let snapshot: PomodoroSnapshot =
                serde_json::from_value(timer).map_err(HandlerError::InvalidPomodoroState)?;
            // Store and fan-out are separate steps: with concurrent pushers the
            // cache keeps the last store, which may not be the last frame delivered.
            state
                .persist_state_usecase
                .execute(
                    sender.clone(),
                    code.clone(),
                    FeatureKind::Pomodoro,
                    FeatureState::new(serde_json::to_value(&snapshot)?),
                )
                .await;
            publish(state, &code, sender, &ServerEvent::PomodoroSync(snapshot)).await
        }
        (PomodoroAction::Sync, None) => {
            let cached = state
                .restore_state_usecase
                .execute(&code, FeatureKind::Pomodoro)
                .await;
            deliver_pomodoro(state, sender, cached).await
        }
        (action, timer) => {
            let echo = ServerEvent::PomodoroAction(PomodoroActionPayload {
                board_id: payload.board_id,
                action,
                payload: timer,
            });
            publish(state, &code, sender, &echo).await
        }
    }
}

fn user_joined(connection_id: &ConnectionId) -> ServerEvent {
    ServerEvent::UserJoined(UserJoinedNotice {
        user_id: connection_id.to_string(),
    })
}

/// Sends the cached pomodoro timer to one connection, if there is one.
async fn deliver_pomodoro(
    state: &AppState,
    to: &ConnectionId,
    cached: Option<CachedFeatureState>,
) -> Result<(), HandlerError> {
    let Some(cached) = cached else {
        return Ok(());
    };

    match serde_json::from_value::<PomodoroSnapshot>(cached.state.into_value()) {
        Ok(snapshot) => reply(state, to, &ServerEvent::PomodoroSync(snapshot)).await,
        Err(e) => {
            tracing::warn!("Cached pomodoro state is unreadable: {}", e);
            Ok(())
        }
    }
}

/// Fans `event` out with its own audience.
async fn publish(
    state: &AppState,
    code: &RoomCode,
    sender: &ConnectionId,
    event: &ServerEvent,
) -> Result<(), HandlerError> {
    match event.relay_audience() {
        Some(audience) => publish_to(state, code, sender, audience, event).await,
        None => {
            tracing::warn!("Refusing to fan out a direct reply to room '{}'", code);
            Ok(())
        }
    }
}

async fn publish_to(
    state: &AppState,
    code: &RoomCode,
    sender: &ConnectionId,
    audience: Audience,
    event: &ServerEvent,
) -> Result<(), HandlerError> {
    let message = event.to_json()?;
    state
        .relay_event_usecase
        .publish(code, sender, audience, &message)
        .await;
    Ok(())
}

/// Sends `event` to `to` only. A connection that is already gone is logged, not an error.
pub async fn reply(
    state: &AppState,
    to: &ConnectionId,
    event: &ServerEvent,
) -> Result<(), HandlerError> {
    let message = event.to_json()?;
    if let Err(e) = state.relay_event_usecase.push_to(to, &message).await {
        tracing::warn!("Failed to reply to '{}': {}", to, e);
    }
    Ok(())
}
