//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Payload field names are camelCase. Payloads that the relay only forwards
//! keep their unknown fields through `#[serde(flatten)]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::domain::{Audience, RoomScope, ScopeFilter};

/// Suffix of a `game:action` type that asks for the room's game state
pub const STATE_REQUEST_SUFFIX: &str = "_STATE_REQ";

/// Audience of the `userJoined` notice sent when a connection joins a board room.
///
/// Unlike `join-room`, this is a room-wide broadcast that reaches the joiner too.
pub const BOARD_JOIN_AUDIENCE: Audience = Audience::everyone_in(ScopeFilter::Only(RoomScope::Board));

// ========================================
// Client → Server
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "create-room")]
    CreateRoom(CreateRoomRequest),
    #[serde(rename = "join-room")]
    JoinRoom(String),
    /// Board-display room, separate from `create-room` / `join-room`
    #[serde(rename = "join")]
    Join(String),
    #[serde(rename = "board:update")]
    BoardUpdate(RoutedPayload),
    #[serde(rename = "game:action")]
    GameAction(GameActionPayload),
    #[serde(rename = "game:persist_state")]
    GamePersistState(PersistStatePayload),
    #[serde(rename = "pomodoro:action")]
    PomodoroAction(PomodoroActionPayload),
    #[serde(rename = "user:ghost")]
    UserGhost(GhostPayload),
    #[serde(rename = "chat:message")]
    ChatMessage(RoutedPayload),
}

impl ClientEvent {
    /// Event name as it appears on the wire, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateRoom(_) => "create-room",
            ClientEvent::JoinRoom(_) => "join-room",
            ClientEvent::Join(_) => "join",
            ClientEvent::BoardUpdate(_) => "board:update",
            ClientEvent::GameAction(_) => "game:action",
            ClientEvent::GamePersistState(_) => "game:persist_state",
            ClientEvent::PomodoroAction(_) => "pomodoro:action",
            ClientEvent::UserGhost(_) => "user:ghost",
            ClientEvent::ChatMessage(_) => "chat:message",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<String>,
}

/// Passthrough payload routed by its `boardId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedPayload {
    #[serde(rename = "boardId")]
    pub board_id: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// `game:action` payload: `{boardId, userId, userName, userColor, type, payload}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameActionPayload {
    #[serde(rename = "boardId")]
    pub board_id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl GameActionPayload {
    pub fn is_state_request(&self) -> bool {
        self.action_type.ends_with(STATE_REQUEST_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistStatePayload {
    pub board_id: String,
    pub full_state: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroAction {
    Start,
    Pause,
    Reset,
    Sync,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroActionPayload {
    pub board_id: String,
    pub action: PomodoroAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Timer state published by the authoritative client on `sync`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSnapshot {
    pub phase: String,
    pub remaining_time: Number,
    pub is_running: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostPayload {
    pub board_id: String,
    pub user_id: Value,
    pub is_ghost: bool,
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connected")]
    Connected(ConnectedNotice),
    #[serde(rename = "roomCreated")]
    RoomCreated(RoomAdmission),
    #[serde(rename = "roomJoined")]
    RoomJoined(RoomAdmission),
    #[serde(rename = "roomError")]
    RoomError(String),
    #[serde(rename = "userJoined")]
    UserJoined(UserJoinedNotice),
    #[serde(rename = "board:update")]
    BoardUpdate(RoutedPayload),
    #[serde(rename = "game:action")]
    GameAction(GameActionPayload),
    #[serde(rename = "game:restore")]
    GameRestore(Value),
    #[serde(rename = "user:ghost")]
    UserGhost(GhostNotice),
    #[serde(rename = "pomodoro:sync")]
    PomodoroSync(PomodoroSnapshot),
    #[serde(rename = "pomodoro:action")]
    PomodoroAction(PomodoroActionPayload),
    #[serde(rename = "chat:message")]
    ChatMessage(RoutedPayload),
    #[serde(rename = "relay:error")]
    RelayError(String),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Fan-out audience used when this event is relayed to a room.
    ///
    /// `None` for events that only ever answer the requesting connection.
    pub fn relay_audience(&self) -> Option<Audience> {
        match self {
            ServerEvent::BoardUpdate(_) => Some(Audience::others_in(ScopeFilter::Only(
                RoomScope::Board,
            ))),
            ServerEvent::UserJoined(_) => Some(Audience::others_in(ScopeFilter::Only(
                RoomScope::Session,
            ))),
            ServerEvent::GameAction(_)
            | ServerEvent::UserGhost(_)
            | ServerEvent::PomodoroSync(_)
            | ServerEvent::ChatMessage(_) => Some(Audience::others_in(ScopeFilter::Any)),
            ServerEvent::PomodoroAction(_) => Some(Audience::everyone_in(ScopeFilter::Any)),
            ServerEvent::Connected(_)
            | ServerEvent::RoomCreated(_)
            | ServerEvent::RoomJoined(_)
            | ServerEvent::RoomError(_)
            | ServerEvent::GameRestore(_)
            | ServerEvent::RelayError(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedNotice {
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAdmission {
    pub room_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedNotice {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostNotice {
    pub user_id: Value,
    pub is_ghost: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_create_room_with_custom_code() {
        // テスト項目: create-room イベントをパースできる
        // given (前提条件):
        let text = r#"{"event":"create-room","data":{"roomName":"Retro","customCode":"ABC123"}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::CreateRoom(CreateRoomRequest {
                room_name: Some("Retro".to_string()),
                custom_code: Some("ABC123".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_create_room_without_fields() {
        // テスト項目: フィールドを省略した create-room もパースできる
        // given (前提条件):
        let text = r#"{"event":"create-room","data":{}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::CreateRoom(CreateRoomRequest::default()));
    }

    #[test]
    fn test_board_update_keeps_unknown_fields() {
        // テスト項目: board:update の未知のフィールドが中継時に保持される
        // given (前提条件):
        let text = r#"{"event":"board:update","data":{"boardId":"R1","strokes":[[1,2],[3,4]],"color":"red"}}"#;
        let ClientEvent::BoardUpdate(payload) = serde_json::from_str(text).unwrap() else {
            panic!("expected board:update");
        };

        // when (操作):
        let json = ServerEvent::BoardUpdate(payload).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "event": "board:update",
                "data": {"boardId": "R1", "strokes": [[1, 2], [3, 4]], "color": "red"}
            })
        );
    }

    #[test]
    fn test_game_action_state_request_detection() {
        // テスト項目: *_STATE_REQ タイプの game:action が状態要求として判定される
        // given (前提条件):
        let request: GameActionPayload = serde_json::from_value(json!({
            "boardId": "GAMMA",
            "userId": "u1",
            "userName": "Zed",
            "userColor": "#00f",
            "type": "CONNECT4_STATE_REQ",
            "payload": null
        }))
        .unwrap();
        let mv: GameActionPayload = serde_json::from_value(json!({
            "boardId": "GAMMA",
            "type": "CONNECT4_MOVE",
            "payload": {"column": 3}
        }))
        .unwrap();

        // when (操作):

        // then (期待する結果):
        assert!(request.is_state_request());
        assert!(!mv.is_state_request());
        assert_eq!(request.body.get("userName"), Some(&json!("Zed")));
    }

    #[test]
    fn test_pomodoro_action_parse() {
        // テスト項目: pomodoro:action をパースできる（payload は任意）
        // given (前提条件):
        let start = r#"{"event":"pomodoro:action","data":{"boardId":"R1","action":"start"}}"#;
        let sync = r#"{"event":"pomodoro:action","data":{"boardId":"R1","action":"sync","payload":{"phase":"work","remainingTime":1500,"isRunning":true}}}"#;

        // when (操作):
        let start: ClientEvent = serde_json::from_str(start).unwrap();
        let sync: ClientEvent = serde_json::from_str(sync).unwrap();

        // then (期待する結果):
        assert!(matches!(
            start,
            ClientEvent::PomodoroAction(PomodoroActionPayload {
                action: PomodoroAction::Start,
                payload: None,
                ..
            })
        ));
        let ClientEvent::PomodoroAction(sync) = sync else {
            panic!("expected pomodoro:action");
        };
        let snapshot: PomodoroSnapshot = serde_json::from_value(sync.payload.unwrap()).unwrap();
        assert_eq!(snapshot.phase, "work");
        assert!(snapshot.is_running);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        // テスト項目: 未知のイベントはパースエラーになる
        // given (前提条件):
        let text = r#"{"event":"board:delete","data":{"boardId":"R1"}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_wire_names() {
        // テスト項目: サーバーイベントが既定のイベント名・camelCase で出力される
        // given (前提条件):
        let created = ServerEvent::RoomCreated(RoomAdmission {
            room_code: "ABC123".to_string(),
            room_name: Some("Retro".to_string()),
        });
        let joined = ServerEvent::UserJoined(UserJoinedNotice {
            user_id: "conn-1".to_string(),
        });
        let error = ServerEvent::RoomError("Room 'X' does not exist".to_string());

        // when (操作):
        let created: Value = serde_json::from_str(&created.to_json().unwrap()).unwrap();
        let joined: Value = serde_json::from_str(&joined.to_json().unwrap()).unwrap();
        let error: Value = serde_json::from_str(&error.to_json().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            created,
            json!({"event": "roomCreated", "data": {"roomCode": "ABC123", "roomName": "Retro"}})
        );
        assert_eq!(
            joined,
            json!({"event": "userJoined", "data": {"userId": "conn-1"}})
        );
        assert_eq!(
            error,
            json!({"event": "roomError", "data": "Room 'X' does not exist"})
        );
    }

    #[test]
    fn test_relay_audience_table() {
        // テスト項目: イベント種別ごとに配信範囲（スコープ・送信者を含むか）が決まる
        // given (前提条件):
        let board = ServerEvent::BoardUpdate(RoutedPayload {
            board_id: "R1".to_string(),
            body: Map::new(),
        });
        let echo = ServerEvent::PomodoroAction(PomodoroActionPayload {
            board_id: "R1".to_string(),
            action: PomodoroAction::Pause,
            payload: None,
        });
        let restore = ServerEvent::GameRestore(json!({}));

        // when (操作):

        // then (期待する結果):
        assert_eq!(
            board.relay_audience(),
            Some(Audience::others_in(ScopeFilter::Only(RoomScope::Board)))
        );
        assert_eq!(
            echo.relay_audience(),
            Some(Audience::everyone_in(ScopeFilter::Any))
        );
        assert_eq!(restore.relay_audience(), None);
        assert!(BOARD_JOIN_AUDIENCE.include_sender);
    }
}
