//! Event formatting for client display.

use serde_json::{Map, Value};

use chalkboard_server::infrastructure::dto::websocket::{
    GameActionPayload, PomodoroActionPayload, PomodoroSnapshot, RoutedPayload, ServerEvent,
};
use chalkboard_shared::time::timestamp_to_rfc3339;

const RULE: &str = "============================================================";

/// Event formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any event received from the relay
    ///
    /// # Arguments
    ///
    /// * `event` - The decoded server event
    /// * `me` - This client's connection id (to mark our own notices)
    pub fn format_server_event(event: &ServerEvent, me: &str) -> String {
        match event {
            ServerEvent::Connected(notice) => Self::format_connected(&notice.connection_id),
            ServerEvent::RoomCreated(admission) => Self::format_admitted(
                "Created",
                &admission.room_code,
                admission.room_name.as_deref(),
            ),
            ServerEvent::RoomJoined(admission) => Self::format_admitted(
                "Joined",
                &admission.room_code,
                admission.room_name.as_deref(),
            ),
            ServerEvent::RoomError(message) => format!("\n! room error: {}\n", message),
            ServerEvent::UserJoined(notice) => {
                let me_suffix = if notice.user_id == me { " (me)" } else { "" };
                format!("\n+ {}{} joined\n", notice.user_id, me_suffix)
            }
            ServerEvent::BoardUpdate(update) => Self::format_board_update(update),
            ServerEvent::GameAction(action) => Self::format_game_action(action),
            ServerEvent::GameRestore(state) => format!("\n⟲ game state restored: {}\n", state),
            ServerEvent::UserGhost(ghost) => {
                let mode = if ghost.is_ghost { "is now a ghost" } else { "is back" };
                format!("\n~ {} {}\n", display_value(&ghost.user_id), mode)
            }
            ServerEvent::PomodoroSync(timer) => Self::format_pomodoro_sync(timer),
            ServerEvent::PomodoroAction(action) => Self::format_pomodoro_action(action),
            ServerEvent::ChatMessage(message) => Self::format_chat_message(message),
            ServerEvent::RelayError(message) => format!("\n! relay error: {}\n", message),
        }
    }

    pub fn format_connected(connection_id: &str) -> String {
        format!("\nConnected as {}\n", connection_id)
    }

    /// Format the admission banner shown after `create-room` / `join-room`
    pub fn format_admitted(verb: &str, room_code: &str, room_name: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(RULE);
        output.push('\n');
        match room_name {
            Some(name) => output.push_str(&format!("{} room {} ({})\n", verb, room_code, name)),
            None => output.push_str(&format!("{} room {}\n", verb, room_code)),
        }
        output.push_str("Type /help for commands.\n");
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a chat message (`userId` and `text` if present, raw fields otherwise)
    pub fn format_chat_message(message: &RoutedPayload) -> String {
        let from = message
            .body
            .get("userId")
            .map(display_value)
            .unwrap_or_else(|| "someone".to_string());
        let text = match message.body.get("text") {
            Some(text) => display_value(text),
            None => Value::Object(message.body.clone()).to_string(),
        };
        format!("\n@{}: {}\n", from, text)
    }

    pub fn format_board_update(update: &RoutedPayload) -> String {
        format!("\n# board update: {}\n", summarize(&update.body))
    }

    pub fn format_game_action(action: &GameActionPayload) -> String {
        let from = action
            .body
            .get("userName")
            .or_else(|| action.body.get("userId"))
            .map(display_value)
            .unwrap_or_else(|| "someone".to_string());
        format!("\n> {} played {}\n", from, action.action_type)
    }

    /// Format a timer snapshot as `phase mm:ss (running|paused)`
    pub fn format_pomodoro_sync(timer: &PomodoroSnapshot) -> String {
        let seconds = timer.remaining_time.as_f64().unwrap_or(0.0).max(0.0) as u64;
        let state = if timer.is_running { "running" } else { "paused" };
        format!(
            "\n⏱ {} {:02}:{:02} ({})\n",
            timer.phase,
            seconds / 60,
            seconds % 60,
            state
        )
    }

    pub fn format_pomodoro_action(action: &PomodoroActionPayload) -> String {
        let name = serde_json::to_value(action.action)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        format!("\n⏱ timer {}\n", name)
    }

    /// Format a confirmation message after sending
    ///
    /// # Arguments
    ///
    /// * `sent_at` - Unix timestamp when the event was sent (milliseconds)
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("sent at {}\n", timestamp_to_rfc3339(sent_at))
    }

    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text frame (when decoding fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

/// Strings without their quotes, everything else as JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn summarize(body: &Map<String, Value>) -> String {
    if body.is_empty() {
        return "(empty)".to_string();
    }
    body.keys().cloned().collect::<Vec<_>>().join(", ")
}
