//! Typed input → relay events.
//!
//! Plain text is sent as a chat message. Lines starting with `/` are commands:
//!
//! | input | event |
//! |---|---|
//! | `/board {json}` | `board:update` |
//! | `/game TYPE [json]` | `game:action` |
//! | `/restore GAME` | `game:action` with type `GAME_STATE_REQ` |
//! | `/persist json` | `game:persist_state` |
//! | `/pomodoro start\|pause\|reset` | `pomodoro:action` |
//! | `/pomodoro sync [json]` | `pomodoro:action` (push with a timer, pull without) |
//! | `/ghost on\|off` | `user:ghost` |

use serde_json::{Map, Value};

use chalkboard_server::infrastructure::dto::websocket::{
    ClientEvent, GameActionPayload, GhostPayload, PersistStatePayload, PomodoroAction,
    PomodoroActionPayload, RoutedPayload, STATE_REQUEST_SUFFIX,
};

use crate::error::CommandError;

pub const HELP: &str = "\
Commands:
  <text>                      send a chat message
  /board {json}               send a board update
  /game TYPE [json]           send a game action
  /restore GAME               ask for the saved state of GAME
  /persist json               save the full game state
  /pomodoro start|pause|reset control the shared timer
  /pomodoro sync [json]       publish the timer, or fetch it without json
  /ghost on|off               toggle ghost mode
  /help                       show this help
  /quit                       leave
";

/// Where typed events are routed and who sends them
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub board_id: &'a str,
    pub user_id: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Send(ClientEvent),
    Help,
    Quit,
}

pub fn parse_input(line: &str, ctx: &CommandContext<'_>) -> Result<Input, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Input::Send(chat(line, ctx)));
    };

    let (name, args) = split_word(rest);
    let event = match name {
        "help" => return Ok(Input::Help),
        "quit" | "exit" => return Ok(Input::Quit),
        "board" => ClientEvent::BoardUpdate(RoutedPayload {
            board_id: ctx.board_id.to_string(),
            body: parse_object(args, "board")?,
        }),
        "game" => {
            let (action_type, payload) = split_word(args);
            if action_type.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "game",
                    argument: "an action type",
                });
            }
            game_action(action_type.to_string(), parse_optional(payload)?, ctx)
        }
        "restore" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "restore",
                    argument: "a game name",
                });
            }
            let action_type = format!("{}{}", args.to_uppercase(), STATE_REQUEST_SUFFIX);
            game_action(action_type, Value::Null, ctx)
        }
        "persist" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "persist",
                    argument: "the full state as JSON",
                });
            }
            ClientEvent::GamePersistState(PersistStatePayload {
                board_id: ctx.board_id.to_string(),
                full_state: parse_json(args)?,
            })
        }
        "pomodoro" => pomodoro(args, ctx)?,
        "ghost" => {
            let is_ghost = match args {
                "on" => true,
                "off" => false,
                other => {
                    return Err(CommandError::UnknownValue {
                        kind: "ghost mode",
                        value: other.to_string(),
                    });
                }
            };
            ClientEvent::UserGhost(GhostPayload {
                board_id: ctx.board_id.to_string(),
                user_id: Value::String(ctx.user_id.to_string()),
                is_ghost,
            })
        }
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(Input::Send(event))
}

fn chat(text: &str, ctx: &CommandContext<'_>) -> ClientEvent {
    let mut body = Map::new();
    body.insert("userId".to_string(), Value::String(ctx.user_id.to_string()));
    body.insert("text".to_string(), Value::String(text.to_string()));
    ClientEvent::ChatMessage(RoutedPayload {
        board_id: ctx.board_id.to_string(),
        body,
    })
}

fn game_action(action_type: String, payload: Value, ctx: &CommandContext<'_>) -> ClientEvent {
    let mut body = Map::new();
    body.insert("userId".to_string(), Value::String(ctx.user_id.to_string()));
    body.insert("payload".to_string(), payload);
    ClientEvent::GameAction(GameActionPayload {
        board_id: ctx.board_id.to_string(),
        action_type,
        body,
    })
}

fn pomodoro(args: &str, ctx: &CommandContext<'_>) -> Result<ClientEvent, CommandError> {
    let (action, payload) = split_word(args);
    let action = match action {
        "start" => PomodoroAction::Start,
        "pause" => PomodoroAction::Pause,
        "reset" => PomodoroAction::Reset,
        "sync" => PomodoroAction::Sync,
        "" => {
            return Err(CommandError::MissingArgument {
                command: "pomodoro",
                argument: "start, pause, reset or sync",
            });
        }
        other => {
            return Err(CommandError::UnknownValue {
                kind: "pomodoro action",
                value: other.to_string(),
            });
        }
    };
    let payload = match parse_optional(payload)? {
        Value::Null => None,
        value => Some(value),
    };
    Ok(ClientEvent::PomodoroAction(PomodoroActionPayload {
        board_id: ctx.board_id.to_string(),
        action,
        payload,
    }))
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn parse_json(input: &str) -> Result<Value, CommandError> {
    serde_json::from_str(input).map_err(|e| CommandError::InvalidJson(e.to_string()))
}

fn parse_optional(input: &str) -> Result<Value, CommandError> {
    if input.is_empty() {
        Ok(Value::Null)
    } else {
        parse_json(input)
    }
}

fn parse_object(input: &str, command: &'static str) -> Result<Map<String, Value>, CommandError> {
    match parse_json(input)? {
        Value::Object(map) => Ok(map),
        _ => Err(CommandError::ExpectedObject(command)),
    }
}
