//! WebSocket client session management.

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use chalkboard_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use chalkboard_shared::time::get_utc_timestamp;

use crate::{
    command::{CommandContext, HELP, Input, parse_input},
    domain::RoomIntent,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// What this connection has learned from the relay so far
#[derive(Debug, Default)]
struct SessionState {
    connection_id: Option<String>,
    room_code: Option<String>,
}

impl SessionState {
    /// Update from a server event and return the events to send in response
    fn on_event(
        &mut self,
        event: &ServerEvent,
        intent: &mut RoomIntent,
    ) -> Result<Vec<ClientEvent>, ClientError> {
        match event {
            ServerEvent::Connected(notice) => {
                self.connection_id = Some(notice.connection_id.clone());
                Ok(vec![intent.to_event()])
            }
            ServerEvent::RoomCreated(admission) | ServerEvent::RoomJoined(admission) => {
                let code = admission.room_code.clone();
                self.room_code = Some(code.clone());
                *intent = RoomIntent::Rejoin(code.clone());
                // board events are only routed to board members
                Ok(vec![ClientEvent::Join(code)])
            }
            ServerEvent::RoomError(message) if self.room_code.is_none() => {
                match intent.fallback() {
                    Some(next) => {
                        tracing::info!("Room request failed ({}), trying {:?}", message, next);
                        let event = next.to_event();
                        *intent = next;
                        Ok(vec![event])
                    }
                    None => Err(ClientError::RoomRejected(message.clone())),
                }
            }
            _ => Ok(Vec::new()),
        }
    }

    fn context(&self) -> Option<CommandContext<'_>> {
        Some(CommandContext {
            board_id: self.room_code.as_deref()?,
            user_id: self.connection_id.as_deref()?,
        })
    }

    fn me(&self) -> &str {
        self.connection_id.as_deref().unwrap_or_default()
    }
}

async fn send_event<S>(write: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(event)?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Run one WebSocket client session
///
/// Returns `Ok(())` when the user quits, and an error when the connection is
/// lost or the room request is refused. `intent` is updated on admission so
/// the next session lands in the same room.
pub async fn run_client_session(
    url: &str,
    intent: &mut RoomIntent,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay at {}", url);

    let (mut write, mut read) = ws_stream.split();
    let mut state = SessionState::default();

    loop {
        tokio::select! {
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(data))) => {
                        print!("{}", MessageFormatter::format_binary_message(data.len()));
                        redisplay_prompt();
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(ClientError::ConnectionError(
                            "Server closed the connection".to_string(),
                        ));
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(ClientError::ConnectionError(e.to_string())),
                };

                let event = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!("Undecodable frame: {}", e);
                        print!("{}", MessageFormatter::format_raw_message(text.as_str()));
                        redisplay_prompt();
                        continue;
                    }
                };

                let replies = state.on_event(&event, intent)?;
                print!("{}", MessageFormatter::format_server_event(&event, state.me()));
                for reply in &replies {
                    send_event(&mut write, reply).await?;
                }
                redisplay_prompt();
            }
            line = input_rx.recv() => {
                // input closed (Ctrl+C / Ctrl+D)
                let Some(line) = line else {
                    return Ok(());
                };
                let Some(ctx) = state.context() else {
                    println!("Not in a room yet, please wait.");
                    redisplay_prompt();
                    continue;
                };

                match parse_input(&line, &ctx) {
                    Ok(Input::Send(event)) => {
                        send_event(&mut write, &event).await?;
                        print!("{}", MessageFormatter::format_sent_confirmation(get_utc_timestamp()));
                    }
                    Ok(Input::Help) => print!("{}", HELP),
                    Ok(Input::Quit) => {
                        let _ = write.close().await;
                        return Ok(());
                    }
                    Err(e) => println!("{}", e),
                }
                redisplay_prompt();
            }
        }
    }
}
