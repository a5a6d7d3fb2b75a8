//! Chat endpoints: persisted message log plus the realtime WebSocket.
//!
//! # WebSocket protocol
//!
//! Clients connect to `GET /ws?token=<access token>`. Messages are JSON
//! envelopes tagged by `type`:
//!
//! **Client → Server:**
//! ```json
//! {"type": "send", "receiver_id": null, "message": "Hi!"}
//! ```
//! A missing `receiver_id` broadcasts to administrators.
//!
//! **Server → Client:**
//! ```json
//! {"type": "sent", "message_id": "..."}
//! {"type": "event", "event": {"type": "new_message", ...}}
//! {"type": "error", "message": "..."}
//! ```

use crate::auth::{RequireAdmin, SessionUser};
use crate::relay::RelayEvent;
use crate::server::state::AppState;
use crate::store::{ChatStore as _, UserStore as _};
use crate::types::{ChatMessage, Role, UserId};
use axum::{
    Json,
    extract::{
        Path, Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use chrono::Utc;
use fitsphere_web::AppError;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MessageResponse;

/// Listing filters for the caller's messages.
#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// Listing filters for the admin view.
#[derive(Debug, Default, Deserialize)]
pub struct AdminChatQuery {
    /// Narrow to one participant
    pub user_id: Option<Uuid>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// WebSocket auth query.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    /// Access token (browsers cannot set headers on WebSocket upgrade)
    pub token: String,
}

/// WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Client sends a chat message
    Send {
        /// Receiver; `None` broadcasts to administrators
        receiver_id: Option<Uuid>,
        /// Message body
        message: String,
    },
    /// Server acknowledges a send
    Sent {
        /// Persisted message id
        message_id: Uuid,
    },
    /// Server streams an addressed relay event
    Event {
        /// The event
        event: RelayEvent,
    },
    /// Server reports a protocol error
    Error {
        /// Error description
        message: String,
    },
    /// Keep-alive
    Ping,
    /// Keep-alive response
    Pong,
}

/// Messages the caller sent or received.
pub async fn get_messages(
    session: SessionUser,
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = state
        .stores()
        .chat
        .list_for_user(&session.user_id, query.skip, query.limit)
        .await?;
    Ok(Json(messages))
}

/// All messages, optionally narrowed to one participant (admin).
pub async fn admin_messages(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminChatQuery>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let participant = query.user_id.map(UserId::from_uuid);
    let messages = state
        .stores()
        .chat
        .list_all(participant.as_ref(), query.skip, query.limit)
        .await?;
    Ok(Json(messages))
}

/// Mark one message read.
pub async fn mark_read(
    _session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.stores().chat.mark_read(&id).await? {
        return Err(AppError::not_found("Message", id));
    }
    Ok(Json(MessageResponse::new("Message marked as read")))
}

/// Upgrade to the realtime chat/notification socket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
) -> Result<Response, AppError> {
    let claims = state
        .tokens
        .validate(&query.token)
        .map_err(|_| AppError::unauthorized("Could not validate credentials"))?;
    let user_id = claims.user_id();
    let sender_name = state
        .stores()
        .users
        .get(&user_id)
        .await?
        .map_or_else(|| claims.email.clone(), |u| u.name);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, claims.role, sender_name)))
}

async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    user_id: UserId,
    role: Role,
    sender_name: String,
) {
    tracing::info!(%user_id, "Chat client connected");
    let (mut sink, mut stream) = socket.split();
    let mut events = state.engine.relay().subscribe();

    loop {
        tokio::select! {
            incoming = stream.next() => {
                let Some(Ok(message)) = incoming else {
                    break;
                };
                match message {
                    Message::Text(text) => {
                        let reply = handle_client_message(
                            &state, user_id, role, &sender_name, &text,
                        )
                        .await;
                        if send_envelope(&mut sink, &reply).await.is_err() {
                            break;
                        }
                    }
                    Message::Ping(payload) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) if event.is_for(&user_id, role) => {
                        if send_envelope(&mut sink, &WsMessage::Event { event }).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(%user_id, missed, "Chat client lagged; events dropped");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::info!(%user_id, "Chat client disconnected");
}

async fn handle_client_message(
    state: &AppState,
    user_id: UserId,
    role: Role,
    sender_name: &str,
    text: &str,
) -> WsMessage {
    let parsed: Result<WsMessage, _> = serde_json::from_str(text);
    match parsed {
        Ok(WsMessage::Send {
            receiver_id,
            message,
        }) => {
            if message.trim().is_empty() {
                return WsMessage::Error {
                    message: "Message cannot be empty".to_string(),
                };
            }
            let chat_message = ChatMessage {
                id: Uuid::new_v4(),
                sender_id: user_id,
                sender_name: sender_name.to_string(),
                sender_role: role,
                receiver_id: receiver_id.map(UserId::from_uuid),
                message,
                is_read: false,
                created_at: Utc::now(),
            };
            if let Err(err) = state.stores().chat.insert(&chat_message).await {
                tracing::error!(%user_id, error = %err, "Failed to persist chat message");
                return WsMessage::Error {
                    message: "Failed to send message".to_string(),
                };
            }
            let message_id = chat_message.id;
            state.engine.relay().emit(RelayEvent::NewMessage {
                message: chat_message,
            });
            WsMessage::Sent { message_id }
        }
        Ok(WsMessage::Ping) => WsMessage::Pong,
        Ok(_) => WsMessage::Error {
            message: "Unexpected message type".to_string(),
        },
        Err(err) => WsMessage::Error {
            message: format!("Invalid message format: {err}"),
        },
    }
}

async fn send_envelope(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    envelope: &WsMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(envelope) {
        Ok(json) => sink.send(Message::Text(json)).await,
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize WebSocket envelope");
            Ok(())
        }
    }
}
