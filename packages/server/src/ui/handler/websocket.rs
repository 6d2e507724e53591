//! WebSocket connection handlers.
//!
//! One connection runs two tasks: an inbound reader that applies client
//! events in arrival order, and an outbound pusher that drains the
//! connection's queue into the socket. When either ends, the other is
//! aborted and the connection is cleaned up.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, DisplayName, Message as ChatMessage, RoomId, UserId, ValueObjectError,
    },
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::RelayMessageError,
};

/// Inbound event rejected by the coordinator.
///
/// The event is dropped and logged; the connection stays open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("malformed event: {0}")]
    Malformed(String),

    #[error("invalid field: {0}")]
    InvalidField(#[from] ValueObjectError),

    #[error("'{0}' requires login")]
    LoginRequired(&'static str),

    #[error("rejected: {0}")]
    Rejected(String),
}

/// Per-connection state owned by the inbound reader
struct ConnectionSession {
    connection_id: ConnectionId,
    user: Option<(UserId, DisplayName)>,
}

impl ConnectionSession {
    fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            user: None,
        }
    }

    fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|(user_id, _)| user_id)
    }

    fn require_login(
        &self,
        event: &'static str,
    ) -> Result<&(UserId, DisplayName), ProtocolViolation> {
        self.user
            .as_ref()
            .ok_or(ProtocolViolation::LoginRequired(event))
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's queue into the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Queue fed by the MessagePusher
/// * `sender` - WebSocket sink of this connection
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Wait until either task ends, then stop the other one.
///
/// The inbound reader is awaited after the abort so that an event it was
/// applying cannot bind presence or membership after cleanup has run.
async fn wait_for_either(
    mut recv_task: tokio::task::JoinHandle<()>,
    mut send_task: tokio::task::JoinHandle<()>,
) {
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            recv_task.abort();
            // 中断済みの JoinError は後始末に影響しないので捨てる
            let _ = recv_task.await;
        }
    };
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_connection(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive events from this client
    let recv_task = tokio::spawn(async move {
        let mut session = ConnectionSession::new(connection_id_clone);

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!(
                        "WebSocket error on connection '{}': {}",
                        session.connection_id,
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", session.connection_id, text);
                    if let Err(violation) = handle_event(&state_clone, &mut session, &text).await
                    {
                        tracing::warn!(
                            "Dropped event from connection '{}': {}",
                            session.connection_id,
                            violation
                        );
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", session.connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push queued events to this client
    let send_task = pusher_loop(rx, sender);

    wait_for_either(recv_task, send_task).await;

    let outcome = state.disconnect_usecase.execute(&connection_id).await;
    match outcome.released {
        Some(entry) => tracing::info!(
            "Connection '{}' of user '{}' closed",
            connection_id,
            entry.user_id
        ),
        None => tracing::info!("Connection '{}' closed", connection_id),
    }
}

/// Apply one inbound text frame
async fn handle_event(
    state: &AppState,
    session: &mut ConnectionSession,
    text: &str,
) -> Result<(), ProtocolViolation> {
    let event = serde_json::from_str::<ClientEvent>(text)
        .map_err(|e| ProtocolViolation::Malformed(e.to_string()))?;
    let connection_id = session.connection_id.clone();

    match event {
        ClientEvent::Login(payload) => {
            let user_id = UserId::new(payload.user_identity)?;
            let display_name = DisplayName::new(payload.display_name)?;

            // 別ユーザーとしての再ログインでは、前のユーザーの入力中状態を止める
            if session.user_id().is_some_and(|previous| previous != &user_id) {
                state.typing_usecase.stop_connection(&connection_id).await;
            }

            session.user = Some((user_id.clone(), display_name.clone()));
            if let Err(e) = state
                .user_directory_usecase
                .register(&user_id, &display_name)
                .await
            {
                tracing::warn!("Failed to record user '{}': {}", user_id, e);
            }
            if let Err(e) = state
                .presence_usecase
                .login(connection_id, user_id, display_name)
                .await
            {
                tracing::warn!("Login broadcast failed: {}", e);
            }
        }
        ClientEvent::Join(payload) => {
            let room_id = RoomId::new(payload.room)?;
            state
                .join_room_usecase
                .execute(connection_id, session.user_id(), room_id)
                .await
                .map_err(|e| ProtocolViolation::Rejected(e.to_string()))?;
        }
        ClientEvent::Leave(payload) => {
            let room_id = RoomId::new(payload.room)?;
            state
                .leave_room_usecase
                .execute(&connection_id, &room_id)
                .await;
        }
        ClientEvent::Message(payload) => {
            let (user_id, _) = session.require_login("message")?;
            let message = ChatMessage::try_from(payload)?;
            match state
                .relay_message_usecase
                .execute(&connection_id, user_id, message)
                .await
            {
                Ok(_targets) => {}
                Err(e @ RelayMessageError::SenderMismatch { .. }) => {
                    return Err(ProtocolViolation::Rejected(e.to_string()));
                }
                Err(e) => tracing::warn!("Failed to relay message: {}", e),
            }
        }
        ClientEvent::Typing(payload) => {
            let (user_id, display_name) = session.require_login("typing")?;
            let room_id = RoomId::new(payload.room)?;
            if let Err(e) = state
                .typing_usecase
                .keystroke(connection_id, user_id.clone(), display_name.clone(), room_id)
                .await
            {
                tracing::warn!("Failed to process keystroke: {}", e);
            }
        }
        ClientEvent::StopTyping(payload) => {
            let (user_id, _) = session.require_login("stop-typing")?;
            let room_id = RoomId::new(payload.room)?;
            if let Err(e) = state.typing_usecase.stop(user_id.clone(), room_id).await {
                tracing::warn!("Failed to stop typing: {}", e);
            }
        }
        ClientEvent::RoomCreated(payload) => {
            let room_id = RoomId::new(payload.room_identity)?;
            let participants = payload
                .participant_identities
                .into_iter()
                .map(UserId::new)
                .collect::<Result<Vec<_>, _>>()?;
            state
                .announce_room_usecase
                .execute(&room_id, &participants)
                .await;
        }
    }

    Ok(())
}
