//! WebSocket client session management.

use std::{collections::BTreeSet, sync::Arc};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::{
    http::{CreateRoomRequest, RoomKindDto},
    websocket::{ClientEvent, LoginPayload, MessagePayload, RoomPayload, ServerEvent},
};
use hiroba_shared::time::Clock;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    domain::{
        Command, DEFAULT_HISTORY_LIMIT, InputEvent, MessageDelivery, Timeline, parse_command,
    },
    error::ClientError,
    formatter::MessageFormatter,
    store::MessageStore,
    ui::redisplay_prompt,
};

/// Rooms this client has joined; survives reconnects
#[derive(Debug, Default)]
pub struct RoomSelection {
    pub current: Option<String>,
    pub joined: BTreeSet<String>,
}

/// State shared by every session of one client run
#[derive(Clone)]
pub struct SessionContext {
    pub ws_url: String,
    pub user_id: String,
    pub display_name: String,
    store: Arc<dyn MessageStore>,
    delivery: Arc<MessageDelivery>,
    rooms: Arc<Mutex<RoomSelection>>,
    timeline: Arc<Mutex<Timeline>>,
}

impl SessionContext {
    pub fn new(
        ws_url: String,
        user_id: String,
        display_name: String,
        store: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ws_url,
            user_id,
            display_name,
            delivery: Arc::new(MessageDelivery::new(store.clone(), clock)),
            store,
            rooms: Arc::new(Mutex::new(RoomSelection::default())),
            timeline: Arc::new(Mutex::new(Timeline::new())),
        }
    }

    pub async fn current_room(&self) -> Option<String> {
        self.rooms.lock().await.current.clone()
    }

    pub async fn joined_rooms(&self) -> Vec<String> {
        self.rooms.lock().await.joined.iter().cloned().collect()
    }
}

fn send_event(
    outbound: &mpsc::UnboundedSender<ClientEvent>,
    event: ClientEvent,
) -> Result<(), ClientError> {
    outbound
        .send(event)
        .map_err(|_| ClientError::ConnectionError("Connection closed".to_string()))
}

/// Apply one server event to the local state and render it
///
/// `room-opened` joins the new room's channel.
pub async fn apply_server_event(
    ctx: &SessionContext,
    event: ServerEvent,
    outbound: &mpsc::UnboundedSender<ClientEvent>,
) -> Option<String> {
    match event {
        ServerEvent::PresenceSnapshot(snapshot) => Some(MessageFormatter::format_presence(
            &snapshot.entries,
            &ctx.user_id,
        )),
        ServerEvent::Message(message) => {
            let output = MessageFormatter::format_chat_message(&message);
            if ctx.timeline.lock().await.reconcile(message) {
                Some(output)
            } else {
                tracing::debug!("Dropped duplicate message");
                None
            }
        }
        ServerEvent::TypingStart(typing) => Some(MessageFormatter::format_typing(
            &typing.display_name,
            &typing.room,
            true,
        )),
        ServerEvent::TypingStop(typing) => Some(MessageFormatter::format_typing(
            &typing.display_name,
            &typing.room,
            false,
        )),
        ServerEvent::RoomOpened(opened) => {
            let newly_joined = ctx
                .rooms
                .lock()
                .await
                .joined
                .insert(opened.room_identity.clone());
            if newly_joined {
                let join = ClientEvent::Join(RoomPayload {
                    room: opened.room_identity.clone(),
                });
                if let Err(e) = send_event(outbound, join) {
                    tracing::warn!("Failed to join room {}: {}", opened.room_identity, e);
                }
            }
            Some(MessageFormatter::format_room_opened(
                &opened.room_identity,
                &opened.participant_identities,
            ))
        }
    }
}

/// Forward an edit of the chat line as a typing signal for the current room
///
/// Without a current room there is nobody to notify.
pub async fn notify_typing(
    ctx: &SessionContext,
    event: &InputEvent,
    outbound: &mpsc::UnboundedSender<ClientEvent>,
) -> Result<(), ClientError> {
    let Some(room) = ctx.current_room().await else {
        return Ok(());
    };

    match event {
        InputEvent::Keystroke => send_event(outbound, ClientEvent::Typing(RoomPayload { room })),
        InputEvent::Abandoned => {
            send_event(outbound, ClientEvent::StopTyping(RoomPayload { room }))
        }
        InputEvent::Line(_) => Ok(()),
    }
}

/// Join a room channel, make it current and show its history
async fn join_room(
    ctx: &SessionContext,
    room: String,
    outbound: &mpsc::UnboundedSender<ClientEvent>,
) -> Result<String, ClientError> {
    send_event(outbound, ClientEvent::Join(RoomPayload { room: room.clone() }))?;
    {
        let mut rooms = ctx.rooms.lock().await;
        rooms.joined.insert(room.clone());
        rooms.current = Some(room.clone());
    }

    show_history(ctx, &room, DEFAULT_HISTORY_LIMIT).await
}

async fn show_history(ctx: &SessionContext, room: &str, limit: usize) -> Result<String, ClientError> {
    let history = match ctx.store.history(room, limit).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!("Failed to load history of {}: {}", room, e);
            vec![]
        }
    };

    let mut timeline = ctx.timeline.lock().await;
    timeline.seed_history(room, history.into_iter().map(MessagePayload::from).collect());
    Ok(MessageFormatter::format_history(room, timeline.messages(room)))
}

/// Execute one parsed command
///
/// Returns the text to print, if any. [`Command::Quit`] is handled by the
/// caller.
pub async fn execute_command(
    ctx: &SessionContext,
    command: Command,
    outbound: &mpsc::UnboundedSender<ClientEvent>,
) -> Result<Option<String>, ClientError> {
    match command {
        Command::Say(text) => {
            if text.is_empty() {
                return Ok(None);
            }
            let room = ctx.current_room().await.ok_or(ClientError::NoRoomSelected)?;
            let optimistic =
                ctx.delivery
                    .compose(&room, &ctx.user_id, &ctx.display_name, &text);
            let sent_at = optimistic.timestamp;
            let delivered = ctx.delivery.deliver(&ctx.timeline, optimistic).await;
            let persisted = delivered.is_durable();
            send_event(outbound, ClientEvent::Message(delivered.into_payload()))?;
            Ok(Some(MessageFormatter::format_sent_confirmation(
                sent_at, persisted,
            )))
        }
        Command::Join(room) => join_room(ctx, room, outbound).await.map(Some),
        Command::Leave(room) => {
            let room = match room {
                Some(room) => room,
                None => ctx.current_room().await.ok_or(ClientError::NoRoomSelected)?,
            };
            send_event(outbound, ClientEvent::Leave(RoomPayload { room: room.clone() }))?;
            let mut rooms = ctx.rooms.lock().await;
            rooms.joined.remove(&room);
            if rooms.current.as_deref() == Some(room.as_str()) {
                rooms.current = None;
            }
            Ok(Some(MessageFormatter::format_left(&room)))
        }
        Command::Direct(peer) => {
            let request = CreateRoomRequest {
                kind: RoomKindDto::Direct,
                name: None,
                participants: vec![ctx.user_id.clone(), peer],
            };
            open_room(ctx, request, outbound).await.map(Some)
        }
        Command::Group { name, participants } => {
            let mut members = vec![ctx.user_id.clone()];
            members.extend(participants);
            let request = CreateRoomRequest {
                kind: RoomKindDto::Group,
                name: Some(name),
                participants: members,
            };
            open_room(ctx, request, outbound).await.map(Some)
        }
        Command::Who => {
            let presence = ctx.store.presence().await?;
            Ok(Some(MessageFormatter::format_presence(
                &presence.entries,
                &ctx.user_id,
            )))
        }
        Command::Users => {
            let users = ctx.store.users(&ctx.user_id).await?;
            let presence = ctx.store.presence().await?;
            Ok(Some(MessageFormatter::format_users(
                &users.users,
                &presence.entries,
            )))
        }
        Command::Rooms => {
            let summaries = ctx.store.list_rooms(&ctx.user_id).await?;
            Ok(Some(MessageFormatter::format_rooms(&summaries)))
        }
        Command::History(limit) => {
            let room = ctx.current_room().await.ok_or(ClientError::NoRoomSelected)?;
            show_history(ctx, &room, limit).await.map(Some)
        }
        Command::Help => Ok(Some(MessageFormatter::format_help())),
        Command::Quit => Ok(None),
    }
}

async fn open_room(
    ctx: &SessionContext,
    request: CreateRoomRequest,
    outbound: &mpsc::UnboundedSender<ClientEvent>,
) -> Result<String, ClientError> {
    let created = ctx.store.create_room(request).await?;
    let mut output = MessageFormatter::format_room_ready(&created.room, created.existed);
    output.push_str(&join_room(ctx, created.room.identity, outbound).await?);
    Ok(output)
}

/// Run one WebSocket session until the connection drops or input ends.
///
/// Logs in and re-joins every previously joined room on connect.
///
/// # Returns
///
/// * `Ok(())` - The user ended the session
/// * `Err(ClientError::ConnectionError)` - The connection failed or was lost
pub async fn run_client_session(
    ctx: &SessionContext,
    input_rx: &mut mpsc::UnboundedReceiver<InputEvent>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(ctx.ws_url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}' ({}). Type /help for commands. Press Ctrl+C to exit.\n",
        ctx.display_name, ctx.user_id
    );

    let (mut write, mut read) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ClientEvent>();

    // Outbound events are written in the order they were queued
    let mut write_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                break;
            }
        }
    });

    let reader_ctx = ctx.clone();
    let reader_tx = outbound_tx.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            let output = match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => apply_server_event(&reader_ctx, event, &reader_tx).await,
                    Err(_) => Some(MessageFormatter::format_raw_message(&text)),
                },
                Ok(Message::Binary(data)) => {
                    Some(MessageFormatter::format_binary_message(data.len()))
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => None,
            };

            if let Some(output) = output {
                print!("{}", output);
                redisplay_prompt(&reader_ctx.user_id);
            }
        }
    });

    let login = ClientEvent::Login(LoginPayload {
        user_identity: ctx.user_id.clone(),
        display_name: ctx.display_name.clone(),
    });
    send_event(&outbound_tx, login)?;
    for room in ctx.joined_rooms().await {
        tracing::info!("Re-joining room {}", room);
        send_event(&outbound_tx, ClientEvent::Join(RoomPayload { room }))?;
    }
    redisplay_prompt(&ctx.user_id);

    let result = loop {
        tokio::select! {
            _ = &mut read_task => {
                break Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            _ = &mut write_task => {
                break Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            input = input_rx.recv() => {
                let line = match input {
                    None => break Ok(()),
                    Some(InputEvent::Line(line)) => line,
                    Some(activity) => {
                        if let Err(e) = notify_typing(ctx, &activity, &outbound_tx).await {
                            tracing::debug!("Failed to send typing signal: {}", e);
                        }
                        continue;
                    }
                };

                match parse_command(&line) {
                    Ok(Command::Quit) => break Ok(()),
                    Ok(command) => match execute_command(ctx, command, &outbound_tx).await {
                        Ok(Some(output)) => print!("{}", output),
                        Ok(None) => {}
                        Err(e) => println!("! {}", e),
                    },
                    Err(e) => println!("! {}", e),
                }
                redisplay_prompt(&ctx.user_id);
            }
        }
    };

    read_task.abort();
    write_task.abort();
    result
}

#[cfg(test)]
mod tests {
    use hiroba_server::infrastructure::dto::{
        http::{CreateRoomResponse, MessageDto, PresenceListDto, RoomDto, UserDto, UserListDto},
        websocket::{PresenceEntryPayload, RoomOpenedPayload, TypingPayload},
    };
    use hiroba_shared::time::FixedClock;

    use super::*;
    use crate::store::MockMessageStore;

    fn context(store: MockMessageStore) -> SessionContext {
        SessionContext::new(
            "ws://127.0.0.1:0/ws".to_string(),
            "alice".to_string(),
            "Alice".to_string(),
            Arc::new(store),
            Arc::new(FixedClock::new(1000)),
        )
    }

    fn record(identity: &str, room: &str, content: &str, timestamp: i64) -> MessageDto {
        MessageDto {
            identity: identity.to_string(),
            room: room.to_string(),
            sender_identity: "bob".to_string(),
            sender_display_name: "Bob".to_string(),
            content: content.to_string(),
            timestamp,
            created_at: String::new(),
            read_by: vec![],
        }
    }

    fn relayed(identity: &str, content: &str) -> MessagePayload {
        MessagePayload::from(record(identity, "lobby", content, 2000))
    }

    #[tokio::test]
    async fn test_join_sends_event_and_shows_history() {
        // テスト項目: /join で join イベントが送られ、履歴が表示されて現在のルームになる
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_history()
            .withf(|room, limit| room.to_string() == "lobby" && *limit == DEFAULT_HISTORY_LIMIT)
            .returning(|_, _| Ok(vec![record("m-1", "lobby", "welcome", 500)]));
        let ctx = context(store);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let output = execute_command(&ctx, Command::Join("lobby".to_string()), &tx)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::Join(RoomPayload {
                room: "lobby".to_string()
            })
        );
        assert!(output.unwrap().contains("@Bob: welcome"));
        assert_eq!(ctx.current_room().await, Some("lobby".to_string()));
    }

    #[tokio::test]
    async fn test_say_without_room_is_rejected() {
        // テスト項目: ルーム未選択で本文を送ると NoRoomSelected になり、何も送られない
        // given (前提条件):
        let ctx = context(MockMessageStore::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = execute_command(&ctx, Command::Say("hello".to_string()), &tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(ClientError::NoRoomSelected));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_say_relays_durable_message() {
        // テスト項目: 本文は永続化され、永続 ID 付きのメッセージとして中継される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store.expect_history().returning(|_, _| Ok(vec![]));
        store.expect_create_message().returning(|request| {
            Ok(MessageDto {
                sender_identity: request.sender_identity,
                sender_display_name: request.sender_display_name,
                ..record("m-7", &request.room, &request.content, 1001)
            })
        });
        let ctx = context(store);
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute_command(&ctx, Command::Join("lobby".to_string()), &tx)
            .await
            .unwrap();
        rx.try_recv().unwrap();

        // when (操作):
        let output = execute_command(&ctx, Command::Say("hello".to_string()), &tx)
            .await
            .unwrap();

        // then (期待する結果):
        let ClientEvent::Message(payload) = rx.try_recv().unwrap() else {
            panic!("expected a message event");
        };
        assert_eq!(payload.identity, "m-7");
        assert_eq!(payload.sender_identity, "alice");
        assert_eq!(payload.content, "hello");
        assert!(!output.unwrap().contains("not saved"));
    }

    #[tokio::test]
    async fn test_leave_clears_current_room() {
        // テスト項目: 現在のルームを離れると leave が送られ、現在のルームが解除される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store.expect_history().returning(|_, _| Ok(vec![]));
        let ctx = context(store);
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute_command(&ctx, Command::Join("lobby".to_string()), &tx)
            .await
            .unwrap();
        rx.try_recv().unwrap();

        // when (操作):
        execute_command(&ctx, Command::Leave(None), &tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::Leave(RoomPayload {
                room: "lobby".to_string()
            })
        );
        assert_eq!(ctx.current_room().await, None);
        assert!(ctx.joined_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_dm_creates_direct_room_and_joins() {
        // テスト項目: /dm で自分と相手のダイレクトルームが作られ、参加する
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_create_room()
            .withf(|request| {
                request.kind == RoomKindDto::Direct
                    && request.participants == vec!["alice".to_string(), "bob".to_string()]
            })
            .returning(|request| {
                Ok(CreateRoomResponse {
                    room: RoomDto {
                        identity: "r1".to_string(),
                        name: "alice & bob".to_string(),
                        kind: RoomKindDto::Direct,
                        participants: request.participants,
                        created_at: String::new(),
                        last_activity: 0,
                    },
                    existed: false,
                })
            });
        store.expect_history().returning(|_, _| Ok(vec![]));
        let ctx = context(store);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let output = execute_command(&ctx, Command::Direct("bob".to_string()), &tx)
            .await
            .unwrap()
            .unwrap();

        // then (期待する結果):
        assert!(output.contains("Created \"alice & bob\""));
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::Join(RoomPayload {
                room: "r1".to_string()
            })
        );
        assert_eq!(ctx.current_room().await, Some("r1".to_string()));
    }

    #[tokio::test]
    async fn test_who_lists_presence() {
        // テスト項目: /who でオンラインのユーザー一覧が表示される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store.expect_presence().returning(|| {
            Ok(PresenceListDto {
                entries: vec![PresenceEntryPayload {
                    user_identity: "bob".to_string(),
                    display_name: "Bob".to_string(),
                }],
            })
        });
        let ctx = context(store);
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let output = execute_command(&ctx, Command::Who, &tx).await.unwrap().unwrap();

        // then (期待する結果):
        assert!(output.contains("Bob [bob]"));
    }

    #[tokio::test]
    async fn test_users_lists_directory_without_self() {
        // テスト項目: /users で自分以外の既知ユーザーがオンライン表示付きで一覧される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_users()
            .withf(|exclude| exclude.to_string() == "alice")
            .returning(|_| {
                Ok(UserListDto {
                    users: vec![
                        UserDto {
                            identity: "bob".to_string(),
                            display_name: "Bob".to_string(),
                            registered_at: String::new(),
                        },
                        UserDto {
                            identity: "carol".to_string(),
                            display_name: "Carol".to_string(),
                            registered_at: String::new(),
                        },
                    ],
                })
            });
        store.expect_presence().returning(|| {
            Ok(PresenceListDto {
                entries: vec![PresenceEntryPayload {
                    user_identity: "carol".to_string(),
                    display_name: "Carol".to_string(),
                }],
            })
        });
        let ctx = context(store);
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let output = execute_command(&ctx, Command::Users, &tx)
            .await
            .unwrap()
            .unwrap();

        // then (期待する結果):
        assert!(output.contains("○ Bob [bob]"));
        assert!(output.contains("● Carol [carol]"));
    }

    #[tokio::test]
    async fn test_duplicate_relay_is_rendered_once() {
        // テスト項目: 同じメッセージが2回届いても表示は1回だけ
        // given (前提条件):
        let ctx = context(MockMessageStore::new());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let first =
            apply_server_event(&ctx, ServerEvent::Message(relayed("m-1", "hi")), &tx).await;
        let second =
            apply_server_event(&ctx, ServerEvent::Message(relayed("m-1", "hi")), &tx).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_room_opened_joins_channel_once() {
        // テスト項目: room-opened を受けるとそのルームに1回だけ join する
        // given (前提条件):
        let ctx = context(MockMessageStore::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let opened = RoomOpenedPayload {
            room_identity: "r1".to_string(),
            participant_identities: vec!["alice".to_string(), "bob".to_string()],
        };

        // when (操作):
        let output =
            apply_server_event(&ctx, ServerEvent::RoomOpened(opened.clone()), &tx).await;
        apply_server_event(&ctx, ServerEvent::RoomOpened(opened), &tx).await;

        // then (期待する結果):
        assert!(output.unwrap().contains("New room #r1 with alice, bob"));
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::Join(RoomPayload {
                room: "r1".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
        assert_eq!(ctx.joined_rooms().await, vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_typing_events_are_rendered() {
        // テスト項目: typing-start と typing-stop が表示される
        // given (前提条件):
        let ctx = context(MockMessageStore::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let typing = TypingPayload {
            user_identity: "bob".to_string(),
            display_name: "Bob".to_string(),
            room: "lobby".to_string(),
        };

        // when (操作):
        let start = apply_server_event(&ctx, ServerEvent::TypingStart(typing.clone()), &tx).await;
        let stop = apply_server_event(&ctx, ServerEvent::TypingStop(typing), &tx).await;

        // then (期待する結果):
        assert!(start.unwrap().contains("Bob is typing"));
        assert!(stop.unwrap().contains("Bob stopped typing"));
    }

    #[tokio::test]
    async fn test_keystroke_sends_typing_for_current_room() {
        // テスト項目: 入力中のキーストロークが現在のルームへの typing として送られる
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store.expect_history().returning(|_, _| Ok(vec![]));
        let ctx = context(store);
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute_command(&ctx, Command::Join("lobby".to_string()), &tx)
            .await
            .unwrap();
        rx.try_recv().unwrap();

        // when (操作):
        notify_typing(&ctx, &InputEvent::Keystroke, &tx).await.unwrap();
        notify_typing(&ctx, &InputEvent::Abandoned, &tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::Typing(RoomPayload {
                room: "lobby".to_string()
            })
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::StopTyping(RoomPayload {
                room: "lobby".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_keystroke_without_room_sends_nothing() {
        // テスト項目: ルーム未選択ではキーストロークを受けても何も送られない
        // given (前提条件):
        let ctx = context(MockMessageStore::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = notify_typing(&ctx, &InputEvent::Keystroke, &tx).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx.try_recv().is_err());
    }
}
