//! UseCase: 接続の切断処理
//!
//! 切断はこのサブシステムで唯一の取り消しシグナルです。次の順で後始末します。
//!
//! 1. この接続が発生させた入力中状態を止める（typing-stop を送る）
//! 2. すべてのルームチャンネルから外す
//! 3. 在席がまだこの接続に束縛されていれば解除し、スナップショットを送る
//! 4. MessagePusher から登録解除する
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute()
//! - 切断後の在席スナップショット、チャンネルからの除去、typing-stop

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceEntry, RoomChannelRepository, RoomId};

use super::{presence::PresenceUseCase, typing::TypingUseCase};

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// 解除された在席（未ログイン・在席移動済みなら `None`）
    pub released: Option<PresenceEntry>,
    /// 参加していたルーム
    pub left_rooms: Vec<RoomId>,
    /// 止めた入力中状態の数
    pub stopped_typing: usize,
}

/// 切断処理のユースケース
pub struct DisconnectUseCase {
    room_channel_repository: Arc<dyn RoomChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    presence_usecase: Arc<PresenceUseCase>,
    typing_usecase: Arc<TypingUseCase>,
}

impl DisconnectUseCase {
    pub fn new(
        room_channel_repository: Arc<dyn RoomChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        presence_usecase: Arc<PresenceUseCase>,
        typing_usecase: Arc<TypingUseCase>,
    ) -> Self {
        Self {
            room_channel_repository,
            message_pusher,
            presence_usecase,
            typing_usecase,
        }
    }

    pub async fn execute(&self, connection_id: &ConnectionId) -> DisconnectOutcome {
        let stopped_typing = self.typing_usecase.stop_connection(connection_id).await;
        let left_rooms = self
            .room_channel_repository
            .remove_connection(connection_id)
            .await;
        let released = self.presence_usecase.release_connection(connection_id).await;
        self.message_pusher
            .unregister_connection(connection_id)
            .await;

        tracing::info!(
            "Connection '{}' cleaned up ({} room(s), {} typing state(s))",
            connection_id,
            left_rooms.len(),
            stopped_typing
        );

        DisconnectOutcome {
            released,
            left_rooms,
            stopped_typing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, UserId},
        infrastructure::{
            dto::websocket::ServerEvent,
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryPresenceRepository, InMemoryRoomChannelRepository},
        },
        usecase::typing::DEFAULT_TYPING_QUIET_PERIOD,
    };
    use tokio::sync::mpsc;

    fn connection(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    struct Fixture {
        usecase: DisconnectUseCase,
        presence: Arc<PresenceUseCase>,
        typing: Arc<TypingUseCase>,
        channels: Arc<InMemoryRoomChannelRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        bob_rx: mpsc::UnboundedReceiver<String>,
    }

    /// alice (c1) と bob (c2) がログインし、room-1 に参加している状態を作る
    async fn setup() -> Fixture {
        let channels = Arc::new(InMemoryRoomChannelRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let presence = Arc::new(PresenceUseCase::new(
            Arc::new(InMemoryPresenceRepository::default()),
            pusher.clone(),
        ));
        let typing = Arc::new(TypingUseCase::new(
            channels.clone(),
            pusher.clone(),
            DEFAULT_TYPING_QUIET_PERIOD,
        ));

        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, mut bob_rx) = mpsc::unbounded_channel();
        pusher.register_connection(connection("c1"), tx1).await;
        pusher.register_connection(connection("c2"), tx2).await;
        presence
            .login(connection("c1"), user("alice"), name("Alice"))
            .await
            .unwrap();
        presence
            .login(connection("c2"), user("bob"), name("Bob"))
            .await
            .unwrap();
        channels.join(connection("c1"), room("room-1")).await;
        channels.join(connection("c2"), room("room-1")).await;
        while bob_rx.try_recv().is_ok() {}

        let usecase = DisconnectUseCase::new(
            channels.clone(),
            pusher.clone(),
            presence.clone(),
            typing.clone(),
        );
        Fixture {
            usecase,
            presence,
            typing,
            channels,
            pusher,
            bob_rx,
        }
    }

    fn received(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(json) = rx.try_recv() {
            events.push(serde_json::from_str(&json).unwrap());
        }
        events
    }

    #[tokio::test]
    async fn test_disconnect_cleans_up_everything() {
        // テスト項目: 切断で入力中状態・チャンネル・在席・送信キューがすべて片付く
        // given (前提条件):
        let mut fx = setup().await;
        fx.typing
            .keystroke(connection("c1"), user("alice"), name("Alice"), room("room-1"))
            .await
            .unwrap();

        // when (操作):
        let outcome = fx.usecase.execute(&connection("c1")).await;

        // then (期待する結果):
        assert_eq!(outcome.released.map(|e| e.user_id), Some(user("alice")));
        assert_eq!(outcome.left_rooms, vec![room("room-1")]);
        assert_eq!(outcome.stopped_typing, 1);
        assert_eq!(
            fx.channels.members_except(&room("room-1"), None).await,
            vec![connection("c2")]
        );
        assert_eq!(fx.pusher.count_connections().await, 1);

        let events = received(&mut fx.bob_rx);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ServerEvent::TypingStart(_)));
        assert!(matches!(events[1], ServerEvent::TypingStop(_)));
        match &events[2] {
            ServerEvent::PresenceSnapshot(payload) => {
                let users: Vec<&str> = payload
                    .entries
                    .iter()
                    .map(|e| e.user_identity.as_str())
                    .collect();
                assert_eq!(users, vec!["bob"]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_of_unbound_connection_keeps_presence() {
        // テスト項目: 未ログインの接続の切断では在席スナップショットを送らない
        // given (前提条件):
        let mut fx = setup().await;
        let (tx3, _rx3) = mpsc::unbounded_channel();
        fx.pusher.register_connection(connection("c3"), tx3).await;

        // when (操作):
        let outcome = fx.usecase.execute(&connection("c3")).await;

        // then (期待する結果):
        assert!(outcome.released.is_none());
        assert!(received(&mut fx.bob_rx).is_empty());
        assert_eq!(fx.presence.list().await.len(), 2);
    }
}
