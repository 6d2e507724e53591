//! Message delivery: optimistic display, persistence, then relay.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MessageDelivery::deliver()
//! - 永続化成功時は永続 ID で確定し、永続コピーを中継する
//! - 永続化失敗時は仮コピーを中継し、再試行しない
//!
//! ### なぜモックを使うのか
//! - HTTP サーバーなしで MessageStore の成功・失敗を再現するため

use std::sync::Arc;

use hiroba_server::infrastructure::dto::{http::CreateMessageRequest, websocket::MessagePayload};
use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use super::timeline::{Timeline, provisional_identity};
use crate::store::MessageStore;

/// Copy of a message to relay to the room channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    /// Persisted; carries the durable identity
    Durable(MessagePayload),
    /// Persistence failed; the optimistic copy with its provisional identity
    Fallback(MessagePayload),
}

impl Delivered {
    pub fn payload(&self) -> &MessagePayload {
        match self {
            Delivered::Durable(payload) | Delivered::Fallback(payload) => payload,
        }
    }

    pub fn into_payload(self) -> MessagePayload {
        match self {
            Delivered::Durable(payload) | Delivered::Fallback(payload) => payload,
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, Delivered::Durable(_))
    }
}

pub struct MessageDelivery {
    store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
}

impl MessageDelivery {
    pub fn new(store: Arc<dyn MessageStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Build an optimistic message with a provisional identity
    pub fn compose(
        &self,
        room: &str,
        sender_identity: &str,
        sender_display_name: &str,
        content: &str,
    ) -> MessagePayload {
        MessagePayload {
            room: room.to_string(),
            sender_identity: sender_identity.to_string(),
            sender_display_name: sender_display_name.to_string(),
            content: content.to_string(),
            identity: provisional_identity(),
            timestamp: self.clock.now_millis(),
        }
    }

    /// Show `optimistic` locally, persist it and return the copy to relay.
    ///
    /// The timeline lock is not held while the store is called.
    pub async fn deliver(&self, timeline: &Mutex<Timeline>, optimistic: MessagePayload) -> Delivered {
        timeline.lock().await.push_optimistic(optimistic.clone());

        let request = CreateMessageRequest {
            room: optimistic.room.clone(),
            sender_identity: optimistic.sender_identity.clone(),
            sender_display_name: optimistic.sender_display_name.clone(),
            content: optimistic.content.clone(),
        };

        match self.store.create_message(request).await {
            Ok(record) => {
                let durable = MessagePayload::from(record);
                timeline
                    .lock()
                    .await
                    .confirm(&optimistic.room, &optimistic.identity, &durable.identity);
                tracing::debug!(
                    "Message {} persisted as {}",
                    optimistic.identity,
                    durable.identity
                );
                Delivered::Durable(durable)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to persist message {}, relaying the local copy: {}",
                    optimistic.identity,
                    e
                );
                Delivered::Fallback(optimistic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hiroba_server::infrastructure::dto::http::MessageDto;
    use hiroba_shared::time::FixedClock;

    use super::*;
    use crate::{error::ClientError, store::MockMessageStore};

    fn record(request: &CreateMessageRequest, identity: &str) -> MessageDto {
        MessageDto {
            identity: identity.to_string(),
            room: request.room.clone(),
            sender_identity: request.sender_identity.clone(),
            sender_display_name: request.sender_display_name.clone(),
            content: request.content.clone(),
            timestamp: 5000,
            created_at: "1970-01-01T09:00:05+09:00".to_string(),
            read_by: vec![],
        }
    }

    #[test]
    fn test_compose_uses_provisional_identity_and_clock() {
        // テスト項目: 組み立てたメッセージは仮 ID と時計の時刻を持つ
        // given (前提条件):
        let delivery = MessageDelivery::new(
            Arc::new(MockMessageStore::new()),
            Arc::new(FixedClock::new(4242)),
        );

        // when (操作):
        let message = delivery.compose("room-1", "alice", "Alice", "hello");

        // then (期待する結果):
        assert!(message.identity.starts_with("temp-"));
        assert_eq!(message.timestamp, 4242);
        assert_eq!(message.sender_display_name, "Alice");
    }

    #[tokio::test]
    async fn test_deliver_confirms_and_relays_durable_copy() {
        // テスト項目: 永続化に成功すると、タイムラインの ID が確定し永続コピーが中継対象になる
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_create_message()
            .times(1)
            .returning(|request| Ok(record(&request, "m-1")));
        let delivery = MessageDelivery::new(Arc::new(store), Arc::new(FixedClock::new(1000)));
        let timeline = Mutex::new(Timeline::new());
        let optimistic = delivery.compose("room-1", "alice", "Alice", "hello");

        // when (操作):
        let delivered = delivery.deliver(&timeline, optimistic).await;

        // then (期待する結果):
        assert!(delivered.is_durable());
        assert_eq!(delivered.payload().identity, "m-1");
        let timeline = timeline.lock().await;
        let entries = timeline.messages("room-1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].identity, "m-1");
        assert_eq!(entries[0].timestamp, 1000);
    }

    #[tokio::test]
    async fn test_deliver_falls_back_to_optimistic_copy() {
        // テスト項目: 永続化に失敗すると、仮コピーがそのまま中継対象になり再試行しない
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_create_message()
            .times(1)
            .returning(|_| Err(ClientError::StoreUnavailable("down".to_string())));
        let delivery = MessageDelivery::new(Arc::new(store), Arc::new(FixedClock::new(1000)));
        let timeline = Mutex::new(Timeline::new());
        let optimistic = delivery.compose("room-1", "alice", "Alice", "hello");
        let provisional = optimistic.identity.clone();

        // when (操作):
        let delivered = delivery.deliver(&timeline, optimistic).await;

        // then (期待する結果):
        assert!(!delivered.is_durable());
        assert_eq!(delivered.payload().identity, provisional);
        assert_eq!(timeline.lock().await.messages("room-1")[0].identity, provisional);
    }

    #[tokio::test]
    async fn test_observer_sees_one_message_for_durable_and_fallback_copies() {
        // テスト項目: 永続コピーと同内容の仮コピーが 2000ms 以内に届いても、受信側では1件になる
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_create_message()
            .returning(|request| Ok(record(&request, "m-1")));
        let delivery = MessageDelivery::new(Arc::new(store), Arc::new(FixedClock::new(4000)));
        let sender_timeline = Mutex::new(Timeline::new());
        let optimistic = delivery.compose("room-1", "alice", "Alice", "hi");
        let fallback = optimistic.clone();
        let durable = delivery.deliver(&sender_timeline, optimistic).await;
        let mut observer = Timeline::new();

        // when (操作):
        let first = observer.reconcile(durable.into_payload());
        let second = observer.reconcile(fallback);

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(observer.messages("room-1").len(), 1);
    }
}
