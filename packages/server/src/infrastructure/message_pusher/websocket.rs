//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 接続へのイベント送信（push_to, broadcast, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、送信にだけ使用します。
//! 実際のソケットへの書き込みは接続ごとの pusher ループが行うため、
//! ここでの送信はブロックしません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::default();
/// pusher.register_connection(connection_id.clone(), tx).await;
/// pusher.push_to(&connection_id, r#"{"type":"presence-snapshot","entries":[]}"#).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中の WebSocket sender
    ///
    /// Key: connection id
    /// Value: PusherChannel
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { connections }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        connections.insert(connection_id, sender);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed event to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;
        let attempted = targets.len();
        let mut delivered = 0;

        for target in targets {
            match connections.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push event to connection '{}': {}", target, e);
                    } else {
                        delivered += 1;
                        tracing::debug!("Broadcasted event to connection '{}'", target);
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }

        // 宛先があるのに1つも届かなかった場合だけエラーにする
        if attempted > 0 && delivered == 0 {
            return Err(MessagePushError::NoneDelivered { attempted });
        }
        Ok(())
    }

    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;
        let mut delivered = 0;

        for (connection_id, sender) in connections.iter() {
            match sender.send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to push event to connection '{}': {}",
                    connection_id,
                    e
                ),
            }
        }
        tracing::debug!(
            "Broadcasted event to {}/{} connection(s)",
            delivered,
            connections.len()
        );

        if !connections.is_empty() && delivered == 0 {
            return Err(MessagePushError::NoneDelivered {
                attempted: connections.len(),
            });
        }
        Ok(())
    }

    async fn count_connections(&self) -> usize {
        self.connections.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続への送信（部分失敗の許容、全滅時のエラー）
    // - broadcast_all: 登録済み全接続への送信
    // ========================================

    fn connection(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(connection("c1"), tx).await;

        // when (操作):
        let result = pusher.push_to(&connection("c1"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher.push_to(&connection("nonexistent"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しない・閉じていてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel::<String>();
        pusher.register_connection(connection("c1"), tx1).await;
        pusher.register_connection(connection("c2"), tx2).await;
        drop(rx2);

        // when (操作):
        let targets = vec![connection("c1"), connection("c2"), connection("ghost")];
        let result = pusher.broadcast(targets, "Broadcast").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_connection() {
        // テスト項目: broadcast_all は登録済みの全接続に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(connection("c1"), tx1).await;
        pusher.register_connection(connection("c2"), tx2).await;

        // when (操作):
        let result = pusher.broadcast_all("snapshot").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("snapshot".to_string()));
        assert_eq!(rx2.recv().await, Some("snapshot".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_connection() {
        // テスト項目: 登録解除した接続には届かない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_connection(connection("c1"), tx).await;

        // when (操作):
        pusher.unregister_connection(&connection("c1")).await;

        // then (期待する結果):
        assert_eq!(pusher.count_connections().await, 0);
        assert!(pusher.push_to(&connection("c1"), "x").await.is_err());
    }

    #[tokio::test]
    async fn test_broadcast_reaching_nobody_fails() {
        // テスト項目: 宛先のどこにも届かないブロードキャストはエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        pusher.register_connection(connection("c1"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher
            .broadcast(vec![connection("c1"), connection("ghost")], "Broadcast")
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::NoneDelivered { attempted: 2 }));
    }

    #[tokio::test]
    async fn test_broadcast_without_targets_succeeds() {
        // テスト項目: 宛先が空のブロードキャストは何もせず成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher.broadcast(vec![], "Broadcast").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_all_with_only_closed_connections_fails() {
        // テスト項目: 登録済みの接続がすべて閉じていると broadcast_all はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        pusher.register_connection(connection("c1"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.broadcast_all("snapshot").await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::NoneDelivered { attempted: 1 }));
    }
}
