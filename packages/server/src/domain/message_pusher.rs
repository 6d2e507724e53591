//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを届けるためのインターフェース。
//! 接続ごとに1本の送信キューを持ち、キューに積んだ順にクライアントへ届く
//! （同一接続内の順序保証）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ConnectionId};

/// 1接続分の送信キュー（シリアライズ済み JSON を流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続へ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続へ送信（一部の失敗は許容する）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 登録済みの全接続へ送信（ログイン前の接続も含む）
    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError>;

    /// 登録済みの接続数
    async fn count_connections(&self) -> usize;
}
