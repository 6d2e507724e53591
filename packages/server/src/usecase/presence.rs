//! UseCase: 在席管理（ログイン・切断時の在席解除・一覧）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PresenceUseCase::login() / release_connection() / list()
//! - 在席スナップショットのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：ログインで全接続（未ログイン含む）にスナップショットが届く
//! - 同一ユーザーの再ログイン：新しい接続に在席が移る
//! - エッジケース：未ログインの接続の切断では何も送られない

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, PresenceEntry, PresenceRepository, UserId,
};

use super::{error::LoginError, event};

/// 在席管理のユースケース
pub struct PresenceUseCase {
    presence_repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 在席の変更とスナップショット送出を直列化する
    ///
    /// 各接続が変更の順にスナップショットを受け取るためのロック。
    gate: Mutex<()>,
}

impl PresenceUseCase {
    pub fn new(
        presence_repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence_repository,
            message_pusher,
            gate: Mutex::new(()),
        }
    }

    /// 接続をユーザーに束縛し、全接続へスナップショットを送る
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PresenceEntry>)` - 送出したスナップショット
    /// * `Err(LoginError)` - 送出失敗
    pub async fn login(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        display_name: DisplayName,
    ) -> Result<Vec<PresenceEntry>, LoginError> {
        let _guard = self.gate.lock().await;

        let entry = PresenceEntry::new(user_id.clone(), display_name, connection_id.clone());
        let (displaced, snapshot) = self.presence_repository.bind(entry).await;
        for previous in &displaced {
            tracing::info!(
                "Presence of '{}' moved off connection '{}'",
                previous.user_id,
                previous.connection_id
            );
        }
        tracing::info!("User '{}' logged in on connection '{}'", user_id, connection_id);

        self.broadcast_snapshot(snapshot.clone())
            .await
            .map_err(LoginError::BroadcastFailed)?;

        Ok(snapshot)
    }

    /// 切断された接続の在席を解除する
    ///
    /// 接続がまだ在席エントリを持っている場合だけ削除し、残りの全接続へ
    /// スナップショットを送る。未ログイン、または別の接続に在席が移った
    /// 接続では何もしない。
    pub async fn release_connection(&self, connection_id: &ConnectionId) -> Option<PresenceEntry> {
        let _guard = self.gate.lock().await;

        let (removed, snapshot) = self
            .presence_repository
            .unbind_connection(connection_id)
            .await?;
        tracing::info!("User '{}' left presence", removed.user_id);

        if let Err(e) = self.broadcast_snapshot(snapshot).await {
            tracing::warn!("Failed to broadcast presence snapshot: {}", e);
        }

        Some(removed)
    }

    /// 在席一覧（user identity 順）
    pub async fn list(&self) -> Vec<PresenceEntry> {
        self.presence_repository.snapshot().await
    }

    pub async fn find_by_user(&self, user_id: &UserId) -> Option<PresenceEntry> {
        self.presence_repository.find_by_user(user_id).await
    }

    async fn broadcast_snapshot(&self, snapshot: Vec<PresenceEntry>) -> Result<(), String> {
        let json = event::encode(&event::presence_snapshot(snapshot))?;
        self.message_pusher
            .broadcast_all(&json)
            .await
            .map_err(|e| e.to_string())
    }
}
