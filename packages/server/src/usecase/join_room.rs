//! UseCase: ルームチャンネルへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute()
//! - 参加の冪等性、参加者チェック（有効時のみ）
//!
//! ### どのような状況を想定しているか
//! - 既定：ルーム ID を知っていれば誰でも参加できる
//! - 参加者チェック有効：永続ルームの参加者だけが参加できる

use std::sync::Arc;

use crate::domain::{ConnectionId, PersistenceStore, RoomChannelRepository, RoomId, UserId};

use super::error::JoinRoomError;

/// ルームチャンネル参加のユースケース
pub struct JoinRoomUseCase {
    room_channel_repository: Arc<dyn RoomChannelRepository>,
    store: Arc<dyn PersistenceStore>,
    /// `true` のとき、永続ルームの参加者以外の参加を拒否する
    enforce_membership: bool,
}

impl JoinRoomUseCase {
    pub fn new(
        room_channel_repository: Arc<dyn RoomChannelRepository>,
        store: Arc<dyn PersistenceStore>,
        enforce_membership: bool,
    ) -> Self {
        Self {
            room_channel_repository,
            store,
            enforce_membership,
        }
    }

    /// 接続をルームチャンネルに参加させる
    ///
    /// # Arguments
    ///
    /// * `user_id` - 接続に束縛されたユーザー（未ログインなら `None`）
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 新規に参加した
    /// * `Ok(false)` - すでに参加していた
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        user_id: Option<&UserId>,
        room_id: RoomId,
    ) -> Result<bool, JoinRoomError> {
        if self.enforce_membership {
            self.check_participant(user_id, &room_id).await?;
        }

        let joined = self
            .room_channel_repository
            .join(connection_id.clone(), room_id.clone())
            .await;
        tracing::debug!("Connection '{}' joined room '{}'", connection_id, room_id);

        Ok(joined)
    }

    async fn check_participant(
        &self,
        user_id: Option<&UserId>,
        room_id: &RoomId,
    ) -> Result<(), JoinRoomError> {
        let user_id = user_id.ok_or_else(|| JoinRoomError::NotLoggedIn(room_id.to_string()))?;
        let room = self
            .store
            .find_room(room_id)
            .await?
            .ok_or_else(|| JoinRoomError::RoomNotFound(room_id.to_string()))?;

        if !room.has_participant(user_id) {
            return Err(JoinRoomError::NotParticipant {
                user: user_id.to_string(),
                room: room_id.to_string(),
            });
        }
        Ok(())
    }
}
