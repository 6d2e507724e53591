//! UseCase: 新しいルームの通知（room-opened）
//!
//! 参加者のうち、いま在席しているユーザーの接続にだけ送ります。
//! 在席していない参加者は次回ルーム一覧を取得したときに気づきます。

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MessagePusher, PresenceRepository, RoomId, UserId},
    infrastructure::dto::websocket::{RoomOpenedPayload, ServerEvent},
};

use super::event;

/// ルーム通知のユースケース
pub struct AnnounceRoomUseCase {
    presence_repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl AnnounceRoomUseCase {
    pub fn new(
        presence_repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence_repository,
            message_pusher,
        }
    }

    /// 在席中の参加者へ room-opened を送り、送信先の接続を返す
    pub async fn execute(&self, room_id: &RoomId, participants: &[UserId]) -> Vec<ConnectionId> {
        let mut targets = Vec::new();
        for participant in participants {
            if let Some(entry) = self.presence_repository.find_by_user(participant).await
                && !targets.contains(&entry.connection_id)
            {
                targets.push(entry.connection_id);
            }
        }
        if targets.is_empty() {
            tracing::debug!("No participant of room '{}' is online", room_id);
            return targets;
        }

        let payload = RoomOpenedPayload {
            room_identity: room_id.to_string(),
            participant_identities: participants.iter().map(UserId::to_string).collect(),
        };
        let json = match event::encode(&ServerEvent::RoomOpened(payload)) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode room-opened: {}", e);
                return Vec::new();
            }
        };
        for target in &targets {
            if let Err(e) = self.message_pusher.push_to(target, &json).await {
                tracing::warn!("Failed to announce room '{}' to {}: {}", room_id, target, e);
            }
        }
        tracing::info!(
            "Room '{}' announced to {} connection(s)",
            room_id,
            targets.len()
        );

        targets
    }
}
