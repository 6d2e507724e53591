//! UseCase: ルームチャンネルへのメッセージ中継
//!
//! 永続化はクライアントが先に済ませており、ここでは永続 ID を持つ
//! メッセージ（永続化失敗時は仮 ID のまま）を受け取り、送信者以外の
//! メンバーへ配信するだけです。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute()
//! - 送信者の除外、離脱済み接続への非配信、送信者なりすましの拒否
//! - 送信に伴う typing-stop

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, Message, MessagePusher, RoomChannelRepository, UserId},
    infrastructure::dto::websocket::{MessagePayload, ServerEvent},
};

use super::{error::RelayMessageError, event, typing::TypingUseCase};

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    room_channel_repository: Arc<dyn RoomChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    typing_usecase: Arc<TypingUseCase>,
}

impl RelayMessageUseCase {
    pub fn new(
        room_channel_repository: Arc<dyn RoomChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        typing_usecase: Arc<TypingUseCase>,
    ) -> Self {
        Self {
            room_channel_repository,
            message_pusher,
            typing_usecase,
        }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信元の接続（配信対象から除外）
    /// * `bound_user` - 送信元の接続にログインしているユーザー
    /// * `message` - 中継するメッセージ（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 配信対象の接続
    /// * `Err(RelayMessageError)` - 送信者不一致、または配信失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        bound_user: &UserId,
        message: Message,
    ) -> Result<Vec<ConnectionId>, RelayMessageError> {
        if &message.sender_id != bound_user {
            return Err(RelayMessageError::SenderMismatch {
                claimed: message.sender_id.to_string(),
                bound: bound_user.to_string(),
            });
        }

        // 送信は入力中状態を終わらせる
        if let Err(e) = self
            .typing_usecase
            .stop(message.sender_id.clone(), message.room_id.clone())
            .await
        {
            tracing::warn!("Failed to stop typing on send: {}", e);
        }

        let targets = self
            .room_channel_repository
            .members_except(&message.room_id, Some(connection_id))
            .await;
        tracing::debug!(
            "Relaying message '{}' in room '{}' to {} connection(s)",
            message.id,
            message.room_id,
            targets.len()
        );
        if targets.is_empty() {
            return Ok(targets);
        }

        let json = event::encode(&ServerEvent::Message(MessagePayload::from(message)))
            .map_err(RelayMessageError::EncodeFailed)?;
        self.message_pusher
            .broadcast(targets.clone(), &json)
            .await
            .map_err(|e| RelayMessageError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }
}
