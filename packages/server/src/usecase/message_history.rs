//! UseCase: メッセージの永続化・履歴取得・既読
//!
//! HTTP API から呼ばれる、永続ストアへの薄い窓口です。

use std::sync::Arc;

use crate::domain::{
    DisplayName, Message, MessageContent, MessageId, PersistenceStore, RoomId, UserId,
};

use super::error::HistoryError;

/// 1回の履歴取得で返す最大件数
pub const MAX_HISTORY_LIMIT: usize = 200;

/// メッセージ作成のユースケース
pub struct CreateMessageUseCase {
    store: Arc<dyn PersistenceStore>,
}

impl CreateMessageUseCase {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// メッセージを永続化し、永続 ID と時刻が付いたメッセージを返す
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        sender_display_name: DisplayName,
        content: MessageContent,
    ) -> Result<Message, HistoryError> {
        let message = self
            .store
            .create_message(&room_id, &sender_id, &sender_display_name, content)
            .await?;
        tracing::info!(
            "Message '{}' persisted in room '{}' by '{}'",
            message.id,
            room_id,
            sender_id
        );
        Ok(message)
    }
}

/// 履歴取得のユースケース
pub struct GetMessageHistoryUseCase {
    store: Arc<dyn PersistenceStore>,
    default_limit: usize,
}

impl GetMessageHistoryUseCase {
    pub fn new(store: Arc<dyn PersistenceStore>, default_limit: usize) -> Self {
        Self {
            store,
            default_limit,
        }
    }

    /// 古い順のメッセージ一覧を返す
    ///
    /// `limit` 省略時は既定値、上限は [`MAX_HISTORY_LIMIT`]。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Message>, HistoryError> {
        let limit = limit.unwrap_or(self.default_limit).min(MAX_HISTORY_LIMIT);
        let offset = offset.unwrap_or(0);
        Ok(self
            .store
            .list_recent_messages(room_id, limit, offset)
            .await?)
    }
}

/// 既読登録のユースケース
pub struct MarkReadUseCase {
    store: Arc<dyn PersistenceStore>,
}

impl MarkReadUseCase {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
        reader: UserId,
    ) -> Result<Message, HistoryError> {
        Ok(self.store.mark_read(room_id, message_id, reader).await?)
    }
}
