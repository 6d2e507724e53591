//! UseCase: ルームチャンネルからの離脱

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomChannelRepository, RoomId};

/// ルームチャンネル離脱のユースケース
pub struct LeaveRoomUseCase {
    room_channel_repository: Arc<dyn RoomChannelRepository>,
}

impl LeaveRoomUseCase {
    pub fn new(room_channel_repository: Arc<dyn RoomChannelRepository>) -> Self {
        Self {
            room_channel_repository,
        }
    }

    /// 離脱を実行。メンバーでなければ何もせず `false` を返す
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let left = self
            .room_channel_repository
            .leave(connection_id, room_id)
            .await;
        if left {
            tracing::debug!("Connection '{}' left room '{}'", connection_id, room_id);
        }
        left
    }
}
