//! InMemory Room Channel Repository 実装
//!
//! `RoomChannels` を `Mutex` で保護します。ブロードキャスト対象の取得も
//! 同じロックを通るため、参加・離脱の途中状態を観測することはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomChannelRepository, RoomChannels, RoomId};

/// インメモリ Room Channel Repository 実装
pub struct InMemoryRoomChannelRepository {
    channels: Arc<Mutex<RoomChannels>>,
}

impl InMemoryRoomChannelRepository {
    pub fn new(channels: Arc<Mutex<RoomChannels>>) -> Self {
        Self { channels }
    }
}

impl Default for InMemoryRoomChannelRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(RoomChannels::new())))
    }
}

#[async_trait]
impl RoomChannelRepository for InMemoryRoomChannelRepository {
    async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        self.channels.lock().await.join(connection_id, room_id)
    }

    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        self.channels.lock().await.leave(connection_id, room_id)
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        self.channels.lock().await.remove_connection(connection_id)
    }

    async fn members_except(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId> {
        self.channels.lock().await.members_except(room_id, exclude)
    }
}
