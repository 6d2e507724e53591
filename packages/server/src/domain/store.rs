//! Persistence collaborator interface.
//!
//! Durable users, rooms and messages live outside the coordinator. The core
//! only needs this small create/find surface; storage engine design is not
//! its concern.

use async_trait::async_trait;

use super::{
    entity::{Message, Room, RoomCreation, UserProfile},
    error::StoreError,
    value_object::{DisplayName, MessageContent, MessageId, RoomId, UserId},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Persist a message and assign its durable identity and timestamp
    async fn create_message(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        sender_display_name: &DisplayName,
        content: MessageContent,
    ) -> Result<Message, StoreError>;

    /// Recent messages of a room, oldest first.
    ///
    /// `offset` skips that many of the newest messages, `limit` caps the page.
    async fn list_recent_messages(
        &self,
        room_id: &RoomId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>, StoreError>;

    /// Return the direct room between the pair, creating it if missing
    async fn find_or_create_direct_room(
        &self,
        pair: (UserId, UserId),
        name: String,
    ) -> Result<RoomCreation, StoreError>;

    async fn create_group_room(
        &self,
        name: String,
        participants: Vec<UserId>,
    ) -> Result<Room, StoreError>;

    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, StoreError>;

    /// Rooms the user participates in, most recent activity first
    async fn list_rooms_for(&self, user_id: &UserId) -> Result<Vec<Room>, StoreError>;

    /// Record a user, keeping the first registration time and the latest name
    async fn upsert_user(
        &self,
        user_id: &UserId,
        display_name: &DisplayName,
    ) -> Result<UserProfile, StoreError>;

    /// Every known user ordered by identity, without `exclude` when given
    async fn list_users(&self, exclude: Option<UserId>) -> Result<Vec<UserProfile>, StoreError>;

    /// Add `reader` to the message's read-receipt set
    async fn mark_read(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
        reader: UserId,
    ) -> Result<Message, StoreError>;
}
