//! Domain entities.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::value_object::{
    ConnectionId, DisplayName, MessageContent, MessageId, RoomId, Timestamp, UserId,
};

/// One user's live presence: who they are and which connection reaches them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceEntry {
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub connection_id: ConnectionId,
}

impl PresenceEntry {
    pub fn new(user_id: UserId, display_name: DisplayName, connection_id: ConnectionId) -> Self {
        Self {
            user_id,
            display_name,
            connection_id,
        }
    }
}

/// A user the store has seen log in, online or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    /// Latest display name the user logged in with
    pub display_name: DisplayName,
    pub registered_at: Timestamp,
}

/// A chat message as relayed through a room channel.
///
/// `id` is durable when the persistence store assigned it and provisional
/// (see [`MessageId::is_provisional`]) for an un-persisted fallback copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub sender_display_name: DisplayName,
    pub content: MessageContent,
    pub timestamp: Timestamp,
    /// Read receipts; the only mutable part of a durable message
    pub read_by: BTreeSet<UserId>,
}

impl Message {
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        sender_id: UserId,
        sender_display_name: DisplayName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            sender_id,
            sender_display_name,
            content,
            timestamp,
            read_by: BTreeSet::new(),
        }
    }

    pub fn is_durable(&self) -> bool {
        !self.id.is_provisional()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Direct,
    Group,
}

/// Durable room record owned by the persistence store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub kind: RoomKind,
    pub participants: Vec<UserId>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl Room {
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// True when this is a direct room between exactly `a` and `b` (in any order)
    pub fn is_direct_between(&self, a: &UserId, b: &UserId) -> bool {
        self.kind == RoomKind::Direct
            && self.participants.len() == 2
            && self.has_participant(a)
            && self.has_participant(b)
    }
}

/// Result of a find-or-create room operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCreation {
    pub room: Room,
    /// `true` when an existing room was returned instead of creating one
    pub existed: bool,
}
