//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame tagged by `"type"`:
//!
//! ```json
//! {"type":"join","room":"room-1"}
//! {"type":"presence-snapshot","entries":[{"userIdentity":"alice","displayName":"Alice"}]}
//! ```

use serde::{Deserialize, Serialize};

/// Events sent by a client to the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    Login(LoginPayload),
    Join(RoomPayload),
    Leave(RoomPayload),
    Message(MessagePayload),
    /// One keystroke in the room's input
    Typing(RoomPayload),
    StopTyping(RoomPayload),
    RoomCreated(RoomOpenedPayload),
}

/// Events sent by the coordinator to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    PresenceSnapshot(PresenceSnapshotPayload),
    Message(MessagePayload),
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
    RoomOpened(RoomOpenedPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub user_identity: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    #[serde(default)]
    pub room: String,
}

/// Chat message as relayed through a room channel.
///
/// `identity` is durable once persisted; un-persisted fallback copies carry
/// a provisional `temp-` identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(default)]
    pub room: String,
    pub sender_identity: String,
    pub sender_display_name: String,
    pub content: String,
    pub identity: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntryPayload {
    pub user_identity: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSnapshotPayload {
    pub entries: Vec<PresenceEntryPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub user_identity: String,
    pub display_name: String,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOpenedPayload {
    pub room_identity: String,
    pub participant_identities: Vec<String>,
}
