//! Conversion logic between DTOs and domain entities.
//!
//! Inbound conversions are fallible: every wire string goes through the
//! value-object constructors, so malformed frames surface as
//! [`ValueObjectError`] instead of panicking.

use hiroba_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    DisplayName, Message, MessageContent, MessageId, PresenceEntry, Room, RoomId, RoomKind,
    Timestamp, UserId, UserProfile, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::MessagePayload> for Message {
    type Error = ValueObjectError;

    fn try_from(payload: dto::MessagePayload) -> Result<Self, Self::Error> {
        Ok(Message::new(
            MessageId::new(payload.identity)?,
            RoomId::new(payload.room)?,
            UserId::new(payload.sender_identity)?,
            DisplayName::new(payload.sender_display_name)?,
            MessageContent::new(payload.content)?,
            Timestamp::new(payload.timestamp),
        ))
    }
}

impl From<http::RoomKindDto> for RoomKind {
    fn from(dto: http::RoomKindDto) -> Self {
        match dto {
            http::RoomKindDto::Direct => RoomKind::Direct,
            http::RoomKindDto::Group => RoomKind::Group,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Message> for dto::MessagePayload {
    fn from(model: Message) -> Self {
        Self {
            room: model.room_id.into_string(),
            sender_identity: model.sender_id.into_string(),
            sender_display_name: model.sender_display_name.into_string(),
            content: model.content.into_string(),
            identity: model.id.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<PresenceEntry> for dto::PresenceEntryPayload {
    fn from(model: PresenceEntry) -> Self {
        Self {
            user_identity: model.user_id.into_string(),
            display_name: model.display_name.into_string(),
        }
    }
}

impl From<RoomKind> for http::RoomKindDto {
    fn from(model: RoomKind) -> Self {
        match model {
            RoomKind::Direct => http::RoomKindDto::Direct,
            RoomKind::Group => http::RoomKindDto::Group,
        }
    }
}

impl From<Message> for http::MessageDto {
    fn from(model: Message) -> Self {
        Self {
            identity: model.id.into_string(),
            room: model.room_id.into_string(),
            sender_identity: model.sender_id.into_string(),
            sender_display_name: model.sender_display_name.into_string(),
            content: model.content.into_string(),
            timestamp: model.timestamp.value(),
            created_at: timestamp_to_jst_rfc3339(model.timestamp.value()),
            read_by: model.read_by.into_iter().map(UserId::into_string).collect(),
        }
    }
}

impl From<Room> for http::RoomDto {
    fn from(model: Room) -> Self {
        Self {
            identity: model.id.into_string(),
            name: model.name,
            kind: model.kind.into(),
            participants: model
                .participants
                .into_iter()
                .map(UserId::into_string)
                .collect(),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
            last_activity: model.last_activity.value(),
        }
    }
}

impl From<UserProfile> for http::UserDto {
    fn from(model: UserProfile) -> Self {
        Self {
            identity: model.id.into_string(),
            display_name: model.display_name.into_string(),
            registered_at: timestamp_to_jst_rfc3339(model.registered_at.value()),
        }
    }
}

impl From<Room> for dto::RoomOpenedPayload {
    fn from(model: Room) -> Self {
        Self {
            room_identity: model.id.into_string(),
            participant_identities: model
                .participants
                .into_iter()
                .map(UserId::into_string)
                .collect(),
        }
    }
}

// ========================================
// DTO → DTO
// ========================================

/// A persisted record relayed through a room channel
impl From<http::MessageDto> for dto::MessagePayload {
    fn from(record: http::MessageDto) -> Self {
        Self {
            room: record.room,
            sender_identity: record.sender_identity,
            sender_display_name: record.sender_display_name,
            content: record.content,
            identity: record.identity,
            timestamp: record.timestamp,
        }
    }
}
