//! Domain layer for the presence and room-broadcast coordinator.
//!
//! This module contains the state machines and tables that are independent
//! of data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod presence;
pub mod repository;
pub mod room_channel;
pub mod store;
pub mod typing;
pub mod value_object;

pub use entity::{Message, PresenceEntry, Room, RoomCreation, RoomKind, UserProfile};
pub use error::{MessagePushError, StoreError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use presence::PresenceTable;
pub use repository::{PresenceRepository, RoomChannelRepository};
pub use room_channel::RoomChannels;
pub use store::PersistenceStore;
#[cfg(test)]
pub use store::MockPersistenceStore;
pub use typing::{KeystrokeOutcome, TypingBoard, TypingKey, TypingState};
pub use value_object::{
    ConnectionId, DisplayName, MessageContent, MessageId, RoomId, Timestamp, UserId,
};
