//! InMemory Repository 実装

mod presence;
mod room_channel;

pub use presence::InMemoryPresenceRepository;
pub use room_channel::InMemoryRoomChannelRepository;
