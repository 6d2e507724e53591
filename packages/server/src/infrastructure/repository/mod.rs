//! Repository 実装
//!
//! - `inmemory`: プロセス内のテーブルを `Mutex` で保護した実装

pub mod inmemory;

pub use inmemory::{InMemoryPresenceRepository, InMemoryRoomChannelRepository};
