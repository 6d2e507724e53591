//! Local message timeline.
//!
//! Holds the messages shown per room. Own messages enter as optimistic
//! copies with a provisional identity and are confirmed in place once the
//! store assigns a durable identity. Relayed messages are reconciled against
//! what is already shown so that one logical message appears once.

use std::collections::HashMap;

use hiroba_server::{
    domain::{MessageId, value_object::PROVISIONAL_ID_PREFIX},
    infrastructure::dto::websocket::MessagePayload,
};

/// Two messages with equal content and sender closer than this are one message
pub const DUPLICATE_WINDOW_MS: u64 = 2000;

/// Generate a fresh provisional identity
pub fn provisional_identity() -> String {
    MessageId::generate_provisional().into_string()
}

pub fn is_provisional(identity: &str) -> bool {
    identity.starts_with(PROVISIONAL_ID_PREFIX)
}

/// Whether `incoming` is another copy of `existing`.
///
/// Matches on identity first, then falls back to equal content and sender
/// identity with timestamps less than [`DUPLICATE_WINDOW_MS`] apart.
pub fn is_same_message(existing: &MessagePayload, incoming: &MessagePayload) -> bool {
    if existing.identity == incoming.identity {
        return true;
    }

    existing.content == incoming.content
        && existing.sender_identity == incoming.sender_identity
        && existing.timestamp.abs_diff(incoming.timestamp) < DUPLICATE_WINDOW_MS
}

/// Messages shown per room, in arrival order
#[derive(Debug, Default)]
pub struct Timeline {
    rooms: HashMap<String, Vec<MessagePayload>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an own message before the store confirms it
    pub fn push_optimistic(&mut self, message: MessagePayload) {
        self.rooms
            .entry(message.room.clone())
            .or_default()
            .push(message);
    }

    /// Replace a provisional identity with the durable one.
    ///
    /// Only the identity changes. Returns `false` if no entry carries
    /// `provisional`.
    pub fn confirm(&mut self, room: &str, provisional: &str, durable: &str) -> bool {
        let Some(entry) = self
            .rooms
            .get_mut(room)
            .and_then(|entries| entries.iter_mut().find(|e| e.identity == provisional))
        else {
            return false;
        };

        entry.identity = durable.to_string();
        true
    }

    /// Append a relayed message unless a copy of it is already shown.
    ///
    /// Returns `true` if the message was appended.
    pub fn reconcile(&mut self, incoming: MessagePayload) -> bool {
        let entries = self.rooms.entry(incoming.room.clone()).or_default();
        if entries.iter().any(|e| is_same_message(e, &incoming)) {
            return false;
        }

        entries.push(incoming);
        true
    }

    /// Merge fetched history into a room, keeping entries ordered by timestamp.
    ///
    /// Returns the number of messages that were not shown yet.
    pub fn seed_history(&mut self, room: &str, history: Vec<MessagePayload>) -> usize {
        let added = history
            .into_iter()
            .filter(|message| message.room == room)
            .map(|message| self.reconcile(message))
            .filter(|appended| *appended)
            .count();

        if let Some(entries) = self.rooms.get_mut(room) {
            entries.sort_by_key(|e| e.timestamp);
        }
        added
    }

    pub fn messages(&self, room: &str) -> &[MessagePayload] {
        self.rooms.get(room).map(Vec::as_slice).unwrap_or_default()
    }
}
