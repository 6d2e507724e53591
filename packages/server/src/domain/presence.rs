//! Presence table: which user is reachable through which connection.
//!
//! Holds at most one [`PresenceEntry`] per user identity. A later login for
//! the same user overwrites the earlier binding (last writer wins), which
//! leaves the older connection open but invisible to presence.

use std::collections::HashMap;

use super::{
    entity::PresenceEntry,
    value_object::{ConnectionId, UserId},
};

#[derive(Debug, Default, Clone)]
pub struct PresenceTable {
    entries: HashMap<UserId, PresenceEntry>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `entry.connection_id` to `entry.user_id`.
    ///
    /// Returns the entries this binding displaced: the previous binding of the
    /// same user (if it was on another connection) and any other user this
    /// connection had logged in as before.
    pub fn bind(&mut self, entry: PresenceEntry) -> Vec<PresenceEntry> {
        let mut displaced = Vec::new();

        let stale_users: Vec<UserId> = self
            .entries
            .values()
            .filter(|e| e.connection_id == entry.connection_id && e.user_id != entry.user_id)
            .map(|e| e.user_id.clone())
            .collect();
        for user_id in stale_users {
            if let Some(previous) = self.entries.remove(&user_id) {
                displaced.push(previous);
            }
        }

        if let Some(previous) = self.entries.insert(entry.user_id.clone(), entry.clone())
            && previous.connection_id != entry.connection_id
        {
            displaced.push(previous);
        }

        displaced
    }

    /// Remove the entry bound to `connection_id`.
    ///
    /// A connection whose user has since been taken over by a newer connection
    /// no longer owns an entry, so nothing is removed for it.
    pub fn unbind_connection(&mut self, connection_id: &ConnectionId) -> Option<PresenceEntry> {
        let user_id = self
            .entries
            .values()
            .find(|e| &e.connection_id == connection_id)
            .map(|e| e.user_id.clone())?;
        self.entries.remove(&user_id)
    }

    pub fn find_by_user(&self, user_id: &UserId) -> Option<&PresenceEntry> {
        self.entries.get(user_id)
    }

    /// Current entries sorted by user identity
    pub fn snapshot(&self) -> Vec<PresenceEntry> {
        let mut entries: Vec<PresenceEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
