//! Room channels: the live fan-out groups keyed by room identifier.
//!
//! A channel is nothing but the set of connections that joined it. Channels
//! are created on first join and dropped when their last member leaves. A
//! reverse index lets a disconnect clear every membership in one pass.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::value_object::{ConnectionId, RoomId};

#[derive(Debug, Default, Clone)]
pub struct RoomChannels {
    members: HashMap<RoomId, BTreeSet<ConnectionId>>,
    joined: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl RoomChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection_id` to the channel. Returns `false` if it was already a member.
    pub fn join(&mut self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        let inserted = self
            .members
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.clone());
        if inserted {
            self.joined.entry(connection_id).or_default().insert(room_id);
        }
        inserted
    }

    /// Remove `connection_id` from the channel. Returns `false` if it was not a member.
    pub fn leave(&mut self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let removed = match self.members.get_mut(room_id) {
            Some(set) => {
                let removed = set.remove(connection_id);
                if set.is_empty() {
                    self.members.remove(room_id);
                }
                removed
            }
            None => false,
        };

        if let Some(rooms) = self.joined.get_mut(connection_id) {
            rooms.remove(room_id);
            if rooms.is_empty() {
                self.joined.remove(connection_id);
            }
        }

        removed
    }

    /// Drop every membership of `connection_id`, returning the rooms it was in
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .joined
            .remove(connection_id)
            .map(|rooms| rooms.into_iter().collect())
            .unwrap_or_default();
        rooms.sort();

        for room_id in &rooms {
            if let Some(set) = self.members.get_mut(room_id) {
                set.remove(connection_id);
                if set.is_empty() {
                    self.members.remove(room_id);
                }
            }
        }

        rooms
    }

    /// Members of the channel, minus `exclude` (the originating connection)
    pub fn members_except(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId> {
        self.members
            .get(room_id)
            .map(|set| {
                set.iter()
                    .filter(|id| Some(*id) != exclude)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_member(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        self.members
            .get(room_id)
            .is_some_and(|set| set.contains(connection_id))
    }

    pub fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .joined
            .get(connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    pub fn channel_count(&self) -> usize {
        self.members.len()
    }
}
