//! Typing indicator state machine.
//!
//! Each (user, room) pair is either idle (absent from the board) or typing.
//! Every keystroke stamps the pair with a fresh generation; a quiet-period
//! timer only expires the pair if the generation it was armed with is still
//! current, so a stale timer can never stop a refreshed indicator.

use std::collections::HashMap;

use super::value_object::{ConnectionId, DisplayName, RoomId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypingKey {
    pub user_id: UserId,
    pub room_id: RoomId,
}

impl TypingKey {
    pub fn new(user_id: UserId, room_id: RoomId) -> Self {
        Self { user_id, room_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    /// Connection the latest keystroke came from; excluded from typing broadcasts
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    generation: u64,
}

impl TypingState {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// idle → typing; announce `typing-start`
    Started { generation: u64 },
    /// typing → typing; only the quiet timer restarts
    Refreshed { generation: u64 },
}

impl KeystrokeOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Started { generation } | Self::Refreshed { generation } => *generation,
        }
    }
}

#[derive(Debug, Default)]
pub struct TypingBoard {
    states: HashMap<TypingKey, TypingState>,
    next_generation: u64,
}

impl TypingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keystroke(
        &mut self,
        key: TypingKey,
        connection_id: ConnectionId,
        display_name: DisplayName,
    ) -> KeystrokeOutcome {
        self.next_generation += 1;
        let generation = self.next_generation;

        match self.states.get_mut(&key) {
            Some(state) => {
                state.generation = generation;
                state.connection_id = connection_id;
                state.display_name = display_name;
                KeystrokeOutcome::Refreshed { generation }
            }
            None => {
                self.states.insert(
                    key,
                    TypingState {
                        connection_id,
                        display_name,
                        generation,
                    },
                );
                KeystrokeOutcome::Started { generation }
            }
        }
    }

    /// Quiet timer fired. Returns the state only if `generation` is still current.
    pub fn expire(&mut self, key: &TypingKey, generation: u64) -> Option<TypingState> {
        if self.states.get(key)?.generation != generation {
            return None;
        }
        self.states.remove(key)
    }

    /// Explicit stop (send or stop signal). Returns the state if the pair was typing.
    pub fn stop(&mut self, key: &TypingKey) -> Option<TypingState> {
        self.states.remove(key)
    }

    /// Stop everything whose latest keystroke came from `connection_id`
    pub fn stop_connection(&mut self, connection_id: &ConnectionId) -> Vec<(TypingKey, TypingState)> {
        let keys: Vec<TypingKey> = self
            .states
            .iter()
            .filter(|(_, state)| &state.connection_id == connection_id)
            .map(|(key, _)| key.clone())
            .collect();

        keys.into_iter()
            .filter_map(|key| self.states.remove(&key).map(|state| (key, state)))
            .collect()
    }

    pub fn is_typing(&self, key: &TypingKey) -> bool {
        self.states.contains_key(key)
    }
}
