//! Infrastructure layer: in-memory state, WebSocket delivery, wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod store;
