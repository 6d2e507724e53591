//! Request handlers.

mod http;
mod websocket;

pub use http::{
    create_message, create_room, get_presence, get_room_messages, get_rooms, get_users,
    health_check, mark_read,
};
pub use websocket::{ProtocolViolation, websocket_handler};
