//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PresenceEntryPayload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKindDto {
    Direct,
    Group,
}

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub room: String,
    pub sender_identity: String,
    pub sender_display_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub identity: String,
    pub room: String,
    pub sender_identity: String,
    pub sender_display_name: String,
    pub content: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Human-readable timestamp (JST, RFC 3339)
    pub created_at: String,
    pub read_by: Vec<String>,
}

/// Query of `GET /api/rooms/{room}/messages`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Body of `POST /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub kind: RoomKindDto,
    pub name: Option<String>,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub identity: String,
    pub name: String,
    pub kind: RoomKindDto,
    pub participants: Vec<String>,
    pub created_at: String,
    /// Unix timestamp in milliseconds
    pub last_activity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room: RoomDto,
    pub existed: bool,
}

/// Query of `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsQuery {
    pub user_identity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room: RoomDto,
    pub last_message: Option<MessageDto>,
}

/// Body of `POST /api/rooms/{room}/messages/{message}/read`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub user_identity: String,
}

/// Query of `GET /api/users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersQuery {
    pub exclude: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub identity: String,
    pub display_name: String,
    pub registered_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListDto {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceListDto {
    pub entries: Vec<PresenceEntryPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
