//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{
        DisplayName, MessageContent, MessageId, RoomId, RoomKind, StoreError, UserId,
        ValueObjectError,
    },
    infrastructure::dto::{
        http::{
            CreateMessageRequest, CreateRoomRequest, CreateRoomResponse, ErrorResponse,
            HistoryQuery, MarkReadRequest, MessageDto, PresenceListDto, RoomDto, RoomSummaryDto,
            RoomsQuery, UserDto, UserListDto, UsersQuery,
        },
        websocket::PresenceEntryPayload,
    },
    ui::state::AppState,
    usecase::{HistoryError, RoomError, UserDirectoryError},
};

/// Error response of the HTTP API
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match e {
            StoreError::RoomNotFound(_) | StoreError::MessageNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidRoom(_) => StatusCode::BAD_REQUEST,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, e.to_string())
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::Store(e) => e.into(),
        }
    }
}

impl From<RoomError> for ApiError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            RoomError::Store(e) => e.into(),
        }
    }
}

impl From<UserDirectoryError> for ApiError {
    fn from(e: UserDirectoryError) -> Self {
        match e {
            UserDirectoryError::Store(e) => e.into(),
        }
    }
}

/// Health check endpoint with the number of open connections
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let connections = state.message_pusher.count_connections().await;
    Json(serde_json::json!({"status": "ok", "connections": connections}))
}

/// Current presence list, sorted by user identity
pub async fn get_presence(State(state): State<Arc<AppState>>) -> Json<PresenceListDto> {
    let entries = state.presence_usecase.list().await;

    // Domain Model から DTO への変換
    Json(PresenceListDto {
        entries: entries
            .into_iter()
            .map(PresenceEntryPayload::from)
            .collect(),
    })
}

/// Every known user, online or not, ordered by identity
///
/// `?exclude=<user>` leaves the caller out of the list.
pub async fn get_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UserListDto>, ApiError> {
    let exclude = query
        .exclude
        .filter(|exclude| !exclude.trim().is_empty())
        .map(UserId::new)
        .transpose()?;

    let users = state.user_directory_usecase.list(exclude).await?;

    Ok(Json(UserListDto {
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

/// Persist a message and return it with its durable identity
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let room_id = RoomId::new(request.room)?;
    let sender_id = UserId::new(request.sender_identity)?;
    let sender_display_name = DisplayName::new(request.sender_display_name)?;
    let content = MessageContent::new(request.content)?;

    let message = state
        .create_message_usecase
        .execute(room_id, sender_id, sender_display_name, content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Message history of a room, oldest first
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let room_id = RoomId::new(room_id)?;

    let messages = state
        .get_message_history_usecase
        .execute(&room_id, query.limit, query.offset)
        .await?;

    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

/// Create a room (`direct` rooms are find-or-create)
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let participants = request
        .participants
        .into_iter()
        .map(UserId::new)
        .collect::<Result<Vec<_>, ValueObjectError>>()?;

    let creation = state
        .create_room_usecase
        .execute(RoomKind::from(request.kind), request.name, participants)
        .await?;

    let status = if creation.existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(CreateRoomResponse {
            room: creation.room.into(),
            existed: creation.existed,
        }),
    ))
}

/// Rooms of a user, most recent activity first
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomsQuery>,
) -> Result<Json<Vec<RoomSummaryDto>>, ApiError> {
    let user_id = UserId::new(query.user_identity)?;

    let summaries = state.list_rooms_usecase.execute(&user_id).await?;

    // Domain Model から DTO への変換
    Ok(Json(
        summaries
            .into_iter()
            .map(|summary| RoomSummaryDto {
                room: RoomDto::from(summary.room),
                last_message: summary.last_message.map(MessageDto::from),
            })
            .collect(),
    ))
}

/// Add a reader to a message's read receipts
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path((room_id, message_id)): Path<(String, String)>,
    Json(request): Json<MarkReadRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    let room_id = RoomId::new(room_id)?;
    let message_id = MessageId::new(message_id)?;
    let reader = UserId::new(request.user_identity)?;

    let message = state
        .mark_read_usecase
        .execute(&room_id, &message_id, reader)
        .await?;

    Ok(Json(message.into()))
}
