//! Persistence store access.
//!
//! The client persists messages and rooms through the coordinator's HTTP
//! API before relaying them over the WebSocket.

use async_trait::async_trait;
use hiroba_server::infrastructure::dto::http::{
    CreateMessageRequest, CreateRoomRequest, CreateRoomResponse, ErrorResponse, MessageDto,
    PresenceListDto, RoomSummaryDto, UserListDto,
};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Store operations the client depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message and return it with its durable identity
    async fn create_message(&self, request: CreateMessageRequest)
    -> Result<MessageDto, ClientError>;

    /// Most recent messages of a room, oldest first
    async fn history(&self, room: &str, limit: usize) -> Result<Vec<MessageDto>, ClientError>;

    async fn create_room(&self, request: CreateRoomRequest)
    -> Result<CreateRoomResponse, ClientError>;

    async fn list_rooms(&self, user_identity: &str) -> Result<Vec<RoomSummaryDto>, ClientError>;

    async fn presence(&self) -> Result<PresenceListDto, ClientError>;

    /// Every user who has logged in, except `exclude`
    async fn users(&self, exclude: &str) -> Result<UserListDto, ClientError>;
}

/// [`MessageStore`] backed by the HTTP API
pub struct HttpMessageStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMessageStore {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a success body, or turn an error status into [`ClientError::StoreRejected`]
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        return Err(ClientError::StoreRejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<T>().await?)
}

#[async_trait]
impl MessageStore for HttpMessageStore {
    async fn create_message(
        &self,
        request: CreateMessageRequest,
    ) -> Result<MessageDto, ClientError> {
        let response = self
            .client
            .post(self.url("/api/messages"))
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn history(&self, room: &str, limit: usize) -> Result<Vec<MessageDto>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/rooms/{}/messages", room)))
            .query(&[("limit", limit)])
            .send()
            .await?;
        read_json(response).await
    }

    async fn create_room(
        &self,
        request: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/api/rooms"))
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn list_rooms(&self, user_identity: &str) -> Result<Vec<RoomSummaryDto>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/rooms"))
            .query(&[("userIdentity", user_identity)])
            .send()
            .await?;
        read_json(response).await
    }

    async fn presence(&self) -> Result<PresenceListDto, ClientError> {
        let response = self.client.get(self.url("/api/presence")).send().await?;
        read_json(response).await
    }

    async fn users(&self, exclude: &str) -> Result<UserListDto, ClientError> {
        let response = self
            .client
            .get(self.url("/api/users"))
            .query(&[("exclude", exclude)])
            .send()
            .await?;
        read_json(response).await
    }
}
