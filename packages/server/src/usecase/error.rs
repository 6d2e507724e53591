//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::StoreError;

/// ログイン処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("failed to broadcast presence: {0}")]
    BroadcastFailed(String),
}

/// ルームチャンネル参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("login is required to join room '{0}'")]
    NotLoggedIn(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("user '{user}' is not a participant of room '{room}'")]
    NotParticipant { user: String, room: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// メッセージ中継のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayMessageError {
    #[error("sender '{claimed}' does not match logged-in user '{bound}'")]
    SenderMismatch { claimed: String, bound: String },

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),

    #[error("failed to broadcast message: {0}")]
    BroadcastFailed(String),
}

/// 入力中表示のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("failed to encode event: {0}")]
    EncodeFailed(String),

    #[error("failed to broadcast typing event: {0}")]
    BroadcastFailed(String),
}

/// メッセージ履歴（作成・取得・既読）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// ルーム作成・一覧のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// ユーザーディレクトリのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDirectoryError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
