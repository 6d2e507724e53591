//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{
        AnnounceRoomUseCase, CreateMessageUseCase, CreateRoomUseCase, DisconnectUseCase,
        GetMessageHistoryUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
        MarkReadUseCase, PresenceUseCase, RelayMessageUseCase, TypingUseCase,
        UserDirectoryUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// MessagePusher（接続ごとの送信キューの登録先）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// PresenceUseCase（ログイン・在席一覧）
    pub presence_usecase: Arc<PresenceUseCase>,
    /// TypingUseCase（入力中表示）
    pub typing_usecase: Arc<TypingUseCase>,
    /// JoinRoomUseCase（ルームチャンネル参加）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルームチャンネル離脱）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// RelayMessageUseCase（メッセージ中継）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// AnnounceRoomUseCase（room-opened 通知）
    pub announce_room_usecase: Arc<AnnounceRoomUseCase>,
    /// DisconnectUseCase（切断時の後始末）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub create_message_usecase: Arc<CreateMessageUseCase>,
    pub get_message_history_usecase: Arc<GetMessageHistoryUseCase>,
    pub mark_read_usecase: Arc<MarkReadUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// UserDirectoryUseCase（ログイン済みユーザーの一覧）
    pub user_directory_usecase: Arc<UserDirectoryUseCase>,
}
