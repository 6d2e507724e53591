//! Dependency wiring for the in-memory coordinator.

use std::sync::Arc;

use hiroba_shared::time::SystemClock;

use crate::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryPresenceRepository, InMemoryRoomChannelRepository},
        store::InMemoryPersistenceStore,
    },
    ui::state::AppState,
    usecase::{
        AnnounceRoomUseCase, CreateMessageUseCase, CreateRoomUseCase, DisconnectUseCase,
        GetMessageHistoryUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
        MarkReadUseCase, PresenceUseCase, RelayMessageUseCase, TypingUseCase,
        UserDirectoryUseCase,
    },
};

/// Build the application state backed by in-memory repositories and store
pub fn build_in_memory_state(config: &ServerConfig) -> AppState {
    // Initialize dependencies in order:
    // 1. Repositories and store
    // 2. MessagePusher
    // 3. UseCases

    // 1. Create Repositories (in-memory) and the persistence store
    let presence_repository = Arc::new(InMemoryPresenceRepository::default());
    let room_channel_repository = Arc::new(InMemoryRoomChannelRepository::default());
    let store = Arc::new(InMemoryPersistenceStore::new(Arc::new(SystemClock)));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create UseCases
    let presence_usecase = Arc::new(PresenceUseCase::new(
        presence_repository.clone(),
        message_pusher.clone(),
    ));
    let typing_usecase = Arc::new(TypingUseCase::new(
        room_channel_repository.clone(),
        message_pusher.clone(),
        config.typing_quiet_period(),
    ));
    let announce_room_usecase = Arc::new(AnnounceRoomUseCase::new(
        presence_repository.clone(),
        message_pusher.clone(),
    ));

    AppState {
        message_pusher: message_pusher.clone(),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            room_channel_repository.clone(),
            store.clone(),
            config.enforce_room_membership,
        )),
        leave_room_usecase: Arc::new(LeaveRoomUseCase::new(room_channel_repository.clone())),
        relay_message_usecase: Arc::new(RelayMessageUseCase::new(
            room_channel_repository.clone(),
            message_pusher.clone(),
            typing_usecase.clone(),
        )),
        disconnect_usecase: Arc::new(DisconnectUseCase::new(
            room_channel_repository,
            message_pusher,
            presence_usecase.clone(),
            typing_usecase.clone(),
        )),
        create_message_usecase: Arc::new(CreateMessageUseCase::new(store.clone())),
        get_message_history_usecase: Arc::new(GetMessageHistoryUseCase::new(
            store.clone(),
            config.history_limit,
        )),
        mark_read_usecase: Arc::new(MarkReadUseCase::new(store.clone())),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(
            store.clone(),
            announce_room_usecase.clone(),
        )),
        list_rooms_usecase: Arc::new(ListRoomsUseCase::new(store.clone())),
        user_directory_usecase: Arc::new(UserDirectoryUseCase::new(store)),
        presence_usecase,
        typing_usecase,
        announce_room_usecase,
    }
}
