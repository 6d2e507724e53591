//! UseCase 層
//!
//! 1つの操作につき1つの構造体を置き、Repository / MessagePusher /
//! PersistenceStore の trait にだけ依存します。

pub mod announce_room;
pub mod disconnect;
pub mod error;
mod event;
pub mod join_room;
pub mod leave_room;
pub mod message_history;
pub mod presence;
pub mod relay_message;
pub mod rooms;
pub mod typing;
pub mod users;

pub use announce_room::AnnounceRoomUseCase;
pub use disconnect::{DisconnectOutcome, DisconnectUseCase};
pub use error::{
    HistoryError, JoinRoomError, LoginError, RelayMessageError, RoomError, TypingError,
    UserDirectoryError,
};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use message_history::{
    CreateMessageUseCase, GetMessageHistoryUseCase, MAX_HISTORY_LIMIT, MarkReadUseCase,
};
pub use presence::PresenceUseCase;
pub use relay_message::RelayMessageUseCase;
pub use rooms::{CreateRoomUseCase, ListRoomsUseCase, RoomSummary};
pub use typing::{DEFAULT_TYPING_QUIET_PERIOD, TypingUseCase};
pub use users::UserDirectoryUseCase;
