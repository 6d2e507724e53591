//! UseCase: ルームの作成・一覧
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase: ダイレクトルームの find-or-create、新規作成時の room-opened
//! - ListRoomsUseCase: 最終メッセージ付きの一覧

use std::sync::Arc;

use crate::domain::{Message, PersistenceStore, Room, RoomCreation, RoomKind, UserId};

use super::{announce_room::AnnounceRoomUseCase, error::RoomError};

/// ルーム一覧の1件（最終メッセージ付き）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room: Room,
    pub last_message: Option<Message>,
}

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    store: Arc<dyn PersistenceStore>,
    announce_room_usecase: Arc<AnnounceRoomUseCase>,
}

impl CreateRoomUseCase {
    pub fn new(
        store: Arc<dyn PersistenceStore>,
        announce_room_usecase: Arc<AnnounceRoomUseCase>,
    ) -> Self {
        Self {
            store,
            announce_room_usecase,
        }
    }

    /// ルームを作成する
    ///
    /// ダイレクトルームは同じ2人のルームがあればそれを返す。新しく作った
    /// ルームは在席中の参加者へ room-opened で通知する。
    pub async fn execute(
        &self,
        kind: RoomKind,
        name: Option<String>,
        participants: Vec<UserId>,
    ) -> Result<RoomCreation, RoomError> {
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let creation = match kind {
            RoomKind::Direct => {
                let [a, b] = <[UserId; 2]>::try_from(participants).map_err(|p| {
                    RoomError::InvalidInput(format!(
                        "direct room needs exactly 2 participants, got {}",
                        p.len()
                    ))
                })?;
                let name = name.unwrap_or_else(|| format!("{} & {}", a, b));
                self.store.find_or_create_direct_room((a, b), name).await?
            }
            RoomKind::Group => {
                let name = name.ok_or_else(|| {
                    RoomError::InvalidInput("group room needs a name".to_string())
                })?;
                let room = self.store.create_group_room(name, participants).await?;
                RoomCreation {
                    room,
                    existed: false,
                }
            }
        };

        if !creation.existed {
            self.announce_room_usecase
                .execute(&creation.room.id, &creation.room.participants)
                .await;
        }

        Ok(creation)
    }
}

/// ルーム一覧のユースケース
pub struct ListRoomsUseCase {
    store: Arc<dyn PersistenceStore>,
}

impl ListRoomsUseCase {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// ユーザーが参加しているルームを最終アクティビティの新しい順で返す
    pub async fn execute(&self, user_id: &UserId) -> Result<Vec<RoomSummary>, RoomError> {
        let rooms = self.store.list_rooms_for(user_id).await?;

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let last_message = self
                .store
                .list_recent_messages(&room.id, 1, 0)
                .await?
                .pop();
            summaries.push(RoomSummary { room, last_message });
        }

        Ok(summaries)
    }
}
