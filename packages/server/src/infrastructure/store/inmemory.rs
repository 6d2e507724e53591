//! In-memory PersistenceStore implementation.
//!
//! Rooms and messages are kept in a single lock-guarded state so that a
//! message insert and the room's last-activity update happen together.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use hiroba_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    DisplayName, Message, MessageContent, MessageId, PersistenceStore, Room, RoomCreation,
    RoomId, RoomKind, StoreError, Timestamp, UserId, UserProfile,
};

#[derive(Debug, Default)]
struct StoreState {
    rooms: HashMap<RoomId, Room>,
    /// Messages per room in insertion order (oldest first)
    messages: HashMap<RoomId, Vec<Message>>,
    users: BTreeMap<UserId, UserProfile>,
}

pub struct InMemoryPersistenceStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPersistenceStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

impl Default for InMemoryPersistenceStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// Deduplicate while keeping first-seen order
fn unique_participants(participants: Vec<UserId>) -> Vec<UserId> {
    let mut seen = BTreeSet::new();
    participants
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

#[async_trait]
impl PersistenceStore for InMemoryPersistenceStore {
    async fn create_message(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        sender_display_name: &DisplayName,
        content: MessageContent,
    ) -> Result<Message, StoreError> {
        let now = self.now();
        let mut state = self.state.lock().await;

        let room = state
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;
        room.last_activity = now;

        let message = Message::new(
            MessageId::generate_durable(),
            room_id.clone(),
            sender_id.clone(),
            sender_display_name.clone(),
            content,
            now,
        );
        state
            .messages
            .entry(room_id.clone())
            .or_default()
            .push(message.clone());

        tracing::debug!("Message '{}' stored in room '{}'", message.id, room_id);
        Ok(message)
    }

    async fn list_recent_messages(
        &self,
        room_id: &RoomId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let state = self.state.lock().await;

        if !state.rooms.contains_key(room_id) {
            return Err(StoreError::RoomNotFound(room_id.to_string()));
        }
        let Some(messages) = state.messages.get(room_id) else {
            return Ok(Vec::new());
        };

        let end = messages.len().saturating_sub(offset);
        let start = end.saturating_sub(limit);
        Ok(messages[start..end].to_vec())
    }

    async fn find_or_create_direct_room(
        &self,
        pair: (UserId, UserId),
        name: String,
    ) -> Result<RoomCreation, StoreError> {
        let (a, b) = pair;
        if a == b {
            return Err(StoreError::InvalidRoom(
                "direct room needs two distinct participants".to_string(),
            ));
        }

        let now = self.now();
        let mut state = self.state.lock().await;

        if let Some(room) = state.rooms.values().find(|r| r.is_direct_between(&a, &b)) {
            return Ok(RoomCreation {
                room: room.clone(),
                existed: true,
            });
        }

        let room = Room {
            id: RoomId::generate(),
            name,
            kind: RoomKind::Direct,
            participants: vec![a, b],
            created_at: now,
            last_activity: now,
        };
        state.rooms.insert(room.id.clone(), room.clone());
        tracing::info!("Direct room '{}' created", room.id);

        Ok(RoomCreation {
            room,
            existed: false,
        })
    }

    async fn create_group_room(
        &self,
        name: String,
        participants: Vec<UserId>,
    ) -> Result<Room, StoreError> {
        let participants = unique_participants(participants);
        if participants.is_empty() {
            return Err(StoreError::InvalidRoom(
                "group room needs at least one participant".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(StoreError::InvalidRoom(
                "group room needs a name".to_string(),
            ));
        }

        let now = self.now();
        let room = Room {
            id: RoomId::generate(),
            name,
            kind: RoomKind::Group,
            participants,
            created_at: now,
            last_activity: now,
        };

        let mut state = self.state.lock().await;
        state.rooms.insert(room.id.clone(), room.clone());
        tracing::info!("Group room '{}' created", room.id);

        Ok(room)
    }

    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self.state.lock().await.rooms.get(room_id).cloned())
    }

    async fn list_rooms_for(&self, user_id: &UserId) -> Result<Vec<Room>, StoreError> {
        let state = self.state.lock().await;

        let mut rooms: Vec<Room> = state
            .rooms
            .values()
            .filter(|room| room.has_participant(user_id))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(rooms)
    }

    async fn upsert_user(
        &self,
        user_id: &UserId,
        display_name: &DisplayName,
    ) -> Result<UserProfile, StoreError> {
        let now = self.now();
        let mut state = self.state.lock().await;

        let profile = state
            .users
            .entry(user_id.clone())
            .and_modify(|profile| profile.display_name = display_name.clone())
            .or_insert_with(|| {
                tracing::info!("User '{}' registered", user_id);
                UserProfile {
                    id: user_id.clone(),
                    display_name: display_name.clone(),
                    registered_at: now,
                }
            });

        Ok(profile.clone())
    }

    async fn list_users(&self, exclude: Option<UserId>) -> Result<Vec<UserProfile>, StoreError> {
        let state = self.state.lock().await;

        Ok(state
            .users
            .values()
            .filter(|profile| exclude.as_ref() != Some(&profile.id))
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
        reader: UserId,
    ) -> Result<Message, StoreError> {
        let mut state = self.state.lock().await;

        let messages = state
            .messages
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;
        let message = messages
            .iter_mut()
            .find(|m| &m.id == message_id)
            .ok_or_else(|| StoreError::MessageNotFound(message_id.to_string()))?;
        message.read_by.insert(reader);

        Ok(message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiroba_shared::time::FixedClock;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    fn content(value: &str) -> MessageContent {
        MessageContent::new(value.to_string()).unwrap()
    }

    fn store_at(millis: i64) -> InMemoryPersistenceStore {
        InMemoryPersistenceStore::new(Arc::new(FixedClock::new(millis)))
    }

    async fn direct_room(store: &InMemoryPersistenceStore) -> Room {
        store
            .find_or_create_direct_room((user("alice"), user("bob")), "alice & bob".to_string())
            .await
            .unwrap()
            .room
    }

    #[tokio::test]
    async fn test_create_message_assigns_durable_identity() {
        // テスト項目: 保存されたメッセージには永続 ID とストアの時刻が付与される
        // given (前提条件):
        let store = store_at(1_700_000_000_000);
        let room = direct_room(&store).await;

        // when (操作):
        let message = store
            .create_message(&room.id, &user("alice"), &name("Alice"), content("hello"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(message.is_durable());
        assert_eq!(message.timestamp, Timestamp::new(1_700_000_000_000));
        assert_eq!(message.content.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_create_message_in_unknown_room_fails() {
        // テスト項目: 存在しないルームへの保存は RoomNotFound を返す
        // given (前提条件):
        let store = store_at(0);
        let room_id = RoomId::new("missing".to_string()).unwrap();

        // when (操作):
        let result = store
            .create_message(&room_id, &user("alice"), &name("Alice"), content("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::RoomNotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn test_list_recent_messages_pages_from_newest() {
        // テスト項目: 履歴は古い順で返り、offset は新しい側から読み飛ばす
        // given (前提条件):
        let store = store_at(0);
        let room = direct_room(&store).await;
        for body in ["m1", "m2", "m3", "m4", "m5"] {
            store
                .create_message(&room.id, &user("alice"), &name("Alice"), content(body))
                .await
                .unwrap();
        }

        // when (操作):
        let latest = store.list_recent_messages(&room.id, 2, 0).await.unwrap();
        let older = store.list_recent_messages(&room.id, 2, 2).await.unwrap();
        let beyond = store.list_recent_messages(&room.id, 2, 10).await.unwrap();

        // then (期待する結果):
        let bodies = |ms: &[Message]| -> Vec<String> {
            ms.iter().map(|m| m.content.as_str().to_string()).collect()
        };
        assert_eq!(bodies(&latest), vec!["m4", "m5"]);
        assert_eq!(bodies(&older), vec!["m2", "m3"]);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_find_or_create_direct_room_returns_existing() {
        // テスト項目: 同じペアのダイレクトルームは順序に関係なく再利用される
        // given (前提条件):
        let store = store_at(0);
        let first = direct_room(&store).await;

        // when (操作):
        let second = store
            .find_or_create_direct_room((user("bob"), user("alice")), "bob & alice".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(second.existed);
        assert_eq!(second.room.id, first.id);
    }

    #[tokio::test]
    async fn test_direct_room_with_self_is_invalid() {
        // テスト項目: 自分自身とのダイレクトルームは作成できない
        // given (前提条件):
        let store = store_at(0);

        // when (操作):
        let result = store
            .find_or_create_direct_room((user("alice"), user("alice")), "me".to_string())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::InvalidRoom(_))));
    }

    #[tokio::test]
    async fn test_create_group_room_deduplicates_participants() {
        // テスト項目: グループルームの参加者は重複が除かれる
        // given (前提条件):
        let store = store_at(0);

        // when (操作):
        let room = store
            .create_group_room(
                "team".to_string(),
                vec![user("alice"), user("bob"), user("alice")],
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.kind, RoomKind::Group);
        assert_eq!(room.participants, vec![user("alice"), user("bob")]);
    }

    #[tokio::test]
    async fn test_list_rooms_for_orders_by_last_activity() {
        // テスト項目: ルーム一覧は最終アクティビティの新しい順
        // given (前提条件):
        let clock = Arc::new(FixedClock::new(1_000));
        let store = InMemoryPersistenceStore::new(clock);
        let direct = direct_room(&store).await;
        let group = store
            .create_group_room("team".to_string(), vec![user("alice"), user("carol")])
            .await
            .unwrap();

        let later = InMemoryPersistenceStore {
            state: store.state.clone(),
            clock: Arc::new(FixedClock::new(2_000)),
        };
        later
            .create_message(&direct.id, &user("alice"), &name("Alice"), content("ping"))
            .await
            .unwrap();

        // when (操作):
        let rooms = store.list_rooms_for(&user("alice")).await.unwrap();
        let carol_rooms = store.list_rooms_for(&user("carol")).await.unwrap();

        // then (期待する結果):
        let ids: Vec<RoomId> = rooms.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![direct.id, group.id.clone()]);
        assert_eq!(carol_rooms.len(), 1);
        assert_eq!(carol_rooms[0].id, group.id);
    }

    #[tokio::test]
    async fn test_mark_read_adds_reader_once() {
        // テスト項目: 既読は集合として記録され、重複しない
        // given (前提条件):
        let store = store_at(0);
        let room = direct_room(&store).await;
        let message = store
            .create_message(&room.id, &user("alice"), &name("Alice"), content("hi"))
            .await
            .unwrap();

        // when (操作):
        store
            .mark_read(&room.id, &message.id, user("bob"))
            .await
            .unwrap();
        let updated = store
            .mark_read(&room.id, &message.id, user("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(updated.read_by.len(), 1);
        assert!(updated.read_by.contains(&user("bob")));
    }

    #[tokio::test]
    async fn test_upsert_user_keeps_registration_and_updates_name() {
        // テスト項目: 同じユーザーの再登録では登録時刻が保たれ、表示名だけが更新される
        // given (前提条件):
        let store = store_at(1_000);
        store.upsert_user(&user("alice"), &name("Alice")).await.unwrap();
        let later = InMemoryPersistenceStore {
            state: store.state.clone(),
            clock: Arc::new(FixedClock::new(2_000)),
        };

        // when (操作):
        let profile = later
            .upsert_user(&user("alice"), &name("Alice L."))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(profile.registered_at, Timestamp::new(1_000));
        assert_eq!(profile.display_name, name("Alice L."));
        assert_eq!(store.list_users(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_users_sorted_and_excludes_caller() {
        // テスト項目: ユーザー一覧は ID 順で、exclude に指定したユーザーは含まれない
        // given (前提条件):
        let store = store_at(0);
        for (id, display) in [("carol", "Carol"), ("alice", "Alice"), ("bob", "Bob")] {
            store.upsert_user(&user(id), &name(display)).await.unwrap();
        }

        // when (操作):
        let everyone = store.list_users(None).await.unwrap();
        let others = store.list_users(Some(user("alice"))).await.unwrap();

        // then (期待する結果):
        let ids = |users: &[UserProfile]| -> Vec<String> {
            users.iter().map(|u| u.id.to_string()).collect()
        };
        assert_eq!(ids(&everyone), vec!["alice", "bob", "carol"]);
        assert_eq!(ids(&others), vec!["bob", "carol"]);
    }
}
