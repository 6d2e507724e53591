//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! `PresenceTable` を `Mutex` で保護し、変更とスナップショット取得を
//! 同じロック内で行うことで、半端な状態を観測させません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PresenceEntry, PresenceRepository, PresenceTable, UserId};

/// インメモリ Presence Repository 実装
pub struct InMemoryPresenceRepository {
    table: Arc<Mutex<PresenceTable>>,
}

impl InMemoryPresenceRepository {
    pub fn new(table: Arc<Mutex<PresenceTable>>) -> Self {
        Self { table }
    }
}

impl Default for InMemoryPresenceRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(PresenceTable::new())))
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn bind(&self, entry: PresenceEntry) -> (Vec<PresenceEntry>, Vec<PresenceEntry>) {
        let mut table = self.table.lock().await;
        let displaced = table.bind(entry);
        (displaced, table.snapshot())
    }

    async fn unbind_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<(PresenceEntry, Vec<PresenceEntry>)> {
        let mut table = self.table.lock().await;
        let removed = table.unbind_connection(connection_id)?;
        Some((removed, table.snapshot()))
    }

    async fn snapshot(&self) -> Vec<PresenceEntry> {
        self.table.lock().await.snapshot()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Option<PresenceEntry> {
        self.table.lock().await.find_by_user(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayName;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - bind / unbind_connection がスナップショットと一緒に結果を返すこと
    // - 共有された PresenceTable に反映されること
    // ========================================

    fn entry(user: &str, connection: &str) -> PresenceEntry {
        PresenceEntry::new(
            UserId::new(user.to_string()).unwrap(),
            DisplayName::new(user.to_string()).unwrap(),
            ConnectionId::new(connection.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_bind_returns_snapshot_after_change() {
        // テスト項目: bind は変更後のスナップショットを返す
        // given (前提条件):
        let repo = InMemoryPresenceRepository::default();
        repo.bind(entry("bob", "c2")).await;

        // when (操作):
        let (displaced, snapshot) = repo.bind(entry("alice", "c1")).await;

        // then (期待する結果):
        assert!(displaced.is_empty());
        assert_eq!(snapshot, vec![entry("alice", "c1"), entry("bob", "c2")]);
    }

    #[tokio::test]
    async fn test_unbind_connection_returns_removed_and_snapshot() {
        // テスト項目: unbind_connection は削除したエントリと残りのスナップショットを返す
        // given (前提条件):
        let repo = InMemoryPresenceRepository::default();
        repo.bind(entry("alice", "c1")).await;
        repo.bind(entry("bob", "c2")).await;

        // when (操作):
        let result = repo
            .unbind_connection(&ConnectionId::new("c1".to_string()).unwrap())
            .await;

        // then (期待する結果):
        let (removed, snapshot) = result.unwrap();
        assert_eq!(removed, entry("alice", "c1"));
        assert_eq!(snapshot, vec![entry("bob", "c2")]);
    }

    #[tokio::test]
    async fn test_shared_table_is_updated() {
        // テスト項目: コンストラクタに渡したテーブルに変更が反映される
        // given (前提条件):
        let table = Arc::new(Mutex::new(PresenceTable::new()));
        let repo = InMemoryPresenceRepository::new(table.clone());

        // when (操作):
        repo.bind(entry("alice", "c1")).await;

        // then (期待する結果):
        assert_eq!(table.lock().await.len(), 1);
        assert!(
            repo.find_by_user(&UserId::new("alice".to_string()).unwrap())
                .await
                .is_some()
        );
    }
}
