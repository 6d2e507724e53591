//! Repository trait 定義
//!
//! 在席テーブルとルームチャンネルへのアクセスを抽象化します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//! 生のテーブルは公開せず、ここに並ぶ操作だけで変更します。

use async_trait::async_trait;

use super::{
    entity::PresenceEntry,
    value_object::{ConnectionId, RoomId, UserId},
};

/// Presence Repository trait
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// 接続をユーザーに束縛し、束縛後のスナップショットを返す
    ///
    /// 押し出されたエントリと、同じロック内で取得したスナップショットの組を返す。
    async fn bind(&self, entry: PresenceEntry) -> (Vec<PresenceEntry>, Vec<PresenceEntry>);

    /// 接続に束縛されたエントリを削除し、削除後のスナップショットを返す
    ///
    /// 束縛されていない接続の場合は `None`。
    async fn unbind_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<(PresenceEntry, Vec<PresenceEntry>)>;

    /// 在席一覧（user identity 順）
    async fn snapshot(&self) -> Vec<PresenceEntry>;

    /// ユーザーの在席エントリを取得
    async fn find_by_user(&self, user_id: &UserId) -> Option<PresenceEntry>;
}

/// Room Channel Repository trait
#[async_trait]
pub trait RoomChannelRepository: Send + Sync {
    /// チャンネルに参加（冪等）。新規参加なら `true`
    async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> bool;

    /// チャンネルから離脱。メンバーだった場合 `true`
    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool;

    /// 接続の全メンバーシップを削除し、参加していたルームを返す
    async fn remove_connection(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// ブロードキャスト対象（`exclude` を除くメンバー）
    async fn members_except(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId>;
}
