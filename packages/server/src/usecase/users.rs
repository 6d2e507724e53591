//! UseCase: ユーザーディレクトリ
//!
//! ログインしたことのあるユーザーを永続ストアに記録し、オンラインかどうかに
//! 関係なく一覧で返します。ダイレクトルームの相手選びに使います。

use std::sync::Arc;

use crate::domain::{DisplayName, PersistenceStore, UserId, UserProfile};

use super::error::UserDirectoryError;

/// ユーザーディレクトリのユースケース
pub struct UserDirectoryUseCase {
    store: Arc<dyn PersistenceStore>,
}

impl UserDirectoryUseCase {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// ログインしたユーザーを記録する（表示名は最新のものに更新）
    pub async fn register(
        &self,
        user_id: &UserId,
        display_name: &DisplayName,
    ) -> Result<UserProfile, UserDirectoryError> {
        Ok(self.store.upsert_user(user_id, display_name).await?)
    }

    /// 既知のユーザーを ID 順で返す。`exclude` は一覧から除く
    pub async fn list(
        &self,
        exclude: Option<UserId>,
    ) -> Result<Vec<UserProfile>, UserDirectoryError> {
        Ok(self.store.list_users(exclude).await?)
    }
}
