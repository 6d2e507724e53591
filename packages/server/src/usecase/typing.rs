//! UseCase: 入力中表示（typing indicator）
//!
//! (user, room) ごとに独立したタイマーを持ち、キー入力の連続を
//! `typing-start` / `typing-stop` の1組に変換します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 連続したキー入力で typing-start が1回だけ届く
//! - 無入力期間の後に typing-stop が1回だけ届く
//! - 明示的な停止（送信・stop-typing）で即座に typing-stop、タイマーは無効化
//! - 切断時にその接続の入力中状態が止まる
//!
//! ### どのような状況を想定しているか
//! - tokio の一時停止した時計（start_paused）で時間経過を再現する

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::AbortHandle};

use crate::{
    domain::{
        ConnectionId, DisplayName, KeystrokeOutcome, MessagePusher, RoomChannelRepository, RoomId,
        TypingBoard, TypingKey, UserId,
    },
    infrastructure::dto::websocket::ServerEvent,
};

use super::{error::TypingError, event};

/// 最後のキー入力から typing-stop までの無入力期間
pub const DEFAULT_TYPING_QUIET_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Default)]
struct TypingRuntime {
    board: TypingBoard,
    timers: HashMap<TypingKey, AbortHandle>,
}

/// 入力中表示のユースケース
pub struct TypingUseCase {
    room_channel_repository: Arc<dyn RoomChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    quiet_period: Duration,
    runtime: Mutex<TypingRuntime>,
}

impl TypingUseCase {
    pub fn new(
        room_channel_repository: Arc<dyn RoomChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        quiet_period: Duration,
    ) -> Self {
        Self {
            room_channel_repository,
            message_pusher,
            quiet_period,
            runtime: Mutex::new(TypingRuntime::default()),
        }
    }

    /// キー入力を1回処理する
    ///
    /// idle からの最初の入力ならルームの他メンバーへ `typing-start` を送り、
    /// いずれの場合も無入力タイマーを張り直す。
    pub async fn keystroke(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        user_id: UserId,
        display_name: DisplayName,
        room_id: RoomId,
    ) -> Result<KeystrokeOutcome, TypingError> {
        let key = TypingKey::new(user_id, room_id);
        let mut runtime = self.runtime.lock().await;

        let outcome =
            runtime
                .board
                .keystroke(key.clone(), connection_id.clone(), display_name.clone());
        let timer = self.arm_timer(key.clone(), outcome.generation());
        if let Some(previous) = runtime.timers.insert(key.clone(), timer) {
            previous.abort();
        }

        // ロックを保持したまま送ることで start / stop の順序を保つ
        if let KeystrokeOutcome::Started { .. } = outcome {
            tracing::debug!("'{}' started typing in '{}'", key.user_id, key.room_id);
            self.announce(
                &key.room_id,
                &event::typing_start(&key, &display_name),
                &connection_id,
            )
            .await?;
        }

        Ok(outcome)
    }

    /// 明示的な停止（メッセージ送信・stop-typing）
    ///
    /// 入力中だった場合は即座に `typing-stop` を送り `true` を返す。
    pub async fn stop(&self, user_id: UserId, room_id: RoomId) -> Result<bool, TypingError> {
        let key = TypingKey::new(user_id, room_id);
        let mut runtime = self.runtime.lock().await;

        let Some(state) = runtime.board.stop(&key) else {
            return Ok(false);
        };
        if let Some(timer) = runtime.timers.remove(&key) {
            timer.abort();
        }

        tracing::debug!("'{}' stopped typing in '{}'", key.user_id, key.room_id);
        self.announce(
            &key.room_id,
            &event::typing_stop(&key, &state.display_name),
            &state.connection_id,
        )
        .await?;

        Ok(true)
    }

    /// 切断された接続が発生させた入力中状態をすべて止める
    pub async fn stop_connection(&self, connection_id: &ConnectionId) -> usize {
        let mut runtime = self.runtime.lock().await;

        let stopped = runtime.board.stop_connection(connection_id);
        for (key, state) in &stopped {
            if let Some(timer) = runtime.timers.remove(key) {
                timer.abort();
            }
            if let Err(e) = self
                .announce(
                    &key.room_id,
                    &event::typing_stop(key, &state.display_name),
                    connection_id,
                )
                .await
            {
                tracing::warn!("Failed to announce typing stop for '{}': {}", key.user_id, e);
            }
        }

        stopped.len()
    }

    fn arm_timer(self: &Arc<Self>, key: TypingKey, generation: u64) -> AbortHandle {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.quiet_period).await;
            this.expire(key, generation).await;
        })
        .abort_handle()
    }

    async fn expire(&self, key: TypingKey, generation: u64) {
        let mut runtime = self.runtime.lock().await;

        let Some(state) = runtime.board.expire(&key, generation) else {
            return;
        };
        runtime.timers.remove(&key);

        tracing::debug!("'{}' went quiet in '{}'", key.user_id, key.room_id);
        if let Err(e) = self
            .announce(
                &key.room_id,
                &event::typing_stop(&key, &state.display_name),
                &state.connection_id,
            )
            .await
        {
            tracing::warn!("Failed to announce typing stop for '{}': {}", key.user_id, e);
        }
    }

    async fn announce(
        &self,
        room_id: &RoomId,
        server_event: &ServerEvent,
        exclude: &ConnectionId,
    ) -> Result<(), TypingError> {
        let targets = self
            .room_channel_repository
            .members_except(room_id, Some(exclude))
            .await;
        if targets.is_empty() {
            return Ok(());
        }

        let json = event::encode(server_event).map_err(TypingError::EncodeFailed)?;
        self.message_pusher
            .broadcast(targets, &json)
            .await
            .map_err(|e| TypingError::BroadcastFailed(e.to_string()))
    }
}
