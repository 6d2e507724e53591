//! 送出イベントの組み立てとシリアライズ

use crate::{
    domain::{DisplayName, PresenceEntry, TypingKey},
    infrastructure::dto::websocket::{
        PresenceEntryPayload, PresenceSnapshotPayload, ServerEvent, TypingPayload,
    },
};

/// ServerEvent を JSON 文字列に変換
pub(crate) fn encode(event: &ServerEvent) -> Result<String, String> {
    serde_json::to_string(event).map_err(|e| e.to_string())
}

pub(crate) fn presence_snapshot(entries: Vec<PresenceEntry>) -> ServerEvent {
    ServerEvent::PresenceSnapshot(PresenceSnapshotPayload {
        entries: entries
            .into_iter()
            .map(PresenceEntryPayload::from)
            .collect(),
    })
}

fn typing_payload(key: &TypingKey, display_name: &DisplayName) -> TypingPayload {
    TypingPayload {
        user_identity: key.user_id.to_string(),
        display_name: display_name.as_str().to_string(),
        room: key.room_id.to_string(),
    }
}

pub(crate) fn typing_start(key: &TypingKey, display_name: &DisplayName) -> ServerEvent {
    ServerEvent::TypingStart(typing_payload(key, display_name))
}

pub(crate) fn typing_stop(key: &TypingKey, display_name: &DisplayName) -> ServerEvent {
    ServerEvent::TypingStop(typing_payload(key, display_name))
}
