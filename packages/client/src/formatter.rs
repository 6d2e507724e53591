//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::{
    http::{RoomDto, RoomSummaryDto, UserDto},
    websocket::{MessagePayload, PresenceEntryPayload},
};
use hiroba_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::timeline::is_provisional;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a presence snapshot, marking the current user
    pub fn format_presence(entries: &[PresenceEntryPayload], current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Online:\n");

        if entries.is_empty() {
            output.push_str("(Nobody online)\n");
        } else {
            for entry in entries {
                let me_suffix = if entry.user_identity == current_user_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!(
                    "{} [{}]{}\n",
                    entry.display_name, entry.user_identity, me_suffix
                ));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the user directory, marking who is online
    pub fn format_users(users: &[UserDto], online: &[PresenceEntryPayload]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Users:\n");

        if users.is_empty() {
            output.push_str("(No other users yet)\n");
        }
        for user in users {
            let is_online = online
                .iter()
                .any(|entry| entry.user_identity == user.identity);
            let marker = if is_online { "●" } else { "○" };
            output.push_str(&format!(
                "{} {} [{}]\n",
                marker, user.display_name, user.identity
            ));
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The relayed message
    ///
    /// # Returns
    ///
    /// A formatted string with room, sender, content and send time.
    /// Copies that were never persisted are flagged.
    pub fn format_chat_message(message: &MessagePayload) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(message.timestamp);
        let unsaved = if is_provisional(&message.identity) {
            " (not saved)"
        } else {
            ""
        };
        format!(
            "\n\n{rule}\n\
             #{} @{}: {}\n\
             sent at {}{}\n\
             {rule}\n",
            message.room,
            message.sender_display_name,
            message.content,
            timestamp_str,
            unsaved,
            rule = THIN_RULE,
        )
    }

    /// Format a confirmation after sending; un-persisted copies are flagged
    pub fn format_sent_confirmation(sent_at: i64, persisted: bool) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(sent_at);
        if persisted {
            format!("sent at {}\n", timestamp_str)
        } else {
            format!("sent at {} (not saved)\n", timestamp_str)
        }
    }

    pub fn format_typing(display_name: &str, room: &str, started: bool) -> String {
        if started {
            format!("\n… {} is typing in #{}\n", display_name, room)
        } else {
            format!("\n… {} stopped typing in #{}\n", display_name, room)
        }
    }

    /// Format a room-opened notification
    pub fn format_room_opened(room: &str, participants: &[String]) -> String {
        format!(
            "\n* New room #{} with {}\n",
            room,
            participants.join(", ")
        )
    }

    /// Format the result of `/dm` or `/group`
    pub fn format_room_ready(room: &RoomDto, existed: bool) -> String {
        let verb = if existed { "Opened" } else { "Created" };
        format!(
            "\n* {} \"{}\" (#{}) with {}\n",
            verb,
            room.name,
            room.identity,
            room.participants.join(", ")
        )
    }

    /// Format the messages of a room, oldest first
    pub fn format_history(room: &str, messages: &[MessagePayload]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("#{}\n", room));

        if messages.is_empty() {
            output.push_str("(No messages)\n");
        } else {
            for message in messages {
                output.push_str(&format!(
                    "[{}] @{}: {}\n",
                    timestamp_to_jst_rfc3339(message.timestamp),
                    message.sender_display_name,
                    message.content
                ));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a room list with each room's last message
    pub fn format_rooms(summaries: &[RoomSummaryDto]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Rooms:\n");

        if summaries.is_empty() {
            output.push_str("(No rooms)\n");
        } else {
            for summary in summaries {
                let last = summary
                    .last_message
                    .as_ref()
                    .map(|m| format!("@{}: {}", m.sender_display_name, m.content))
                    .unwrap_or_else(|| "(no messages)".to_string());
                output.push_str(&format!(
                    "{} (#{}) - {}\n",
                    summary.room.name, summary.room.identity, last
                ));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    pub fn format_left(room: &str) -> String {
        format!("\n- Left #{}\n", room)
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  <text>                    send to the current room",
            "  /join <room>              join a room and show its history",
            "  /leave [room]             leave a room (default: current)",
            "  /dm <user>                open the direct room with a user",
            "  /group <name> <user>...   create a group room",
            "  /who                      list who is online",
            "  /users                    list every known user (● online)",
            "  /rooms                    list your rooms",
            "  /history [limit]          show the current room's history",
            "  /quit                     exit",
            "",
        ]
        .join("\n")
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
