//! Value objects for the presence and room-broadcast domain.
//!
//! Every identifier is an opaque, non-empty string. Validation happens once at
//! the boundary (DTO → domain) so the rest of the crate can rely on it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Prefix for client-generated identities that have not been persisted yet.
pub const PROVISIONAL_ID_PREFIX: &str = "temp-";

/// Maximum length of message content in characters
pub const MAX_MESSAGE_CONTENT_LENGTH: usize = 10_000;

/// Maximum length of a display name in characters
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, rejecting empty or blank values
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.trim().is_empty() {
                    return Err(ValueObjectError::Empty($field));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// Opaque identity of one open transport connection.
    ConnectionId,
    "connection id"
);

string_identifier!(
    /// Identity of a user, bound to a connection by `login`.
    UserId,
    "user identity"
);

string_identifier!(
    /// Room identifier; doubles as the name of its broadcast channel.
    RoomId,
    "room identifier"
);

string_identifier!(
    /// Identity of a message, either durable or provisional.
    MessageId,
    "message identity"
);

impl ConnectionId {
    /// Generate a fresh connection identity at transport connect time
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl RoomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl MessageId {
    /// Generate a durable identity (store side)
    pub fn generate_durable() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Generate a provisional identity for an optimistic local echo
    pub fn generate_provisional() -> Self {
        Self(format!("{}{}", PROVISIONAL_ID_PREFIX, Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_ID_PREFIX)
    }
}

/// Name shown next to a user's messages and presence entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("display name"));
        }
        if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(ValueObjectError::TooLong {
                field: "display name",
                max: MAX_DISPLAY_NAME_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Chat message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("message content"));
        }
        if value.chars().count() > MAX_MESSAGE_CONTENT_LENGTH {
            return Err(ValueObjectError::TooLong {
                field: "message content",
                max: MAX_MESSAGE_CONTENT_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
