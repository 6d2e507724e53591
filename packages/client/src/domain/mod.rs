//! Client-side logic with no I/O of its own.

pub mod command;
pub mod delivery;
pub mod input;
pub mod reconnect;
pub mod timeline;

pub use command::{Command, DEFAULT_HISTORY_LIMIT, parse_command};
pub use delivery::{Delivered, MessageDelivery};
pub use input::{InputEvent, KeystrokeTracker};
pub use reconnect::should_attempt_reconnect;
pub use timeline::Timeline;
