//! Server configuration (command-line flags with environment fallbacks).

use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "hiroba-server")]
#[command(about = "Presence and room-broadcast coordinator for Hiroba chat", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Quiet period in milliseconds after the last keystroke before typing stops
    #[arg(long, env = "HIROBA_TYPING_QUIET_MS", default_value_t = 1000)]
    pub typing_quiet_ms: u64,

    /// Number of messages returned by the history endpoint when no limit is given
    #[arg(long, env = "HIROBA_HISTORY_LIMIT", default_value_t = 50)]
    pub history_limit: usize,

    /// Only let room participants join a room channel
    #[arg(long, env = "HIROBA_ENFORCE_ROOM_MEMBERSHIP", default_value_t = false)]
    pub enforce_room_membership: bool,
}

impl ServerConfig {
    pub fn typing_quiet_period(&self) -> Duration {
        Duration::from_millis(self.typing_quiet_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            typing_quiet_ms: 1000,
            history_limit: 50,
            enforce_room_membership: false,
        }
    }
}
