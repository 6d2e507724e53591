//! Presence and room-broadcast server for Hiroba chat.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --typing-quiet-ms 1500
//! ```

use clap::Parser;
use hiroba_server::{app::build_in_memory_state, config::ServerConfig, ui::Server};
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::parse();
    tracing::info!(
        "Typing quiet period: {}ms, history limit: {}, room membership check: {}",
        config.typing_quiet_ms,
        config.history_limit,
        if config.enforce_room_membership {
            "on"
        } else {
            "off"
        }
    );

    let state = build_in_memory_state(&config);
    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
