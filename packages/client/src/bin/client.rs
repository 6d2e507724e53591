//! Hiroba CLI chat client.
//!
//! Logs in with a user identity, joins rooms and sends messages through the
//! optimistic delivery protocol. Automatically reconnects on disconnection
//! (max 5 attempts with 5 second interval), logging in and re-joining rooms.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --user-id alice --name Alice
//! cargo run --bin hiroba-client -- -i bob -u ws://127.0.0.1:8080/ws -a http://127.0.0.1:8080
//! ```

use clap::Parser;
use hiroba_client::{run_client, runner::ClientOptions};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Hiroba CLI chat client", long_about = None)]
struct Args {
    /// User identity to log in as
    #[arg(short = 'i', long)]
    user_id: String,

    /// Display name (defaults to the user identity)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "HIROBA_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// HTTP API base URL
    #[arg(short = 'a', long, env = "HIROBA_API", default_value = "http://127.0.0.1:8080")]
    api: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let options = ClientOptions {
        ws_url: args.url,
        api_url: args.api,
        display_name: args.name.unwrap_or_else(|| args.user_id.clone()),
        user_id: args.user_id,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
