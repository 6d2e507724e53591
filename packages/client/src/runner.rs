//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use hiroba_shared::time::SystemClock;
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};
use tokio::sync::mpsc;

use crate::{
    domain::{InputEvent, should_attempt_reconnect},
    error::ClientError,
    session::{SessionContext, run_client_session},
    store::HttpMessageStore,
    ui::KeystrokeNotifier,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Where to connect and who to log in as
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub ws_url: String,
    /// HTTP API origin, e.g. `http://127.0.0.1:8080`
    pub api_url: String,
    pub user_id: String,
    pub display_name: String,
}

/// Read input on a blocking thread for the whole client run
///
/// Besides submitted lines, edits of a chat line are reported as
/// keystrokes so the session can send typing signals.
fn spawn_readline(user_id: String) -> mpsc::UnboundedReceiver<InputEvent> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<InputEvent>();

    std::thread::spawn(move || {
        let mut rl = match Editor::<KeystrokeNotifier, DefaultHistory>::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };
        rl.set_helper(Some(KeystrokeNotifier::new(input_tx.clone())));

        let prompt = format!("{}> ", user_id);

        loop {
            let read = rl.readline(&prompt);
            if let Some(notifier) = rl.helper() {
                match &read {
                    Ok(_) => notifier.reset(),
                    Err(_) => notifier.abandon(),
                }
            }

            match read {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(InputEvent::Line(line.to_string())).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Run the client with reconnection logic
///
/// Each reconnect logs in again and re-joins the rooms joined so far.
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let store = Arc::new(HttpMessageStore::new(options.api_url));
    let ctx = SessionContext::new(
        options.ws_url,
        options.user_id.clone(),
        options.display_name,
        store,
        Arc::new(SystemClock),
    );
    let mut input_rx = spawn_readline(options.user_id);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            ctx.ws_url,
            ctx.user_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&ctx, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If the session ended by user exit, don't reconnect
                break;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        reconnect_count
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
