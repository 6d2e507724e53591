//! Hiroba CLI client.
//!
//! - `domain`: timeline reconciliation, the delivery protocol, command
//!   parsing and the reconnect policy
//! - `store`: persistence store access over the HTTP API
//! - `session` / `runner`: one WebSocket session and the reconnect loop

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod store;
mod ui;

pub use runner::run_client;
