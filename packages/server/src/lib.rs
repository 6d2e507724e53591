//! Hiroba server: presence and room-broadcast coordinator.
//!
//! - `domain`: value objects, entities, state machines and the traits the
//!   other layers depend on
//! - `infrastructure`: in-memory repositories and store, WebSocket pusher, DTOs
//! - `usecase`: one struct per operation
//! - `ui`: axum server, WebSocket and HTTP handlers

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
