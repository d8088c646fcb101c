//! desk-client library crate.
//!
//! This crate provides the Desk Control Client: a terminal remote control
//! that mirrors a desk backend's state and forwards user intents to it as
//! JSON commands over one WebSocket connection.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! stdin (user intents)              desk backend (JSON over WebSocket)
//!         ↓                                   ↕
//! [desk-client]
//!   ├── domain/           Pure types: ClientConfig, ConnectionStatus, DeskSnapshot
//!   ├── application/
//!   │     ├── controller/ DeskController: dispatch, presets, repeat-move state
//!   │     ├── intent/     Terminal command language → Intent
//!   │     └── event_loop/ Single-task scheduler: inbound, intents, repeat ticker
//!   └── infrastructure/
//!         ├── connection/ WebSocket reader/writer task (tokio-tungstenite)
//!         └── terminal/   Status-line renderer and stdin reader
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `desk-core`; it talks to the
//!   outside world only through the [`application::CommandSink`] and
//!   [`application::StateObserver`] traits and plain channels.
//! - `infrastructure` depends on all other layers plus `tokio-tungstenite`.

/// Domain layer: configuration and view-model types (no I/O).
pub mod domain;

/// Application layer: controller, intents, and the event loop.
pub mod application;

/// Infrastructure layer: WebSocket connection and terminal I/O.
pub mod infrastructure;
