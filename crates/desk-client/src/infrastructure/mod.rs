//! Infrastructure layer for desk-client.
//!
//! The infrastructure layer handles all I/O: the WebSocket connection to the
//! desk backend and the terminal (stdin for intents, stdout for state).
//!
//! # What does NOT belong here?
//!
//! - Deciding which command a user action produces (application layer)
//! - Message type definitions and JSON decoding (`desk-core`)
//! - CLI parsing (done in `main.rs`)

pub mod connection;
pub mod terminal;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use connection::{spawn_connection, CommandSender};
pub use terminal::{read_intents, OutputFormat, TerminalRenderer};
