//! # desk-core
//!
//! Shared library for the desk remote control containing the JSON wire
//! protocol and the in-memory desk state model.
//!
//! It has zero dependencies on sockets, async runtimes, or terminal I/O, so
//! everything in here can be unit tested with plain `#[test]` functions.
//!
//! # Architecture overview (for beginners)
//!
//! A height-adjustable desk is driven by a backend process that owns the
//! Bluetooth link to the motor controller.  Remote controls talk to that
//! backend over a WebSocket using small JSON objects:
//!
//! ```text
//! remote control  ── {"command":"move_up"} ──────────────▶  desk backend
//!                 ◀─ {"current_height": 712.5} ──────────
//! ```
//!
//! This crate defines:
//!
//! - **`protocol`** – The outbound [`Command`] set, the inbound [`Event`]
//!   set, and the codec that turns them into / out of JSON text.
//!
//! - **`domain`** – [`DeskState`], the local mirror of the desk's height and
//!   presets.  It decides which local edits must be reported back to the
//!   backend and which writes are just the backend's own snapshot arriving.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `desk_core::DeskState` instead of `desk_core::domain::desk_state::DeskState`.
pub use domain::desk_state::{
    height_percent, DeskState, PresetKind, PresetValue, MAX_HEIGHT, MIN_HEIGHT,
};
pub use protocol::codec::{decode_event, encode_command, ProtocolError};
pub use protocol::messages::{Command, Direction, Event, PresetConfig};
