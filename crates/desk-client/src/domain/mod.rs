//! Domain layer for desk-client.
//!
//! Plain data: runtime configuration, connection status, and the snapshot
//! handed to renderers.  Nothing in here touches a socket or the terminal.

pub mod config;
pub mod snapshot;

pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_REPEAT_INTERVAL};
pub use snapshot::{ConnectionStatus, DeskSnapshot};
