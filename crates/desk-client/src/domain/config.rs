//! Client configuration types.
//!
//! [`ClientConfig`] is the single source of truth for all runtime settings.
//! It is built from CLI arguments in `main.rs`; the defaults dial a desk
//! backend on the local machine.

use std::time::Duration;

use desk_core::MAX_HEIGHT;

/// The backend endpoint the panel has always dialled.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/websocket";

/// How often a held move button re-sends its `move_*` command.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// All runtime configuration for the remote control.
///
/// # Example
///
/// ```rust
/// use desk_client::domain::ClientConfig;
///
/// let cfg = ClientConfig::default();
/// assert_eq!(cfg.endpoint, "ws://localhost:8080/websocket");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket URL of the desk backend.
    pub endpoint: String,

    /// Period of the press-and-hold repeat.  The first repeat fires one
    /// period after the press; the press itself sends immediately.
    pub repeat_interval: Duration,

    /// Height shown as 100 % in the status line.
    pub max_height: f64,
}

impl Default for ClientConfig {
    /// | Field           | Default                          |
    /// |-----------------|----------------------------------|
    /// | endpoint        | `ws://localhost:8080/websocket`  |
    /// | repeat_interval | 100 ms                           |
    /// | max_height      | 650                              |
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            max_height: MAX_HEIGHT,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.endpoint, "ws://localhost:8080/websocket");
    }

    #[test]
    fn test_default_repeat_interval_is_100ms() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.repeat_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_default_max_height_is_650() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.max_height, 650.0);
    }
}
