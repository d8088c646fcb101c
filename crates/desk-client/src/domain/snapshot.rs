//! View-model types handed to renderers.
//!
//! A [`DeskSnapshot`] is a plain, serializable copy of everything the user
//! can see.  Renderers never hold a reference into the controller; they get
//! a fresh snapshot after every state change.

use serde::Serialize;

use desk_core::Direction;

/// State of the single WebSocket connection.
///
/// There is no reconnect: once `Closed`, the remote stays disconnected
/// until the process is restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Dialling the backend.
    Connecting,
    /// Handshake complete; commands are sent.
    Open,
    /// Refused, dropped, or closed.  Commands are dropped.
    Closed,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Open => "connected",
            ConnectionStatus::Closed => "disconnected",
        }
    }
}

/// Everything the status line shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeskSnapshot {
    pub status: ConnectionStatus,
    pub height: Option<f64>,
    /// Derived on demand from `height`; never stored.
    pub height_percent: Option<f64>,
    pub sit_height: Option<f64>,
    pub stand_height: Option<f64>,
    pub sit_duration: Option<f64>,
    pub stand_duration: Option<f64>,
    pub desk_address: Option<String>,
    /// Direction of the active press-and-hold, if any.
    pub moving: Option<Direction>,
}
