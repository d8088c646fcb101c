//! All desk protocol message types.
//!
//! # Message flow
//!
//! ```text
//! Remote  → Backend:  Command  →  JSON text frame
//! Backend → Remote:   JSON text frame  →  Event
//! ```
//!
//! # JSON discriminant
//!
//! Every outbound message is a JSON object with a `"command"` field that
//! identifies the variant.  The four `set_*` commands also carry a numeric
//! `"value"`:
//!
//! ```json
//! {"command":"move_up"}
//! {"command":"set_sit","value":120}
//! ```
//!
//! Serde's `#[serde(tag = "command")]` attribute handles this automatically.
//!
//! Inbound messages have no discriminant field.  The backend sends objects
//! whose *top-level key* tells the remote what they carry
//! (`current_height` or `config`), so [`Event`] is decoded by hand in
//! [`crate::protocol::codec::decode_event`] instead of through a derive.

use serde::{Serialize, Serializer};

// ── Remote → Backend ──────────────────────────────────────────────────────────

/// All commands the remote control can send to the desk backend.
///
/// # Serde representation
///
/// ```json
/// {"command":"current_height"}
/// {"command":"get_config"}
/// {"command":"set_stand_duration","value":45}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Ask the backend to report the current height.
    CurrentHeight,
    /// Ask the backend to report the stored preset configuration.
    GetConfig,
    /// Move to the stored sit height.
    Sit,
    /// Move to the stored stand height.
    Stand,
    /// Move up by one step.
    MoveUp,
    /// Move down by one step.
    MoveDown,
    /// Update the stored sit height.
    SetSit {
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    },
    /// Update the stored stand height.
    SetStand {
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    },
    /// Update the stored sit transition duration.
    SetSitDuration {
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    },
    /// Update the stored stand transition duration.
    SetStandDuration {
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    },
}

impl Command {
    /// Returns the wire name of the command (the `"command"` field value).
    ///
    /// Used in log messages so that values are never logged at info level.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CurrentHeight => "current_height",
            Command::GetConfig => "get_config",
            Command::Sit => "sit",
            Command::Stand => "stand",
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
            Command::SetSit { .. } => "set_sit",
            Command::SetStand { .. } => "set_stand",
            Command::SetSitDuration { .. } => "set_sit_duration",
            Command::SetStandDuration { .. } => "set_stand_duration",
        }
    }

    /// The payload of a `set_*` command, `None` for every other command.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Command::SetSit { value }
            | Command::SetStand { value }
            | Command::SetSitDuration { value }
            | Command::SetStandDuration { value } => Some(value),
            _ => None,
        }
    }
}

/// Writes whole numbers as JSON integers (`120`, not `120.0`).
///
/// The backend stores these values verbatim in its config file, so an
/// integral height must stay an integer on the wire.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Direction of a press-and-hold move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The single-step command for this direction.
    pub fn move_command(self) -> Command {
        match self {
            Direction::Up => Command::MoveUp,
            Direction::Down => Command::MoveDown,
        }
    }
}

// ── Backend → Remote ──────────────────────────────────────────────────────────

/// The backend's snapshot of the stored presets.
///
/// Every field is optional: the remote only checks for presence and
/// overwrites its local copy with whatever arrived, including absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stand: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sit_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stand_duration: Option<f64>,
    /// Bluetooth address of the desk, as stored by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

/// A decoded inbound message.
///
/// An inbound message carries at most one semantic payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `{"current_height": <number or numeric string>}`
    CurrentHeight(f64),
    /// `{"config": {"sit": .., "stand": .., "sit_duration": .., "stand_duration": ..}}`
    Config(PresetConfig),
    /// Valid JSON the remote does not understand.  Logged, never fatal.
    Unrecognized(serde_json::Value),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
