//! JSON codec for desk protocol messages.
//!
//! Outbound commands are plain serde serialization.  Inbound events are
//! decoded from a [`serde_json::Value`] by key presence:
//!
//! ```text
//! {"current_height": 712.5, "speed": 0}   → Event::CurrentHeight(712.5)
//! {"config": {"sit": 720, ...}}           → Event::Config(..)
//! {"hello": 1}                            → Event::Unrecognized(..)
//! ```
//!
//! Numbers are parsed leniently: the backend has been seen to send heights
//! both as JSON numbers and as numeric strings.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::protocol::messages::{Command, Event, PresetConfig};

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The frame is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// A `current_height` payload did not contain a number.
    #[error("current_height is not numeric: {0}")]
    InvalidHeight(String),

    /// A `config` payload was not a JSON object.
    #[error("config payload is not an object: {0}")]
    InvalidConfig(String),

    /// A command could not be serialized.
    #[error("failed to serialize command: {0}")]
    Serialize(String),
}

/// Top-level key of a height report.
pub const KEY_CURRENT_HEIGHT: &str = "current_height";
/// Top-level key of a preset snapshot.
pub const KEY_CONFIG: &str = "config";

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`Command`] as a JSON text frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Serialize`] for a non-finite `set_*` value (JSON
/// has no spelling for NaN or infinity) or if serde fails.
///
/// # Examples
///
/// ```rust
/// use desk_core::{encode_command, Command};
///
/// let text = encode_command(&Command::Sit).unwrap();
/// assert_eq!(text, r#"{"command":"sit"}"#);
/// ```
pub fn encode_command(cmd: &Command) -> Result<String, ProtocolError> {
    if let Some(value) = cmd.value().filter(|v| !v.is_finite()) {
        return Err(ProtocolError::Serialize(format!(
            "{} value {value} is not finite",
            cmd.name()
        )));
    }
    serde_json::to_string(cmd).map_err(|e| ProtocolError::Serialize(e.to_string()))
}

/// Decodes one inbound text frame into an [`Event`].
///
/// `current_height` takes precedence over `config` when both keys are
/// present.  Anything else that is valid JSON is returned as
/// [`Event::Unrecognized`] rather than an error.
///
/// # Errors
///
/// - [`ProtocolError::InvalidJson`] when `text` is not JSON at all.
/// - [`ProtocolError::InvalidHeight`] when `current_height` has no numeric value.
/// - [`ProtocolError::InvalidConfig`] when `config` is not an object.
///
/// # Examples
///
/// ```rust
/// use desk_core::{decode_event, Event};
///
/// let event = decode_event(r#"{"current_height": "650.0"}"#).unwrap();
/// assert_eq!(event, Event::CurrentHeight(650.0));
/// ```
pub fn decode_event(text: &str) -> Result<Event, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        other => return Ok(Event::Unrecognized(other)),
    };

    if let Some(raw) = object.get(KEY_CURRENT_HEIGHT) {
        let height =
            lenient_number(raw).ok_or_else(|| ProtocolError::InvalidHeight(raw.to_string()))?;
        return Ok(Event::CurrentHeight(height));
    }

    if let Some(raw) = object.get(KEY_CONFIG) {
        let config = raw
            .as_object()
            .ok_or_else(|| ProtocolError::InvalidConfig(raw.to_string()))?;
        return Ok(Event::Config(decode_preset_config(config)));
    }

    Ok(Event::Unrecognized(Value::Object(object)))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn decode_preset_config(config: &Map<String, Value>) -> PresetConfig {
    let number = |key: &str| {
        let raw = config.get(key)?;
        let parsed = lenient_number(raw);
        if parsed.is_none() {
            debug!("config field {key} is not numeric: {raw}");
        }
        parsed
    };
    PresetConfig {
        sit: number("sit"),
        stand: number("stand"),
        sit_duration: number("sit_duration"),
        stand_duration: number("stand_duration"),
        mac: config.get("mac").and_then(Value::as_str).map(str::to_owned),
    }
}

/// Reads a JSON number, or a string that starts with one.
///
/// Overflowing strings such as `"1e999"` parse to infinity and are rejected.
fn lenient_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parses the longest numeric prefix of `s`, ignoring leading whitespace.
///
/// `"712.5mm"` → `712.5`, `"  -3e2x"` → `-300.0`, `"abc"` → `None`.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
