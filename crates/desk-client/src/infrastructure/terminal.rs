//! Terminal front-end: status-line renderer and stdin intent reader.
//!
//! Logging goes to stderr (see `main.rs`), so stdout carries only what the
//! user asked to see: one status line per state change, or one JSON object
//! per line in `--output json` mode for scripts.

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use desk_core::Direction;

use crate::application::controller::StateObserver;
use crate::application::intent::{parse_intent, Intent, HELP};
use crate::domain::DeskSnapshot;

/// How snapshots are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable status line.
    Text,
    /// One JSON object per line.
    Json,
}

/// [`StateObserver`] that prints every snapshot to stdout.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    format: OutputFormat,
}

impl TerminalRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn render(&self, snapshot: &DeskSnapshot) -> Option<String> {
        match self.format {
            OutputFormat::Text => Some(status_line(snapshot)),
            OutputFormat::Json => match serde_json::to_string(snapshot) {
                Ok(json) => Some(json),
                Err(e) => {
                    error!("failed to serialize snapshot: {e}");
                    None
                }
            },
        }
    }
}

impl StateObserver for TerminalRenderer {
    fn state_changed(&self, snapshot: &DeskSnapshot) {
        let Some(line) = self.render(snapshot) else {
            return;
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
            debug!("stdout write failed: {e}");
        }
    }
}

/// Formats the human-readable status line.
///
/// ```text
/// [connected] height 325 (50%) | sit 720 / 45s | stand 1100 / 15s | desk E8:5B:.. | moving up
/// ```
pub fn status_line(snapshot: &DeskSnapshot) -> String {
    let mut line = format!("[{}]", snapshot.status.label());

    match (snapshot.height, snapshot.height_percent) {
        (Some(height), Some(percent)) => {
            line.push_str(&format!(" height {} ({}%)", number(height), number(percent)))
        }
        (Some(height), None) => line.push_str(&format!(" height {}", number(height))),
        _ => line.push_str(" height ?"),
    }

    line.push_str(&format!(
        " | sit {} / {}s | stand {} / {}s",
        optional(snapshot.sit_height),
        optional(snapshot.sit_duration),
        optional(snapshot.stand_height),
        optional(snapshot.stand_duration),
    ));

    if let Some(address) = &snapshot.desk_address {
        line.push_str(&format!(" | desk {address}"));
    }

    match snapshot.moving {
        Some(Direction::Up) => line.push_str(" | moving up"),
        Some(Direction::Down) => line.push_str(" | moving down"),
        None => {}
    }

    line
}

fn number(value: f64) -> String {
    // f64's Display already prints 650 rather than 650.0.
    value.to_string()
}

fn optional(value: Option<f64>) -> String {
    value.map(number).unwrap_or_else(|| "?".to_string())
}

/// Reads intents from `reader` line by line and forwards them.
///
/// Runs on a dedicated OS thread: a blocking stdin read cannot be cancelled,
/// and parking it inside the runtime would stall shutdown.  `help` is
/// answered here; bad lines are logged and skipped.  Returns when the input
/// ends, `quit` is read, or the event loop has gone away.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails.
pub fn read_intents<R: BufRead>(reader: R, intents_tx: &mpsc::Sender<Intent>) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let intent = match parse_intent(&line) {
            Ok(intent) => intent,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        if intent == Intent::Help {
            println!("{HELP}");
            continue;
        }

        if intents_tx.blocking_send(intent).is_err() {
            break;
        }
        if intent == Intent::Quit {
            break;
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
