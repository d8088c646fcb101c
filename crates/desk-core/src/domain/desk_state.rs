//! Desk state model with first-write suppression for presets.
//!
//! # Two kinds of writes
//!
//! The four preset fields (sit/stand height, sit/stand duration) are written
//! from two places:
//!
//! 1. The backend's `config` snapshot.  This is the backend telling us what
//!    it already has stored, so it must never be echoed back.
//! 2. The user editing a field.  This must be reported with a `set_*`
//!    command, but only if the field already held a value; editing a field
//!    the backend never filled in is a local-only write.
//!
//! Each field therefore carries an explicit `initialized` flag instead of
//! relying on change detection.  [`DeskState::apply_config`] never produces
//! a command; [`DeskState::edit_preset`] returns the command to send, if any.

use crate::protocol::messages::{Command, PresetConfig};

/// Height that maps to 100 % in [`height_percent`].
pub const MAX_HEIGHT: f64 = 650.0;

/// Lower end of the display range.  Reserved for range normalization; the
/// percentage is currently computed against zero.
pub const MIN_HEIGHT: f64 = 0.0;

/// `height / max_height * 100`, truncated (not rounded) to two decimals.
///
/// ```rust
/// use desk_core::height_percent;
///
/// assert_eq!(height_percent(325.0, 650.0), 50.0);
/// assert_eq!(height_percent(100.0, 650.0), 15.38);
/// ```
pub fn height_percent(height: f64, max_height: f64) -> f64 {
    let percent = height / max_height * 100.0;
    (percent * 100.0).trunc() / 100.0
}

/// Which preset a user edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetKind {
    Sit,
    Stand,
    SitDuration,
    StandDuration,
}

impl PresetKind {
    pub const ALL: [PresetKind; 4] = [
        PresetKind::Sit,
        PresetKind::Stand,
        PresetKind::SitDuration,
        PresetKind::StandDuration,
    ];

    /// The `set_*` command that stores this preset on the backend.
    pub fn set_command(self, value: f64) -> Command {
        match self {
            PresetKind::Sit => Command::SetSit { value },
            PresetKind::Stand => Command::SetStand { value },
            PresetKind::SitDuration => Command::SetSitDuration { value },
            PresetKind::StandDuration => Command::SetStandDuration { value },
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PresetKind::Sit => "sit",
            PresetKind::Stand => "stand",
            PresetKind::SitDuration => "sit-duration",
            PresetKind::StandDuration => "stand-duration",
        }
    }
}

/// One preset field plus its first-write flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PresetValue {
    value: Option<f64>,
    initialized: bool,
}

impl PresetValue {
    pub fn get(&self) -> Option<f64> {
        self.value
    }

    /// `true` once the field holds a value a user edit may replace.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Programmatic write from a backend snapshot.
    fn load(&mut self, value: Option<f64>) {
        self.value = value;
        self.initialized = value.is_some();
    }

    /// User write.  Returns `true` when the edit must be reported.
    fn edit(&mut self, value: f64) -> bool {
        let report = self.initialized && self.value != Some(value);
        self.value = Some(value);
        self.initialized = true;
        report
    }
}

/// Local mirror of the desk.  All fields start empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeskState {
    height: Option<f64>,
    sit_height: PresetValue,
    stand_height: PresetValue,
    sit_duration: PresetValue,
    stand_duration: PresetValue,
    desk_address: Option<String>,
}

impl DeskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported height, `None` until the first report.
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn preset(&self, kind: PresetKind) -> &PresetValue {
        match kind {
            PresetKind::Sit => &self.sit_height,
            PresetKind::Stand => &self.stand_height,
            PresetKind::SitDuration => &self.sit_duration,
            PresetKind::StandDuration => &self.stand_duration,
        }
    }

    fn preset_mut(&mut self, kind: PresetKind) -> &mut PresetValue {
        match kind {
            PresetKind::Sit => &mut self.sit_height,
            PresetKind::Stand => &mut self.stand_height,
            PresetKind::SitDuration => &mut self.sit_duration,
            PresetKind::StandDuration => &mut self.stand_duration,
        }
    }

    /// Bluetooth address from the last config snapshot.
    pub fn desk_address(&self) -> Option<&str> {
        self.desk_address.as_deref()
    }

    /// Stores a `current_height` report.  Presets are untouched.
    pub fn apply_height(&mut self, height: f64) {
        self.height = Some(height);
    }

    /// Overwrites every preset from a backend snapshot.
    ///
    /// Never yields a command, regardless of the previous values.
    pub fn apply_config(&mut self, config: &PresetConfig) {
        self.sit_height.load(config.sit);
        self.stand_height.load(config.stand);
        self.sit_duration.load(config.sit_duration);
        self.stand_duration.load(config.stand_duration);
        self.desk_address = config.mac.clone();
    }

    /// Applies a user edit and returns the `set_*` command to send, if any.
    ///
    /// A command is returned only when the field was already initialized and
    /// the value actually changed.
    pub fn edit_preset(&mut self, kind: PresetKind, value: f64) -> Option<Command> {
        self.preset_mut(kind)
            .edit(value)
            .then(|| kind.set_command(value))
    }

    /// Display percentage of the current height, `None` while unknown.
    pub fn height_percent(&self, max_height: f64) -> Option<f64> {
        self.height.map(|h| height_percent(h, max_height))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
