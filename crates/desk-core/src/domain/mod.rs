//! Domain layer: the local mirror of the desk's state.
//!
//! No I/O and no async in here.  The client's application layer owns a
//! [`DeskState`] and feeds it decoded events and user edits.

pub mod desk_state;

pub use desk_state::{height_percent, DeskState, PresetKind, PresetValue, MAX_HEIGHT, MIN_HEIGHT};
