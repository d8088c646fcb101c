//! Application layer for desk-client.
//!
//! The application layer knows *what* the remote control does: which
//! commands a user action produces, how backend messages change the local
//! state, and when a held button repeats.  It delegates *how* bytes move to
//! the infrastructure layer through [`CommandSink`], [`StateObserver`] and
//! plain tokio channels.

pub mod controller;
pub mod event_loop;
pub mod intent;

pub use controller::{CommandSink, DeskController, SinkError, StateObserver};
pub use event_loop::{EventLoop, Inbound};
pub use intent::{parse_intent, Gesture, Intent, IntentError, HELP};
