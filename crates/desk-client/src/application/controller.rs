//! DeskController: the Desk Control Client's state machine.
//!
//! The controller owns the local [`DeskState`], the connection status and
//! the active press-and-hold direction.  It has no notion of time or
//! sockets: the event loop tells it when the connection opens, when a frame
//! arrives and when the repeat ticker fires, and it answers by pushing
//! [`Command`]s into a [`CommandSink`] and snapshots into a
//! [`StateObserver`].
//!
//! # Inbound dispatch
//!
//! ```text
//! {"current_height": ..}  → height only
//! {"config": {..}}        → all four presets, never echoed back
//! anything else           → warn! and ignore
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use desk_core::{decode_event, Command, DeskState, Direction, Event, PresetKind};

use crate::application::intent::Gesture;
use crate::domain::{ConnectionStatus, DeskSnapshot};

/// Error type for outbound command delivery.
#[derive(Debug, Error, PartialEq)]
pub enum SinkError {
    #[error("connection writer has shut down")]
    Closed,
}

/// Where outbound commands go.
///
/// The production implementation is a channel into the WebSocket writer
/// task; tests record commands in memory.
pub trait CommandSink: Send + Sync {
    /// Queues one command for delivery.  Must not block.
    fn send(&self, cmd: Command) -> Result<(), SinkError>;
}

/// Notified with a fresh snapshot after every state mutation.
pub trait StateObserver: Send + Sync {
    fn state_changed(&self, snapshot: &DeskSnapshot);
}

/// The Desk Control Client.
pub struct DeskController {
    state: DeskState,
    status: ConnectionStatus,
    repeat: Option<Direction>,
    max_height: f64,
    sink: Arc<dyn CommandSink>,
    observer: Arc<dyn StateObserver>,
}

impl DeskController {
    /// Creates a controller in the `Connecting` state with an empty desk state.
    pub fn new(
        sink: Arc<dyn CommandSink>,
        observer: Arc<dyn StateObserver>,
        max_height: f64,
    ) -> Self {
        Self {
            state: DeskState::new(),
            status: ConnectionStatus::Connecting,
            repeat: None,
            max_height,
            sink,
            observer,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn state(&self) -> &DeskState {
        &self.state
    }

    /// Direction of the active press-and-hold, if any.
    pub fn repeat_direction(&self) -> Option<Direction> {
        self.repeat
    }

    /// Builds the view-model for renderers.
    pub fn snapshot(&self) -> DeskSnapshot {
        let preset = |kind| self.state.preset(kind).get();
        DeskSnapshot {
            status: self.status,
            height: self.state.height(),
            height_percent: self.state.height_percent(self.max_height),
            sit_height: preset(PresetKind::Sit),
            stand_height: preset(PresetKind::Stand),
            sit_duration: preset(PresetKind::SitDuration),
            stand_duration: preset(PresetKind::StandDuration),
            desk_address: self.state.desk_address().map(str::to_owned),
            moving: self.repeat,
        }
    }

    /// Pushes the current snapshot to the observer.
    pub fn render(&self) {
        self.observer.state_changed(&self.snapshot());
    }

    // ── Connection lifecycle ──────────────────────────────────────────────────

    /// The connection is open: ask for the height and the presets.
    pub fn on_open(&mut self) {
        info!("desk backend connection open");
        self.status = ConnectionStatus::Open;
        self.render();
        self.send(Command::CurrentHeight);
        self.send(Command::GetConfig);
    }

    /// The connection is gone for good.  Any press-and-hold is dropped.
    pub fn on_closed(&mut self, reason: &str) {
        warn!("desk backend connection closed: {reason}");
        self.status = ConnectionStatus::Closed;
        self.repeat = None;
        self.render();
    }

    /// Decodes one inbound text frame and applies it.
    ///
    /// Never fails: undecodable and unrecognized frames are logged and
    /// leave the state untouched.
    pub fn on_message(&mut self, text: &str) {
        let event = match decode_event(text) {
            Ok(event) => event,
            Err(e) => {
                warn!("ignoring backend message: {e}");
                return;
            }
        };

        match event {
            Event::CurrentHeight(height) => {
                debug!("current height {height}");
                self.state.apply_height(height);
            }
            Event::Config(config) => {
                debug!("config received: {config:?}");
                self.state.apply_config(&config);
            }
            Event::Unrecognized(value) => {
                warn!("message not understood: {value}");
                return;
            }
        }
        self.render();
    }

    // ── User intents ──────────────────────────────────────────────────────────

    pub fn sit(&mut self) {
        self.send(Command::Sit);
    }

    pub fn stand(&mut self) {
        self.send(Command::Stand);
    }

    /// Starts a gesture.
    ///
    /// `FullDown` and `FullUp` are plain `sit` / `stand` and never touch the
    /// repeat.  `Up` / `Down` send one step immediately and arm the repeat;
    /// pressing the other direction while one is held switches direction.
    pub fn start(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::FullDown => self.sit(),
            Gesture::FullUp => self.stand(),
            Gesture::Up => self.begin_move(Direction::Up),
            Gesture::Down => self.begin_move(Direction::Down),
        }
    }

    fn begin_move(&mut self, direction: Direction) {
        if self.status != ConnectionStatus::Open {
            warn!("not connected; ignoring move {direction:?}");
            return;
        }
        match self.repeat {
            Some(active) if active == direction => return,
            Some(active) => debug!("switching repeat from {active:?} to {direction:?}"),
            None => {}
        }
        self.repeat = Some(direction);
        self.send(direction.move_command());
        self.render();
    }

    /// Re-sends the held direction's step.  No-op when nothing is held.
    pub fn on_repeat_tick(&mut self) {
        if let Some(direction) = self.repeat {
            self.send(direction.move_command());
        }
    }

    /// Releases the press-and-hold.
    pub fn stop(&mut self) {
        if self.repeat.take().is_some() {
            self.render();
        }
    }

    /// Applies a user edit to a preset and reports it when required.
    pub fn edit_preset(&mut self, kind: PresetKind, value: f64) {
        if let Some(cmd) = self.state.edit_preset(kind, value) {
            self.send(cmd);
        } else {
            debug!("{} set to {value} locally", kind.label());
        }
        self.render();
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn send(&self, cmd: Command) {
        if self.status != ConnectionStatus::Open {
            warn!("not connected; dropping {}", cmd.name());
            return;
        }
        match self.sink.send(cmd) {
            Ok(()) => debug!("sent {}", cmd.name()),
            Err(e) => warn!("failed to send {}: {e}", cmd.name()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<Command>>,
        should_fail: bool,
    }

    impl CommandSink for RecordingSink {
        fn send(&self, cmd: Command) -> Result<(), SinkError> {
            if self.should_fail {
                return Err(SinkError::Closed);
            }
            self.sent.lock().unwrap().push(cmd);
            Ok(())
        }
    }

    impl RecordingSink {
        fn take(&self) -> Vec<Command> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        snapshots: Mutex<Vec<DeskSnapshot>>,
    }

    impl StateObserver for RecordingObserver {
        fn state_changed(&self, snapshot: &DeskSnapshot) {
            self.snapshots.lock().unwrap().push(snapshot.clone());
        }
    }

    fn make_controller() -> (DeskController, Arc<RecordingSink>, Arc<RecordingObserver>) {
        let sink = Arc::new(RecordingSink::default());
        let observer = Arc::new(RecordingObserver::default());
        let controller = DeskController::new(sink.clone(), observer.clone(), 650.0);
        (controller, sink, observer)
    }

    /// A controller whose connection is open and whose start-up queries
    /// have already been drained from the sink.
    fn open_controller() -> (DeskController, Arc<RecordingSink>, Arc<RecordingObserver>) {
        let (mut controller, sink, observer) = make_controller();
        controller.on_open();
        sink.take();
        (controller, sink, observer)
    }

    const CONFIG: &str =
        r#"{"config":{"sit":120,"stand":500,"sit_duration":45,"stand_duration":15}}"#;

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    #[test]
    fn test_new_controller_is_connecting_and_empty() {
        let (controller, sink, _) = make_controller();
        assert_eq!(controller.status(), ConnectionStatus::Connecting);
        assert_eq!(controller.state(), &DeskState::new());
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_on_open_queries_height_then_config() {
        let (mut controller, sink, _) = make_controller();

        controller.on_open();

        assert_eq!(controller.status(), ConnectionStatus::Open);
        assert_eq!(sink.take(), vec![Command::CurrentHeight, Command::GetConfig]);
    }

    #[test]
    fn test_on_closed_drops_repeat_and_renders_disconnected() {
        let (mut controller, _, observer) = open_controller();
        controller.start(Gesture::Up);

        controller.on_closed("connection refused");

        assert_eq!(controller.status(), ConnectionStatus::Closed);
        assert_eq!(controller.repeat_direction(), None);
        let last = observer.snapshots.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.status, ConnectionStatus::Closed);
        assert_eq!(last.moving, None);
    }

    #[test]
    fn test_commands_are_dropped_while_closed() {
        let (mut controller, sink, _) = open_controller();
        controller.on_closed("dropped");

        controller.sit();
        controller.start(Gesture::Down);
        controller.on_repeat_tick();

        assert!(sink.take().is_empty());
        assert_eq!(controller.repeat_direction(), None);
    }

    #[test]
    fn test_sink_failure_is_not_fatal() {
        let sink = Arc::new(RecordingSink {
            should_fail: true,
            ..Default::default()
        });
        let mut controller =
            DeskController::new(sink, Arc::new(RecordingObserver::default()), 650.0);

        controller.on_open();
        controller.stand();

        assert_eq!(controller.status(), ConnectionStatus::Open);
    }

    // ── Inbound dispatch ──────────────────────────────────────────────────────

    #[test]
    fn test_height_message_sets_height_only() {
        let (mut controller, sink, _) = open_controller();
        controller.on_message(CONFIG);
        let presets_before = controller.snapshot();

        controller.on_message(r#"{"current_height": "712.5"}"#);

        let after = controller.snapshot();
        assert_eq!(after.height, Some(712.5));
        assert_eq!(after.sit_height, presets_before.sit_height);
        assert_eq!(after.stand_height, presets_before.stand_height);
        assert_eq!(after.sit_duration, presets_before.sit_duration);
        assert_eq!(after.stand_duration, presets_before.stand_duration);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_config_message_sends_nothing() {
        // Arrange
        let (mut controller, sink, _) = open_controller();

        // Act: first load, then a changed snapshot
        controller.on_message(CONFIG);
        controller.on_message(
            r#"{"config":{"sit":130,"stand":510,"sit_duration":40,"stand_duration":10}}"#,
        );

        // Assert: presets follow the backend, nothing is echoed
        let snap = controller.snapshot();
        assert_eq!(snap.sit_height, Some(130.0));
        assert_eq!(snap.stand_height, Some(510.0));
        assert_eq!(snap.sit_duration, Some(40.0));
        assert_eq!(snap.stand_duration, Some(10.0));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_unrecognized_message_changes_nothing() {
        let (mut controller, sink, observer) = open_controller();
        let renders_before = observer.snapshots.lock().unwrap().len();
        let before = controller.snapshot();

        controller.on_message(r#"{"speed": 3}"#);

        assert_eq!(controller.snapshot(), before);
        assert_eq!(observer.snapshots.lock().unwrap().len(), renders_before);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_malformed_message_is_ignored() {
        let (mut controller, _, _) = open_controller();
        controller.on_message(r#"{"current_height": 300}"#);

        controller.on_message("{not json");
        controller.on_message(r#"{"current_height": "abc"}"#);

        assert_eq!(controller.snapshot().height, Some(300.0));
    }

    #[test]
    fn test_overflowing_height_keeps_previous_height() {
        let (mut controller, _, _) = open_controller();
        controller.on_message(r#"{"current_height": 325}"#);

        controller.on_message(r#"{"current_height": "1e999"}"#);

        let snap = controller.snapshot();
        assert_eq!(snap.height, Some(325.0));
        assert_eq!(snap.height_percent, Some(50.0));
    }

    #[test]
    fn test_height_percent_in_snapshot() {
        let (mut controller, _, _) = open_controller();
        controller.on_message(r#"{"current_height": 325}"#);
        assert_eq!(controller.snapshot().height_percent, Some(50.0));
    }

    // ── Presets ───────────────────────────────────────────────────────────────

    #[test]
    fn test_edit_of_loaded_preset_sends_exactly_one_set_command() {
        let (mut controller, sink, _) = open_controller();
        controller.on_message(CONFIG);

        controller.edit_preset(PresetKind::Sit, 130.0);

        assert_eq!(sink.take(), vec![Command::SetSit { value: 130.0 }]);
    }

    #[test]
    fn test_edit_before_config_is_local_only() {
        let (mut controller, sink, _) = open_controller();

        controller.edit_preset(PresetKind::Stand, 480.0);

        assert!(sink.take().is_empty());
        assert_eq!(controller.snapshot().stand_height, Some(480.0));
    }

    #[test]
    fn test_edit_to_same_value_sends_nothing() {
        let (mut controller, sink, _) = open_controller();
        controller.on_message(CONFIG);

        controller.edit_preset(PresetKind::StandDuration, 15.0);

        assert!(sink.take().is_empty());
    }

    // ── Gestures ──────────────────────────────────────────────────────────────

    #[test]
    fn test_sit_and_stand_send_preset_commands() {
        let (mut controller, sink, _) = open_controller();
        controller.sit();
        controller.stand();
        assert_eq!(sink.take(), vec![Command::Sit, Command::Stand]);
    }

    #[test]
    fn test_full_down_is_sit_without_repeat() {
        let (mut controller, sink, _) = open_controller();

        controller.start(Gesture::FullDown);

        assert_eq!(sink.take(), vec![Command::Sit]);
        assert_eq!(controller.repeat_direction(), None);
    }

    #[test]
    fn test_full_up_is_stand_without_repeat() {
        let (mut controller, sink, _) = open_controller();

        controller.start(Gesture::FullUp);

        assert_eq!(sink.take(), vec![Command::Stand]);
        assert_eq!(controller.repeat_direction(), None);
    }

    #[test]
    fn test_up_sends_immediately_and_arms_repeat() {
        let (mut controller, sink, _) = open_controller();

        controller.start(Gesture::Up);

        assert_eq!(sink.take(), vec![Command::MoveUp]);
        assert_eq!(controller.repeat_direction(), Some(Direction::Up));
    }

    #[test]
    fn test_repeat_tick_resends_held_direction() {
        let (mut controller, sink, _) = open_controller();
        controller.start(Gesture::Down);

        controller.on_repeat_tick();
        controller.on_repeat_tick();

        assert_eq!(
            sink.take(),
            vec![Command::MoveDown, Command::MoveDown, Command::MoveDown]
        );
    }

    #[test]
    fn test_pressing_same_direction_twice_is_noop() {
        let (mut controller, sink, _) = open_controller();
        controller.start(Gesture::Up);

        controller.start(Gesture::Up);

        assert_eq!(sink.take(), vec![Command::MoveUp]);
    }

    #[test]
    fn test_other_direction_replaces_active_repeat() {
        let (mut controller, sink, _) = open_controller();
        controller.start(Gesture::Up);

        controller.start(Gesture::Down);
        controller.on_repeat_tick();

        assert_eq!(
            sink.take(),
            vec![Command::MoveUp, Command::MoveDown, Command::MoveDown]
        );
        assert_eq!(controller.repeat_direction(), Some(Direction::Down));
    }

    #[test]
    fn test_stop_clears_repeat() {
        let (mut controller, sink, _) = open_controller();
        controller.start(Gesture::Up);
        sink.take();

        controller.stop();
        controller.on_repeat_tick();

        assert_eq!(controller.repeat_direction(), None);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_snapshot_reports_moving_direction() {
        let (mut controller, _, observer) = open_controller();

        controller.start(Gesture::Down);

        let last = observer.snapshots.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.moving, Some(Direction::Down));
    }
}
