//! Single-task event loop for the Desk Control Client.
//!
//! Three sources feed one task:
//!
//! ```text
//! connection task ──Inbound──▶ ┐
//! stdin task      ──Intent───▶ ├──▶ EventLoop ──▶ DeskController
//! repeat ticker   ──tick─────▶ ┘
//! ```
//!
//! `tokio::select!` picks one ready source at a time and its handler runs
//! to completion before the next source is polled, so the controller is
//! only ever touched from this task and needs no locking.
//!
//! # Repeat ticker
//!
//! The ticker exists only while the controller reports a held direction.
//! Its first tick is one period after the press (the press itself already
//! sent a step), so holding for 250 ms with a 100 ms period yields steps at
//! 0, 100 and 200 ms.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use desk_core::Direction;

use crate::application::controller::DeskController;
use crate::application::intent::Intent;

/// Connection events delivered to the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Handshake finished.
    Opened,
    /// One text frame from the backend.
    Text(String),
    /// The connection failed or ended.  Sent at most once.
    Closed { reason: String },
}

/// Drives a [`DeskController`] from connection events, intents and time.
pub struct EventLoop {
    controller: DeskController,
    repeat_interval: Duration,
}

impl EventLoop {
    pub fn new(controller: DeskController, repeat_interval: Duration) -> Self {
        Self {
            controller,
            repeat_interval,
        }
    }

    /// Runs until `Intent::Quit` arrives or the intent channel closes.
    ///
    /// Returns the controller so callers can inspect the final state.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<Inbound>,
        mut intents: mpsc::Receiver<Intent>,
    ) -> DeskController {
        let mut inbound_open = true;
        let mut ticker: Option<(Direction, Interval)> = None;

        self.controller.render();

        loop {
            tokio::select! {
                event = inbound.recv(), if inbound_open => match event {
                    Some(event) => self.handle_inbound(event),
                    None => {
                        debug!("connection task finished");
                        inbound_open = false;
                    }
                },
                intent = intents.recv() => match intent {
                    Some(Intent::Quit) | None => {
                        info!("leaving event loop");
                        break;
                    }
                    Some(intent) => self.handle_intent(intent),
                },
                _ = next_tick(&mut ticker) => self.controller.on_repeat_tick(),
            }

            self.sync_ticker(&mut ticker);
        }

        self.controller
    }

    fn handle_inbound(&mut self, event: Inbound) {
        match event {
            Inbound::Opened => self.controller.on_open(),
            Inbound::Text(text) => self.controller.on_message(&text),
            Inbound::Closed { reason } => self.controller.on_closed(&reason),
        }
    }

    fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Sit => self.controller.sit(),
            Intent::Stand => self.controller.stand(),
            Intent::Start(gesture) => self.controller.start(gesture),
            Intent::Release => self.controller.stop(),
            Intent::EditPreset(kind, value) => self.controller.edit_preset(kind, value),
            Intent::Show => self.controller.render(),
            // Usage text is printed by the terminal front-end.
            Intent::Help | Intent::Quit => {}
        }
    }

    /// Creates, replaces or drops the ticker to match the held direction.
    fn sync_ticker(&self, ticker: &mut Option<(Direction, Interval)>) {
        let wanted = self.controller.repeat_direction();
        let current = ticker.as_ref().map(|(direction, _)| *direction);
        if wanted == current {
            return;
        }

        *ticker = wanted.map(|direction| {
            let period = self.repeat_interval;
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            (direction, interval)
        });
    }
}

/// Waits for the next repeat tick, or forever when nothing is held.
async fn next_tick(ticker: &mut Option<(Direction, Interval)>) {
    match ticker {
        Some((_, interval)) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
