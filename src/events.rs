//! Event types and the main event loop driver for the place detail screen.
//!
//! This module defines the [`Event`] enum (keyboard input, ticks, and the two
//! pipeline results) and the [`EventHandler`], which runs a background task
//! that polls crossterm for key events and emits periodic [`Event::Tick`]s.
//! The main loop in `main.rs` receives events via [`EventHandler::next`] and
//! the pipeline tasks (location resolution, place fetches) send events via
//! [`EventHandler::tx`].

use crate::fetcher::FetchOrigin;
use crate::models::{Coordinate, PlaceRecord, Review};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Events processed by the application event loop.
pub enum Event {
    /// Periodic tick used for UI refresh.
    Tick,
    /// User key press from the terminal.
    Input(KeyEvent),
    /// Outcome of the location resolution chain; `None` means every tier
    /// failed and distances stay unknown.
    LocationResolved(Option<Coordinate>),
    /// Result of one place fetch.
    PlaceUpdate {
        /// Fetch sequence number; stale results are discarded by the app.
        seq: u64,
        /// The resolved place record (remote, bundled, or all-defaults).
        record: PlaceRecord,
        /// Normalized remote reviews; empty for non-remote origins.
        reviews: Vec<Review>,
        /// Which source produced this result.
        origin: FetchOrigin,
    },
}

/// Multiplexes terminal input and ticks into a single event stream.
///
/// Holds an unbounded channel: the sender ([`tx`](EventHandler::tx)) can be
/// cloned and given to the pipeline tasks, while the receiver is consumed by
/// [`next`](EventHandler::next) in the main loop. A background task polls
/// crossterm with a timeout and sends [`Event::Input`] on key press and
/// [`Event::Tick`] at the configured interval.
pub struct EventHandler {
    /// Sender for posting events (e.g. from the location or fetch tasks).
    pub tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates a new event handler and spawns the input/tick task.
    ///
    /// The spawned task runs until the process exits. It polls crossterm with
    /// a timeout of `tick_rate_ms`; when a key is pressed it sends
    /// [`Event::Input`], and when the tick interval elapses it sends
    /// [`Event::Tick`].
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::from_secs(0));
                if event::poll(timeout).expect("Poll failed") {
                    if let CrosstermEvent::Key(key) = event::read().expect("Read failed") {
                        event_tx.send(Event::Input(key)).ok();
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    event_tx.send(Event::Tick).ok();
                    last_tick = Instant::now();
                }
            }
        });

        Self { tx, rx }
    }

    /// Receives the next event from the channel.
    ///
    /// Returns `None` when all senders have been dropped (e.g. the input task
    /// exited).
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
