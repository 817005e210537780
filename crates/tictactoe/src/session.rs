//! A play session: engine, mode, and the delayed automated move.
//!
//! All game state lives in one [`GameEngine`] behind a mutex. The only
//! asynchronous step is the automated O move in single-player mode, which
//! runs on a tokio task after the configured delay and re-checks the game
//! when it wakes, not when it was scheduled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tictactoe_engine::{
    GameEngine, GameStatus, Mark, Move, MoveIgnored, MoveOutcome, MoveSelector, Position,
    Snapshot, ValidationError,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::config::{PlayMode, Settings};

/// Mark played automatically in single-player mode.
pub const COMPUTER_MARK: Mark = Mark::O;

/// Notifications for whoever renders the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A mark was placed.
    MoveApplied {
        /// The move as placed.
        played: Move,
        /// Status after the move.
        status: GameStatus,
        /// True when the automated player made the move.
        automated: bool,
    },
    /// A new round started.
    Reset {
        /// Round number after the reset.
        round: u64,
    },
    /// Play mode changed.
    ModeChanged(PlayMode),
}

#[derive(Debug)]
struct Table<S> {
    engine: GameEngine,
    selector: S,
}

fn lock<S>(table: &Mutex<Table<S>>) -> MutexGuard<'_, Table<S>> {
    // The engine is consistent between calls, so a panic elsewhere leaves it usable.
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

fn notify(events: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) {
    if events.send(event).is_err() {
        debug!("Session event receiver dropped");
    }
}

/// Plays the automated move if the round it was scheduled for still wants it.
///
/// Returns `None` when the move is stale: the board was reset, the round
/// ended, it is no longer the computer's turn, or no cell is free.
#[instrument(skip(table, events))]
fn play_scheduled_move<S: MoveSelector>(
    table: &Mutex<Table<S>>,
    scheduled_round: u64,
    events: &mpsc::UnboundedSender<SessionEvent>,
) -> Option<MoveOutcome> {
    let mut guard = lock(table);
    let Table { engine, selector } = &mut *guard;

    if engine.round() != scheduled_round {
        debug!(current_round = engine.round(), "Dropping automated move from an earlier round");
        return None;
    }
    if engine.is_over() {
        debug!(status = ?engine.status(), "Dropping automated move after game over");
        return None;
    }
    if engine.to_move() != COMPUTER_MARK {
        debug!(to_move = %engine.to_move(), "Dropping automated move out of turn");
        return None;
    }

    let position = selector.select_move(engine.board())?;
    let outcome = engine.place(position);
    if let MoveOutcome::Applied { played, status } = outcome {
        info!(position = %position, ?status, "Computer moved");
        notify(
            events,
            SessionEvent::MoveApplied {
                played,
                status,
                automated: true,
            },
        );
    }
    Some(outcome)
}

/// One running game with its score, mode, and pending automated move.
///
/// Methods that may schedule the automated move must run inside a tokio
/// runtime.
#[derive(Debug)]
pub struct Session<S> {
    table: Arc<Mutex<Table<S>>>,
    mode: PlayMode,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<S> Session<S>
where
    S: MoveSelector + Send + 'static,
{
    /// Creates a session with a fresh engine.
    #[instrument(skip(selector, events))]
    pub fn new(
        selector: S,
        mode: PlayMode,
        delay: Duration,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        info!("Creating session");
        Self {
            table: Arc::new(Mutex::new(Table {
                engine: GameEngine::new(),
                selector,
            })),
            mode,
            delay,
            pending: None,
            events,
        }
    }

    /// Creates a session from resolved settings.
    pub fn from_settings(
        settings: &Settings,
        selector: S,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self::new(selector, *settings.mode(), settings.computer_delay(), events)
    }

    /// Offers a human move at a cell index.
    ///
    /// In single-player mode the human plays X only; input during the
    /// computer's turn is ignored. An applied move that leaves the round in
    /// progress schedules the computer's reply.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for indices outside 0-8.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn human_move(&mut self, index: usize) -> Result<MoveOutcome, ValidationError> {
        let position = Position::try_from(index).inspect_err(|e| {
            warn!(error = %e, "Rejected out-of-range cell");
        })?;

        let outcome = {
            let mut table = lock(&self.table);
            if self.mode == PlayMode::SinglePlayer
                && !table.engine.is_over()
                && table.engine.to_move() == COMPUTER_MARK
            {
                debug!("Ignoring input during the computer's turn");
                return Ok(MoveOutcome::Ignored(MoveIgnored::NotYourTurn(COMPUTER_MARK)));
            }
            table.engine.place(position)
        };

        if let MoveOutcome::Applied { played, status } = outcome {
            notify(
                &self.events,
                SessionEvent::MoveApplied {
                    played,
                    status,
                    automated: false,
                },
            );
            if status == GameStatus::InProgress && self.mode == PlayMode::SinglePlayer {
                self.schedule_computer_move();
            }
        }
        Ok(outcome)
    }

    /// Schedules the automated move after the configured delay.
    ///
    /// Replaces any move already pending.
    #[instrument(skip(self), fields(delay_ms = self.delay.as_millis() as u64))]
    pub fn schedule_computer_move(&mut self) {
        self.cancel_pending();
        let round = lock(&self.table).engine.round();
        let table = Arc::clone(&self.table);
        let events = self.events.clone();
        let delay = self.delay;

        debug!(round, "Scheduling automated move");
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            play_scheduled_move(&table, round, &events);
        }));
    }

    /// Aborts the pending automated move, if any.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take()
            && !handle.is_finished()
        {
            debug!("Cancelling pending automated move");
            handle.abort();
        }
    }

    /// True while an automated move is waiting to run.
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts a new round, dropping any pending automated move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.cancel_pending();
        let round = {
            let mut table = lock(&self.table);
            table.engine.reset();
            table.engine.round()
        };
        notify(&self.events, SessionEvent::Reset { round });
    }

    /// Switches between single- and two-player play.
    ///
    /// Leaving single-player mode cancels the pending automated move;
    /// entering it on O's turn schedules one.
    #[instrument(skip(self), fields(from = %self.mode))]
    pub fn set_mode(&mut self, mode: PlayMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        info!(to = %mode, "Play mode changed");
        notify(&self.events, SessionEvent::ModeChanged(mode));

        match mode {
            PlayMode::TwoPlayer => self.cancel_pending(),
            PlayMode::SinglePlayer => {
                let computer_due = {
                    let table = lock(&self.table);
                    !table.engine.is_over() && table.engine.to_move() == COMPUTER_MARK
                };
                if computer_due {
                    self.schedule_computer_move();
                }
            }
        }
    }

    /// Current play mode.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Copies out the engine's observable state.
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.table).engine.snapshot()
    }
}

impl<S> Drop for Session<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
