//! Application state for the terminal front end.

use tictactoe_engine::{GameStatus, Position, Snapshot};
use tracing::debug;

use crate::config::PlayMode;
use crate::session::{COMPUTER_MARK, SessionEvent};

/// What the screen shows, refreshed from the session after every input
/// and every session event.
#[derive(Debug, Clone)]
pub struct App {
    cursor: Position,
    snapshot: Snapshot,
    mode: PlayMode,
    notice: Option<String>,
}

impl App {
    /// Creates the view for a session.
    pub fn new(snapshot: Snapshot, mode: PlayMode) -> Self {
        Self {
            cursor: Position::Center,
            snapshot,
            mode,
            notice: None,
        }
    }

    /// Replaces the displayed state.
    pub fn refresh(&mut self, snapshot: Snapshot, mode: PlayMode) {
        self.snapshot = snapshot;
        self.mode = mode;
    }

    /// Turns a session event into a one-line notice.
    pub fn handle_event(&mut self, event: &SessionEvent) {
        debug!(?event, "Handling session event");
        self.notice = match event {
            SessionEvent::MoveApplied {
                played,
                automated: true,
                ..
            } => Some(format!("Computer played {}", played.position.label())),
            SessionEvent::MoveApplied { .. } => None,
            SessionEvent::Reset { round } => Some(format!("Round {} started", round + 1)),
            SessionEvent::ModeChanged(mode) => Some(format!("Mode: {}", mode.label())),
        };
    }

    /// Shows a one-line notice under the status.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Clears the notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Moves the cursor.
    pub fn set_cursor(&mut self, cursor: Position) {
        self.cursor = cursor;
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Displayed engine state.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Displayed play mode.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Current notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The status line: whose turn, who won, or a draw.
    pub fn status_line(&self) -> String {
        match self.snapshot.status() {
            GameStatus::WonBy(mark) => format!("Player {} wins!", mark),
            GameStatus::Draw => "It's a draw!".to_string(),
            GameStatus::InProgress
                if self.mode == PlayMode::SinglePlayer
                    && *self.snapshot.to_move() == COMPUTER_MARK =>
            {
                format!("Computer ({}) is thinking...", COMPUTER_MARK)
            }
            GameStatus::InProgress => format!("It's {}'s turn", self.snapshot.to_move()),
        }
    }
}
