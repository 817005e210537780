//! Moves and their outcomes.
//!
//! Moves are domain events: the engine records every applied move and
//! reports rejected ones as values instead of errors.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{GameStatus, Mark, Position};

/// A mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Move {
    /// The mark placed.
    pub mark: Mark,
    /// Where it was placed.
    pub position: Position,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Why a move was discarded without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum MoveIgnored {
    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    OccupiedCell(Position),

    /// The round has ended; only a reset is accepted.
    #[display("Game is already over")]
    GameOver,

    /// It is the automated player's turn.
    #[display("It's {}'s turn", _0)]
    NotYourTurn(Mark),
}

/// Result of offering a move to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was placed.
    Applied {
        /// The move as placed.
        played: Move,
        /// Status after evaluation.
        status: GameStatus,
    },
    /// The move was discarded; nothing changed.
    Ignored(MoveIgnored),
}

impl MoveOutcome {
    /// True if the move changed the board.
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }

    /// Status after an applied move.
    pub fn status(&self) -> Option<GameStatus> {
        match self {
            MoveOutcome::Applied { status, .. } => Some(*status),
            MoveOutcome::Ignored(_) => None,
        }
    }
}
