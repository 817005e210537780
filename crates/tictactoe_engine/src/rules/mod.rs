//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. The engine owns the state transitions;
//! these only report what the board shows.

pub mod win;

pub use win::{WinningLine, find_winning_line};

use crate::{Board, Mark};

/// What the board shows after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A line is complete.
    Win {
        /// Mark filling the line.
        mark: Mark,
        /// First completed line in evaluation order.
        line: WinningLine,
    },
    /// Board full, no line complete.
    Draw,
    /// Empty cells remain and no line is complete.
    Ongoing,
}

/// Evaluates the board: lines first, then fullness.
pub fn evaluate(board: &Board) -> Verdict {
    if let Some((mark, line)) = find_winning_line(board) {
        Verdict::Win { mark, line }
    } else if board.is_full() {
        Verdict::Draw
    } else {
        Verdict::Ongoing
    }
}
