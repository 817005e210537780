//! Tic-tac-toe game logic.
//!
//! # Architecture
//!
//! - **Engine**: [`GameEngine`] owns the board, the mark to move, the round
//!   status, and the score. Moves are applied and evaluated in one step.
//! - **Rules**: pure board queries (winning lines, full board, verdict).
//! - **Selector**: [`MoveSelector`] picks the automated player's cell;
//!   [`RandomSelector`] draws uniformly from the empty ones.
//! - **Invariants**: properties re-checked after every move in debug builds.
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{GameEngine, GameStatus, Mark};
//!
//! let mut engine = GameEngine::new();
//! for index in [0, 1, 4, 2, 8] {
//!     engine.apply_move(index)?;
//! }
//! assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));
//! assert_eq!(engine.score().get(Mark::X), 1);
//! # Ok::<(), tictactoe_engine::ValidationError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod error;
mod position;
mod selector;
mod types;

pub mod invariants;
pub mod rules;

pub use action::{Move, MoveIgnored, MoveOutcome};
pub use engine::{GameEngine, GameStatus, ScoreTally, Snapshot};
pub use error::ValidationError;
pub use position::Position;
pub use rules::{Verdict, WinningLine};
pub use selector::{MoveSelector, RandomSelector};
pub use types::{Board, Cell, Mark};
