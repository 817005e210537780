//! Invariants over engine state.
//!
//! Checked after every applied move in debug builds, and exercised
//! directly by the property tests.

use crate::rules::{self, Verdict};
use crate::{Board, Cell, GameEngine, GameStatus, Mark};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: &'static str,
}

impl InvariantViolation {
    /// Creates a violation for the given description.
    pub fn new(description: &'static str) -> Self {
        Self { description }
    }
}

/// Several invariants checked together. Implemented for tuples.
pub trait InvariantSet<S> {
    /// Checks every invariant, collecting all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        collect(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        collect(violations)
    }
}

/// Marks alternate X, O, X, ... and the mark to move matches the history.
pub struct AlternatingTurn;

impl Invariant<GameEngine> for AlternatingTurn {
    fn holds(engine: &GameEngine) -> bool {
        let history = engine.history();
        let alternates = history
            .iter()
            .enumerate()
            .all(|(i, m)| m.mark == if i % 2 == 0 { Mark::X } else { Mark::O });
        if !alternates {
            return false;
        }

        let expected = match (engine.status(), history.last()) {
            (GameStatus::InProgress, _) if history.len() % 2 == 0 => Mark::X,
            (GameStatus::InProgress, _) => Mark::O,
            (_, Some(last)) => last.mark,
            (_, None) => return false,
        };
        engine.to_move() == expected
    }

    fn description() -> &'static str {
        "Marks alternate starting with X"
    }
}

/// Replaying the history onto an empty board reproduces the board.
pub struct MonotonicBoard;

impl Invariant<GameEngine> for MonotonicBoard {
    fn holds(engine: &GameEngine) -> bool {
        let mut replayed = Board::new();
        for m in engine.history() {
            if !replayed.is_empty(m.position) {
                return false;
            }
            replayed.set(m.position, Cell::Occupied(m.mark));
        }
        replayed == *engine.board()
    }

    fn description() -> &'static str {
        "Cells are never overwritten"
    }
}

/// The stored status agrees with what the board shows.
pub struct StatusMatchesBoard;

impl Invariant<GameEngine> for StatusMatchesBoard {
    fn holds(engine: &GameEngine) -> bool {
        match (engine.status(), rules::evaluate(engine.board())) {
            (GameStatus::InProgress, Verdict::Ongoing) => true,
            (GameStatus::Draw, Verdict::Draw) => true,
            (GameStatus::WonBy(winner), Verdict::Win { mark, .. }) => winner == mark,
            _ => false,
        }
    }

    fn description() -> &'static str {
        "Status matches the board"
    }
}

/// Everything checked after each applied move.
pub type EngineInvariants = (AlternatingTurn, MonotonicBoard, StatusMatchesBoard);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_fresh_engine_holds() {
        let engine = GameEngine::new();
        assert_eq!(EngineInvariants::check_all(&engine), Ok(()));
    }

    #[test]
    fn test_holds_through_a_won_round() {
        let mut engine = GameEngine::new();
        for pos in [
            Position::TopLeft,
            Position::Center,
            Position::TopCenter,
            Position::BottomLeft,
            Position::TopRight,
        ] {
            engine.place(pos);
            assert_eq!(EngineInvariants::check_all(&engine), Ok(()));
        }
        assert!(engine.is_over());
    }

    #[test]
    fn test_two_invariant_set() {
        let engine = GameEngine::new();
        assert!(<(AlternatingTurn, MonotonicBoard)>::check_all(&engine).is_ok());
    }

    #[test]
    fn test_violation_display() {
        let violation = InvariantViolation::new(MonotonicBoard::description());
        assert_eq!(
            violation.to_string(),
            "Invariant violated: Cells are never overwritten"
        );
    }
}
