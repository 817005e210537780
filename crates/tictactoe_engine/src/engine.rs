//! The game state machine.
//!
//! `InProgress --(winning move)--> WonBy(mark)`,
//! `InProgress --(board full, no line)--> Draw`,
//! `InProgress --(any other move)--> InProgress` with the turn flipped.
//! Terminal states accept only [`GameEngine::reset`].

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::action::{Move, MoveIgnored, MoveOutcome};
use crate::error::ValidationError;
use crate::invariants::{EngineInvariants, InvariantSet};
use crate::rules::{self, Verdict, WinningLine};
use crate::{Board, Cell, Mark, Position};

/// Current status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are accepted.
    InProgress,
    /// A mark completed a line.
    WonBy(Mark),
    /// The board filled with no line complete.
    Draw,
}

impl GameStatus {
    /// True for `WonBy` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            GameStatus::WonBy(mark) => Some(mark),
            _ => None,
        }
    }
}

/// Wins per mark across rounds. Draws are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreTally {
    x: u32,
    o: u32,
}

impl ScoreTally {
    /// Wins recorded for `mark`.
    pub fn get(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Total wins across both marks.
    pub fn total(&self) -> u32 {
        self.x + self.o
    }

    fn record_win(&mut self, mark: Mark) {
        match mark {
            Mark::X => self.x += 1,
            Mark::O => self.o += 1,
        }
    }
}

/// Everything a renderer needs after a call into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Snapshot {
    board: Board,
    to_move: Mark,
    status: GameStatus,
    score: ScoreTally,
    winning_line: Option<WinningLine>,
    round: u64,
}

/// Owns the board, turn, status, and score of one play session.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    to_move: Mark,
    status: GameStatus,
    score: ScoreTally,
    winning_line: Option<WinningLine>,
    history: Vec<Move>,
    round: u64,
}

impl GameEngine {
    /// Creates an engine with an empty board, X to move, and a zero score.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            status: GameStatus::InProgress,
            score: ScoreTally::default(),
            winning_line: None,
            history: Vec::new(),
            round: 0,
        }
    }

    /// Applies a move at a raw cell index.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `index` is not 0-8. No state changes
    /// in that case.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, index: usize) -> Result<MoveOutcome, ValidationError> {
        let position = Position::try_from(index)?;
        Ok(self.place(position))
    }

    /// Places the current mark at `position` and evaluates the board.
    ///
    /// Preconditions are checked every time this runs: a finished round or
    /// an occupied cell makes the call a no-op reported as
    /// [`MoveOutcome::Ignored`].
    #[instrument(skip(self), fields(mark = %self.to_move, round = self.round))]
    pub fn place(&mut self, position: Position) -> MoveOutcome {
        if self.status.is_terminal() {
            debug!(status = ?self.status, "Ignoring move after game over");
            return MoveOutcome::Ignored(MoveIgnored::GameOver);
        }
        if !self.board.is_empty(position) {
            debug!("Ignoring move on occupied cell");
            return MoveOutcome::Ignored(MoveIgnored::OccupiedCell(position));
        }

        let played = Move::new(self.to_move, position);
        self.board.set(position, Cell::Occupied(played.mark));
        self.history.push(played);
        self.evaluate();

        debug_assert!(
            EngineInvariants::check_all(self).is_ok(),
            "engine invariants violated after {played}"
        );

        MoveOutcome::Applied {
            played,
            status: self.status,
        }
    }

    /// Settles the round after a placed mark: win, draw, or flip the turn.
    fn evaluate(&mut self) {
        match rules::evaluate(&self.board) {
            Verdict::Win { mark, line } => {
                debug_assert_eq!(mark, self.to_move, "only the mover can complete a line");
                self.status = GameStatus::WonBy(self.to_move);
                self.score.record_win(self.to_move);
                self.winning_line = Some(line);
                info!(
                    winner = %self.to_move,
                    line = ?line.indices(),
                    score_x = self.score.get(Mark::X),
                    score_o = self.score.get(Mark::O),
                    "Round won"
                );
            }
            Verdict::Draw => {
                self.status = GameStatus::Draw;
                info!("Round drawn");
            }
            Verdict::Ongoing => {
                self.to_move = self.to_move.opponent();
                debug!(to_move = %self.to_move, "Turn passed");
            }
        }
    }

    /// Starts a new round. The score is kept.
    #[instrument(skip(self), fields(round = self.round))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = Mark::X;
        self.status = GameStatus::InProgress;
        self.winning_line = None;
        self.history.clear();
        self.round += 1;
        info!(new_round = self.round, "Board reset");
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move. After a terminal move this is the mark that ended it.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True once the round is won or drawn.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Wins per mark.
    pub fn score(&self) -> ScoreTally {
        self.score
    }

    /// The line that ended the round, if it was won.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.winning_line
    }

    /// Moves applied this round, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of resets since creation.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Copies out the observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            to_move: self.to_move,
            status: self.status,
            score: self.score,
            winning_line: self.winning_line,
            round: self.round,
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(engine: &mut GameEngine, indices: &[usize]) {
        for &i in indices {
            assert!(engine.apply_move(i).unwrap().is_applied(), "move {i} rejected");
        }
    }

    #[test]
    fn test_new_engine() {
        let engine = GameEngine::new();
        assert_eq!(engine.to_move(), Mark::X);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.score().total(), 0);
        assert_eq!(engine.round(), 0);
    }

    #[test]
    fn test_move_flips_turn() {
        let mut engine = GameEngine::new();
        let outcome = engine.place(Position::Center);
        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                played: Move::new(Mark::X, Position::Center),
                status: GameStatus::InProgress,
            }
        );
        assert_eq!(engine.to_move(), Mark::O);
        assert_eq!(engine.board().get(Position::Center), Cell::Occupied(Mark::X));
    }

    #[test]
    fn test_occupied_cell_is_ignored() {
        let mut engine = GameEngine::new();
        engine.place(Position::TopLeft);
        let before = engine.snapshot();
        let outcome = engine.place(Position::TopLeft);
        assert_eq!(
            outcome,
            MoveOutcome::Ignored(MoveIgnored::OccupiedCell(Position::TopLeft))
        );
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_win_updates_score_once() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 3, 1, 4, 2]);
        assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));
        assert_eq!(engine.score().get(Mark::X), 1);
        assert_eq!(engine.score().get(Mark::O), 0);
        assert_eq!(engine.winning_line().map(|l| l.indices()), Some([0, 1, 2]));
        // Winner stays as the mark to move.
        assert_eq!(engine.to_move(), Mark::X);
    }

    #[test]
    fn test_move_after_win_is_ignored() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 3, 1, 4, 2]);
        let before = engine.snapshot();
        assert_eq!(
            engine.apply_move(8).unwrap(),
            MoveOutcome::Ignored(MoveIgnored::GameOver)
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_win_on_last_cell_is_not_a_draw() {
        let mut engine = GameEngine::new();
        // X O X / O X O / O X X -> X completes the main diagonal last.
        play(&mut engine, &[0, 1, 2, 3, 4, 5, 7, 6, 8]);
        assert!(engine.board().is_full());
        assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));
        assert_eq!(engine.score().get(Mark::X), 1);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut engine = GameEngine::new();
        let err = engine.apply_move(9).unwrap_err();
        assert_eq!(err, ValidationError::new(9));
        assert_eq!(engine.snapshot(), GameEngine::new().snapshot());
    }

    #[test]
    fn test_reset_keeps_score() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 3, 1, 4, 2]);
        engine.reset();
        assert_eq!(engine.board(), &Board::new());
        assert_eq!(engine.to_move(), Mark::X);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.winning_line(), None);
        assert!(engine.history().is_empty());
        assert_eq!(engine.score().get(Mark::X), 1);
        assert_eq!(engine.round(), 1);
    }

    #[test]
    fn test_o_can_win() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 2, 1, 4, 8, 6]);
        assert_eq!(engine.status(), GameStatus::WonBy(Mark::O));
        assert_eq!(engine.score().get(Mark::O), 1);
    }
}
