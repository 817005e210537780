//! Automated move selection for single-player mode.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{Board, Position};

/// Picks a move for the automated player.
pub trait MoveSelector {
    /// Returns an empty position to play, or `None` if the board is full.
    ///
    /// Callers must not offer a move to the engine when this returns `None`.
    fn select_move(&mut self, board: &Board) -> Option<Position>;
}

/// Plays a uniformly random empty cell. No look-ahead.
#[derive(Debug, Clone)]
pub struct RandomSelector<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    /// Wraps the given random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSelector<ChaCha8Rng> {
    /// Deterministic selector for tests and reproducible sessions.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Selector seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> MoveSelector for RandomSelector<R> {
    #[instrument(skip_all)]
    fn select_move(&mut self, board: &Board) -> Option<Position> {
        let available = board.empty_positions();
        if available.is_empty() {
            debug!("No empty cells to choose from");
            return None;
        }
        let chosen = available[self.rng.gen_range(0..available.len())];
        debug!(position = %chosen, candidates = available.len(), "Selected move");
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Mark};

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new();
        for pos in Position::ALL {
            board.set(pos, Cell::Occupied(Mark::X));
        }
        assert_eq!(RandomSelector::seeded(7).select_move(&board), None);
    }

    #[test]
    fn test_single_empty_cell_is_chosen() {
        let mut board = Board::new();
        for pos in Position::ALL {
            if pos != Position::BottomCenter {
                board.set(pos, Cell::Occupied(Mark::O));
            }
        }
        let mut selector = RandomSelector::seeded(99);
        for _ in 0..10 {
            assert_eq!(selector.select_move(&board), Some(Position::BottomCenter));
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let board = Board::new();
        let mut a = RandomSelector::seeded(42);
        let mut b = RandomSelector::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.select_move(&board), b.select_move(&board));
        }
    }

    #[test]
    fn test_every_empty_cell_is_reachable() {
        let mut board = Board::new();
        board.set(Position::Center, Cell::Occupied(Mark::X));
        let mut selector = RandomSelector::seeded(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let pos = selector.select_move(&board).unwrap();
            assert_ne!(pos, Position::Center);
            seen.insert(pos);
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_choices_are_uniform_over_empty_cells() {
        let board = Board::new();
        let mut selector = RandomSelector::seeded(2024);
        let mut counts = [0usize; 9];
        for _ in 0..9000 {
            let pos = selector.select_move(&board).unwrap();
            counts[pos.to_index()] += 1;
        }
        // Expected 1000 per cell; the band is several standard deviations wide.
        assert!(
            counts.iter().all(|n| (800..1200).contains(n)),
            "counts = {counts:?}"
        );
    }

    #[test]
    fn test_choices_are_uniform_on_partial_board() {
        let mut board = Board::new();
        for pos in [Position::TopLeft, Position::Center, Position::BottomRight] {
            board.set(pos, Cell::Occupied(Mark::X));
        }
        let mut selector = RandomSelector::seeded(77);
        let mut counts = [0usize; 9];
        for _ in 0..6000 {
            let pos = selector.select_move(&board).unwrap();
            counts[pos.to_index()] += 1;
        }
        for pos in Position::ALL {
            let n = counts[pos.to_index()];
            if board.is_empty(pos) {
                assert!((800..1200).contains(&n), "{pos}: {n} in {counts:?}");
            } else {
                assert_eq!(n, 0);
            }
        }
    }
}
