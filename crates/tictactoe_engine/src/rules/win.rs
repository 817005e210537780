//! Win detection.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Board, Cell, Mark, Position};

/// Three positions that win when they hold the same mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine([Position; 3]);

impl WinningLine {
    /// The eight lines, in evaluation order.
    pub const ALL: [WinningLine; 8] = [
        // Rows
        WinningLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
        WinningLine([Position::MiddleLeft, Position::Center, Position::MiddleRight]),
        WinningLine([Position::BottomLeft, Position::BottomCenter, Position::BottomRight]),
        // Columns
        WinningLine([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft]),
        WinningLine([Position::TopCenter, Position::Center, Position::BottomCenter]),
        WinningLine([Position::TopRight, Position::MiddleRight, Position::BottomRight]),
        // Diagonals
        WinningLine([Position::TopLeft, Position::Center, Position::BottomRight]),
        WinningLine([Position::TopRight, Position::Center, Position::BottomLeft]),
    ];

    /// Board indices of this line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Checks whether the line passes through `pos`.
    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Returns the mark filling all three cells, if any.
    pub fn owner(&self, board: &Board) -> Option<Mark> {
        let [a, b, c] = self.0;
        let cell = board.get(a);
        if cell != Cell::Empty && cell == board.get(b) && cell == board.get(c) {
            cell.mark()
        } else {
            None
        }
    }
}

/// Finds the first completed line in evaluation order.
#[instrument(skip(board))]
pub fn find_winning_line(board: &Board) -> Option<(Mark, WinningLine)> {
    WinningLine::ALL
        .iter()
        .find_map(|line| line.owner(board).map(|mark| (mark, *line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(find_winning_line(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Cell::Occupied(Mark::X));
        board.set(Position::TopCenter, Cell::Occupied(Mark::X));
        board.set(Position::TopRight, Cell::Occupied(Mark::X));
        assert_eq!(find_winning_line(&board).map(|(mark, _)| mark), Some(Mark::X));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let mut board = Board::new();
        board.set(Position::TopRight, Cell::Occupied(Mark::O));
        board.set(Position::Center, Cell::Occupied(Mark::O));
        board.set(Position::BottomLeft, Cell::Occupied(Mark::O));
        let (mark, line) = find_winning_line(&board).unwrap();
        assert_eq!(mark, Mark::O);
        assert_eq!(line.indices(), [2, 4, 6]);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Cell::Occupied(Mark::X));
        board.set(Position::TopCenter, Cell::Occupied(Mark::O));
        board.set(Position::TopRight, Cell::Occupied(Mark::X));
        assert_eq!(find_winning_line(&board), None);
    }

    #[test]
    fn test_first_line_in_order_is_reported() {
        // X holds both the top row and the left column.
        let mut board = Board::new();
        for pos in [
            Position::TopLeft,
            Position::TopCenter,
            Position::TopRight,
            Position::MiddleLeft,
            Position::BottomLeft,
        ] {
            board.set(pos, Cell::Occupied(Mark::X));
        }
        let (_, line) = find_winning_line(&board).unwrap();
        assert_eq!(line.indices(), [0, 1, 2]);
    }

    #[test]
    fn test_lines_cover_rows_columns_diagonals() {
        let center_lines = WinningLine::ALL
            .iter()
            .filter(|l| l.contains(Position::Center))
            .count();
        let corner_lines = WinningLine::ALL
            .iter()
            .filter(|l| l.contains(Position::TopLeft))
            .count();
        assert_eq!(center_lines, 4);
        assert_eq!(corner_lines, 3);
    }
}
