//! Keyboard mapping.

use crossterm::event::KeyCode;
use tictactoe_engine::Position;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Play the cell with this index.
    Place(usize),
    /// Play the cell under the cursor.
    PlaceAtCursor,
    /// Move the cursor one cell.
    Cursor(KeyCode),
    /// Start a new round.
    Reset,
    /// Switch between single- and two-player.
    ToggleMode,
    /// Leave the game.
    Quit,
}

/// Maps a key to an action. Digits 1-9 address cells in reading order.
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Action::Place(d as usize - 1)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::PlaceAtCursor),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => Some(Action::Cursor(key)),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('m') => Some(Action::ToggleMode),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Moves cursor based on arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let target = match key {
        KeyCode::Up => Position::from_row_col(row.wrapping_sub(1), col),
        KeyCode::Down => Position::from_row_col(row + 1, col),
        KeyCode::Left => Position::from_row_col(row, col.wrapping_sub(1)),
        KeyCode::Right => Position::from_row_col(row, col + 1),
        _ => None,
    };
    target.unwrap_or(cursor)
}
