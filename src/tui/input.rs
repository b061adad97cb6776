//! Keyboard mapping.

use crossterm::event::KeyCode;
use oxo_tictactoe::Position;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play the given cell.
    Play(Position),
    /// Play the cell under the cursor.
    PlayCursor,
    /// Move the cursor one cell.
    Cursor(KeyCode),
    /// Step one snapshot back in history.
    Back,
    /// Step one snapshot forward in history.
    Forward,
    /// Re-issue a failed AI request.
    Retry,
    /// Start a new game.
    Reset,
    /// Leave the app.
    Quit,
}

/// Maps a key to a command. Digits 1-9 address cells like a phone keypad
/// read left to right, top to bottom.
pub fn command_for(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .and_then(|d| Position::from_index(d as usize - 1))
            .map(Command::Play),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::PlayCursor),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => Some(Command::Cursor(key)),
        KeyCode::Char('[') => Some(Command::Back),
        KeyCode::Char(']') => Some(Command::Forward),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Command::Retry),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Moves cursor based on arrow keys, stopping at the board edge.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_row_col(row, col).unwrap_or(cursor)
}
