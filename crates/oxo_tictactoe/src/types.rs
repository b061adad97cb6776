//! Core domain types for tic-tac-toe.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::Position;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// The person at the keyboard. Plays X and always opens.
    Human,
    /// The remote prediction service. Plays O.
    #[strum(to_string = "AI")]
    Ai,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
        }
    }

    /// Mark drawn on the board for this player.
    pub fn symbol(self) -> char {
        match self {
            Player::Human => 'X',
            Player::Ai => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Integer used for this square by the prediction service.
    ///
    /// Human is `1`, AI is `-1`, empty is `0`.
    pub fn wire_value(self) -> i8 {
        match self {
            Square::Empty => 0,
            Square::Occupied(Player::Human) => 1,
            Square::Occupied(Player::Ai) => -1,
        }
    }

    /// Inverse of [`Square::wire_value`].
    pub fn from_wire_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Square::Empty),
            1 => Some(Square::Occupied(Player::Human)),
            -1 => Some(Square::Occupied(Player::Ai)),
            _ => None,
        }
    }
}

/// Error produced when a board cannot be built from external input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// The input did not contain exactly nine cells.
    #[display("Expected 9 cells, found {}", _0)]
    WrongLength(#[error(not(source))] usize),

    /// A cell value was not one of -1, 0 or 1.
    #[display("Cell {} has invalid value {:?} (expected -1, 0 or 1)", index, value)]
    InvalidCell {
        /// Zero-based cell index.
        index: usize,
        /// The offending text.
        value: String,
    },

    /// The mark counts cannot arise when the human opens and turns alternate.
    #[display("Impossible position: {} X against {} O", human, ai)]
    ImpossibleCounts {
        /// Number of human marks.
        human: usize,
        /// Number of AI marks.
        ai: usize,
    },
}

/// 3x3 tic-tac-toe board.
///
/// Boards are values: [`Board::with`] returns an updated copy and leaves
/// the original untouched, so history snapshots can never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from its squares in row-major order.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Builds a board from the prediction service's integer encoding.
    #[instrument]
    pub fn from_wire(cells: &[i64]) -> Result<Self, BoardError> {
        if cells.len() != 9 {
            return Err(BoardError::WrongLength(cells.len()));
        }
        let mut squares = [Square::Empty; 9];
        for (index, (slot, value)) in squares.iter_mut().zip(cells).enumerate() {
            *slot = Square::from_wire_value(*value).ok_or_else(|| BoardError::InvalidCell {
                index,
                value: value.to_string(),
            })?;
        }
        Ok(Self { squares })
    }

    /// Encodes the board the way the prediction service expects it.
    pub fn to_wire(&self) -> [i8; 9] {
        self.squares.map(Square::wire_value)
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Returns a copy of this board with `player` placed at `pos`.
    pub fn with(mut self, pos: Position, player: Player) -> Self {
        self.squares[pos.to_index()] = Square::Occupied(player);
        self
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of squares occupied by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 1-based key so the text doubles as a
    /// keypad legend.
    pub fn display(&self) -> String {
        let rows: Vec<String> = self
            .squares
            .chunks(3)
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, square)| match square {
                        Square::Empty => (row * 3 + col + 1).to_string(),
                        Square::Occupied(player) => player.symbol().to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        rows.join("\n-+-+-\n")
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parses nine comma- or whitespace-separated integers, e.g.
    /// `"0,0,0,0,1,0,0,0,-1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() != 9 {
            return Err(BoardError::WrongLength(tokens.len()));
        }
        let mut cells = Vec::with_capacity(9);
        for (index, token) in tokens.iter().enumerate() {
            let value = token.parse::<i64>().map_err(|_| BoardError::InvalidCell {
                index,
                value: (*token).to_string(),
            })?;
            cells.push(value);
        }
        Self::from_wire(&cells)
    }
}
