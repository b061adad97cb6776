//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Nothing here is stored: the
//! [`Outcome`] of a position is recomputed whenever it is needed.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Board, Player};

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Outcome {
    /// Moves remain and nobody has three in a row.
    InProgress,
    /// The human completed a line.
    HumanWin,
    /// The AI completed a line.
    AiWin,
    /// Every square is filled and nobody won.
    Draw,
}

impl Outcome {
    /// Outcome for a game won by `player`.
    pub fn won_by(player: Player) -> Self {
        match player {
            Player::Human => Outcome::HumanWin,
            Player::Ai => Outcome::AiWin,
        }
    }

    /// Returns the winner if there is one.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::HumanWin => Some(Player::Human),
            Outcome::AiWin => Some(Player::Ai),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }

    /// True once no further moves may be made.
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Evaluates a board: winner first, then draw, otherwise in progress.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(winner) = check_winner(board) {
        Outcome::won_by(winner)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_top_row() {
        let board: Board = "1,1,1,0,0,0,0,0,0".parse().expect("valid board");
        assert_eq!(evaluate(&board), Outcome::HumanWin);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / O X X / O X O
        let board: Board = "1,-1,1,-1,1,1,-1,1,-1".parse().expect("valid board");
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_square_beats_draw() {
        // X O X / O X O / X O X: full, and X holds both diagonals.
        let board: Board = "1,-1,1,-1,1,-1,1,-1,1".parse().expect("valid board");
        assert_eq!(evaluate(&board), Outcome::HumanWin);
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
        assert!(!Outcome::InProgress.is_terminal());
    }

    #[test]
    fn test_winner_accessor() {
        assert_eq!(Outcome::AiWin.winner(), Some(Player::Ai));
        assert_eq!(Outcome::Draw.winner(), None);
        assert!(Outcome::Draw.is_terminal());
    }
}
