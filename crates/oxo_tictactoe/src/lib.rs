//! Pure tic-tac-toe logic for a human playing against a remote AI.
//!
//! Nothing in this crate performs I/O. The controller is a reducer:
//! [`GameState::apply`] consumes the current state and an [`Event`] and
//! returns a [`Step`] holding the next state plus an optional [`Effect`]
//! the caller must carry out (ask the AI for a move, or cancel the
//! outstanding request).
//!
//! # Example
//!
//! ```
//! use oxo_tictactoe::{Effect, Event, GameState, Outcome, Phase, Position};
//!
//! let step = GameState::new().apply(Event::HumanMove(Position::Center));
//! assert_eq!(step.state.move_index(), 1);
//! assert_eq!(step.state.outcome(), Outcome::InProgress);
//! assert!(matches!(step.state.phase(), Phase::AwaitingAi(_)));
//! assert!(matches!(step.effect, Some(Effect::RequestAi { .. })));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod position;
pub mod rules;
mod types;

pub use action::{AiFailure, Effect, Event, Ignored, PredictionDefect, Ticket};
pub use game::{GameState, Phase, Snapshot, Step};
pub use position::Position;
pub use rules::{Outcome, evaluate};
pub use types::{Board, BoardError, Player, Square};
