//! oxo - tic-tac-toe in the terminal against a remote AI.
//!
//! The human plays X and always opens. After each human move the board is
//! POSTed to a prediction service, which answers with the cell O takes.
//!
//! # Architecture
//!
//! - **Rules / controller**: [`oxo_tictactoe`], pure and synchronous
//! - **AI client**: [`HttpPredictor`] behind the [`MovePredictor`] trait
//! - **Driver**: [`GameDriver`] runs controller effects on tokio
//! - **TUI**: [`tui`] renders the board and turns input into events
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use oxo::{Event, GameDriver, HttpPredictor, Position, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let predictor = Arc::new(HttpPredictor::new(settings.endpoint().clone()));
//! let mut driver = GameDriver::new(predictor, settings.timeout());
//! driver.dispatch(Event::HumanMove(Position::Center));
//! driver.next_response().await;
//! println!("{}", driver.state().board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ai_client;
mod config;
mod driver;
pub mod tui;

// Crate-level exports - AI client
pub use ai_client::{
    AiClientError, AiClientErrorKind, HttpPredictor, MovePredictor, PredictRequest, PredictResponse,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, ENDPOINT_VAR, Settings, TIMEOUT_VAR};

// Crate-level exports - Driver
pub use driver::GameDriver;

// Crate-level exports - Game types
pub use oxo_tictactoe::{
    AiFailure, Board, BoardError, Effect, Event, GameState, Ignored, Outcome, Phase, Player,
    Position, PredictionDefect, Snapshot, Square, Step, Ticket, evaluate,
};
