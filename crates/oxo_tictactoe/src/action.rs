//! Events fed into the controller and effects it asks the caller to run.

use serde::{Deserialize, Serialize};

use crate::{Board, Position};

/// Identifies one AI move request.
///
/// Tickets increase monotonically for the lifetime of a [`GameState`]
/// (reset included), so a response carrying an old ticket can always be
/// told apart from the one currently awaited.
///
/// [`GameState`]: crate::GameState
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("#{}", _0)]
pub struct Ticket(pub u64);

/// Why the AI's chosen cell was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum PredictionDefect {
    /// Not an index in 0-8.
    #[display("out of range")]
    OutOfRange,
    /// The cell already holds a mark.
    #[display("already occupied")]
    Occupied,
}

/// Ways an AI move request can fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum AiFailure {
    /// The request could not complete (transport error, non-2xx, timeout).
    #[display("network failure: {}", message)]
    NetworkFailure {
        /// Human-readable cause.
        message: String,
    },

    /// The service answered, but not with `{"prediction": <integer>}`.
    #[display("malformed response: {}", message)]
    MalformedResponse {
        /// Human-readable cause.
        message: String,
    },

    /// The service picked a cell that cannot be played.
    #[display("invalid prediction {}: {}", prediction, defect)]
    InvalidPrediction {
        /// The cell index the service returned.
        prediction: i64,
        /// What is wrong with it.
        defect: PredictionDefect,
    },
}

/// Input to [`GameState::apply`](crate::GameState::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The human selected a cell.
    HumanMove(Position),
    /// The AI request identified by `ticket` completed.
    AiResponded {
        /// Ticket of the request this answers.
        ticket: Ticket,
        /// The chosen cell index, unvalidated, or the failure.
        result: Result<i64, AiFailure>,
    },
    /// Re-issue the AI request after a failure.
    Retry,
    /// Start a new game.
    Reset,
    /// Display an earlier (or later) snapshot from history.
    JumpTo(usize),
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the AI to choose a cell on `board`, answering with `ticket`.
    RequestAi {
        /// Ticket the answer must carry.
        ticket: Ticket,
        /// Board the AI moves on.
        board: Board,
    },
    /// Abandon the outstanding request.
    CancelAi {
        /// Ticket of the abandoned request.
        ticket: Ticket,
    },
}

/// Reason an event left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Ignored {
    /// A human move arrived while it was not the human's turn.
    #[display("not the human's turn")]
    NotHumanTurn,
    /// A human move targeted a filled cell.
    #[display("{} is already occupied", _0)]
    SquareOccupied(Position),
    /// An AI answer arrived for a request that is no longer awaited.
    #[display("stale response {}", _0)]
    StaleResponse(Ticket),
    /// Retry was requested while nothing had failed.
    #[display("nothing to retry")]
    NothingToRetry,
    /// History travel was requested while the AI was thinking.
    #[display("AI is thinking")]
    AwaitingAi,
    /// History travel targeted an index past the end of history.
    #[display("no move {}", _0)]
    NoSuchMove(usize),
}
