//! Turn controller for a human playing against a remote AI.
//!
//! [`GameState`] is an immutable value moved through [`GameState::apply`].
//! Whose turn it is lives in an explicit [`Phase`] and in every
//! [`Snapshot`], never in the parity of the move index, so truncating or
//! branching history cannot desynchronise it.

use tracing::{debug, info, instrument, warn};

use crate::action::{AiFailure, Effect, Event, Ignored, PredictionDefect, Ticket};
use crate::rules::{Outcome, evaluate};
use crate::{Board, BoardError, Player, Position};

/// One entry in the game timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    board: Board,
    to_move: Player,
}

impl Snapshot {
    /// The board at this point.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Who moves next from this board.
    pub fn to_move(&self) -> Player {
        self.to_move
    }
}

/// Where the controller is in the turn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the human to pick a cell.
    HumanTurn,
    /// An AI request with this ticket is outstanding. Human input is blocked.
    AwaitingAi(Ticket),
    /// The displayed board is won or drawn. Never holds `InProgress`.
    Finished(Outcome),
    /// The AI request failed. The human may retry or reset.
    Failed {
        /// Ticket of the failed request.
        ticket: Ticket,
        /// What went wrong.
        failure: AiFailure,
    },
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// State after the event.
    pub state: GameState,
    /// Work the caller must carry out, if any.
    pub effect: Option<Effect>,
    /// Set when the event was refused and `state` is unchanged.
    pub ignored: Option<Ignored>,
}

impl Step {
    fn to(state: GameState) -> Self {
        Self {
            state,
            effect: None,
            ignored: None,
        }
    }

    fn with_effect(state: GameState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
            ignored: None,
        }
    }

    fn ignore(state: GameState, reason: Ignored) -> Self {
        debug!(%reason, "Event ignored");
        Self {
            state,
            effect: None,
            ignored: Some(reason),
        }
    }
}

/// Complete controller state.
///
/// Invariants: `history` is never empty, its first entry is the empty
/// board with the human to move, and `move_index < history.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    history: Vec<Snapshot>,
    move_index: usize,
    phase: Phase,
    next_ticket: u64,
}

impl GameState {
    /// Creates a new game with the human to move.
    pub fn new() -> Self {
        Self {
            history: vec![Snapshot {
                board: Board::new(),
                to_move: Player::Human,
            }],
            move_index: 0,
            phase: Phase::HumanTurn,
            next_ticket: 0,
        }
    }

    /// Starts from an arbitrary position reached by alternating play.
    ///
    /// History becomes the empty board followed by `board`. The player to
    /// move follows from the mark counts, and when it is the AI's turn the
    /// returned step carries the request.
    #[instrument]
    pub fn resume(board: Board) -> Result<Step, BoardError> {
        let (human, ai) = (board.count(Player::Human), board.count(Player::Ai));
        let to_move = match human.checked_sub(ai) {
            Some(0) => Player::Human,
            Some(1) => Player::Ai,
            _ => return Err(BoardError::ImpossibleCounts { human, ai }),
        };
        let mut state = Self::new();
        if board != Board::new() {
            state.push(board, to_move);
        }
        Ok(state.settle())
    }

    /// The currently displayed board.
    pub fn board(&self) -> &Board {
        &self.history[self.move_index].board
    }

    /// Full timeline, oldest first.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Index of the displayed snapshot in [`GameState::history`].
    pub fn move_index(&self) -> usize {
        self.move_index
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Who moves next from the displayed board.
    pub fn to_move(&self) -> Player {
        self.history[self.move_index].to_move
    }

    /// Outcome of the displayed board, recomputed on every call.
    pub fn outcome(&self) -> Outcome {
        evaluate(self.board())
    }

    /// True exactly while an AI request is outstanding.
    pub fn is_thinking(&self) -> bool {
        matches!(self.phase, Phase::AwaitingAi(_))
    }

    /// Nearest earlier snapshot to show when stepping back through history.
    ///
    /// Positions where the AI is about to move are skipped, so stepping
    /// through history never sends a request that would rewrite it.
    pub fn previous_turn(&self) -> Option<usize> {
        (0..self.move_index).rev().find(|&index| self.is_turn_stop(index))
    }

    /// Nearest later snapshot to show when stepping forward through history.
    ///
    /// The latest snapshot is always reachable, whoever is to move there.
    pub fn next_turn(&self) -> Option<usize> {
        (self.move_index + 1..self.history.len()).find(|&index| self.is_turn_stop(index))
    }

    fn is_turn_stop(&self, index: usize) -> bool {
        let snapshot = &self.history[index];
        snapshot.to_move == Player::Human
            || evaluate(&snapshot.board).is_terminal()
            || index + 1 == self.history.len()
    }

    /// Applies an event, returning the next state and any effect to run.
    #[instrument(skip(self), fields(move_index = self.move_index, phase = ?self.phase))]
    pub fn apply(self, event: Event) -> Step {
        match event {
            Event::HumanMove(pos) => self.human_move(pos),
            Event::AiResponded { ticket, result } => self.ai_responded(ticket, result),
            Event::Retry => self.retry(),
            Event::Reset => self.reset(),
            Event::JumpTo(index) => self.jump_to(index),
        }
    }

    fn human_move(self, pos: Position) -> Step {
        if self.phase != Phase::HumanTurn {
            return Step::ignore(self, Ignored::NotHumanTurn);
        }
        if !self.board().is_empty(pos) {
            return Step::ignore(self, Ignored::SquareOccupied(pos));
        }

        info!(position = %pos, "Human move");
        let board = self.board().with(pos, Player::Human);
        let mut next = self;
        next.push(board, Player::Ai);
        next.settle()
    }

    fn ai_responded(self, ticket: Ticket, result: Result<i64, AiFailure>) -> Step {
        if self.phase != Phase::AwaitingAi(ticket) {
            return Step::ignore(self, Ignored::StaleResponse(ticket));
        }

        let prediction = match result {
            Ok(prediction) => prediction,
            Err(failure) => return self.fail(ticket, failure),
        };

        let Some(pos) = usize::try_from(prediction)
            .ok()
            .and_then(Position::from_index)
        else {
            return self.fail(
                ticket,
                AiFailure::InvalidPrediction {
                    prediction,
                    defect: PredictionDefect::OutOfRange,
                },
            );
        };

        if !self.board().is_empty(pos) {
            return self.fail(
                ticket,
                AiFailure::InvalidPrediction {
                    prediction,
                    defect: PredictionDefect::Occupied,
                },
            );
        }

        info!(position = %pos, %ticket, "AI move");
        let board = self.board().with(pos, Player::Ai);
        let mut next = self;
        next.push(board, Player::Human);
        next.settle()
    }

    fn fail(mut self, ticket: Ticket, failure: AiFailure) -> Step {
        warn!(%ticket, %failure, "AI move failed");
        self.phase = Phase::Failed { ticket, failure };
        Step::to(self)
    }

    fn retry(mut self) -> Step {
        if !matches!(self.phase, Phase::Failed { .. }) {
            return Step::ignore(self, Ignored::NothingToRetry);
        }
        info!("Retrying AI move");
        let ticket = self.issue_ticket();
        self.phase = Phase::AwaitingAi(ticket);
        let board = *self.board();
        Step::with_effect(self, Effect::RequestAi { ticket, board })
    }

    fn reset(self) -> Step {
        info!("Resetting game");
        let cancel = match self.phase {
            Phase::AwaitingAi(ticket) => Some(Effect::CancelAi { ticket }),
            _ => None,
        };
        let fresh = Self {
            next_ticket: self.next_ticket,
            ..Self::new()
        };
        Step {
            state: fresh,
            effect: cancel,
            ignored: None,
        }
    }

    fn jump_to(mut self, index: usize) -> Step {
        if self.is_thinking() {
            return Step::ignore(self, Ignored::AwaitingAi);
        }
        if index >= self.history.len() {
            return Step::ignore(self, Ignored::NoSuchMove(index));
        }
        debug!(index, "Jumping through history");
        self.move_index = index;
        self.settle()
    }

    /// Appends a snapshot after the displayed one, dropping any forward
    /// history first.
    fn push(&mut self, board: Board, to_move: Player) {
        self.history.truncate(self.move_index + 1);
        self.history.push(Snapshot { board, to_move });
        self.move_index = self.history.len() - 1;
    }

    /// Derives the phase from the displayed snapshot, issuing an AI
    /// request when the AI is to move.
    fn settle(mut self) -> Step {
        let outcome = self.outcome();
        if outcome.is_terminal() {
            info!(%outcome, "Game over");
            self.phase = Phase::Finished(outcome);
            return Step::to(self);
        }
        match self.to_move() {
            Player::Human => {
                self.phase = Phase::HumanTurn;
                Step::to(self)
            }
            Player::Ai => {
                let ticket = self.issue_ticket();
                self.phase = Phase::AwaitingAi(ticket);
                let board = *self.board();
                debug!(%ticket, "Requesting AI move");
                Step::with_effect(self, Effect::RequestAi { ticket, board })
            }
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
