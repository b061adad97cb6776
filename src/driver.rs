//! Async shell around the pure game controller.
//!
//! The driver owns the [`GameState`], feeds it events, and carries out the
//! effects it returns: spawning the AI request as a tokio task and
//! aborting it when the game is reset.

use std::sync::Arc;
use std::time::Duration;

use oxo_tictactoe::{AiFailure, Board, BoardError, Effect, Event, GameState, Ignored, Ticket};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::ai_client::MovePredictor;

struct InFlight {
    ticket: Ticket,
    task: JoinHandle<()>,
}

/// Runs a game against a [`MovePredictor`].
pub struct GameDriver {
    state: GameState,
    predictor: Arc<dyn MovePredictor>,
    timeout: Duration,
    in_flight: Option<InFlight>,
    responses_tx: mpsc::UnboundedSender<Event>,
    responses_rx: mpsc::UnboundedReceiver<Event>,
}

impl GameDriver {
    /// Creates a driver for a fresh game. AI requests that take longer than
    /// `timeout` are reported as network failures.
    #[instrument(skip(predictor))]
    pub fn new(predictor: Arc<dyn MovePredictor>, timeout: Duration) -> Self {
        info!("Creating game driver");
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        Self {
            state: GameState::new(),
            predictor,
            timeout,
            in_flight: None,
            responses_tx,
            responses_rx,
        }
    }

    /// Creates a driver positioned at `board`, requesting the AI's move
    /// straight away when it is the AI's turn.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(predictor))]
    pub fn resume(
        predictor: Arc<dyn MovePredictor>,
        timeout: Duration,
        board: Board,
    ) -> Result<Self, BoardError> {
        let step = GameState::resume(board)?;
        let mut driver = Self::new(predictor, timeout);
        driver.state = step.state;
        if let Some(effect) = step.effect {
            driver.execute(effect);
        }
        Ok(driver)
    }

    /// Current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// True while a spawned AI request has not reported back.
    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Applies an event and runs the resulting effect.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, event: Event) -> Option<Ignored> {
        if let Event::AiResponded { ticket, .. } = &event
            && self.in_flight.as_ref().is_some_and(|f| f.ticket == *ticket)
        {
            self.in_flight = None;
        }

        let step = std::mem::take(&mut self.state).apply(event);
        if let Some(effect) = step.effect {
            self.execute(effect);
        }
        self.state = step.state;
        step.ignored
    }

    /// Applies every AI response that has already arrived. Never blocks.
    ///
    /// Returns how many of them changed the game; stale replies are
    /// consumed but not counted.
    pub fn drain_responses(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.responses_rx.try_recv() {
            if self.dispatch(event).is_none() {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next AI response that the game accepts and applies it.
    ///
    /// Stale replies are skipped. Returns `false` once nothing is queued and
    /// no request is in flight.
    pub async fn next_response(&mut self) -> bool {
        loop {
            let event = match self.responses_rx.try_recv() {
                Ok(event) => event,
                Err(_) if self.in_flight.is_none() => return false,
                Err(_) => match self.responses_rx.recv().await {
                    Some(event) => event,
                    None => return false,
                },
            };
            if self.dispatch(event).is_none() {
                return true;
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::RequestAi { ticket, board } => {
                self.abort_in_flight();
                debug!(%ticket, "Spawning AI request");
                let predictor = Arc::clone(&self.predictor);
                let tx = self.responses_tx.clone();
                let timeout = self.timeout;
                let task = tokio::spawn(async move {
                    let result = match tokio::time::timeout(timeout, predictor.predict(&board)).await {
                        Ok(Ok(prediction)) => Ok(prediction),
                        Ok(Err(e)) => Err(AiFailure::from(e)),
                        Err(_) => {
                            warn!(%ticket, ?timeout, "AI request timed out");
                            Err(AiFailure::NetworkFailure {
                                message: format!("no response within {} ms", timeout.as_millis()),
                            })
                        }
                    };
                    // Receiver only disappears with the driver itself.
                    let _ = tx.send(Event::AiResponded { ticket, result });
                });
                self.in_flight = Some(InFlight { ticket, task });
            }
            Effect::CancelAi { ticket } => {
                if self.in_flight.as_ref().is_some_and(|f| f.ticket == ticket) {
                    self.abort_in_flight();
                }
            }
        }
    }

    fn abort_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            info!(ticket = %in_flight.ticket, "Cancelling AI request");
            in_flight.task.abort();
        }
    }
}

impl Drop for GameDriver {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
