//! HTTP client for the remote move-prediction service.

use async_trait::async_trait;
use derive_more::{Display, Error};
use oxo_tictactoe::{AiFailure, Board};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Anything that can choose the AI's next cell.
///
/// Implementations return the raw index they were given; range and
/// occupancy are checked by the game controller.
#[async_trait]
pub trait MovePredictor: Send + Sync {
    /// Chooses a cell on `board` for the AI.
    async fn predict(&self, board: &Board) -> Result<i64, AiClientError>;
}

/// Request body sent to the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Board cells, row-major: 1 human, -1 AI, 0 empty.
    pub game_state: [i8; 9],
}

/// Response body returned by the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Chosen cell index.
    pub prediction: i64,
}

/// Category of prediction client failure.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AiClientErrorKind {
    /// The request never produced a response.
    #[display("request failed: {}", _0)]
    Network(String),
    /// The service answered with a non-success status.
    #[display("service returned HTTP {}: {}", status, body)]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// The body was not `{"prediction": <integer>}`.
    #[display("malformed response: {}", _0)]
    Malformed(String),
}

/// Prediction client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("AI client error: {} at {}:{}", kind, file, line)]
pub struct AiClientError {
    /// What went wrong.
    #[error(not(source))]
    pub kind: AiClientErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AiClientError {
    /// Creates a new client error with caller location tracking.
    #[track_caller]
    pub fn new(kind: AiClientErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        error!(%kind, "AI client error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<AiClientError> for AiFailure {
    fn from(err: AiClientError) -> Self {
        match err.kind {
            AiClientErrorKind::Malformed(message) => AiFailure::MalformedResponse { message },
            other => AiFailure::NetworkFailure {
                message: other.to_string(),
            },
        }
    }
}

/// [`MovePredictor`] that POSTs the board to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpPredictor {
    /// Creates a predictor for `endpoint`.
    #[instrument]
    pub fn new(endpoint: String) -> Self {
        info!("Creating HTTP predictor");
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MovePredictor for HttpPredictor {
    #[instrument(skip(self, board), fields(endpoint = %self.endpoint))]
    async fn predict(&self, board: &Board) -> Result<i64, AiClientError> {
        let request = PredictRequest {
            game_state: board.to_wire(),
        };
        debug!(?request, "Sending prediction request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiClientError::new(AiClientErrorKind::Network(e.to_string())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiClientError::new(AiClientErrorKind::Network(e.to_string())))?;

        if !status.is_success() {
            return Err(AiClientError::new(AiClientErrorKind::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: PredictResponse = serde_json::from_str(&body).map_err(|e| {
            AiClientError::new(AiClientErrorKind::Malformed(format!("{e}: {body}")))
        })?;

        info!(prediction = parsed.prediction, "Received prediction");
        Ok(parsed.prediction)
    }
}
