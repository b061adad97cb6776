//! Command-line interface for oxo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oxo::{Board, ConfigError, Settings};
use tracing::instrument;

/// oxo - play tic-tac-toe against a remote AI
#[derive(Parser, Debug)]
#[command(name = "oxo")]
#[command(about = "Play tic-tac-toe against a remote AI prediction service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML). Ignored if it does not exist.
    #[arg(long, global = true, default_value = "oxo.toml")]
    pub config: PathBuf,

    /// Prediction endpoint URL (overrides file and OXO_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// AI request timeout in milliseconds (overrides file and OXO_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Play in the terminal
    Play,

    /// Ask the service for its move on one board and print it
    Predict {
        /// Nine cells, row-major: 1 human, -1 AI, 0 empty (e.g. "0,0,0,0,1,0,0,0,0")
        #[arg(allow_hyphen_values = true)]
        board: Board,
    },
}

impl Cli {
    /// True when the chosen command logs to stderr rather than a file.
    pub fn logs_to_stderr(&self) -> bool {
        matches!(self.command, Some(Command::Predict { .. }))
    }

    /// Resolves settings: file, then environment, then flags.
    #[instrument(skip(self))]
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::load(&self.config)?;
        if let Some(endpoint) = &self.endpoint {
            settings = settings.with_endpoint(endpoint.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings = settings.with_timeout_ms(timeout_ms);
        }
        settings.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_logs_to_stderr() {
        let cli = Cli::try_parse_from(["oxo", "predict", "-1,1,0,0,0,0,0,0,0"]).expect("parses");
        assert!(cli.logs_to_stderr());
        assert!(matches!(cli.command, Some(Command::Predict { .. })));
    }

    #[test]
    fn test_play_logs_to_file() {
        let default = Cli::try_parse_from(["oxo"]).expect("parses");
        assert!(!default.logs_to_stderr());
        let play = Cli::try_parse_from(["oxo", "play", "--timeout-ms", "500"]).expect("parses");
        assert!(!play.logs_to_stderr());
        assert_eq!(play.timeout_ms, Some(500));
    }
}
