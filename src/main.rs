//! oxo - terminal tic-tac-toe against a remote AI.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use oxo::{Board, GameDriver, HttpPredictor, Phase, Settings, evaluate};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    // The TUI logs to the configured file, so only predict can start early.
    if cli.logs_to_stderr() {
        initialize_stderr_tracing();
    }
    let settings = cli.settings()?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => oxo::tui::run_tui(settings).await,
        Command::Predict { board } => run_predict(settings, board).await,
    }
}

/// Queries the service once and reports what the game would make of it.
#[instrument(skip(settings, board), fields(endpoint = %settings.endpoint()))]
async fn run_predict(settings: Settings, board: Board) -> Result<()> {
    println!("{}\n", board.display());
    println!("Outcome: {}", evaluate(&board));

    let predictor = Arc::new(HttpPredictor::new(settings.endpoint().clone()));
    // Resuming through the controller validates the answer like a real game.
    let mut driver = GameDriver::resume(predictor, settings.timeout(), board)?;
    if !driver.next_response().await {
        println!("No AI move due on this board ({} to move)", driver.state().to_move());
        return Ok(());
    }

    match driver.state().phase() {
        Phase::Failed { failure, .. } => anyhow::bail!("AI move failed: {}", failure),
        _ => {
            let played = driver.state().board();
            info!("Prediction applied");
            println!("\nAI reply:\n{}", played.display());
            println!("Outcome: {}", driver.state().outcome());
        }
    }
    Ok(())
}

fn initialize_stderr_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,oxo=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
