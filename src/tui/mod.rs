//! Terminal UI: the board, a status line, and keyboard/mouse input.

mod app;
mod input;
mod ui;

pub use app::App;
pub use ui::{ScreenLayout, board_cells, cell_at, draw, screen_layout, status_line};

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::ai_client::HttpPredictor;
use crate::config::Settings;
use crate::driver::GameDriver;

/// How often the input reader checks whether the UI has gone away.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Runs the game in the terminal until the user quits.
pub async fn run_tui(settings: Settings) -> Result<()> {
    init_file_logging(settings.log_file())?;

    info!(endpoint = %settings.endpoint(), timeout_ms = settings.timeout_ms(), "Starting oxo TUI");

    let predictor = Arc::new(HttpPredictor::new(settings.endpoint().clone()));
    let mut app = App::new(GameDriver::new(predictor, settings.timeout()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let reader = spawn_input_reader(input_tx);

    let res = run_app(&mut terminal, &mut app, input_rx).await;

    // The receiver is gone, so the reader stops within one poll interval.
    if let Err(err) = reader.await {
        error!(error = ?err, "Input reader panicked");
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("oxo TUI stopped");
    res
}

/// Reads terminal events on the blocking pool and forwards them until the
/// receiver is dropped.
fn spawn_input_reader(tx: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            let ready = match event::poll(INPUT_POLL) {
                Ok(ready) => ready,
                Err(err) => {
                    error!(error = %err, "Failed to poll terminal input");
                    return;
                }
            };
            if !ready {
                continue;
            }
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    error!(error = %err, "Failed to read terminal input");
                    return;
                }
            }
        }
        debug!("Input reader stopped");
    })
}

/// Draws, then waits for whichever comes first: user input or the AI's
/// reply. Returns when the user quits or the input stream ends.
#[instrument(skip_all)]
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut input: mpsc::UnboundedReceiver<Event>,
) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        app.tick();
        let area = terminal.draw(|f| draw(f, app))?.area;
        app.set_viewport(area);

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }

        tokio::select! {
            received = input.recv() => match received {
                Some(Event::Key(key)) => app.handle_key(key),
                Some(Event::Mouse(mouse)) => app.handle_mouse(mouse),
                Some(_) => {}
                None => {
                    info!("Input closed");
                    return Ok(());
                }
            },
            () = app.ai_response() => debug!("AI response applied"),
        }
    }
}

/// Logs to a file so output never lands on the screen being drawn.
fn init_file_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use oxo_tictactoe::{Board, Phase, Position};
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::ai_client::{AiClientError, MovePredictor};

    struct FirstEmpty;

    #[async_trait]
    impl MovePredictor for FirstEmpty {
        async fn predict(&self, board: &Board) -> Result<i64, AiClientError> {
            let pos = Position::valid_moves(board)[0];
            Ok(pos.to_index() as i64)
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn start(input: mpsc::UnboundedReceiver<Event>) -> tokio::task::JoinHandle<Result<App>> {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
        let mut app = App::new(GameDriver::new(Arc::new(FirstEmpty), Duration::from_secs(5)));
        tokio::spawn(async move {
            run_app(&mut terminal, &mut app, input).await?;
            Ok(app)
        })
    }

    // Single-threaded runtime: the loop must yield while it waits.
    #[tokio::test]
    async fn test_loop_applies_ai_reply_while_waiting_for_input() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = start(rx);

        tx.send(key('5')).expect("send");
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(key('q')).expect("send");

        let app = handle.await.expect("join").expect("loop");
        assert!(app.should_quit());
        assert_eq!(app.state().board().to_wire(), [-1, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(app.state().phase(), &Phase::HumanTurn);
    }

    #[tokio::test]
    async fn test_loop_ends_when_input_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = start(rx);
        drop(tx);

        let app = handle.await.expect("join").expect("loop");
        assert!(!app.should_quit());
        assert_eq!(app.state().history().len(), 1);
    }
}
