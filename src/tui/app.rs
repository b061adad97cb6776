//! Application state and input handling.

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use oxo_tictactoe::{Event, GameState, Position};
use ratatui::layout::Rect;
use tracing::debug;

use super::input::{Command, command_for, move_cursor};
use super::ui;
use crate::driver::GameDriver;

/// Main application state.
pub struct App {
    driver: GameDriver,
    cursor: Position,
    viewport: Rect,
    should_quit: bool,
}

impl App {
    /// Creates a new application around a driver.
    pub fn new(driver: GameDriver) -> Self {
        Self {
            driver,
            cursor: Position::Center,
            viewport: Rect::default(),
            should_quit: false,
        }
    }

    /// Gets the current game.
    pub fn state(&self) -> &GameState {
        self.driver.state()
    }

    /// Cell under the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Records the area the last frame was drawn into, for mouse hit-testing.
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// Applies AI responses that arrived since the last call.
    pub fn tick(&mut self) {
        let applied = self.driver.drain_responses();
        if applied > 0 {
            debug!(applied, "Applied AI responses");
        }
    }

    /// Waits until the outstanding AI request reports back and applies the
    /// reply. Never completes while no request is in flight.
    ///
    /// Cancel-safe: dropping the future loses no reply.
    pub async fn ai_response(&mut self) {
        if self.driver.has_request_in_flight() {
            self.driver.next_response().await;
        } else {
            std::future::pending::<()>().await;
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(command) = command_for(key.code) {
            self.run(command);
        }
    }

    /// Handles a mouse event; a left click on a cell plays it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(pos) = ui::cell_at(self.viewport, mouse.column, mouse.row) {
            self.cursor = pos;
            self.run(Command::Play(pos));
        }
    }

    fn run(&mut self, command: Command) {
        debug!(?command, "Running command");
        let event = match command {
            Command::Play(pos) => {
                self.cursor = pos;
                Event::HumanMove(pos)
            }
            Command::PlayCursor => Event::HumanMove(self.cursor),
            Command::Cursor(key) => {
                self.cursor = move_cursor(self.cursor, key);
                return;
            }
            Command::Back => match self.state().previous_turn() {
                Some(index) => Event::JumpTo(index),
                None => return,
            },
            Command::Forward => match self.state().next_turn() {
                Some(index) => Event::JumpTo(index),
                None => return,
            },
            Command::Retry => Event::Retry,
            Command::Reset => Event::Reset,
            Command::Quit => {
                self.should_quit = true;
                return;
            }
        };
        self.driver.dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use oxo_tictactoe::{Board, Phase};

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

    fn app() -> App {
        App::new(GameDriver::new(Arc::new(FirstEmpty), Duration::from_secs(5)))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_digit_plays_and_ai_answers() {
        let mut app = app();
        press(&mut app, KeyCode::Char('5'));
        assert!(app.state().is_thinking());

        settle(&mut app).await;
        assert_eq!(app.state().board().to_wire(), [-1, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(app.state().phase(), &Phase::HumanTurn);
    }

    async fn settle(app: &mut App) {
        while app.state().is_thinking() {
            tokio::task::yield_now().await;
            app.tick();
        }
    }

    #[tokio::test]
    async fn test_history_steps_back_two_exchanges_without_asking_ai() {
        let mut app = app();
        press(&mut app, KeyCode::Char('5'));
        settle(&mut app).await;
        press(&mut app, KeyCode::Char('9'));
        settle(&mut app).await;
        assert_eq!(app.state().move_index(), 4);
        let latest = *app.state().board();

        press(&mut app, KeyCode::Char('['));
        assert!(!app.state().is_thinking());
        assert_eq!(app.state().move_index(), 2);

        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.state().move_index(), 0);
        assert_eq!(app.state().board(), &Board::new());
        assert_eq!(app.state().history().len(), 5);

        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char(']'));
        assert!(!app.state().is_thinking());
        assert_eq!(app.state().move_index(), 4);
        assert_eq!(app.state().board(), &latest);
        assert_eq!(app.state().history().len(), 5);
    }

    #[tokio::test]
    async fn test_enter_plays_cursor() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor(), Position::TopLeft);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().board().to_wire()[0], 1);
    }

    #[tokio::test]
    async fn test_mouse_click_plays_cell() {
        let mut app = app();
        let viewport = Rect::new(0, 0, 60, 24);
        app.set_viewport(viewport);
        let target = ui::board_cells(ui::screen_layout(viewport).board)[8];
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.x + 1,
            row: target.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.state().board().to_wire()[8], 1);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
