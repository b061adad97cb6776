//! Stateless UI rendering for tic-tac-toe.

use oxo_tictactoe::{GameState, Phase, Player, Position, Square};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::App;

const CELL_WIDTH: u16 = 7;
const CELL_HEIGHT: u16 = 3;
const GAP: u16 = 1;
const BOARD_WIDTH: u16 = CELL_WIDTH * 3 + GAP * 2;
const BOARD_HEIGHT: u16 = CELL_HEIGHT * 3 + GAP * 2;

const HELP: &str = "1-9 / arrows+Enter / click: play  [ ]: history  t: retry  r: reset  q: quit";

/// Regions of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Title bar.
    pub title: Rect,
    /// Area the board is centered in.
    pub board: Rect,
    /// Status box.
    pub status: Rect,
    /// Key help line.
    pub help: Rect,
}

/// Splits the full frame into its regions.
pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),         // Title
            Constraint::Min(BOARD_HEIGHT), // Board
            Constraint::Length(3),         // Status
            Constraint::Length(1),         // Help
        ])
        .split(area);
    ScreenLayout {
        title: chunks[0],
        board: chunks[1],
        status: chunks[2],
        help: chunks[3],
    }
}

/// Rectangles of the nine cells, row-major, centered in `area` and
/// clipped to it.
pub fn board_cells(area: Rect) -> [Rect; 9] {
    let left = area.x + area.width.saturating_sub(BOARD_WIDTH) / 2;
    let top = area.y + area.height.saturating_sub(BOARD_HEIGHT) / 2;
    std::array::from_fn(|index| {
        let (row, col) = ((index / 3) as u16, (index % 3) as u16);
        Rect::new(
            left + col * (CELL_WIDTH + GAP),
            top + row * (CELL_HEIGHT + GAP),
            CELL_WIDTH,
            CELL_HEIGHT,
        )
        .intersection(area)
    })
}

/// Cell under screen coordinate (`column`, `row`) for a frame of size `viewport`.
pub fn cell_at(viewport: Rect, column: u16, row: u16) -> Option<Position> {
    let cells = board_cells(screen_layout(viewport).board);
    Position::all().find(|pos| {
        let r = cells[pos.to_index()];
        column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
    })
}

/// Status text for the displayed state.
pub fn status_line(state: &GameState) -> String {
    match state.phase() {
        Phase::HumanTurn => format!("Next player: {}", Player::Human.symbol()),
        Phase::AwaitingAi(_) => "AI is thinking...".to_string(),
        Phase::Finished(outcome) => match outcome.winner() {
            Some(player) => format!("Winner: {}", player.symbol()),
            None => "It's a draw!".to_string(),
        },
        Phase::Failed { failure, .. } => format!("AI move failed: {} (t: retry, r: reset)", failure),
    }
}

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = screen_layout(frame.area());
    let state = app.state();

    let title = Paragraph::new("AI Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, layout.title);

    let show_cursor = state.phase() == &Phase::HumanTurn;
    for (pos, cell) in Position::all().zip(board_cells(layout.board)) {
        draw_cell(frame, cell, state.board().get(pos), show_cursor && pos == app.cursor());
    }

    let status_color = match state.phase() {
        Phase::Failed { .. } => Color::Red,
        _ => Color::Yellow,
    };
    let moves = format!(
        " Move {} of {} ",
        state.move_index(),
        state.history().len() - 1
    );
    let status = Paragraph::new(status_line(state))
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(moves));
    frame.render_widget(status, layout.status);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, layout.help);
}

fn draw_cell(frame: &mut Frame, area: Rect, square: Square, highlighted: bool) {
    let (symbol, style) = match square {
        Square::Empty => (" ", Style::default()),
        Square::Occupied(Player::Human) => ("X", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        Square::Occupied(Player::Ai) => ("O", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    };
    let border = if highlighted {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(symbol, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use oxo_tictactoe::{AiFailure, Board, Effect, Event, Ticket};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::ai_client::{AiClientError, MovePredictor};
    use crate::driver::GameDriver;

    struct Unused;

    #[async_trait]
    impl MovePredictor for Unused {
        async fn predict(&self, _board: &Board) -> Result<i64, AiClientError> {
            Ok(0)
        }
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
        terminal.draw(|f| draw(f, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn thinking() -> (GameState, Ticket) {
        let step = GameState::new().apply(Event::HumanMove(Position::Center));
        match step.effect {
            Some(Effect::RequestAi { ticket, .. }) => (step.state, ticket),
            other => panic!("expected AI request, got {other:?}"),
        }
    }

    #[test]
    fn test_status_texts() {
        assert_eq!(status_line(&GameState::new()), "Next player: X");

        let (state, ticket) = thinking();
        assert_eq!(status_line(&state), "AI is thinking...");

        let failed = state
            .apply(Event::AiResponded {
                ticket,
                result: Err(AiFailure::NetworkFailure {
                    message: "timeout".to_string(),
                }),
            })
            .state;
        assert!(status_line(&failed).starts_with("AI move failed: network failure: timeout"));
    }

    #[test]
    fn test_finished_status() {
        let mut state = GameState::new();
        for (human, ai) in [(0, 3), (1, 4)] {
            let step = state.apply(Event::HumanMove(Position::from_index(human).expect("cell")));
            let ticket = match step.effect {
                Some(Effect::RequestAi { ticket, .. }) => ticket,
                other => panic!("expected AI request, got {other:?}"),
            };
            state = step.state.apply(Event::AiResponded { ticket, result: Ok(ai) }).state;
        }
        let state = state.apply(Event::HumanMove(Position::TopRight)).state;
        assert_eq!(status_line(&state), "Winner: X");
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let cells = board_cells(Rect::new(0, 0, 80, 20));
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_cell_at_matches_layout() {
        let viewport = Rect::new(0, 0, 80, 24);
        let cells = board_cells(screen_layout(viewport).board);
        for pos in Position::all() {
            let r = cells[pos.to_index()];
            assert_eq!(cell_at(viewport, r.x + r.width / 2, r.y + r.height / 2), Some(pos));
        }
        assert_eq!(cell_at(viewport, 0, 0), None);
    }

    #[test]
    fn test_draw_shows_board_and_status() {
        let app = App::new(GameDriver::new(Arc::new(Unused), Duration::from_secs(1)));
        let screen = rendered(&app);
        assert!(screen.contains("AI Tic Tac Toe"));
        assert!(screen.contains("Next player: X"));
        assert!(screen.contains("Move 0 of 0"));
    }
}
