//! Stateless UI rendering for tic-tac-toe.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_engine::{Cell, Mark, Position};

use super::app::App;

const CELL_WIDTH: u16 = 7;
const CELL_HEIGHT: u16 = 3;

/// Renders title, board, status, score, and key help.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(CELL_HEIGHT * 3 + 2), // Board
            Constraint::Length(4), // Status + notice
            Constraint::Length(3), // Score and mode
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app);
    draw_status(frame, chunks[2], app);
    draw_score(frame, chunks[3], app);

    let help = Paragraph::new("1-9 or arrows+Enter: move   r: reset   m: mode   q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let board_area = center_rect(area, CELL_WIDTH * 3 + 2, CELL_HEIGHT * 3 + 2);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(CELL_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(CELL_HEIGHT),
        ])
        .split(board_area);

    for row in 0..3 {
        draw_row(frame, rows[row * 2], app, row);
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1]);
        }
    }
}

fn draw_row(frame: &mut Frame, area: Rect, app: &App, row: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CELL_WIDTH),
            Constraint::Length(1),
            Constraint::Length(CELL_WIDTH),
            Constraint::Length(1),
            Constraint::Length(CELL_WIDTH),
        ])
        .split(area);

    for col in 0..3 {
        if let Some(pos) = Position::from_row_col(row, col) {
            draw_cell(frame, cols[col * 2], app, pos);
        }
        if col < 2 {
            draw_separator_vertical(frame, cols[col * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, app: &App, pos: Position) {
    let symbol = match app.snapshot().board().get(pos) {
        Cell::Empty => (pos.to_index() + 1).to_string(),
        Cell::Occupied(mark) => mark.to_string(),
    };

    // Vertically center the symbol in a three-line cell.
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(symbol, cell_style(app, pos))),
        Line::from(""),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Mark color, then cursor, then the winning-line background on top.
fn cell_style(app: &App, pos: Position) -> Style {
    let snapshot = app.snapshot();
    let mut style = match snapshot.board().get(pos) {
        Cell::Empty => Style::default().fg(Color::DarkGray),
        Cell::Occupied(Mark::X) => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        Cell::Occupied(Mark::O) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    if pos == app.cursor() {
        style = style.bg(Color::White).fg(Color::Black);
    }
    if snapshot
        .winning_line()
        .as_ref()
        .is_some_and(|line| line.contains(pos))
    {
        style = style.bg(Color::Green);
    }
    style
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from(Span::styled(
        app.status_line(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];
    if let Some(notice) = app.notice() {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    let status = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_score(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.snapshot().score();
    let text = format!(
        "X: {}   O: {}   |   {}",
        score.get(Mark::X),
        score.get(Mark::O),
        app.mode().label()
    );
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().title("Score").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
