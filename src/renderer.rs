use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::game::GameState;
use crate::grid::{Cell, Grid};

/// Terminal columns per grid cell: a spacer and the glyph.
const CELL_WIDTH: u16 = 2;

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState) {
    let area = frame.area();
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let size = state.grid.size();
    let board = Rect::new(
        play_area.x,
        play_area.y,
        size.width.saturating_mul(CELL_WIDTH).saturating_add(2),
        size.height.saturating_add(2),
    )
    .intersection(play_area);

    let lines: Vec<Line<'_>> = grid_lines(&state.grid).into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().border_style(Style::new().fg(Color::Gray))),
        board,
    );

    frame.render_widget(
        Paragraph::new(status_line(state)).style(Style::new().fg(Color::DarkGray)),
        status_area,
    );
}

/// One string per grid row, each cell drawn as a space followed by its glyph.
#[must_use]
pub fn grid_lines(grid: &Grid) -> Vec<String> {
    grid.rows()
        .map(|row| row.iter().copied().map(cell_text).collect())
        .collect()
}

fn cell_text(cell: Cell) -> String {
    format!(" {}", cell.glyph())
}

#[must_use]
pub fn status_line(state: &GameState) -> String {
    let size = state.grid.size();
    format!(
        "Grid ({} x {})  |  Length: {}",
        size.width, size.height, state.snake.length
    )
}
