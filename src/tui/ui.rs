//! UI rendering

use super::app::{App, Mode};
use gridsheet_core::CellRef;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

pub(crate) const FORMULA_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 10;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

const STATUS_HINT: &str = "i:edit  =:formula  u:undo  ^R:redo  B/I/U/L:style  m/p:drag  :q quit";

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORMULA_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Map a mouse position inside `grid_area` to the data cell under it.
/// Headers, borders and column spacing map to `None`.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<CellRef> {
    if grid_area.width < 3 || grid_area.height < 4 {
        return None;
    }

    let inner_x = grid_area.x.saturating_add(1);
    let inner_y = grid_area.y.saturating_add(1);
    let inner_right = inner_x.saturating_add(grid_area.width.saturating_sub(2));
    let inner_bottom = inner_y.saturating_add(grid_area.height.saturating_sub(2));

    if mouse_col < inner_x
        || mouse_col >= inner_right
        || mouse_row < inner_y
        || mouse_row >= inner_bottom
    {
        return None;
    }

    // Header row contains column letters, not data cells.
    if mouse_row == inner_y {
        return None;
    }

    let rel_row = (mouse_row - inner_y - 1) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row_idx = app.viewport_row + rel_row;
    if row_idx >= app.max_rows() {
        return None;
    }

    let body_x = inner_x
        .saturating_add(ROW_HEADER_WIDTH)
        .saturating_add(GRID_COLUMN_SPACING);
    if mouse_col < body_x {
        return None;
    }

    let stride = app.col_width.saturating_add(GRID_COLUMN_SPACING);
    let rel_col = mouse_col - body_x;
    let offset = (rel_col / stride) as usize;
    if rel_col % stride >= app.col_width || offset >= app.visible_cols {
        return None;
    }
    let col = app.viewport_col + offset;
    if col >= app.max_cols() {
        return None;
    }

    Some(CellRef::new(col, row_idx + 1))
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let grid_area = chunks[1];
    let available_width = grid_area
        .width
        .saturating_sub(ROW_HEADER_WIDTH + GRID_COLUMN_SPACING + 2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders

    app.visible_cols = (available_width / (app.col_width as usize + 1)).max(1);
    app.visible_rows = available_height.max(1);
    app.update_viewport();

    draw_formula_bar(f, app, chunks[0]);
    draw_grid(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);
}

fn draw_formula_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_name = app.cursor.to_string();

    let content = match app.mode {
        Mode::Edit => {
            let (before, after) = app.input.split_at(app.input_cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Formula => {
            let (before, after) = app.input.split_at(app.input_cursor);
            format!("{} = {}│{}", cell_name, before, after)
        }
        Mode::Command => {
            let (before, after) = app.input.split_at(app.input_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Normal => match app.core.grid.get(&app.cursor) {
            Some(text) if !text.is_empty() => format!("{}: {}", cell_name, text),
            _ => format!("{}: (empty)", cell_name),
        },
    };

    let title = match app.mode {
        Mode::Edit => " Edit ",
        Mode::Formula => " Formula ",
        Mode::Command => " Command ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Formula => Color::Green,
            Mode::Command => Color::Cyan,
            Mode::Normal => Color::White,
        }));

    let paragraph = Paragraph::new(content).block(block);
    f.render_widget(paragraph, area);
}

fn header_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn visible_cols(app: &App) -> std::ops::Range<usize> {
    app.viewport_col..(app.viewport_col + app.visible_cols).min(app.max_cols())
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let mut header_cells = vec![Cell::from(" ")]; // Corner
    for col in visible_cols(app) {
        header_cells.push(
            Cell::from(CellRef::col_label(col)).style(header_style(col == app.cursor.col)),
        );
    }
    let header = Row::new(header_cells).height(1);

    let last_row = (app.viewport_row + app.visible_rows).min(app.max_rows());
    let mut rows = Vec::new();
    for row_idx in app.viewport_row..last_row {
        let row = row_idx + 1;
        let mut cells =
            vec![Cell::from(row.to_string()).style(header_style(row == app.cursor.row))];

        for col in visible_cols(app) {
            let cell_ref = CellRef::new(col, row);
            let Some(cell) = app.core.grid.cell(&cell_ref) else {
                cells.push(Cell::from(""));
                continue;
            };

            let mut style = if cell_ref == app.cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if app.core.is_highlighted(&cell_ref) {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else if Some(cell_ref) == app.drag_source {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default()
            };
            if cell.style.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if cell.style.italic {
                style = style.add_modifier(Modifier::ITALIC);
            }

            cells.push(Cell::from(cell.text.clone()).style(style));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    widths.extend(visible_cols(app).map(|_| Constraint::Length(app.col_width)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Gridsheet "))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let file_info = if let Some(ref path) = app.core.file_path {
        let modified_indicator = if app.core.modified { " [+]" } else { "" };
        format!("{}{}", path.display(), modified_indicator)
    } else if app.core.modified {
        "[New File] [+]".to_string()
    } else {
        "[New File]".to_string()
    };

    let importing = if app.pending_imports.is_empty() {
        String::new()
    } else {
        format!("  |  importing {}", app.pending_imports.len())
    };

    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        format!("{}{}  |  {}", file_info, importing, STATUS_HINT)
    };

    let style = if app.status_message.starts_with("Error")
        || app.status_message.contains(" error: ")
    {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status, style)]));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsheet_core::{Document, DocumentOptions};

    fn app() -> App {
        let mut app = App::new(Document::new(), 10);
        app.visible_cols = 4;
        app.visible_rows = 4;
        app
    }

    fn first_body_cell_point(grid_area: Rect) -> (u16, u16) {
        (
            grid_area.x + 1 + ROW_HEADER_WIDTH + GRID_COLUMN_SPACING,
            grid_area.y + 2,
        )
    }

    #[test]
    fn grid_cell_at_maps_first_visible_cell_to_viewport_origin() {
        let mut app = app();
        app.viewport_col = 5;
        app.viewport_row = 3;

        let grid_area = Rect::new(0, 0, 80, 20);
        let (x, y) = first_body_cell_point(grid_area);

        assert_eq!(grid_cell_at(&app, grid_area, x, y), Some(CellRef::new(5, 4)));
    }

    #[test]
    fn grid_cell_at_maps_second_column_past_spacing() {
        let mut app = app();
        app.viewport_col = 3;
        app.viewport_row = 2;

        let grid_area = Rect::new(0, 0, 80, 20);
        let (first_x, y) = first_body_cell_point(grid_area);
        let second_col_start = first_x + app.col_width + GRID_COLUMN_SPACING;

        assert_eq!(
            grid_cell_at(&app, grid_area, second_col_start + 1, y),
            Some(CellRef::new(4, 3))
        );
    }

    #[test]
    fn grid_cell_at_ignores_headers() {
        let app = app();
        let grid_area = Rect::new(0, 0, 80, 20);
        let (x, _y) = first_body_cell_point(grid_area);

        assert_eq!(
            grid_cell_at(&app, grid_area, grid_area.x + 2, grid_area.y + 2),
            None
        );
        assert_eq!(grid_cell_at(&app, grid_area, x, grid_area.y + 1), None);
    }

    #[test]
    fn grid_cell_at_ignores_outside_grid_and_spacing() {
        let app = app();
        let grid_area = Rect::new(0, 0, 80, 20);
        let (first_x, y) = first_body_cell_point(grid_area);
        let spacing_x = first_x + app.col_width;

        assert_eq!(grid_cell_at(&app, grid_area, grid_area.x, grid_area.y), None);
        assert_eq!(grid_cell_at(&app, grid_area, spacing_x, y), None);
    }

    #[test]
    fn grid_cell_at_respects_grid_bounds() {
        let options = DocumentOptions {
            cols: 1,
            rows: 1,
            history_limit: None,
        };
        let doc = Document::with_options(&options).unwrap();
        let mut app = App::new(doc, 10);
        app.visible_cols = 3;
        app.visible_rows = 3;

        let grid_area = Rect::new(0, 0, 80, 20);
        let (first_x, first_y) = first_body_cell_point(grid_area);
        let second_col_x = first_x + app.col_width + GRID_COLUMN_SPACING + 1;

        assert_eq!(
            grid_cell_at(&app, grid_area, first_x, first_y),
            Some(CellRef::new(0, 1))
        );
        assert_eq!(grid_cell_at(&app, grid_area, second_col_x, first_y), None);
        assert_eq!(grid_cell_at(&app, grid_area, first_x, first_y + 1), None);
    }
}
