//! UI rendering

use super::app::{App, UNITS_PER_CELL};
use super::help::get_help_text;
use super::keymap::status_hint;
use ledgergrid_core::{CellView, GridMode, HeaderView, RenderedGrid, RowId, RowView};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub(crate) const CELL_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 5;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

/// What a mouse position lands on inside the grid block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GridHit {
    Header(usize),
    /// Right edge of a header cell; dragging it resizes the column.
    ResizeHandle(usize),
    Cell { row: usize, column: usize },
    /// Inside the grid but not on a cell (row numbers, spacing, empty space).
    Gap,
    Outside,
}

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Terminal cells for a column width in units.
pub(crate) fn cells_for_width(width: u32) -> u16 {
    u16::try_from((width / UNITS_PER_CELL).max(1)).unwrap_or(u16::MAX)
}

fn grid_block_inner(grid_area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(grid_area)
}

/// Column rects laid out the way the table lays them out. Index 0 is the row
/// number column; data column `i` is at `i + 1`.
pub(crate) fn column_rects(app: &App, inner: Rect) -> Vec<Rect> {
    let mut constraints = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    constraints.extend(
        app.grid
            .widths()
            .widths()
            .iter()
            .map(|&w| Constraint::Length(cells_for_width(w))),
    );
    Layout::horizontal(constraints)
        .flex(Flex::Start)
        .spacing(GRID_COLUMN_SPACING)
        .split(inner)
        .to_vec()
}

pub(crate) fn hit_test(app: &App, grid_area: Rect, mouse_col: u16, mouse_row: u16) -> GridHit {
    let inner = grid_block_inner(grid_area);
    if inner.width == 0 || inner.height == 0 {
        return GridHit::Outside;
    }
    let right = inner.x.saturating_add(inner.width);
    let bottom = inner.y.saturating_add(inner.height);
    if mouse_col < inner.x || mouse_col >= right || mouse_row < inner.y || mouse_row >= bottom {
        return GridHit::Outside;
    }

    let rects = column_rects(app, inner);
    let column = rects
        .iter()
        .skip(1)
        .position(|r| r.width > 0 && mouse_col >= r.x && mouse_col < r.x + r.width);

    if mouse_row == inner.y {
        if let Some(column) = column {
            let rect = rects[column + 1];
            if mouse_col + 1 == rect.x + rect.width {
                return GridHit::ResizeHandle(column);
            }
            return GridHit::Header(column);
        }
        // The spacing right after a header also grabs its handle.
        return rects
            .iter()
            .skip(1)
            .position(|r| r.width > 0 && mouse_col == r.x + r.width)
            .map(GridHit::ResizeHandle)
            .unwrap_or(GridHit::Gap);
    }

    let rel_row = (mouse_row - inner.y - 1) as usize;
    let row = app.viewport_row + rel_row;
    if rel_row >= app.visible_rows || row >= app.grid.visible_len() {
        return GridHit::Gap;
    }
    match column {
        Some(column) => GridHit::Cell { row, column },
        None => GridHit::Gap,
    }
}

/// Draw the application UI. Returns the ids of the rows that made it on
/// screen.
pub fn draw(f: &mut Frame, app: &mut App, view: &RenderedGrid) -> Vec<RowId> {
    let chunks = split_main_chunks(f.area());

    let inner = grid_block_inner(chunks[1]);
    app.visible_rows = (inner.height.saturating_sub(1) as usize).max(1);
    app.update_viewport();

    draw_cell_bar(f, app, view, chunks[0]);
    let drawn = draw_grid(f, app, view, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.help_modal {
        draw_help_modal(f, app);
    }
    drawn
}

fn draw_cell_bar(f: &mut Frame, app: &App, view: &RenderedGrid, area: Rect) {
    let header = view.headers.get(app.cursor_col);
    let name = header
        .map(|h| if h.label.is_empty() { h.id.as_str() } else { h.label.as_str() })
        .unwrap_or("");
    let row = view.rows.get(app.cursor_row);
    let editing = row.and_then(|r| match r.cells.get(app.cursor_col) {
        Some(CellView::Editing { buffer }) => Some(buffer.as_str()),
        _ => None,
    });

    let content = match (editing, row) {
        (Some(buffer), Some(r)) => format!("{}{}: {}│", name, row_label(r), buffer),
        (None, Some(r)) => format!(
            "{}{}: {}",
            name,
            row_label(r),
            r.cells
                .get(app.cursor_col)
                .map(cell_text)
                .unwrap_or_default()
        ),
        (_, None) => "(no rows)".to_string(),
    };

    let title = if editing.is_some() { " Edit " } else { " Cell " };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(if editing.is_some() {
            Color::Yellow
        } else {
            Color::White
        }));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn row_label(row: &RowView) -> String {
    if row.is_subtotal {
        " (subtotal)".to_string()
    } else {
        format!(" {}", row.visible_index + 1)
    }
}

fn cell_text(cell: &CellView) -> String {
    match cell {
        CellView::Text(s) => s.clone(),
        CellView::Editing { buffer } => format!("{}│", buffer),
        CellView::Checkbox(true) => "[x]".to_string(),
        CellView::Checkbox(false) => "[ ]".to_string(),
        CellView::Delete => "✕".to_string(),
        CellView::Subtotal { label, .. } => label.clone(),
        CellView::Covered | CellView::Empty => String::new(),
    }
}

fn header_style(app: &App, header: &HeaderView) -> Style {
    if header.column == app.cursor_col {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if header.sort.is_some() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if header.sortable {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn subtotal_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn draw_grid(f: &mut Frame, app: &App, view: &RenderedGrid, area: Rect) -> Vec<RowId> {
    let mut header_cells = vec![Cell::from(" ")];
    for header in &view.headers {
        header_cells.push(Cell::from(header.title()).style(header_style(app, header)));
    }
    let header = Row::new(header_cells).height(1);

    let end = (app.viewport_row + app.visible_rows).min(view.rows.len());
    let start = app.viewport_row.min(end);
    let drawn_rows = &view.rows[start..end];

    let mut rows = Vec::with_capacity(drawn_rows.len());
    for row in drawn_rows {
        let is_cursor_row = row.visible_index == app.cursor_row;
        let number = if row.is_subtotal {
            String::new()
        } else {
            format!("{}", row.visible_index + 1)
        };
        let number_style = if is_cursor_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut cells = vec![Cell::from(number).style(number_style)];

        for (column, cell) in row.cells.iter().enumerate() {
            let text = match cell {
                // Drawn over the row once the table is down.
                CellView::Subtotal { .. } => String::new(),
                other => cell_text(other),
            };
            let style = if matches!(cell, CellView::Editing { .. }) {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if is_cursor_row && column == app.cursor_col {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if matches!(cell, CellView::Delete) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            cells.push(Cell::from(text).style(style));
        }

        let row_style = if row.is_subtotal {
            subtotal_style()
        } else if row.selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        rows.push(Row::new(cells).style(row_style));
    }

    let inner = grid_block_inner(area);
    let rects = column_rects(app, inner);
    let widths: Vec<Constraint> = rects.iter().map(|r| Constraint::Length(r.width)).collect();

    let mode = match view.mode {
        GridMode::Normal => "",
        GridMode::Sorted => " [sorted]",
    };
    let modified = if app.is_modified() { " [+]" } else { "" };
    let title = format!(" {}{}{} ", app.title, modified, mode);

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .flex(Flex::Start)
        .column_spacing(GRID_COLUMN_SPACING);
    f.render_widget(table, area);

    for (offset, row) in drawn_rows.iter().enumerate() {
        draw_merged_subtotal(f, &rects, inner, offset, row);
    }

    drawn_rows.iter().map(|r| r.id).collect()
}

/// Paint a subtotal label across the columns it spans.
fn draw_merged_subtotal(f: &mut Frame, rects: &[Rect], inner: Rect, offset: usize, row: &RowView) {
    let Some((column, label, span)) = row.cells.iter().enumerate().find_map(|(i, c)| match c {
        CellView::Subtotal { label, span } => Some((i, label, *span)),
        _ => None,
    }) else {
        return;
    };
    let (Some(first), Some(last)) = (rects.get(column + 1), rects.get(column + span.max(1))) else {
        return;
    };
    let y = inner.y + 1 + offset as u16;
    let width = (last.x + last.width).saturating_sub(first.x);
    if width == 0 || y >= inner.y + inner.height {
        return;
    }
    let area = Rect::new(first.x, y, width, 1);
    f.render_widget(Paragraph::new(label.as_str()).style(subtotal_style()), area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let file_info = if let Some(ref path) = app.file_path {
        let modified_indicator = if app.is_modified() { " [+]" } else { "" };
        format!("{}{}", path.display(), modified_indicator)
    } else if app.is_modified() {
        "[Demo] [+]".to_string()
    } else {
        "[Demo]".to_string()
    };

    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        format!("{}  |  {}", file_info, status_hint())
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status, style)]));
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(80, 80, f.area());
    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Ledgergrid Help ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let lines: Vec<Line> = get_help_text()
        .into_iter()
        .map(|text| {
            let style = if text.starts_with("  ") || text.is_empty() {
                Style::default().fg(Color::White)
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    let scroll_y = u16::try_from(app.help_scroll.min(max_scroll)).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_sheet;
    use ledgergrid_core::{Grid, GridOptions};

    fn app() -> App {
        let sheet = demo_sheet().unwrap();
        let grid = Grid::new(sheet.columns, sheet.rows, GridOptions::default()).unwrap();
        App::new(grid, sheet.title, None)
    }

    // Demo widths: item 96 -> 12 cells, description 200 -> 25 cells.
    fn grid_area() -> Rect {
        Rect::new(0, 0, 160, 12)
    }

    fn first_column_x() -> u16 {
        grid_area().x + 1 + ROW_HEADER_WIDTH + GRID_COLUMN_SPACING
    }

    #[test]
    fn test_cells_for_width() {
        assert_eq!(cells_for_width(96), 12);
        assert_eq!(cells_for_width(30), 3);
        assert_eq!(cells_for_width(4), 1);
    }

    #[test]
    fn test_hit_first_body_cell() {
        let mut app = app();
        app.visible_rows = 10;
        assert_eq!(
            hit_test(&app, grid_area(), first_column_x(), grid_area().y + 2),
            GridHit::Cell { row: 0, column: 0 }
        );
    }

    #[test]
    fn test_hit_second_column_and_viewport() {
        let mut app = app();
        app.visible_rows = 10;
        app.viewport_row = 1;
        let second_x = first_column_x() + 12 + GRID_COLUMN_SPACING;
        assert_eq!(
            hit_test(&app, grid_area(), second_x, grid_area().y + 3),
            GridHit::Cell { row: 2, column: 1 }
        );
    }

    #[test]
    fn test_hit_header_and_resize_handle() {
        let mut app = app();
        app.visible_rows = 10;
        let header_y = grid_area().y + 1;
        assert_eq!(
            hit_test(&app, grid_area(), first_column_x(), header_y),
            GridHit::Header(0)
        );
        assert_eq!(
            hit_test(&app, grid_area(), first_column_x() + 11, header_y),
            GridHit::ResizeHandle(0)
        );
        assert_eq!(
            hit_test(&app, grid_area(), first_column_x() + 12, header_y),
            GridHit::ResizeHandle(0)
        );
    }

    #[test]
    fn test_hit_ignores_row_numbers_and_spacing() {
        let mut app = app();
        app.visible_rows = 10;
        let y = grid_area().y + 2;
        assert_eq!(hit_test(&app, grid_area(), grid_area().x + 2, y), GridHit::Gap);
        assert_eq!(hit_test(&app, grid_area(), first_column_x() + 12, y), GridHit::Gap);
    }

    #[test]
    fn test_hit_below_last_row_and_outside() {
        let mut app = app();
        app.visible_rows = 10;
        // Demo has four rows.
        assert_eq!(
            hit_test(&app, grid_area(), first_column_x(), grid_area().y + 6),
            GridHit::Gap
        );
        assert_eq!(hit_test(&app, grid_area(), grid_area().x, grid_area().y), GridHit::Outside);
        assert_eq!(hit_test(&app, grid_area(), 5, 40), GridHit::Outside);
    }
}
