//! Application state and logic.
//!
//! [`App`] wraps a [`Grid`] with the terminal-side state: a keyboard cursor,
//! the vertical viewport, the status line and the help modal. The cursor is a
//! (visible row, column) pair; whenever the grid moves its editable cell the
//! cursor follows.

use crate::storage::write_sheet;
use ledgergrid_core::{ColumnType, EditState, Grid, GridMode, GridObserver, Row, RowId};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

/// Column width units drawn per terminal cell.
pub const UNITS_PER_CELL: u32 = 8;

/// Width change for one `+`/`-` press.
const WIDTH_STEP: i32 = UNITS_PER_CELL as i32;

/// Flags the app as modified whenever the grid reports a change.
struct ModifiedFlag(Rc<Cell<bool>>);

impl GridObserver for ModifiedFlag {
    fn on_change(&mut self, _rows: &[Row]) {
        self.0.set(true);
    }
}

/// Main application state container.
pub struct App {
    pub grid: Grid,
    /// Shown in the title bar
    pub title: String,
    /// Where Ctrl+S writes the sheet
    pub file_path: Option<PathBuf>,
    /// Cursor position (visible row)
    pub cursor_row: usize,
    /// Cursor position (column index)
    pub cursor_col: usize,
    /// First visible row
    pub viewport_row: usize,
    /// Number of body rows that fit on screen
    pub visible_rows: usize,
    modified: Rc<Cell<bool>>,
    pub status_message: String,
    pub confirm_quit: bool,
    pub help_modal: bool,
    pub help_scroll: usize,
}

impl App {
    pub fn new(mut grid: Grid, title: Option<String>, file_path: Option<PathBuf>) -> Self {
        let modified = Rc::new(Cell::new(false));
        grid.set_observer(Box::new(ModifiedFlag(Rc::clone(&modified))));
        let title = title
            .or_else(|| {
                file_path
                    .as_ref()
                    .and_then(|p| p.file_stem())
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "ledgergrid".to_string());
        App {
            grid,
            title,
            file_path,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            visible_rows: 20,
            modified,
            status_message: String::new(),
            confirm_quit: false,
            help_modal: false,
            help_scroll: 0,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified.get()
    }

    fn max_row(&self) -> usize {
        self.grid.visible_len().saturating_sub(1)
    }

    fn max_col(&self) -> usize {
        self.grid.columns().len().saturating_sub(1)
    }

    /// Type of the column being edited, if any.
    pub fn editing_kind(&self) -> Option<ColumnType> {
        let (_, column) = self.grid.edit_state().cell()?;
        self.grid.columns().get(column).map(|c| c.kind)
    }

    /// Move cursor by delta, clamping to valid range.
    ///
    /// Leaving the editable cell commits it.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        if matches!(self.grid.edit_state(), EditState::Editing(_)) {
            self.grid.commit_edit();
        }
        self.cursor_col = (self.cursor_col as i64 + i64::from(dx)).clamp(0, self.max_col() as i64)
            as usize;
        self.cursor_row = (self.cursor_row as i64 + i64::from(dy)).clamp(0, self.max_row() as i64)
            as usize;
        self.update_viewport();
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        let visible = self.visible_rows.max(1);
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + visible {
            self.viewport_row = self.cursor_row - visible + 1;
        }
    }

    /// Click the cell under the cursor.
    pub fn activate(&mut self) {
        self.click_cell(self.cursor_row, self.cursor_col);
    }

    /// Click a body cell by visible row and column.
    pub fn click_cell(&mut self, row: usize, column: usize) {
        self.cursor_row = row;
        self.cursor_col = column;
        if let Err(e) = self.grid.click(row, column) {
            self.status_message = format!("Error: {}", e);
        }
        self.clamp_cursor();
        self.sync_cursor_to_edit();
    }

    pub fn blur(&mut self) {
        self.grid.click_outside();
    }

    pub fn toggle_sort_at_cursor(&mut self) {
        self.toggle_sort(self.cursor_col);
    }

    pub fn toggle_sort(&mut self, column: usize) {
        let Some(spec) = self.grid.columns().get(column) else {
            return;
        };
        if !spec.kind.is_sortable() {
            self.status_message = format!("'{}' is not sortable", header_or_id(spec));
            return;
        }
        let label = header_or_id(spec).to_string();
        if let Err(e) = self.grid.toggle_sort(column) {
            self.status_message = format!("Error: {}", e);
            return;
        }
        self.status_message = match self.grid.sort_state().active() {
            Some(active) => format!("Sorted by {} {}", label, active.direction.indicator()),
            None => "Sort cleared".to_string(),
        };
        self.clamp_cursor();
    }

    pub fn add_subtotal(&mut self) {
        if self.grid.mode() == GridMode::Sorted {
            self.status_message = "Clear the sort to add a subtotal".to_string();
            return;
        }
        match self.grid.add_subtotal() {
            Some(id) => {
                self.status_message = "Subtotal added".to_string();
                self.move_cursor_to(id);
            }
            None => self.status_message = "No rows to subtotal".to_string(),
        }
    }

    pub fn insert_rows(&mut self) {
        let ids = self.grid.insert_rows(None);
        self.status_message = format!("Inserted {} row(s)", ids.len());
        if let Some(&first) = ids.first() {
            self.move_cursor_to(first);
        }
    }

    pub fn delete_cursor_row(&mut self) {
        match self.grid.delete_visible_row(self.cursor_row) {
            Ok(true) => self.status_message = "Row deleted".to_string(),
            Ok(false) => self.status_message = "Row kept".to_string(),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
        self.clamp_cursor();
    }

    pub fn increase_column_width(&mut self) {
        self.nudge_column_width(WIDTH_STEP);
    }

    pub fn decrease_column_width(&mut self) {
        self.nudge_column_width(-WIDTH_STEP);
    }

    fn nudge_column_width(&mut self, delta: i32) {
        if let Some(width) = self.grid.widths_mut().nudge(self.cursor_col, delta) {
            self.status_message = format!("Column width {}", width);
        }
    }

    /// Write the committed rows back to the sheet file.
    pub fn save_file(&mut self) {
        let Some(path) = self.file_path.clone() else {
            self.status_message = "No file path. Start with a sheet file to save".to_string();
            return;
        };
        self.grid.commit_edit();
        match write_sheet(
            &path,
            Some(self.title.as_str()),
            self.grid.columns(),
            self.grid.rows(),
        ) {
            Ok(()) => {
                self.modified.set(false);
                self.status_message = format!("Saved to {}", path.display());
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "save failed");
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    /// Report the drawn rows to the grid and follow any focus change.
    ///
    /// Returns `true` when focus moved and the view needs another draw.
    pub fn settle_view(&mut self, rendered: &[RowId]) -> bool {
        let moved = self.grid.view_settled(rendered);
        if moved {
            self.sync_cursor_to_edit();
        }
        moved
    }

    /// Put the cursor on the grid's editable (or focus-pending) cell.
    pub fn sync_cursor_to_edit(&mut self) {
        let target = self
            .grid
            .edit_state()
            .cell()
            .or_else(|| self.grid.pending_focus());
        if let Some((id, column)) = target {
            self.cursor_col = column;
            self.move_cursor_to(id);
        }
    }

    fn move_cursor_to(&mut self, id: RowId) {
        if let Some(index) = self.grid.visible_rows().iter().position(|r| r.id == id) {
            self.cursor_row = index;
        }
        self.update_viewport();
    }

    fn clamp_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.max_row());
        self.cursor_col = self.cursor_col.min(self.max_col());
        self.update_viewport();
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = (self.help_scroll as i64 + i64::from(delta)).max(0) as usize;
    }
}

fn header_or_id(spec: &ledgergrid_core::ColumnSpec) -> &str {
    if spec.header.is_empty() {
        &spec.id
    } else {
        &spec.header
    }
}
