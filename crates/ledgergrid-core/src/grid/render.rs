//! UI-agnostic view of the grid.

use super::state::{Grid, GridMode};
use ledgergrid_engine::engine::{
    ColumnType, Row, RowId, SortDirection, display_readonly, display_value,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderView {
    pub column: usize,
    pub id: String,
    pub label: String,
    pub width: u32,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

impl HeaderView {
    /// Header label with the sort indicator appended.
    pub fn title(&self) -> String {
        match self.sort {
            Some(direction) => format!("{} {}", self.label, direction.indicator()),
            None => self.label.clone(),
        }
    }
}

/// What one cell shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Text(String),
    /// The editable cell, showing the live buffer.
    Editing { buffer: String },
    Checkbox(bool),
    /// Delete control of an action column.
    Delete,
    /// Merged "Subtotal: value" cell covering `span` columns from here.
    Subtotal { label: String, span: usize },
    /// Part of a merged cell to the left.
    Covered,
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub id: RowId,
    pub visible_index: usize,
    pub is_subtotal: bool,
    pub selected: bool,
    pub editing_column: Option<usize>,
    pub cells: Vec<CellView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedGrid {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub mode: GridMode,
    pub can_add_subtotal: bool,
}

impl RenderedGrid {
    /// Ids of the drawn rows, for [`Grid::view_settled`].
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }
}

impl Grid {
    /// Snapshot the visible rows and headers for drawing.
    pub fn render(&self) -> RenderedGrid {
        let headers = self
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| HeaderView {
                column: i,
                id: c.id.clone(),
                label: c.header.clone(),
                width: self.widths.width(i),
                sortable: c.kind.is_sortable(),
                sort: self.sort.direction_for(&c.id),
            })
            .collect();

        let editing = self.edit.cell();
        let rows = self
            .store
            .visible_rows()
            .enumerate()
            .map(|(visible_index, row)| {
                let editing_column = editing.filter(|(id, _)| *id == row.id).map(|(_, c)| c);
                let cells = if row.is_subtotal() {
                    self.subtotal_cells(row)
                } else {
                    self.data_cells(row, editing_column)
                };
                RowView {
                    id: row.id,
                    visible_index,
                    is_subtotal: row.is_subtotal(),
                    selected: self.selected_row == Some(row.id),
                    editing_column,
                    cells,
                }
            })
            .collect();

        RenderedGrid {
            headers,
            rows,
            mode: self.mode,
            can_add_subtotal: self.can_add_subtotal(),
        }
    }

    fn data_cells(&self, row: &Row, editing_column: Option<usize>) -> Vec<CellView> {
        let amount_column = self.store.amount_column();
        self.columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                if editing_column == Some(i)
                    && let Some(buffer) = self.edit.buffer()
                {
                    // Toggles and choices show their stored value, not the buffer.
                    match column.kind {
                        ColumnType::Checkbox | ColumnType::Listbox => {}
                        _ => {
                            return CellView::Editing {
                                buffer: buffer.to_string(),
                            };
                        }
                    }
                }
                let value = row.get(&column.id);
                match column.kind {
                    ColumnType::Checkbox => {
                        CellView::Checkbox(value.is_some_and(|v| v.as_bool()))
                    }
                    ColumnType::Action => CellView::Delete,
                    // Only the resolved amount column is computed; the rest are plain text.
                    ColumnType::Amount if amount_column != Some(column.id.as_str()) => {
                        CellView::Text(value.map(display_readonly).unwrap_or_default())
                    }
                    _ => CellView::Text(display_value(column, value)),
                }
            })
            .collect()
    }

    /// The amount cell merges rightwards up to the next action column; action
    /// columns keep their delete control.
    fn subtotal_cells(&self, row: &Row) -> Vec<CellView> {
        let columns = self.columns();
        let amount_index = self
            .store
            .amount_column()
            .and_then(|id| columns.iter().position(|c| c.id == id));
        let mut cells = Vec::with_capacity(columns.len());
        let mut covering = false;
        for (i, column) in columns.iter().enumerate() {
            let cell = if column.kind == ColumnType::Action {
                covering = false;
                CellView::Delete
            } else if Some(i) == amount_index {
                let span = columns[i..]
                    .iter()
                    .take_while(|c| c.kind != ColumnType::Action)
                    .count();
                covering = true;
                CellView::Subtotal {
                    label: format!("Subtotal: {}", display_value(column, row.get(&column.id))),
                    span,
                }
            } else if covering {
                CellView::Covered
            } else {
                CellView::Empty
            };
            cells.push(cell);
        }
        cells
    }
}
