//! Single-cell editing and keyboard traversal.

use super::state::{Grid, GridMode};
use crate::error::Result;
use ledgergrid_engine::engine::{
    CellValue, ColumnType, InputFilter, RowId, commit_value, edit_text, live_format,
};

/// The cell currently accepting input, with what it held before the edit.
#[derive(Clone, Debug, PartialEq)]
pub struct EditCursor {
    pub row: RowId,
    pub column: usize,
    /// Value before the edit began; `None` if the cell was never set.
    pub original: Option<CellValue>,
    /// What the user sees while typing.
    pub buffer: String,
}

/// At most one cell is editable at any time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditCursor),
    /// Rows were appended and focus moves to `(row, column)` once the view
    /// confirms the row is on screen.
    AwaitingFocus { row: RowId, column: usize },
}

impl EditState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }

    pub fn cursor(&self) -> Option<&EditCursor> {
        match self {
            EditState::Editing(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// The editable cell, if any.
    pub fn cell(&self) -> Option<(RowId, usize)> {
        self.cursor().map(|c| (c.row, c.column))
    }

    pub fn row(&self) -> Option<RowId> {
        match self {
            EditState::Editing(cursor) => Some(cursor.row),
            EditState::AwaitingFocus { row, .. } => Some(*row),
            EditState::Idle => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        self.cursor().map(|c| c.buffer.as_str())
    }
}

/// Keys with grid-level meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridKey {
    Tab,
    Enter,
    Escape,
}

/// Input routed to the editable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditInput {
    Char(char),
    Backspace,
    /// Flip a checkbox.
    Toggle,
    /// Next listbox option.
    NextOption,
    /// Previous listbox option.
    PreviousOption,
}

impl Grid {
    /// Handle a click on the cell shown at (`visible_row`, `column`).
    ///
    /// Action cells delete their row. Editable data cells become the editable
    /// cell (checkboxes also toggle). Anything else only moves the row
    /// highlight. A previous edit is committed first.
    pub fn click(&mut self, visible_row: usize, column: usize) -> Result<()> {
        let index = self.store.committed_index(visible_row)?;
        let kind = self.column_at(column)?.kind;
        let row = &self.store.rows()[index];
        let (id, is_subtotal) = (row.id, row.is_subtotal());

        if kind == ColumnType::Action {
            self.delete_row(id);
            return Ok(());
        }

        if self.edit.cell() == Some((id, column)) {
            if kind == ColumnType::Checkbox {
                self.input(EditInput::Toggle);
            }
            return Ok(());
        }

        self.commit_edit();
        self.selected_row = Some(id);

        let editable = match self.mode {
            GridMode::Normal => !is_subtotal && kind.is_editable(),
            GridMode::Sorted => false,
        };
        if editable {
            self.begin_edit(id, column);
            if kind == ColumnType::Checkbox {
                self.input(EditInput::Toggle);
            }
        } else {
            self.edit = EditState::Idle;
        }
        Ok(())
    }

    /// Blur: commit any edit and drop the highlight.
    pub fn click_outside(&mut self) {
        self.commit_edit();
        self.edit = EditState::Idle;
        self.selected_row = None;
    }

    /// Tab/Enter commit and advance; Escape reverts.
    pub fn key(&mut self, key: GridKey) {
        match key {
            GridKey::Escape => self.cancel_edit(),
            GridKey::Tab | GridKey::Enter => {
                if let Some((row, column)) = self.commit_edit() {
                    self.advance_from(row, column);
                }
            }
        }
    }

    /// Feed one keystroke (or toggle/option step) to the editable cell.
    ///
    /// Edits write through to the row so derived amounts follow the typing.
    pub fn input(&mut self, input: EditInput) {
        let Some(cursor) = self.edit.cursor() else {
            return;
        };
        let (row, column_index, mut buffer) = (cursor.row, cursor.column, cursor.buffer.clone());
        let Some(column) = self.columns().get(column_index).cloned() else {
            return;
        };
        let Some(index) = self.store.index_of(row) else {
            return;
        };
        let current = self.store.rows()[index].get(&column.id).cloned();

        let value = match (column.kind.input_filter(), input) {
            (InputFilter::FreeText, EditInput::Char(c)) => {
                buffer.push(c);
                CellValue::Text(buffer.clone())
            }
            (InputFilter::FreeText, EditInput::Backspace) => {
                buffer.pop();
                CellValue::Text(buffer.clone())
            }
            (InputFilter::Digits | InputFilter::Decimal { .. }, EditInput::Char(c)) => {
                buffer.push(c);
                buffer = live_format(column.kind, &buffer);
                CellValue::Text(buffer.clone())
            }
            (InputFilter::Digits | InputFilter::Decimal { .. }, EditInput::Backspace) => {
                buffer.pop();
                buffer = live_format(column.kind, &buffer);
                CellValue::Text(buffer.clone())
            }
            (InputFilter::Toggle, EditInput::Toggle) => {
                let checked = !current.as_ref().is_some_and(CellValue::as_bool);
                buffer = checked.to_string();
                CellValue::Bool(checked)
            }
            (InputFilter::Choice, EditInput::NextOption | EditInput::PreviousOption) => {
                let count = column.options.len();
                if count == 0 {
                    return;
                }
                let next = match (current.as_ref().and_then(|v| column.option_index(v)), input) {
                    (None, EditInput::PreviousOption) => count - 1,
                    (None, _) => 0,
                    (Some(i), EditInput::PreviousOption) => (i + count - 1) % count,
                    (Some(i), _) => (i + 1) % count,
                };
                buffer = column.options[next].value.clone();
                CellValue::Text(buffer.clone())
            }
            _ => return,
        };

        if let EditState::Editing(cursor) = &mut self.edit {
            cursor.buffer = buffer;
        }
        if self.store.set_cell(index, &column.id, value).is_ok() {
            self.notify_change();
        }
    }

    /// Commit the editable cell and return to idle.
    ///
    /// Returns the committed cell, or `None` if nothing was being edited.
    pub fn commit_edit(&mut self) -> Option<(RowId, usize)> {
        let cursor = self.edit.cursor()?.clone();
        self.edit = EditState::Idle;
        let column = self.columns().get(cursor.column)?.clone();

        // A buffer still showing the opening text puts the original back, so
        // passing through a cell never rewrites it.
        let untouched = cursor.buffer == edit_text(&column, cursor.original.as_ref());
        let value = match column.kind.input_filter() {
            InputFilter::FreeText | InputFilter::Digits | InputFilter::Decimal { .. } => {
                if untouched {
                    cursor.original.clone()
                } else {
                    Some(commit_value(column.kind, &cursor.buffer))
                }
            }
            // Toggles and choices are already stored.
            InputFilter::Toggle | InputFilter::Choice | InputFilter::Locked => None,
        };
        if let Some(value) = value
            && let Some(index) = self.store.index_of(cursor.row)
            && self.store.rows()[index].get(&column.id) != Some(&value)
            && self.store.set_cell(index, &column.id, value).is_ok()
        {
            self.store.project(&self.sort);
            self.notify_change();
        }
        tracing::debug!(row = %cursor.row, column = %column.id, "edit committed");
        Some((cursor.row, cursor.column))
    }

    /// Escape: put back the pre-edit value and return to idle.
    pub fn cancel_edit(&mut self) {
        let cursor = match &self.edit {
            EditState::Editing(cursor) => cursor.clone(),
            EditState::AwaitingFocus { .. } => {
                self.edit = EditState::Idle;
                return;
            }
            EditState::Idle => return,
        };
        self.edit = EditState::Idle;
        let (Some(column), Some(index)) = (
            self.columns().get(cursor.column).map(|c| c.id.clone()),
            self.store.index_of(cursor.row),
        ) else {
            return;
        };
        let restored = match cursor.original {
            Some(value) => self.store.set_cell(index, &column, value),
            None => self.store.clear_cell(index, &column),
        };
        if restored.is_ok() {
            self.store.project(&self.sort);
            self.notify_change();
        }
        tracing::debug!(row = %cursor.row, column = %column, "edit reverted");
    }

    /// Cell that will receive focus once the view shows its row.
    pub fn pending_focus(&self) -> Option<(RowId, usize)> {
        match self.edit {
            EditState::AwaitingFocus { row, column } => Some((row, column)),
            _ => None,
        }
    }

    /// Called by the view after drawing, with the ids of the rows it drew.
    ///
    /// Completes a pending focus once its row is present. Returns `true` when
    /// focus moved.
    pub fn view_settled(&mut self, rendered: &[RowId]) -> bool {
        let Some((row, column)) = self.pending_focus() else {
            return false;
        };
        if !rendered.contains(&row) {
            return false;
        }
        match self.mode {
            GridMode::Normal if self.store.index_of(row).is_some() => {
                self.begin_edit(row, column);
                true
            }
            _ => {
                self.edit = EditState::Idle;
                false
            }
        }
    }

    /// Column indices that accept edits, in order.
    pub fn editable_columns(&self) -> Vec<usize> {
        self.columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind.is_editable())
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn begin_edit(&mut self, row: RowId, column: usize) {
        let Some(spec) = self.columns().get(column) else {
            return;
        };
        let original = self.store.row(row).and_then(|r| r.get(&spec.id)).cloned();
        let buffer = edit_text(spec, original.as_ref());
        self.edit = EditState::Editing(EditCursor {
            row,
            column,
            original,
            buffer,
        });
        self.selected_row = Some(row);
    }

    /// Move to the next editable cell in row-major order, skipping subtotal
    /// rows. Past the last editable cell of the last row, append rows and
    /// queue focus on the first of them; otherwise wrap to the top.
    fn advance_from(&mut self, row: RowId, column: usize) {
        let editable = self.editable_columns();
        let (Some(&first), Some(&last)) = (editable.first(), editable.last()) else {
            return;
        };
        let Some(index) = self.store.index_of(row) else {
            return;
        };

        let rows = self.store.rows();
        if index + 1 == rows.len() && column == last {
            let ids = self.store.insert(self.options.append_batch.max(1));
            self.store.project(&self.sort);
            self.notify_change();
            if let Some(&new_row) = ids.first() {
                tracing::debug!(row = %new_row, appended = ids.len(), "focus deferred to appended row");
                self.edit = EditState::AwaitingFocus {
                    row: new_row,
                    column: first,
                };
            }
            return;
        }

        let next = editable
            .iter()
            .find(|&&c| c > column)
            .map(|&c| (index, c))
            .or_else(|| {
                (index + 1..rows.len())
                    .find(|&i| !rows[i].is_subtotal())
                    .map(|i| (i, first))
            })
            .or_else(|| rows.iter().position(|r| !r.is_subtotal()).map(|i| (i, first)));

        if let Some((i, c)) = next {
            let id = rows[i].id;
            self.begin_edit(id, c);
        }
    }
}
