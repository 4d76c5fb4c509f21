use std::collections::HashSet;

use super::edit::EditState;
use super::observer::{DeleteAck, GridObserver};
use super::store::RowStore;
use super::width::{MIN_COLUMN_WIDTH, WidthManager};
use crate::error::{GridError, Result};
use ledgergrid_engine::engine::{AmountRule, CellValue, ColumnSpec, Row, RowId, SortState};

/// Tunables supplied by the embedding page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridOptions {
    /// Rows appended when Tab/Enter leaves the last editable cell.
    pub append_batch: usize,
    /// Rows appended by an explicit insert.
    pub insert_batch: usize,
    /// Smallest column width reachable by resizing.
    pub min_column_width: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            append_batch: 1,
            insert_batch: 1,
            min_column_width: MIN_COLUMN_WIDTH,
        }
    }
}

/// Grid-wide mode. Every operation that depends on sorting matches on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridMode {
    /// Committed order; subtotals visible; cells editable.
    Normal,
    /// Sorted projection; subtotals hidden; nothing editable.
    Sorted,
}

/// Editable data grid state.
///
/// Holds the row store, the sort controller, the single-cell edit state, the
/// column widths and an optional observer. UI-agnostic: a front end feeds it
/// clicks and keys, draws [`Grid::render`], and reports back with
/// [`Grid::view_settled`].
pub struct Grid {
    pub(crate) store: RowStore,
    pub(crate) mode: GridMode,
    pub(crate) sort: SortState,
    pub(crate) edit: EditState,
    pub(crate) selected_row: Option<RowId>,
    pub(crate) widths: WidthManager,
    pub(crate) options: GridOptions,
    observer: Option<Box<dyn GridObserver>>,
}

impl Grid {
    /// Create a grid over `rows`, resolving the amount rule from column types.
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Row>, options: GridOptions) -> Result<Self> {
        let rule = AmountRule::resolve(&columns);
        Self::with_amount_rule(columns, rows, options, rule)
    }

    /// Create a grid with an explicit amount rule (or none).
    pub fn with_amount_rule(
        columns: Vec<ColumnSpec>,
        rows: Vec<Row>,
        options: GridOptions,
        amount_rule: Option<AmountRule>,
    ) -> Result<Self> {
        validate_columns(&columns, amount_rule.as_ref())?;
        let widths = WidthManager::new(
            columns.iter().map(|c| c.width).collect(),
            options.min_column_width,
        );
        let store = RowStore::new(columns, amount_rule, rows);
        Ok(Grid {
            store,
            mode: GridMode::Normal,
            sort: SortState::default(),
            edit: EditState::Idle,
            selected_row: None,
            widths,
            options,
            observer: None,
        })
    }

    pub fn set_observer(&mut self, observer: Box<dyn GridObserver>) {
        self.observer = Some(observer);
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        self.store.columns()
    }

    /// Committed rows, subtotals included, in committed order.
    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    /// Rows in display order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.store.visible_rows().collect()
    }

    pub fn visible_len(&self) -> usize {
        self.store.working().len()
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn selected_row(&self) -> Option<RowId> {
        self.selected_row
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn widths(&self) -> &WidthManager {
        &self.widths
    }

    pub fn widths_mut(&mut self) -> &mut WidthManager {
        &mut self.widths
    }

    pub fn can_add_subtotal(&self) -> bool {
        self.store.can_add_subtotal()
    }

    pub fn amount_rule(&self) -> Option<&AmountRule> {
        self.store.amount_rule()
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns().iter().position(|c| c.id == column_id)
    }

    pub(crate) fn column_at(&self, index: usize) -> Result<&ColumnSpec> {
        let len = self.columns().len();
        self.columns()
            .get(index)
            .ok_or(GridError::ColumnOutOfRange { index, len })
    }

    /// Replace the input rows, as when the page reloads its data.
    ///
    /// Any edit in progress is dropped without committing; the sort column is
    /// kept and applied to the new rows.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.edit = EditState::Idle;
        self.selected_row = None;
        self.store.replace(rows);
        self.store.project(&self.sort);
        self.notify_change();
    }

    /// Append `count` default rows (the configured insert batch when `None`).
    pub fn insert_rows(&mut self, count: Option<usize>) -> Vec<RowId> {
        let count = count.unwrap_or(self.options.insert_batch).max(1);
        let ids = self.store.insert(count);
        self.store.project(&self.sort);
        self.notify_change();
        ids
    }

    /// Write a cell of the committed row at `index`.
    pub fn set_cell(&mut self, index: usize, column_id: &str, value: CellValue) -> Result<()> {
        self.store.set_cell(index, column_id, value)?;
        self.store.project(&self.sort);
        self.notify_change();
        Ok(())
    }

    /// Insert a subtotal row if one is allowed; otherwise do nothing.
    ///
    /// Subtotals only exist in the committed order, so this is a no-op while
    /// sorted.
    pub fn add_subtotal(&mut self) -> Option<RowId> {
        match self.mode {
            GridMode::Sorted => None,
            GridMode::Normal => {
                self.commit_edit();
                let id = self.store.add_subtotal()?;
                self.store.project(&self.sort);
                self.notify_change();
                Some(id)
            }
        }
    }

    /// Delete the row shown at `visible_index`.
    ///
    /// Returns `Ok(false)` when the observer vetoed the delete.
    pub fn delete_visible_row(&mut self, visible_index: usize) -> Result<bool> {
        let index = self.store.committed_index(visible_index)?;
        let id = self.store.rows()[index].id;
        Ok(self.delete_row(id))
    }

    /// Delete a row by id. Returns `false` if it does not exist or the
    /// observer vetoed the delete.
    pub fn delete_row(&mut self, id: RowId) -> bool {
        if self.store.index_of(id).is_none() {
            return false;
        }
        if let Some(observer) = self.observer.as_mut()
            && observer.on_delete(&[id]) == DeleteAck::Veto
        {
            tracing::debug!(%id, "row delete vetoed");
            return false;
        }
        // The edit may sit on another row; commit it before indices shift.
        if self.edit.row() != Some(id) {
            self.commit_edit();
        }
        if self.edit.row() == Some(id) {
            self.edit = EditState::Idle;
        }
        if self.selected_row == Some(id) {
            self.selected_row = None;
        }
        let Some(index) = self.store.index_of(id) else {
            return false;
        };
        if self.store.delete(index).is_err() {
            return false;
        }
        self.store.project(&self.sort);
        self.notify_change();
        true
    }

    pub(crate) fn notify_change(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_change(self.store.rows());
        }
    }
}

fn validate_columns(columns: &[ColumnSpec], rule: Option<&AmountRule>) -> Result<()> {
    if columns.is_empty() {
        return Err(GridError::NoColumns);
    }
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.id.as_str()) {
            return Err(GridError::DuplicateColumn(column.id.clone()));
        }
    }
    if let Some(rule) = rule {
        let names = [Some(&rule.amount), rule.quantity.as_ref(), rule.rate.as_ref()];
        for name in names.into_iter().flatten() {
            if !seen.contains(name.as_str()) {
                return Err(GridError::UnknownColumn(name.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgergrid_engine::engine::ColumnType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        changes: usize,
        deletes: Vec<RowId>,
        veto: bool,
    }

    struct Shared(Rc<RefCell<Recorder>>);

    impl GridObserver for Shared {
        fn on_change(&mut self, _rows: &[Row]) {
            self.0.borrow_mut().changes += 1;
        }

        fn on_delete(&mut self, ids: &[RowId]) -> DeleteAck {
            let mut rec = self.0.borrow_mut();
            rec.deletes.extend_from_slice(ids);
            if rec.veto { DeleteAck::Veto } else { DeleteAck::Accepted }
        }
    }

    fn grid() -> Grid {
        Grid::new(
            vec![
                ColumnSpec::new("name", "Name", ColumnType::String),
                ColumnSpec::new("qty", "Qty", ColumnType::Number),
                ColumnSpec::new("rate", "Rate", ColumnType::Rate),
                ColumnSpec::new("amount", "Amount", ColumnType::Amount),
            ],
            vec![
                Row::new(RowId(0)).with("name", "a").with("qty", 1i64).with("rate", 2i64),
                Row::new(RowId(0)).with("name", "b").with("qty", 3i64).with("rate", 4i64),
            ],
            GridOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_columns() {
        assert!(matches!(
            Grid::new(Vec::new(), Vec::new(), GridOptions::default()),
            Err(GridError::NoColumns)
        ));
        let dup = vec![
            ColumnSpec::new("a", "A", ColumnType::String),
            ColumnSpec::new("a", "A", ColumnType::Number),
        ];
        assert!(matches!(
            Grid::new(dup, Vec::new(), GridOptions::default()),
            Err(GridError::DuplicateColumn(id)) if id == "a"
        ));
        let cols = vec![ColumnSpec::new("a", "A", ColumnType::Amount)];
        let rule = AmountRule::explicit("a", "q", "r");
        assert!(matches!(
            Grid::with_amount_rule(cols, Vec::new(), GridOptions::default(), Some(rule)),
            Err(GridError::UnknownColumn(id)) if id == "q"
        ));
    }

    #[test]
    fn test_observer_sees_changes() {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let mut grid = grid();
        grid.set_observer(Box::new(Shared(rec.clone())));
        grid.insert_rows(None);
        grid.set_cell(0, "name", CellValue::text("z")).unwrap();
        assert_eq!(rec.borrow().changes, 2);
    }

    #[test]
    fn test_delete_veto_keeps_row() {
        let rec = Rc::new(RefCell::new(Recorder {
            veto: true,
            ..Recorder::default()
        }));
        let mut grid = grid();
        grid.set_observer(Box::new(Shared(rec.clone())));
        assert_eq!(grid.delete_visible_row(0), Ok(false));
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(rec.borrow().deletes, vec![RowId(1)]);
        assert_eq!(rec.borrow().changes, 0);

        rec.borrow_mut().veto = false;
        assert_eq!(grid.delete_visible_row(0), Ok(true));
        assert_eq!(grid.rows().len(), 1);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut grid = grid();
        assert_eq!(
            grid.delete_visible_row(5),
            Err(GridError::RowOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_insert_batch_from_options() {
        let mut grid = Grid::new(
            vec![ColumnSpec::new("name", "Name", ColumnType::String)],
            Vec::new(),
            GridOptions {
                insert_batch: 3,
                ..GridOptions::default()
            },
        )
        .unwrap();
        assert_eq!(grid.insert_rows(None).len(), 3);
        assert_eq!(grid.insert_rows(Some(1)).len(), 1);
        assert_eq!(grid.visible_len(), 4);
    }

    #[test]
    fn test_replace_rows_drops_edit() {
        let mut grid = grid();
        grid.click(0, 0).unwrap();
        grid.replace_rows(vec![Row::new(RowId(99)).with("qty", 5i64).with("rate", 1i64)]);
        assert!(grid.edit_state().is_idle());
        assert_eq!(grid.rows().len(), 1);
        assert_eq!(grid.rows()[0].get("amount"), Some(&CellValue::text("5.00")));
    }
}
