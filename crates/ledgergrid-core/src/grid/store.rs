//! Row store: the committed row sequence and its working projection.

use crate::error::{GridError, Result};
use ledgergrid_engine::engine::{
    AmountRule, CellValue, ColumnSpec, Row, RowId, SortState, can_add_subtotal, project_sorted,
    recalculate_subtotals, subtotal_insert_position,
};

/// Owns row data for a grid.
///
/// Two views are kept: `committed`, the authoritative sequence including
/// subtotal rows, and `working`, the indices of `committed` in the order they
/// are shown. In normal mode `working` is the identity; while sorted it is the
/// sorted projection with subtotal rows left out. Only `committed` is ever
/// mutated; `working` is recomputed from it.
pub struct RowStore {
    columns: Vec<ColumnSpec>,
    committed: Vec<Row>,
    working: Vec<usize>,
    amount_rule: Option<AmountRule>,
    can_add_subtotal: bool,
    next_id: u64,
}

impl RowStore {
    /// Build a store from caller rows. Rows get fresh ids, every derived amount
    /// is recomputed and subtotals are restamped.
    pub fn new(columns: Vec<ColumnSpec>, amount_rule: Option<AmountRule>, rows: Vec<Row>) -> Self {
        let mut store = RowStore {
            columns,
            committed: Vec::new(),
            working: Vec::new(),
            amount_rule,
            can_add_subtotal: false,
            next_id: 1,
        };
        store.replace(rows);
        store
    }

    /// Discard current rows and load a new input sequence.
    pub fn replace(&mut self, rows: Vec<Row>) {
        let mut committed = rows;
        for row in committed.iter_mut() {
            row.id = self.allocate_id();
        }
        self.committed = committed;
        self.recompute_amounts();
        self.recalculate_subtotals();
        self.working = (0..self.committed.len()).collect();
        tracing::debug!(rows = self.committed.len(), "row store loaded");
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn amount_rule(&self) -> Option<&AmountRule> {
        self.amount_rule.as_ref()
    }

    pub fn amount_column(&self) -> Option<&str> {
        self.amount_rule.as_ref().map(|r| r.amount.as_str())
    }

    /// The committed sequence.
    pub fn rows(&self) -> &[Row] {
        &self.committed
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.committed.iter().find(|r| r.id == id)
    }

    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.committed.iter().position(|r| r.id == id)
    }

    /// Committed indices in display order.
    pub fn working(&self) -> &[usize] {
        &self.working
    }

    /// Rows in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.working.iter().map(|&i| &self.committed[i])
    }

    /// Committed index of the row shown at `visible_index`.
    pub fn committed_index(&self, visible_index: usize) -> Result<usize> {
        self.working
            .get(visible_index)
            .copied()
            .ok_or(GridError::RowOutOfRange {
                index: visible_index,
                len: self.working.len(),
            })
    }

    /// Recompute the working view for the given sort state.
    pub fn project(&mut self, sort: &SortState) {
        self.working = match sort.active() {
            Some(active) => match self.column(&active.column) {
                Some(column) => project_sorted(&self.committed, column, active.direction),
                None => (0..self.committed.len()).collect(),
            },
            None => (0..self.committed.len()).collect(),
        };
    }

    pub fn can_add_subtotal(&self) -> bool {
        self.can_add_subtotal
    }

    fn refresh_subtotal_guard(&mut self) {
        self.can_add_subtotal = can_add_subtotal(&self.committed, self.amount_column());
    }

    /// Append `count` rows filled with column defaults. Returns their ids.
    pub fn insert(&mut self, count: usize) -> Vec<RowId> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.allocate_id();
            let mut row = Row::with_defaults(id, &self.columns);
            if let Some(rule) = &self.amount_rule {
                rule.apply(&mut row);
            }
            self.committed.push(row);
            ids.push(id);
        }
        self.recalculate_subtotals();
        tracing::debug!(count, total = self.committed.len(), "rows appended");
        ids
    }

    /// Remove the row at committed `index` and restamp all subtotals.
    pub fn delete(&mut self, index: usize) -> Result<Row> {
        if index >= self.committed.len() {
            return Err(GridError::RowOutOfRange {
                index,
                len: self.committed.len(),
            });
        }
        let removed = self.committed.remove(index);
        self.recalculate_subtotals();
        tracing::debug!(index, id = %removed.id, subtotal = removed.is_subtotal(), "row deleted");
        Ok(removed)
    }

    /// Write one cell. Writing a quantity or rate input recomputes the row's
    /// amount; subtotals are restamped either way.
    pub fn set_cell(&mut self, index: usize, column_id: &str, value: CellValue) -> Result<()> {
        if self.column(column_id).is_none() {
            return Err(GridError::UnknownColumn(column_id.to_string()));
        }
        let len = self.committed.len();
        let row = self
            .committed
            .get_mut(index)
            .ok_or(GridError::RowOutOfRange { index, len })?;
        row.set(column_id, value);
        if let Some(rule) = &self.amount_rule
            && rule.is_input(column_id)
        {
            rule.apply(row);
        }
        self.recalculate_subtotals();
        Ok(())
    }

    /// Remove a cell's value entirely (used to revert to "never set").
    pub fn clear_cell(&mut self, index: usize, column_id: &str) -> Result<()> {
        let len = self.committed.len();
        let row = self
            .committed
            .get_mut(index)
            .ok_or(GridError::RowOutOfRange { index, len })?;
        row.cells.remove(column_id);
        if let Some(rule) = &self.amount_rule
            && rule.is_input(column_id)
        {
            rule.apply(row);
        }
        self.recalculate_subtotals();
        Ok(())
    }

    /// Insert a subtotal row after the last data row with a positive amount
    /// that follows the last existing subtotal.
    ///
    /// Does nothing and returns `None` when no such row exists.
    pub fn add_subtotal(&mut self) -> Option<RowId> {
        let at = subtotal_insert_position(&self.committed, self.amount_column())?;
        let id = self.allocate_id();
        let mut row = Row::subtotal(id);
        if let Some(col) = self.amount_column() {
            row.set(col, CellValue::Number(0.0));
        }
        self.committed.insert(at, row);
        self.recalculate_subtotals();
        tracing::debug!(index = at, %id, "subtotal inserted");
        Some(id)
    }

    /// Recompute every data row's derived amount.
    pub fn recompute_amounts(&mut self) {
        if let Some(rule) = &self.amount_rule {
            for row in self.committed.iter_mut() {
                rule.apply(row);
            }
        }
    }

    /// Restamp subtotal rows and refresh the add-subtotal guard.
    pub fn recalculate_subtotals(&mut self) {
        let amount_column = self.amount_rule.as_ref().map(|r| r.amount.as_str());
        recalculate_subtotals(&mut self.committed, amount_column);
        self.refresh_subtotal_guard();
    }
}
