//! Sort controller: moves the grid between Normal and Sorted mode.

use super::edit::EditState;
use super::state::{Grid, GridMode};
use crate::error::Result;

impl Grid {
    /// Advance the sort on `column` (none → ascending → descending → none).
    ///
    /// Unsortable columns are ignored. Any edit is committed first; a new sort
    /// column replaces the old one.
    pub fn toggle_sort(&mut self, column: usize) -> Result<()> {
        let spec = self.column_at(column)?;
        if !spec.kind.is_sortable() {
            tracing::debug!(column = %spec.id, "column is not sortable");
            return Ok(());
        }
        let id = spec.id.clone();
        self.commit_edit();
        self.sort.toggle(&id);
        tracing::debug!(column = %id, direction = ?self.sort.direction_for(&id), "sort toggled");
        self.apply_sort();
        Ok(())
    }

    /// Drop any sort and return to committed order.
    pub fn clear_sort(&mut self) {
        if !self.sort.is_sorted() {
            return;
        }
        self.commit_edit();
        self.sort.clear();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let next = if self.sort.is_sorted() {
            GridMode::Sorted
        } else {
            GridMode::Normal
        };
        match (self.mode, next) {
            (GridMode::Sorted, GridMode::Normal) => {
                // Back to the committed sequence with fresh amounts.
                self.store.recompute_amounts();
                self.store.recalculate_subtotals();
                self.mode = GridMode::Normal;
                self.store.project(&self.sort);
                self.notify_change();
            }
            (_, GridMode::Sorted) => {
                self.edit = EditState::Idle;
                self.mode = GridMode::Sorted;
                self.store.project(&self.sort);
            }
            (GridMode::Normal, GridMode::Normal) => self.store.project(&self.sort),
        }
    }
}
