//! Single-column tri-state sorting.

use std::cmp::Ordering;

use super::column::ColumnSpec;
use super::row::Row;
use super::value::CellValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSort {
    pub column: String,
    pub direction: SortDirection,
}

/// At most one sorted column; `None` means rows are shown in committed order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<ActiveSort>,
}

impl SortState {
    pub fn active(&self) -> Option<&ActiveSort> {
        self.active.as_ref()
    }

    pub fn is_sorted(&self) -> bool {
        self.active.is_some()
    }

    pub fn direction_for(&self, column_id: &str) -> Option<SortDirection> {
        self.active
            .as_ref()
            .filter(|a| a.column == column_id)
            .map(|a| a.direction)
    }

    /// Advance `column_id` through none → ascending → descending → none.
    ///
    /// Toggling a different column starts that column at ascending and drops
    /// whatever was sorted before.
    pub fn toggle(&mut self, column_id: &str) {
        self.active = match self.direction_for(column_id) {
            None => Some(ActiveSort {
                column: column_id.to_string(),
                direction: SortDirection::Ascending,
            }),
            Some(SortDirection::Ascending) => Some(ActiveSort {
                column: column_id.to_string(),
                direction: SortDirection::Descending,
            }),
            Some(SortDirection::Descending) => None,
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

fn sort_text(value: Option<&CellValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compare two data-row values of `column`, ignoring direction.
///
/// Numeric columns compare numerically when both sides parse. Values that do
/// not parse sort after every number and compare as text among themselves, so
/// the order stays total on mixed columns.
pub fn compare_values(column: &ColumnSpec, a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    if column.kind.is_numeric() {
        let na = a.and_then(CellValue::as_number);
        let nb = b.and_then(CellValue::as_number);
        match (na, nb) {
            (Some(x), Some(y)) => return x.total_cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }
    }
    compare_text(&sort_text(a), &sort_text(b))
}

/// Row comparator: subtotal rows go after every data row regardless of
/// direction and keep their relative order; data rows compare by value.
pub fn compare_rows(column: &ColumnSpec, direction: SortDirection, a: &Row, b: &Row) -> Ordering {
    match (a.is_subtotal(), b.is_subtotal()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_values(column, a.get(&column.id), b.get(&column.id));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Order of every row under the comparator, ties broken by original index.
pub fn sort_indices(rows: &[Row], column: &ColumnSpec, direction: SortDirection) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&i, &j| compare_rows(column, direction, &rows[i], &rows[j]).then(i.cmp(&j)));
    order
}

/// The sorted view of a committed sequence: data rows only, in sort order.
///
/// Returned as indices into `rows` so the committed sequence stays the single
/// owner of row data.
pub fn project_sorted(rows: &[Row], column: &ColumnSpec, direction: SortDirection) -> Vec<usize> {
    sort_indices(rows, column, direction)
        .into_iter()
        .filter(|&i| !rows[i].is_subtotal())
        .collect()
}
