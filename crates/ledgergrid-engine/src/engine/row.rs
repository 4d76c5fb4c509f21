//! Grid rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::column::ColumnSpec;
use super::value::CellValue;

/// Stable identity of a row, independent of its position.
///
/// Positions change under sorting, insertion and deletion; edit state and the
/// row highlight refer to rows by id so they survive all three.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a row holds data or summarizes the data rows above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    Data,
    /// `end_index` is the index of the last data row included in the sum at the
    /// last recompute; `None` when nothing precedes the subtotal.
    Subtotal { end_index: Option<usize> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub kind: RowKind,
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(id: RowId) -> Row {
        Row {
            id,
            kind: RowKind::Data,
            cells: BTreeMap::new(),
        }
    }

    /// A data row with every column set to its type's default value.
    pub fn with_defaults(id: RowId, columns: &[ColumnSpec]) -> Row {
        let cells = columns
            .iter()
            .map(|col| (col.id.clone(), col.kind.default_value()))
            .collect();
        Row {
            id,
            kind: RowKind::Data,
            cells,
        }
    }

    pub fn subtotal(id: RowId) -> Row {
        Row {
            id,
            kind: RowKind::Subtotal { end_index: None },
            cells: BTreeMap::new(),
        }
    }

    pub fn is_subtotal(&self) -> bool {
        matches!(self.kind, RowKind::Subtotal { .. })
    }

    pub fn subtotal_end_index(&self) -> Option<usize> {
        match self.kind {
            RowKind::Subtotal { end_index } => end_index,
            RowKind::Data => None,
        }
    }

    pub fn get(&self, column_id: &str) -> Option<&CellValue> {
        self.cells.get(column_id)
    }

    pub fn set(&mut self, column_id: &str, value: CellValue) {
        self.cells.insert(column_id.to_string(), value);
    }

    /// Builder-style setter, handy when assembling rows by hand.
    pub fn with(mut self, column_id: &str, value: impl Into<CellValue>) -> Row {
        self.set(column_id, value.into());
        self
    }
}
