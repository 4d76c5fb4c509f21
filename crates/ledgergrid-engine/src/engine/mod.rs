//! Grid data layer.
//!
//! This module provides the pieces every grid component consults:
//!
//! - [`CellValue`], [`Row`], [`RowId`], [`RowKind`] - Row data
//! - [`ColumnSpec`], [`ColumnType`], [`TypeRules`] - The column type contract
//! - [`live_format`], [`commit_value`], [`display_value`] - Input filtering and display
//! - [`AmountRule`], [`recalculate_subtotals`] - Derived amounts and subtotals
//! - [`SortState`], [`project_sorted`] - Single-column sorting

mod column;
mod format;
mod row;
mod sort;
mod subtotal;
mod value;

pub use column::{
    ColumnSpec, ColumnType, DEFAULT_COLUMN_WIDTH, DefaultValue, InputFilter, ListOption, TypeRules,
};
pub use format::{
    CHECKED_ICON, DELETE_ICON, MAX_NUMERIC_INPUT, UNCHECKED_ICON, commit_value, display_readonly,
    display_value, edit_text, format_amount, format_trimmed, live_format, looks_numeric, round2,
};
pub use row::{Row, RowId, RowKind};
pub use sort::{
    ActiveSort, SortDirection, SortState, compare_rows, compare_values, project_sorted,
    sort_indices,
};
pub use subtotal::{
    AmountRule, can_add_subtotal, last_subtotal_index, recalculate_subtotals, row_amount,
    subtotal_insert_position,
};
pub use value::CellValue;
