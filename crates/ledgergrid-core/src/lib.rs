//! ledgergrid-core - UI-agnostic editable grid: row store, editing, sorting, widths.

pub mod error;
pub mod grid;

pub use error::{GridError, Result};
pub use grid::{
    CellView, DeleteAck, EditCursor, EditInput, EditState, Grid, GridKey, GridMode, GridObserver,
    GridOptions, HeaderView, RenderedGrid, RowView, WidthManager,
};

pub use ledgergrid_engine::engine::{
    CellValue, ColumnSpec, ColumnType, Row, RowId, SortDirection,
};
