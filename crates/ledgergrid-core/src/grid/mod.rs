//! Grid state and logic (UI-agnostic).

mod edit;
mod observer;
mod render;
mod sort;
mod state;
mod store;
mod width;

pub use edit::{EditCursor, EditInput, EditState, GridKey};
pub use observer::{DeleteAck, GridObserver};
pub use render::{CellView, HeaderView, RenderedGrid, RowView};
pub use state::{Grid, GridMode, GridOptions};
pub use store::RowStore;
pub use width::{DragCapture, MIN_COLUMN_WIDTH, WidthManager};
