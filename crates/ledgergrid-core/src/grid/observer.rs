//! Callbacks from the grid to its embedding page.

use ledgergrid_engine::engine::{Row, RowId};

/// The page's answer to a delete request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteAck {
    /// Remove the rows.
    Accepted,
    /// Keep the rows (for example, the backend refused the delete).
    Veto,
}

/// Receives row mutations from a [`Grid`](super::Grid).
///
/// Both methods have defaults so a page only implements what it cares about.
pub trait GridObserver {
    /// Called after any mutation of the committed rows.
    fn on_change(&mut self, _rows: &[Row]) {}

    /// Called before rows are removed; the rows stay when this returns
    /// [`DeleteAck::Veto`].
    fn on_delete(&mut self, _ids: &[RowId]) -> DeleteAck {
        DeleteAck::Accepted
    }
}
