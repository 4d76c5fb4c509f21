//! Column width manager with drag-to-resize.

/// Smallest width a column can be dragged or nudged to.
pub const MIN_COLUMN_WIDTH: u32 = 30;

/// State captured when a resize handle is grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragCapture {
    pub column: usize,
    pub start_x: i32,
    pub start_width: u32,
}

/// Per-column widths for the current session.
///
/// A drag holds at most one [`DragCapture`]. It is taken on pointer-down and
/// released by pointer-up or [`WidthManager::cancel_drag`]; a new pointer-down
/// replaces a capture that was never released.
#[derive(Clone, Debug)]
pub struct WidthManager {
    widths: Vec<u32>,
    min_width: u32,
    drag: Option<DragCapture>,
}

impl WidthManager {
    pub fn new(widths: Vec<u32>, min_width: u32) -> Self {
        let widths = widths.into_iter().map(|w| w.max(min_width)).collect();
        WidthManager {
            widths,
            min_width,
            drag: None,
        }
    }

    pub fn width(&self, column: usize) -> u32 {
        self.widths.get(column).copied().unwrap_or(self.min_width)
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<&DragCapture> {
        self.drag.as_ref()
    }

    /// Grab the resize handle of `column` at pointer position `x`.
    ///
    /// Returns `false` for a column that does not exist.
    pub fn pointer_down(&mut self, column: usize, x: i32) -> bool {
        let Some(&start_width) = self.widths.get(column) else {
            return false;
        };
        if let Some(stale) = self.drag.take() {
            tracing::debug!(column = stale.column, "replacing unreleased resize capture");
        }
        self.drag = Some(DragCapture {
            column,
            start_x: x,
            start_width,
        });
        true
    }

    /// Follow the pointer. Returns the new width while a drag is active.
    pub fn pointer_move(&mut self, x: i32) -> Option<u32> {
        let drag = self.drag?;
        let width = clamp_width(drag.start_width, x - drag.start_x, self.min_width);
        self.widths[drag.column] = width;
        Some(width)
    }

    /// Release the pointer. The last move's width stays; returns the column
    /// and its final width if a drag was active.
    pub fn pointer_up(&mut self, x: i32) -> Option<(usize, u32)> {
        self.pointer_move(x)?;
        let drag = self.drag.take()?;
        let width = self.widths[drag.column];
        tracing::debug!(column = drag.column, width, "column resized");
        Some((drag.column, width))
    }

    /// Release the capture at the last width set by a move.
    pub fn end_drag(&mut self) -> Option<(usize, u32)> {
        let drag = self.drag.take()?;
        Some((drag.column, self.widths[drag.column]))
    }

    /// Drop an active drag without applying further movement.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Grow or shrink a column by `delta`, honouring the minimum width.
    pub fn nudge(&mut self, column: usize, delta: i32) -> Option<u32> {
        let min_width = self.min_width;
        let width = self.widths.get_mut(column)?;
        *width = clamp_width(*width, delta, min_width);
        Some(*width)
    }
}

fn clamp_width(start: u32, delta: i32, min_width: u32) -> u32 {
    let target = i64::from(start) + i64::from(delta);
    target.clamp(i64::from(min_width), i64::from(u32::MAX)) as u32
}
