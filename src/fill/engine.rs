//! Fill gesture state machine and commit logic.
//!
//! One [`FillEngine`] owns the life cycle of one fill gesture at a time:
//! the dragging flag, the dragged-over marker written on every hover and
//! read once at release, and the commit that folds fill-callback results
//! into a replacement row collection. The engine is platform-independent;
//! DOM listener plumbing lives in the wasm-only `handle` module.

use crate::types::{
    CellEditableFn, Column, DragEndFn, FillEvent, FillMode, Position, RowsChange, RowsChangeFn,
    SelectedRange,
};

use super::range;

/// Primary button mask in `MouseEvent.buttons`.
pub const PRIMARY_BUTTON: u16 = 1;

/// Drives fill-handle drags for a row collection of type `R`.
///
/// `R` is opaque: the engine only clones rows, hands them to the fill
/// callback, and compares replacements against originals with
/// `PartialEq` to decide which rows actually changed.
pub struct FillEngine<R> {
    mode: FillMode,
    dragging: bool,
    /// Last hovered position while dragging. Only the row component is
    /// meaningful in column-only mode. Cleared on every gesture exit.
    dragged_over: Option<Position>,
    is_cell_editable: CellEditableFn,
    on_fill: crate::types::FillFn<R>,
    on_rows_change: Option<RowsChangeFn<R>>,
    on_drag_end: Option<DragEndFn>,
}

impl<R: Clone + PartialEq> FillEngine<R> {
    pub fn new(
        mode: FillMode,
        is_cell_editable: CellEditableFn,
        on_fill: crate::types::FillFn<R>,
    ) -> Self {
        Self {
            mode,
            dragging: false,
            dragged_over: None,
            is_cell_editable,
            on_fill,
            on_rows_change: None,
            on_drag_end: None,
        }
    }

    pub fn on_rows_change(mut self, f: RowsChangeFn<R>) -> Self {
        self.on_rows_change = Some(f);
        self
    }

    pub fn on_drag_end(mut self, f: DragEndFn) -> Self {
        self.on_drag_end = Some(f);
        self
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a gesture. Only a primary-button (single-button) press on
    /// the handle starts one; anything else is ignored.
    pub fn begin_drag(&mut self, buttons: u16) -> bool {
        if buttons != PRIMARY_BUTTON {
            return false;
        }
        self.dragging = true;
        self.dragged_over = None;
        true
    }

    /// Record the position under the pointer. No-op outside a gesture;
    /// hover events are processed in delivery order, so the last call
    /// before release wins.
    pub fn drag_over(&mut self, pos: Position) {
        if self.dragging {
            self.dragged_over = Some(pos);
        }
    }

    /// The range the current gesture would commit, for preview painting.
    pub fn preview_range(&self, source: Position) -> Option<SelectedRange> {
        if !self.dragging {
            return None;
        }
        let hovered = self.dragged_over?;
        range::committed_range(self.mode, source, hovered)
    }

    /// Whether `pos` should paint the dragged-over highlight. The source
    /// cell never does.
    pub fn is_dragged_over(&self, source: Position, pos: Position) -> bool {
        if pos == source {
            return false;
        }
        self.preview_range(source)
            .is_some_and(|range| range.contains(pos))
    }

    /// End the gesture and commit. A release with no recorded hover is a
    /// benign no-op; the dragging flag and marker are cleared and the
    /// drag-ended observer notified on every path.
    pub fn release(&mut self, rows: &[R], columns: &[Column<R>], source: Position) {
        let hovered = self.dragged_over.take();
        self.dragging = false;

        if let Some(hovered) = hovered {
            if let Some(range) = range::committed_range(self.mode, source, hovered) {
                self.commit(rows, columns, source, range);
            }
        }

        if let Some(f) = &self.on_drag_end {
            f();
        }
    }

    /// Double-click shortcut: fill from the row after the source down to
    /// the last row, without a hover phase. Not a drag, so the drag-ended
    /// observer is not involved.
    pub fn fill_to_end(&mut self, rows: &[R], columns: &[Column<R>], source: Position) {
        if let Some(range) = range::fill_to_end_range(source, rows.len()) {
            self.commit(rows, columns, source, range);
        }
    }

    /// Run the fill callback over every eligible cell in `range`, fold
    /// per-column results into one replacement row per row, and notify
    /// rows-changed when at least one row's content differs.
    ///
    /// Rows outside the range are never touched; the outgoing collection
    /// is only materialized when there is something to report.
    fn commit(&self, rows: &[R], columns: &[Column<R>], source: Position, range: SelectedRange) {
        if rows.is_empty() || !source.in_bounds(rows.len(), columns.len()) {
            return;
        }
        let Some(source_row) = rows.get(source.row_idx) else {
            return;
        };
        let Some(source_column) = columns.get(source.idx) else {
            return;
        };

        // Clip to the supplied collections; hover may have wandered past
        // the mounted window.
        let end_row = range.end_row.min(rows.len().saturating_sub(1));
        let end_col = range.end_col.min(columns.len().saturating_sub(1));
        if range.start_row > end_row || range.start_col > end_col {
            return;
        }

        let mut replacements: Vec<(usize, R)> = Vec::new();

        for row_idx in range.start_row..=end_row {
            let Some(original) = rows.get(row_idx) else {
                continue;
            };
            let mut replacement = original.clone();
            let mut touched = false;

            for col_idx in range.start_col..=end_col {
                let pos = Position::new(row_idx, col_idx);
                if pos == source || !(self.is_cell_editable)(pos) {
                    continue;
                }
                let Some(target_column) = columns.get(col_idx) else {
                    continue;
                };
                replacement = (self.on_fill)(FillEvent {
                    source_column_key: &source_column.key,
                    source_row,
                    target_column_key: &target_column.key,
                    target_row: replacement,
                    target_row_idx: row_idx,
                });
                touched = true;
            }

            if touched && replacement != *original {
                replacements.push((row_idx, replacement));
            }
        }

        if replacements.is_empty() {
            return;
        }

        if let Some(notify) = &self.on_rows_change {
            let indexes: Vec<usize> = replacements.iter().map(|(i, _)| *i).collect();
            let mut updated: Vec<R> = rows.to_vec();
            for (row_idx, replacement) in replacements {
                if let Some(slot) = updated.get_mut(row_idx) {
                    *slot = replacement;
                }
            }
            let column_keys: Vec<String> = (range.start_col..=end_col)
                .filter_map(|idx| columns.get(idx))
                .map(|c| c.key.clone())
                .collect();
            notify(
                updated,
                RowsChange {
                    indexes,
                    column_keys,
                },
            );
        }
    }
}
