//! Roving tab-index controller.
//!
//! Single source of truth for which grid element is the keyboard tab
//! stop. The controller is pure state; the view reads tab indexes from
//! it on every render pass and performs the imperative DOM `focus()`
//! when a selection was reached without the pointer.

use crate::types::Position;

/// Where the tab stop currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    /// No element in the grid is a tab stop.
    #[default]
    NoSelection,
    /// A whole row is the tab stop (no cell selected within it).
    RowFocused(usize),
    /// One cell is the tab stop.
    CellFocused(Position),
}

/// Roving focus state machine.
///
/// Invariant: for any state, at most one `(row, cell)` query answers
/// `tab_index == 0`; everything else gets `-1`. This holds across
/// re-renders triggered by virtualization mount/unmount because tab
/// indexes are derived from this state, never stored in the DOM.
#[derive(Debug, Default)]
pub struct RovingFocus {
    state: FocusState,
    /// Set when the current selection was reached via a non-pointer
    /// event and DOM focus must be moved on the next render.
    pending_focus: Option<Position>,
}

impl RovingFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    /// Make `position` the tab stop. `via_pointer` distinguishes a click
    /// (the browser already focused the element) from programmatic or
    /// keyboard selection, which needs an imperative focus move so
    /// Tab/arrow navigation originates from the new cell.
    pub fn select(&mut self, position: Position, via_pointer: bool) {
        self.state = FocusState::CellFocused(position);
        self.pending_focus = if via_pointer { None } else { Some(position) };
    }

    /// Make a whole row the tab stop (no cell selected within it).
    pub fn focus_row(&mut self, row_idx: usize) {
        self.state = FocusState::RowFocused(row_idx);
        self.pending_focus = None;
    }

    /// Drop the tab stop entirely; no element is keyboard-reachable
    /// until the next selection.
    pub fn clear(&mut self) {
        self.state = FocusState::NoSelection;
        self.pending_focus = None;
    }

    /// Tab index for the cell at `position`.
    pub fn cell_tab_index(&self, position: Position) -> i32 {
        match self.state {
            FocusState::CellFocused(selected) if selected == position => 0,
            _ => -1,
        }
    }

    /// Tab index for the row node at `row_idx`. A row is only a tab stop
    /// when it is row-focused; a cell-focused row delegates to the cell.
    pub fn row_tab_index(&self, row_idx: usize) -> i32 {
        match self.state {
            FocusState::RowFocused(focused) if focused == row_idx => 0,
            _ => -1,
        }
    }

    /// The position awaiting an imperative DOM focus, if any. Consumed
    /// by the render pass.
    pub fn take_pending_focus(&mut self) -> Option<Position> {
        self.pending_focus.take()
    }
}
