//! Callback payloads exchanged with the host application.

use super::Position;

/// Keyboard modifier state captured from a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    /// Platform command key: Meta on macOS, Ctrl elsewhere.
    pub command: bool,
}

/// Selection-intent callback supplied by the external selection-state
/// owner. `open_editor` is `Some(true)` for double click, `Some(false)`
/// for context menu, and the column's click-to-edit hint for plain click.
pub type SelectCellFn = std::rc::Rc<dyn Fn(Position, Modifiers, Option<bool>)>;

/// Row-level click observers (informational, no behavioral effect).
/// The position identifies the clicked row and column.
pub type RowClickFn = std::rc::Rc<dyn Fn(Position)>;

/// One fill-callback invocation: produce the replacement for
/// `target_row` given the source row. For rectangular fills the target
/// row may already carry the result of a previous column in the same
/// row; results fold left to right.
pub struct FillEvent<'a, R> {
    pub source_column_key: &'a str,
    pub source_row: &'a R,
    pub target_column_key: &'a str,
    pub target_row: R,
    pub target_row_idx: usize,
}

/// Fill callback supplied by the host. Trusted to be pure; the engine
/// does not catch panics from it.
pub type FillFn<R> = Box<dyn Fn(FillEvent<'_, R>) -> R>;

/// What changed in a fill commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowsChange {
    /// Indexes of rows whose content actually changed, ascending.
    pub indexes: Vec<usize>,
    /// Keys of the column(s) the fill touched.
    pub column_keys: Vec<String>,
}

/// Rows-changed notification: the full updated row collection plus the
/// change description. Fired only when at least one row changed.
pub type RowsChangeFn<R> = Box<dyn Fn(Vec<R>, RowsChange)>;

/// Observer notified when a fill gesture ends, whether or not it
/// committed anything.
pub type DragEndFn = Box<dyn Fn()>;
