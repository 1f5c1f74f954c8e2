//! Column model.
//!
//! A [`Column`] is immutable for the duration of a render pass. The grid
//! core never inspects row data directly; formatting, per-row classes,
//! column spans, and editability all go through callback slots carried on
//! the column, each with a no-op default when omitted.

use super::Position;

/// Default column width in logical pixels.
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Per-row display content for a cell.
pub type FormatterFn<R> = Box<dyn Fn(&R) -> String>;

/// Optional per-row CSS class contributed by the column.
pub type CellClassFn<R> = Box<dyn Fn(&R) -> Option<String>>;

/// Optional column-span resolution, shared between header and body rows.
pub type ColSpanFn<R> = Box<dyn Fn(&ColSpanArgs<'_, R>) -> Option<usize>>;

/// External editability predicate used by the fill engine.
pub type CellEditableFn = Box<dyn Fn(Position) -> bool>;

/// Where a span is being resolved. Body rows carry the row record so the
/// span may depend on data.
pub enum ColSpanContext<'a, R> {
    Header,
    Row(&'a R),
}

/// Arguments to a column's span function.
pub struct ColSpanArgs<'a, R> {
    /// Index of the last frozen column, if any columns are frozen.
    pub last_frozen_idx: Option<usize>,
    pub context: ColSpanContext<'a, R>,
}

/// Editability of a column's cells.
pub enum Editable<R> {
    /// Cells are never editable (the default).
    Never,
    /// Cells are always editable.
    Always,
    /// Editability depends on the row.
    PerRow(Box<dyn Fn(&R) -> bool>),
}

/// Editor behavior options for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// Open the editor on a single click (instead of double click only).
    pub edit_on_click: bool,
}

/// One grid column: identity, layout info, and behavior callbacks.
pub struct Column<R> {
    /// Unique identifier, stable across renders.
    pub key: String,
    /// 0-based position within the full column list.
    pub idx: usize,
    /// Layout width in logical pixels.
    pub width: f32,
    /// Row-group placeholder columns render no content and no fill handle.
    pub row_group: bool,
    pub editable: Editable<R>,
    pub editor_options: Option<EditorOptions>,
    pub formatter: FormatterFn<R>,
    pub cell_class: Option<CellClassFn<R>>,
    pub col_span: Option<ColSpanFn<R>>,
}

impl<R> Column<R> {
    /// Create a column with default behavior: default width, not a row
    /// group, not editable, empty content, no class, no span.
    pub fn new(key: impl Into<String>, idx: usize) -> Self {
        Self {
            key: key.into(),
            idx,
            width: DEFAULT_COL_WIDTH,
            row_group: false,
            editable: Editable::Never,
            editor_options: None,
            formatter: Box::new(|_| String::new()),
            cell_class: None,
            col_span: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_row_group(mut self) -> Self {
        self.row_group = true;
        self
    }

    pub fn with_editable(mut self, editable: Editable<R>) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_editor_options(mut self, options: EditorOptions) -> Self {
        self.editor_options = Some(options);
        self
    }

    pub fn with_formatter(mut self, f: impl Fn(&R) -> String + 'static) -> Self {
        self.formatter = Box::new(f);
        self
    }

    pub fn with_cell_class(mut self, f: impl Fn(&R) -> Option<String> + 'static) -> Self {
        self.cell_class = Some(Box::new(f));
        self
    }

    pub fn with_col_span(
        mut self,
        f: impl Fn(&ColSpanArgs<'_, R>) -> Option<usize> + 'static,
    ) -> Self {
        self.col_span = Some(Box::new(f));
        self
    }

    /// Whether this column's cell is editable for the given row.
    pub fn is_editable(&self, row: &R) -> bool {
        match &self.editable {
            Editable::Never => false,
            Editable::Always => true,
            Editable::PerRow(f) => f(row),
        }
    }

    /// The `edit_on_click` hint passed to the selection callback on click.
    /// `None` when the column declares no editor options.
    pub fn edit_on_click(&self) -> Option<bool> {
        self.editor_options.map(|o| o.edit_on_click)
    }
}

/// Resolve a column's span, using the same rule for header and body rows.
///
/// Returns `None` when the column declares no span function or the
/// function declines. Spans of 0 or 1 are treated as "no span".
pub fn resolve_col_span<R>(
    column: &Column<R>,
    last_frozen_idx: Option<usize>,
    context: ColSpanContext<'_, R>,
) -> Option<usize> {
    let f = column.col_span.as_ref()?;
    let span = f(&ColSpanArgs {
        last_frozen_idx,
        context,
    })?;
    if span > 1 {
        Some(span)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_noop() {
        let col: Column<u32> = Column::new("id", 0);
        assert!(!col.is_editable(&7));
        assert_eq!((col.formatter)(&7), "");
        assert_eq!(col.edit_on_click(), None);
        assert_eq!(resolve_col_span(&col, None, ColSpanContext::Header), None);
    }

    #[test]
    fn test_span_of_one_collapses_to_none() {
        let col: Column<u32> = Column::new("a", 1).with_col_span(|_| Some(1));
        assert_eq!(
            resolve_col_span(&col, None, ColSpanContext::Row(&0)),
            None
        );
    }

    #[test]
    fn test_span_sees_row_context() {
        let col: Column<u32> = Column::new("a", 1).with_col_span(|args| match &args.context {
            ColSpanContext::Row(row) if **row == 42 => Some(3),
            _ => None,
        });
        assert_eq!(
            resolve_col_span(&col, None, ColSpanContext::Row(&42)),
            Some(3)
        );
        assert_eq!(resolve_col_span(&col, None, ColSpanContext::Header), None);
    }

    #[test]
    fn test_per_row_editable() {
        let col: Column<u32> = Column::new("a", 0).with_editable(Editable::PerRow(Box::new(
            |row: &u32| *row % 2 == 0,
        )));
        assert!(col.is_editable(&4));
        assert!(!col.is_editable(&5));
    }
}
