//! Row rendering contract.
//!
//! [`plan_row`] computes the visible cell layout for one row (span
//! collapsing, editor substitution, fill-handle placement) as plain
//! data. The wasm-only [`RowElement`] materializes a planned row as a
//! `div[role="row"]` whose children the view mounts per slot.

use crate::types::{resolve_col_span, ColSpanContext, Column, GridConfig};

/// What occupies one planned cell slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A regular cell rendered through the cell contract.
    Cell,
    /// The externally supplied editor element, substituted at the
    /// selected position.
    Editor,
}

/// One rendered node in a row: a column (possibly spanning several) with
/// its selection/copy/drag membership resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSlot {
    /// Column index (`Column::idx`) of the leading column.
    pub idx: usize,
    /// Span count when this slot collapses multiple columns.
    pub col_span: Option<usize>,
    pub is_selected: bool,
    pub is_copied: bool,
    pub is_dragged_over: bool,
    pub kind: SlotKind,
    /// Whether this slot is the one cell eligible to carry the fill
    /// handle (selected, regular cell, not a row group).
    pub has_drag_handle: bool,
}

/// Compute the cell slots for one row over the viewport column slice.
///
/// Columns are iterated left to right; a column whose span function
/// returns `n > 1` produces one slot and skips the next `n - 1` columns,
/// using the same resolution rule as header rows (the context carries the
/// row data). When a selected column index has an external editor
/// supplied, the editor is substituted for the regular cell.
pub fn plan_row<R>(
    viewport_columns: &[Column<R>],
    row: &R,
    last_frozen_idx: Option<usize>,
    selected_cols: Option<&[usize]>,
    copied_cols: &[usize],
    is_dragged_over: &dyn Fn(usize) -> bool,
    has_editor: bool,
) -> Vec<CellSlot> {
    let mut slots = Vec::with_capacity(viewport_columns.len());
    let mut index = 0;

    while let Some(column) = viewport_columns.get(index) {
        let col_span = resolve_col_span(column, last_frozen_idx, ColSpanContext::Row(row))
            // A span never runs past the visible slice.
            .map(|span| span.min(viewport_columns.len() - index))
            .filter(|span| *span > 1);
        index += col_span.unwrap_or(1);

        let idx = column.idx;
        let is_selected = selected_cols.is_some_and(|set| set.contains(&idx));
        let kind = if is_selected && has_editor {
            SlotKind::Editor
        } else {
            SlotKind::Cell
        };

        slots.push(CellSlot {
            idx,
            col_span,
            is_selected,
            is_copied: copied_cols.contains(&idx),
            is_dragged_over: is_dragged_over(idx),
            kind,
            has_drag_handle: is_selected && kind == SlotKind::Cell && !column.row_group,
        });
    }

    slots
}

/// Class list for a row node: base class, even/odd parity, then the
/// externally supplied per-row class. Informational only.
pub fn row_class_name(config: &GridConfig, row_idx: usize, row_class: Option<&str>) -> String {
    let parity = if row_idx % 2 == 0 { "row-even" } else { "row-odd" };
    let mut class_name = format!("{} {}", config.class("row"), config.class(parity));
    if let Some(extra) = row_class {
        class_name.push(' ');
        class_name.push_str(extra);
    }
    class_name
}

#[cfg(target_arch = "wasm32")]
pub(crate) use dom::RowElement;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlDivElement, HtmlElement};

    use crate::error::{GridError, Result};
    use crate::grid::cell::CellElement;

    /// One mounted `div[role="row"]`.
    ///
    /// The row exposes its vertical offset and height as layout
    /// variables for the virtualization layer; it does not decide
    /// whether it is mounted.
    pub(crate) struct RowElement {
        element: HtmlDivElement,
        cells: Vec<CellElement>,
    }

    impl RowElement {
        pub(crate) fn new(
            document: &Document,
            class_name: &str,
            top: f32,
            height: f32,
            grid_template_columns: &str,
        ) -> Result<Self> {
            let element = document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlDivElement>().ok())
                .ok_or_else(|| GridError::Dom("failed to create row element".into()))?;

            let _ = element.set_attribute("role", "row");
            element.set_class_name(class_name);

            let style = element.style();
            let _ = style.set_property("display", "grid");
            let _ = style.set_property("grid-template-columns", grid_template_columns);
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("top", &format!("{top}px"));
            let _ = style.set_property("--gv-row-height", &format!("{height}px"));
            let _ = style.set_property("height", "var(--gv-row-height)");

            Ok(Self {
                element,
                cells: Vec::new(),
            })
        }

        pub(crate) fn element(&self) -> &HtmlDivElement {
            &self.element
        }

        /// Rows are tab stops only when row-focused; a selected cell
        /// takes the tab stop for itself.
        pub(crate) fn set_tab_index(&self, tab_index: i32) {
            let _ = self
                .element
                .set_attribute("tabindex", &tab_index.to_string());
        }

        /// Append a regular cell as the next child.
        pub(crate) fn mount_cell(&mut self, cell: CellElement) {
            let _ = self.element.append_child(cell.element());
            self.cells.push(cell);
        }

        /// Substitute the externally supplied editor element at the
        /// selected position.
        pub(crate) fn mount_editor(&self, editor: &HtmlElement) {
            let _ = self.element.append_child(editor);
        }

        pub(crate) fn cells_mut(&mut self) -> &mut [CellElement] {
            &mut self.cells
        }
    }

    impl Drop for RowElement {
        fn drop(&mut self) {
            // Cells detach themselves; remove the row node itself.
            self.cells.clear();
            if let Some(parent) = self.element.parent_node() {
                let _ = parent.remove_child(&self.element);
            }
        }
    }
}
