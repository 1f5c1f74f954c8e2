//! Cell rendering contract.
//!
//! Split the way the selection overlay is in the reference stack: a pure
//! value computation ([`cell_spec`]) that tests natively, and a wasm-only
//! DOM element ([`CellElement`]) that materializes it and wires pointer
//! handlers.

use crate::types::{Column, GridConfig};

/// Inputs to one cell render. A pure function of these produces the
/// rendered state; identical inputs produce identical output.
pub struct CellProps<'a, R> {
    pub column: &'a Column<R>,
    pub row: &'a R,
    /// Resolved span for this cell, `None` for a plain single cell.
    pub col_span: Option<usize>,
    pub is_selected: bool,
    pub is_copied: bool,
    pub is_dragged_over: bool,
    /// Tab index assigned by the roving focus controller.
    pub tab_index: i32,
}

/// The rendered state of one cell, ready to apply to a DOM node.
///
/// `PartialEq` so a retained-mode host can skip re-applying an unchanged
/// spec (the memoization contract).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpec {
    /// Space-separated class list in composition order: base, copied,
    /// dragged-over, column-supplied. All additive.
    pub class_name: String,
    /// 1-based column index for `aria-colindex`.
    pub aria_colindex: usize,
    /// Span count for `aria-colspan`, when spanned.
    pub aria_colspan: Option<usize>,
    pub aria_selected: bool,
    /// Set when the column/row pair is not editable.
    pub aria_readonly: bool,
    pub tab_index: i32,
    /// Display content. `None` for row-group placeholder cells, which
    /// render nothing and never carry a fill handle.
    pub content: Option<String>,
}

impl CellSpec {
    /// Whether a fill handle may be attached to this cell's node.
    pub fn fillable(&self) -> bool {
        self.content.is_some()
    }
}

/// Compute the rendered state for one cell.
pub fn cell_spec<R>(config: &GridConfig, props: &CellProps<'_, R>) -> CellSpec {
    let column = props.column;

    let mut class_name = config.class("cell");
    if props.is_copied {
        class_name.push(' ');
        class_name.push_str(&config.class("cell-copied"));
    }
    if props.is_dragged_over {
        class_name.push(' ');
        class_name.push_str(&config.class("cell-dragged-over"));
    }
    if let Some(f) = &column.cell_class {
        if let Some(extra) = f(props.row) {
            class_name.push(' ');
            class_name.push_str(&extra);
        }
    }

    let content = if column.row_group {
        None
    } else {
        Some((column.formatter)(props.row))
    };

    CellSpec {
        class_name,
        aria_colindex: column.idx + 1,
        aria_colspan: props.col_span,
        aria_selected: props.is_selected,
        aria_readonly: !column.is_editable(props.row),
        tab_index: props.tab_index,
        content,
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) use dom::{CellCallbacks, CellElement};

#[cfg(target_arch = "wasm32")]
mod dom {
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlDivElement, MouseEvent};

    use super::CellSpec;
    use crate::error::{GridError, Result};
    use crate::types::{Modifiers, Position, RowClickFn, SelectCellFn};

    /// Handlers a cell forwards pointer gestures to.
    pub(crate) struct CellCallbacks {
        pub select_cell: SelectCellFn,
        pub on_row_click: Option<RowClickFn>,
        pub on_row_double_click: Option<RowClickFn>,
        /// Relayed to the enclosing row; the drag engine consumes it to
        /// update the dragged-over marker.
        pub on_mouse_enter: Rc<dyn Fn(Position)>,
    }

    /// One mounted `div[role="gridcell"]`.
    ///
    /// Handlers are wired once at mount; [`CellElement::apply`] re-applies
    /// a [`CellSpec`] and skips the DOM writes when it is unchanged.
    pub(crate) struct CellElement {
        element: HtmlDivElement,
        last: Option<CellSpec>,
        #[allow(dead_code)] // Kept alive for the listeners' sake
        closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    }

    impl CellElement {
        /// Create the cell node at `position`, spanning `col_span`
        /// columns of the enclosing row grid.
        ///
        /// `edit_on_click` is the column's click-to-edit hint, forwarded
        /// verbatim with the selection intent.
        pub(crate) fn new(
            document: &Document,
            position: Position,
            grid_column_start: usize,
            col_span: Option<usize>,
            edit_on_click: Option<bool>,
            callbacks: &CellCallbacks,
        ) -> Result<Self> {
            let element = document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlDivElement>().ok())
                .ok_or_else(|| GridError::Dom("failed to create cell element".into()))?;

            let _ = element.set_attribute("role", "gridcell");
            let style = element.style();
            let span = col_span.unwrap_or(1);
            let _ = style.set_property(
                "grid-column",
                &format!("{grid_column_start} / span {span}"),
            );

            let mut closures: Vec<Closure<dyn FnMut(MouseEvent)>> = Vec::new();

            // Primary click: selection intent with modifiers and the
            // column's click-to-edit hint, plus the row-click observer.
            {
                let select_cell = Rc::clone(&callbacks.select_cell);
                let on_row_click = callbacks.on_row_click.clone();
                let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                    let modifiers = Modifiers {
                        shift: event.shift_key(),
                        command: event.meta_key() || event.ctrl_key(),
                    };
                    select_cell(position, modifiers, edit_on_click);
                    if let Some(observer) = &on_row_click {
                        observer(position);
                    }
                }) as Box<dyn FnMut(MouseEvent)>);
                element
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                    .ok();
                closures.push(closure);
            }

            // Double click always opens the editor.
            {
                let select_cell = Rc::clone(&callbacks.select_cell);
                let on_row_double_click = callbacks.on_row_double_click.clone();
                let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                    select_cell(position, Modifiers::default(), Some(true));
                    if let Some(observer) = &on_row_double_click {
                        observer(position);
                    }
                }) as Box<dyn FnMut(MouseEvent)>);
                element
                    .add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref())
                    .ok();
                closures.push(closure);
            }

            // Context menu selects without opening an editor, so the
            // browser menu never coincides with an editor pop-open.
            {
                let select_cell = Rc::clone(&callbacks.select_cell);
                let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                    select_cell(position, Modifiers::default(), Some(false));
                }) as Box<dyn FnMut(MouseEvent)>);
                element
                    .add_event_listener_with_callback(
                        "contextmenu",
                        closure.as_ref().unchecked_ref(),
                    )
                    .ok();
                closures.push(closure);
            }

            // Pointer enter feeds the dragged-over marker.
            {
                let on_mouse_enter = Rc::clone(&callbacks.on_mouse_enter);
                let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                    on_mouse_enter(position);
                }) as Box<dyn FnMut(MouseEvent)>);
                element
                    .add_event_listener_with_callback(
                        "mouseenter",
                        closure.as_ref().unchecked_ref(),
                    )
                    .ok();
                closures.push(closure);
            }

            Ok(Self {
                element,
                last: None,
                closures,
            })
        }

        pub(crate) fn element(&self) -> &HtmlDivElement {
            &self.element
        }

        /// Apply a spec to the node. Returns `false` when the spec equals
        /// the one already applied and nothing was written.
        pub(crate) fn apply(&mut self, spec: &CellSpec) -> bool {
            if self.last.as_ref() == Some(spec) {
                return false;
            }

            self.element.set_class_name(&spec.class_name);
            let _ = self
                .element
                .set_attribute("aria-colindex", &spec.aria_colindex.to_string());
            match spec.aria_colspan {
                Some(span) => {
                    let _ = self
                        .element
                        .set_attribute("aria-colspan", &span.to_string());
                }
                None => {
                    let _ = self.element.remove_attribute("aria-colspan");
                }
            }
            let _ = self
                .element
                .set_attribute("aria-selected", if spec.aria_selected { "true" } else { "false" });
            if spec.aria_readonly {
                let _ = self.element.set_attribute("aria-readonly", "true");
            } else {
                let _ = self.element.remove_attribute("aria-readonly");
            }
            let _ = self
                .element
                .set_attribute("tabindex", &spec.tab_index.to_string());
            self.element
                .set_text_content(spec.content.as_deref());

            self.last = Some(spec.clone());
            true
        }

        /// Move DOM focus to this cell (roving focus, non-pointer path).
        pub(crate) fn focus(&self) {
            let _ = self.element.focus();
        }
    }

    impl Drop for CellElement {
        fn drop(&mut self) {
            if let Some(parent) = self.element.parent_node() {
                let _ = parent.remove_child(&self.element);
            }
        }
    }
}
