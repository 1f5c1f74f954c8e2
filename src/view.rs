//! `DataGrid`: the concrete grid struct exported to JavaScript.
//!
//! Wires the generic interaction core (cell/row contracts, roving focus,
//! fill engine) to real DOM nodes for a host page, with rows modeled as
//! JSON objects. Interaction handlers mutate shared state and invoke the
//! host's render callback; the host calls `render()` to flush state to
//! the DOM (typically from `requestAnimationFrame`).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDivElement, HtmlElement};

use crate::error::GridError;
use crate::fill::engine::FillEngine;
use crate::fill::handle::{DragHandle, DragHandleCallbacks};
use crate::grid::cell::{cell_spec, CellCallbacks, CellElement, CellProps};
use crate::grid::row::{plan_row, row_class_name, CellSlot, RowElement, SlotKind};
use crate::grid::RovingFocus;
use crate::types::{
    Column, Editable, EditorOptions, FillEvent, FillMode, GridConfig, Modifiers, Position,
    RowsChange,
};

const DEFAULT_ROW_HEIGHT: f32 = 24.0;

/// JS-facing column description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnSpec {
    key: String,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    editable: bool,
    #[serde(default)]
    edit_on_click: bool,
    #[serde(default)]
    row_group: bool,
    /// Frozen (pinned) column; feeds the span-resolution boundary.
    #[serde(default)]
    frozen: bool,
    /// Constant span applied to every body row.
    #[serde(default)]
    col_span: Option<usize>,
    /// Constant extra class for every cell in the column.
    #[serde(default)]
    cell_class: Option<String>,
}

/// JS-facing grid options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridOptions {
    #[serde(default)]
    column_only_fill: bool,
    #[serde(default)]
    disable_double_click_fill: bool,
    #[serde(default)]
    class_prefix: Option<String>,
    #[serde(default)]
    row_height: Option<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionPayload {
    row_idx: usize,
    idx: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectPayload {
    row_idx: usize,
    idx: usize,
    shift: bool,
    command: bool,
    open_editor: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FillPayload<'a> {
    source_column_key: &'a str,
    source_row: &'a Value,
    target_column_key: &'a str,
    target_row: &'a Value,
    target_row_index: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RowsChangePayload<'a> {
    indexes: &'a [usize],
    column_keys: &'a [String],
}

type FunctionCell = Rc<RefCell<Option<Function>>>;

/// Interaction state shared with event closures.
struct Interaction {
    selected: Option<Position>,
    copied: Option<Position>,
    focus: RovingFocus,
    engine: FillEngine<Value>,
}

fn invoke(callback: &FunctionCell) {
    let callback = callback.borrow().clone();
    if let Some(callback) = callback {
        let _ = callback.call0(&JsValue::NULL);
    }
}

/// Default fill: copy the source column's field into the target column.
fn copy_field_fill(event: FillEvent<'_, Value>) -> Value {
    let FillEvent {
        source_column_key,
        source_row,
        target_column_key,
        mut target_row,
        ..
    } = event;
    let value = source_row
        .get(source_column_key)
        .cloned()
        .unwrap_or(Value::Null);
    if let Some(obj) = target_row.as_object_mut() {
        obj.insert(target_column_key.to_string(), value);
    }
    target_row
}

/// Bridge one fill invocation to a JS callback. A callback that throws
/// or returns a malformed row leaves the target unchanged.
fn js_fill(callback: &Function, event: &FillEvent<'_, Value>) -> Option<Value> {
    let payload = serde_wasm_bindgen::to_value(&FillPayload {
        source_column_key: event.source_column_key,
        source_row: event.source_row,
        target_column_key: event.target_column_key,
        target_row: &event.target_row,
        target_row_index: event.target_row_idx,
    })
    .ok()?;
    let returned = callback.call1(&JsValue::NULL, &payload).ok()?;
    serde_wasm_bindgen::from_value::<Value>(returned).ok()
}

fn build_column(spec: &ColumnSpec, idx: usize) -> Column<Value> {
    let key = spec.key.clone();
    let mut column = Column::new(spec.key.clone(), idx).with_formatter(move |row: &Value| {
        match row.get(&key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    });
    if let Some(width) = spec.width {
        column = column.with_width(width);
    }
    if spec.row_group {
        column = column.with_row_group();
    }
    if spec.editable {
        column = column.with_editable(Editable::Always);
    }
    if spec.edit_on_click {
        column = column.with_editor_options(EditorOptions { edit_on_click: true });
    }
    if let Some(span) = spec.col_span {
        column = column.with_col_span(move |_| Some(span));
    }
    if let Some(class) = spec.cell_class.clone() {
        column = column.with_cell_class(move |_| Some(class.clone()));
    }
    column
}

/// The main grid struct exported to JavaScript.
#[wasm_bindgen]
pub struct DataGrid {
    container: HtmlDivElement,
    config: GridConfig,
    row_height: f32,

    rows: Rc<RefCell<Vec<Value>>>,
    columns: Rc<RefCell<Rc<Vec<Column<Value>>>>>,
    interaction: Rc<RefCell<Interaction>>,
    editor: Rc<RefCell<Option<HtmlElement>>>,
    needs_rebuild: Rc<Cell<bool>>,

    render_callback: FunctionCell,
    select_callback: FunctionCell,
    rows_change_callback: FunctionCell,
    fill_callback: FunctionCell,
    drag_end_callback: FunctionCell,
    row_click_callback: FunctionCell,
    row_double_click_callback: FunctionCell,

    cell_callbacks: CellCallbacks,
    handle: Option<DragHandle>,
    last_frozen_idx: Option<usize>,
    row_elements: Vec<RowElement>,
    row_slots: Vec<Vec<CellSlot>>,
}

/// Observer bridging a cell position to a JS callback cell.
fn position_observer(callback: &FunctionCell) -> Rc<dyn Fn(Position)> {
    let callback = Rc::clone(callback);
    Rc::new(move |pos: Position| {
        let callback = callback.borrow().clone();
        if let Some(callback) = callback {
            let payload = serde_wasm_bindgen::to_value(&PositionPayload {
                row_idx: pos.row_idx,
                idx: pos.idx,
            })
            .unwrap_or(JsValue::NULL);
            let _ = callback.call1(&JsValue::NULL, &payload);
        }
    })
}

#[wasm_bindgen]
impl DataGrid {
    /// Create a grid bound to a container element.
    ///
    /// `options` may be `undefined` or an object:
    /// `{ columnOnlyFill, disableDoubleClickFill, classPrefix, rowHeight }`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlDivElement, options: JsValue) -> Result<DataGrid, JsValue> {
        console_error_panic_hook::set_once();

        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| GridError::Deserialize(e.to_string()))?
        };

        let mut config = GridConfig::default();
        if options.column_only_fill {
            config.fill_mode = FillMode::ColumnOnly;
        }
        config.double_click_fill = !options.disable_double_click_fill;
        if let Some(prefix) = options.class_prefix {
            config.class_prefix = prefix;
        }
        let row_height = options.row_height.unwrap_or(DEFAULT_ROW_HEIGHT);

        let _ = container.set_attribute("role", "grid");
        container.set_class_name(&config.class("grid"));
        {
            let style = container.style();
            if style
                .get_property_value("position")
                .unwrap_or_default()
                .is_empty()
            {
                let _ = style.set_property("position", "relative");
            }
        }

        let rows: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
        let columns: Rc<RefCell<Rc<Vec<Column<Value>>>>> =
            Rc::new(RefCell::new(Rc::new(Vec::new())));

        let render_callback: FunctionCell = Rc::new(RefCell::new(None));
        let select_callback: FunctionCell = Rc::new(RefCell::new(None));
        let rows_change_callback: FunctionCell = Rc::new(RefCell::new(None));
        let fill_callback: FunctionCell = Rc::new(RefCell::new(None));
        let drag_end_callback: FunctionCell = Rc::new(RefCell::new(None));
        let row_click_callback: FunctionCell = Rc::new(RefCell::new(None));
        let row_double_click_callback: FunctionCell = Rc::new(RefCell::new(None));

        // Fill engine over JSON rows. Its callbacks capture only the
        // plain data cells, never the interaction state that owns it.
        let engine = {
            let columns = Rc::clone(&columns);
            let rows = Rc::clone(&rows);
            let is_cell_editable = Box::new(move |pos: Position| {
                let columns = columns.borrow();
                let rows = rows.borrow();
                match (columns.get(pos.idx), rows.get(pos.row_idx)) {
                    (Some(column), Some(row)) => column.is_editable(row),
                    _ => false,
                }
            });

            let fill_callback = Rc::clone(&fill_callback);
            let on_fill = Box::new(move |event: FillEvent<'_, Value>| {
                let callback = fill_callback.borrow().clone();
                match callback {
                    Some(callback) => {
                        js_fill(&callback, &event).unwrap_or(event.target_row)
                    }
                    None => copy_field_fill(event),
                }
            });

            let rows_for_change = Rc::clone(&rows);
            let rows_change_callback = Rc::clone(&rows_change_callback);
            let on_rows_change = Box::new(move |updated: Vec<Value>, change: RowsChange| {
                *rows_for_change.borrow_mut() = updated;
                let callback = rows_change_callback.borrow().clone();
                if let Some(callback) = callback {
                    let rows_js = serde_wasm_bindgen::to_value(&*rows_for_change.borrow())
                        .unwrap_or(JsValue::NULL);
                    let change_js = serde_wasm_bindgen::to_value(&RowsChangePayload {
                        indexes: &change.indexes,
                        column_keys: &change.column_keys,
                    })
                    .unwrap_or(JsValue::NULL);
                    let _ = callback.call2(&JsValue::NULL, &rows_js, &change_js);
                }
            });

            let drag_end_callback = Rc::clone(&drag_end_callback);
            let on_drag_end = Box::new(move || {
                let callback = drag_end_callback.borrow().clone();
                if let Some(callback) = callback {
                    let _ = callback.call0(&JsValue::NULL);
                }
            });

            FillEngine::new(config.fill_mode, is_cell_editable, on_fill)
                .on_rows_change(on_rows_change)
                .on_drag_end(on_drag_end)
        };

        let interaction = Rc::new(RefCell::new(Interaction {
            selected: None,
            copied: None,
            focus: RovingFocus::new(),
            engine,
        }));

        let editor: Rc<RefCell<Option<HtmlElement>>> = Rc::new(RefCell::new(None));
        let needs_rebuild = Rc::new(Cell::new(true));

        // Cell-level handlers shared by every mounted cell.
        let cell_callbacks = {
            let select_cell = {
                let interaction = Rc::clone(&interaction);
                let editor = Rc::clone(&editor);
                let needs_rebuild = Rc::clone(&needs_rebuild);
                let select_callback = Rc::clone(&select_callback);
                let render_callback = Rc::clone(&render_callback);
                Rc::new(
                    move |pos: Position, modifiers: Modifiers, open_editor: Option<bool>| {
                        {
                            let mut itx = interaction.borrow_mut();
                            itx.selected = Some(pos);
                            itx.focus.select(pos, true);
                        }
                        // Editor substitution changes row structure.
                        if editor.borrow().is_some() {
                            needs_rebuild.set(true);
                        }
                        let callback = select_callback.borrow().clone();
                        if let Some(callback) = callback {
                            let payload = serde_wasm_bindgen::to_value(&SelectPayload {
                                row_idx: pos.row_idx,
                                idx: pos.idx,
                                shift: modifiers.shift,
                                command: modifiers.command,
                                open_editor,
                            })
                            .unwrap_or(JsValue::NULL);
                            let _ = callback.call1(&JsValue::NULL, &payload);
                        }
                        invoke(&render_callback);
                    },
                )
            };

            let on_mouse_enter = {
                let interaction = Rc::clone(&interaction);
                let render_callback = Rc::clone(&render_callback);
                Rc::new(move |pos: Position| {
                    let hovering_drag = {
                        let mut itx = interaction.borrow_mut();
                        if itx.engine.is_dragging() {
                            itx.engine.drag_over(pos);
                            true
                        } else {
                            false
                        }
                    };
                    if hovering_drag {
                        invoke(&render_callback);
                    }
                })
            };

            CellCallbacks {
                select_cell,
                on_row_click: Some(position_observer(&row_click_callback)),
                on_row_double_click: Some(position_observer(&row_double_click_callback)),
                on_mouse_enter,
            }
        };

        let mut grid = DataGrid {
            container,
            config,
            row_height,
            rows,
            columns,
            interaction,
            editor,
            needs_rebuild,
            render_callback,
            select_callback,
            rows_change_callback,
            fill_callback,
            drag_end_callback,
            row_click_callback,
            row_double_click_callback,
            cell_callbacks,
            handle: None,
            last_frozen_idx: None,
            row_elements: Vec::new(),
            row_slots: Vec::new(),
        };
        grid.handle = Some(grid.build_drag_handle()?);
        Ok(grid)
    }

    /// Replace the column list. `columns` is an array of
    /// `{ key, width?, editable?, editOnClick?, rowGroup?, colSpan?, cellClass? }`.
    #[wasm_bindgen(js_name = "setColumns")]
    pub fn set_columns(&mut self, columns: JsValue) -> Result<(), JsValue> {
        let specs: Vec<ColumnSpec> = serde_wasm_bindgen::from_value(columns)
            .map_err(|e| GridError::Deserialize(e.to_string()))?;

        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.key.clone()) {
                return Err(GridError::Column(format!("duplicate column key: {}", spec.key)).into());
            }
        }

        let built: Vec<Column<Value>> = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| build_column(spec, idx))
            .collect();
        self.last_frozen_idx = specs
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.frozen)
            .map(|(idx, _)| idx)
            .max();
        *self.columns.borrow_mut() = Rc::new(built);
        self.needs_rebuild.set(true);
        Ok(())
    }

    /// Replace the row collection. `rows` is an array of plain objects.
    #[wasm_bindgen(js_name = "setRows")]
    pub fn set_rows(&mut self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Value> = serde_wasm_bindgen::from_value(rows)
            .map_err(|e| GridError::Deserialize(e.to_string()))?;
        *self.rows.borrow_mut() = rows;
        self.needs_rebuild.set(true);
        Ok(())
    }

    /// The current row collection (reflects committed fills).
    #[wasm_bindgen]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&*self.rows.borrow())
            .map_err(|e| GridError::Deserialize(e.to_string()).into())
    }

    /// Programmatic selection. Moves DOM focus to the cell, since the
    /// position was not reached via a pointer event.
    #[wasm_bindgen(js_name = "selectCell")]
    pub fn select_cell(&mut self, row_idx: usize, idx: usize) -> Result<(), JsValue> {
        let pos = Position::new(row_idx, idx);
        {
            let rows = self.rows.borrow();
            let columns = self.columns.borrow();
            if !pos.in_bounds(rows.len(), columns.len()) {
                return Ok(());
            }
        }
        {
            let mut itx = self.interaction.borrow_mut();
            itx.selected = Some(pos);
            itx.focus.select(pos, false);
        }
        if self.editor.borrow().is_some() {
            self.needs_rebuild.set(true);
        }
        self.render()
    }

    /// Drop the selection; no grid element remains a tab stop.
    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) -> Result<(), JsValue> {
        {
            let mut itx = self.interaction.borrow_mut();
            itx.selected = None;
            itx.focus.clear();
        }
        self.render()
    }

    /// The selected position as `{ rowIdx, idx }`, or `undefined`.
    #[wasm_bindgen]
    pub fn selection(&self) -> JsValue {
        let selected = self.interaction.borrow().selected;
        match selected {
            Some(pos) => serde_wasm_bindgen::to_value(&PositionPayload {
                row_idx: pos.row_idx,
                idx: pos.idx,
            })
            .unwrap_or(JsValue::UNDEFINED),
            None => JsValue::UNDEFINED,
        }
    }

    /// Mark a cell as "copied" for the copy-highlight visual state.
    #[wasm_bindgen(js_name = "setCopied")]
    pub fn set_copied(&mut self, row_idx: usize, idx: usize) {
        self.interaction.borrow_mut().copied = Some(Position::new(row_idx, idx));
    }

    #[wasm_bindgen(js_name = "clearCopied")]
    pub fn clear_copied(&mut self) {
        self.interaction.borrow_mut().copied = None;
    }

    /// Supply (or clear) the editor element substituted at the selected
    /// position.
    #[wasm_bindgen(js_name = "setEditorElement")]
    pub fn set_editor_element(&mut self, editor: Option<HtmlElement>) {
        *self.editor.borrow_mut() = editor;
        self.needs_rebuild.set(true);
    }

    /// Register a callback invoked whenever interaction state changed
    /// and the host should call `render()` (typically scheduled via
    /// `requestAnimationFrame`).
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        *self.render_callback.borrow_mut() = callback;
    }

    /// Observer for selection intents:
    /// `({ rowIdx, idx, shift, command, openEditor }) => void`.
    #[wasm_bindgen(js_name = "onSelectCell")]
    pub fn on_select_cell(&mut self, callback: Option<Function>) {
        *self.select_callback.borrow_mut() = callback;
    }

    /// Fill callback: `(event) => newRow`, with the same event shape as
    /// the Rust `FillEvent`. When unset, fills copy the source column's
    /// field.
    #[wasm_bindgen(js_name = "onFill")]
    pub fn on_fill(&mut self, callback: Option<Function>) {
        *self.fill_callback.borrow_mut() = callback;
    }

    /// Rows-changed observer: `(rows, { indexes, columnKeys }) => void`.
    /// Fires only when a fill commit actually changed at least one row.
    #[wasm_bindgen(js_name = "onRowsChange")]
    pub fn on_rows_change(&mut self, callback: Option<Function>) {
        *self.rows_change_callback.borrow_mut() = callback;
    }

    /// Observer notified when a fill gesture ends, committed or not.
    #[wasm_bindgen(js_name = "onDragEnd")]
    pub fn on_drag_end(&mut self, callback: Option<Function>) {
        *self.drag_end_callback.borrow_mut() = callback;
    }

    /// Generic row-click observer: `({ rowIdx, idx }) => void`.
    #[wasm_bindgen(js_name = "onRowClick")]
    pub fn on_row_click(&mut self, callback: Option<Function>) {
        *self.row_click_callback.borrow_mut() = callback;
    }

    /// Row double-click observer: `({ rowIdx, idx }) => void`.
    #[wasm_bindgen(js_name = "onRowDoubleClick")]
    pub fn on_row_double_click(&mut self, callback: Option<Function>) {
        *self.row_double_click_callback.borrow_mut() = callback;
    }

    /// Whether a fill gesture is in flight.
    #[wasm_bindgen(js_name = "isDragging")]
    pub fn is_dragging(&self) -> bool {
        self.interaction.borrow().engine.is_dragging()
    }

    /// Flush interaction state to the DOM.
    #[wasm_bindgen]
    pub fn render(&mut self) -> Result<(), JsValue> {
        if self.needs_rebuild.replace(false) {
            self.rebuild_rows()?;
        }
        self.apply_state();
        self.apply_pending_focus();
        Ok(())
    }
}

// Internal render passes (not exported).
impl DataGrid {
    fn document(&self) -> Result<Document, GridError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GridError::Dom("no document".into()))
    }

    fn build_drag_handle(&self) -> Result<DragHandle, JsValue> {
        let document = self.document()?;

        let on_begin = {
            let interaction = Rc::clone(&self.interaction);
            Rc::new(move |buttons: u16| interaction.borrow_mut().engine.begin_drag(buttons))
        };

        let on_release = {
            let interaction = Rc::clone(&self.interaction);
            let rows = Rc::clone(&self.rows);
            let columns = Rc::clone(&self.columns);
            let render_callback = Rc::clone(&self.render_callback);
            Rc::new(move || {
                // Snapshots, so the engine's rows-changed bridge can
                // rewrite the live collection mid-release.
                let rows_snapshot: Vec<Value> = rows.borrow().clone();
                let columns_snapshot = Rc::clone(&*columns.borrow());
                let source = interaction.borrow().selected;
                {
                    let mut itx = interaction.borrow_mut();
                    match source {
                        Some(source) => {
                            itx.engine.release(&rows_snapshot, &columns_snapshot, source);
                        }
                        // No selected cell: still tear the gesture down.
                        None => itx.engine.release(&[], &columns_snapshot, Position::new(0, 0)),
                    }
                }
                invoke(&render_callback);
            })
        };

        let on_double_click = {
            let interaction = Rc::clone(&self.interaction);
            let rows = Rc::clone(&self.rows);
            let columns = Rc::clone(&self.columns);
            let render_callback = Rc::clone(&self.render_callback);
            let enabled = self.config.double_click_fill;
            Rc::new(move || {
                if !enabled {
                    return;
                }
                let rows_snapshot: Vec<Value> = rows.borrow().clone();
                let columns_snapshot = Rc::clone(&*columns.borrow());
                let source = interaction.borrow().selected;
                if let Some(source) = source {
                    let mut itx = interaction.borrow_mut();
                    itx.engine
                        .fill_to_end(&rows_snapshot, &columns_snapshot, source);
                }
                invoke(&render_callback);
            })
        };

        DragHandle::new(
            &document,
            &self.config.class("cell-drag-handle"),
            DragHandleCallbacks {
                on_begin,
                on_release,
                on_double_click,
            },
        )
        .map_err(Into::into)
    }

    /// Rebuild every row node (rows or columns changed, or the editor
    /// substitution moved).
    fn rebuild_rows(&mut self) -> Result<(), JsValue> {
        let document = self.document()?;

        self.row_elements.clear();
        self.row_slots.clear();

        let columns = Rc::clone(&*self.columns.borrow());
        let rows = self.rows.borrow();
        let (selected, copied) = {
            let itx = self.interaction.borrow();
            (itx.selected, itx.copied)
        };
        let editor = self.editor.borrow();

        let template: String = columns
            .iter()
            .map(|c| format!("{}px", c.width))
            .collect::<Vec<_>>()
            .join(" ");

        for (row_idx, row) in rows.iter().enumerate() {
            let selected_cols: Vec<usize> = selected
                .filter(|pos| pos.row_idx == row_idx)
                .map(|pos| pos.idx)
                .into_iter()
                .collect();
            let copied_cols: Vec<usize> = copied
                .filter(|pos| pos.row_idx == row_idx)
                .map(|pos| pos.idx)
                .into_iter()
                .collect();
            let has_editor = editor.is_some() && !selected_cols.is_empty();

            let slots = plan_row(
                &columns,
                row,
                self.last_frozen_idx,
                if selected_cols.is_empty() {
                    None
                } else {
                    Some(selected_cols.as_slice())
                },
                &copied_cols,
                &|_| false,
                has_editor,
            );

            let class_name = row_class_name(&self.config, row_idx, None);
            let top = (row_idx as f32) * self.row_height;
            let mut row_element =
                RowElement::new(&document, &class_name, top, self.row_height, &template)?;

            for slot in &slots {
                match slot.kind {
                    SlotKind::Editor => {
                        if let Some(editor) = editor.as_ref() {
                            row_element.mount_editor(editor);
                        }
                    }
                    SlotKind::Cell => {
                        let edit_on_click =
                            columns.get(slot.idx).and_then(|c| c.edit_on_click());
                        let cell = CellElement::new(
                            &document,
                            Position::new(row_idx, slot.idx),
                            slot.idx + 1,
                            slot.col_span,
                            edit_on_click,
                            &self.cell_callbacks,
                        )?;
                        row_element.mount_cell(cell);
                    }
                }
            }

            let _ = self.container.append_child(row_element.element());
            self.row_elements.push(row_element);
            self.row_slots.push(slots);
        }

        Ok(())
    }

    /// Re-apply selection/copy/drag state to the mounted nodes. Cheap:
    /// unchanged cell specs skip their DOM writes.
    fn apply_state(&mut self) {
        let columns = Rc::clone(&*self.columns.borrow());
        let rows = self.rows.borrow();
        let itx = self.interaction.borrow();

        let mut handle_target: Option<(usize, usize)> = None;

        for (row_idx, (row_element, slots)) in self
            .row_elements
            .iter_mut()
            .zip(self.row_slots.iter())
            .enumerate()
        {
            let Some(row) = rows.get(row_idx) else {
                continue;
            };

            row_element.set_tab_index(itx.focus.row_tab_index(row_idx));

            let mut cell_iter = row_element.cells_mut().iter_mut();
            for (slot_pos, slot) in slots.iter().enumerate() {
                if slot.kind != SlotKind::Cell {
                    continue;
                }
                let Some(cell) = cell_iter.next() else {
                    break;
                };
                let Some(column) = columns.get(slot.idx) else {
                    continue;
                };

                let span = slot.col_span.unwrap_or(1);
                let covers = |pos: &Position| {
                    pos.row_idx == row_idx
                        && (slot.idx..slot.idx + span).contains(&pos.idx)
                };
                let pos = Position::new(row_idx, slot.idx);

                let is_selected = itx.selected.as_ref().is_some_and(&covers);
                let is_copied = itx.copied.as_ref().is_some_and(&covers);
                let is_dragged_over = itx
                    .selected
                    .is_some_and(|sel| itx.engine.is_dragged_over(sel, pos));

                let spec = cell_spec(
                    &self.config,
                    &CellProps {
                        column,
                        row,
                        col_span: slot.col_span,
                        is_selected,
                        is_copied,
                        is_dragged_over,
                        tab_index: itx.focus.cell_tab_index(pos),
                    },
                );
                let fillable = spec.fillable();
                cell.apply(&spec);

                if is_selected && fillable {
                    handle_target = Some((row_idx, slot_pos));
                }
            }
        }

        drop(itx);
        drop(rows);

        // The fill handle lives on exactly one cell: the selected one.
        if let Some(handle) = &self.handle {
            match handle_target {
                Some((row_idx, slot_pos)) => {
                    let cell_index = self
                        .row_slots
                        .get(row_idx)
                        .map(|slots| {
                            slots
                                .iter()
                                .take(slot_pos)
                                .filter(|s| s.kind == SlotKind::Cell)
                                .count()
                        })
                        .unwrap_or(0);
                    if let Some(cell) = self
                        .row_elements
                        .get_mut(row_idx)
                        .and_then(|r| r.cells_mut().get_mut(cell_index))
                    {
                        let _ = cell.element().append_child(handle.element());
                    }
                }
                None => {
                    if let Some(parent) = handle.element().parent_node() {
                        let _ = parent.remove_child(handle.element());
                    }
                }
            }
        }
    }

    /// Imperative focus move for selections reached without the pointer.
    fn apply_pending_focus(&mut self) {
        let pending = self.interaction.borrow_mut().focus.take_pending_focus();
        let Some(pos) = pending else {
            return;
        };
        let Some(slots) = self.row_slots.get(pos.row_idx) else {
            return;
        };
        let mut cell_index = 0;
        for slot in slots {
            if slot.kind != SlotKind::Cell {
                continue;
            }
            let span = slot.col_span.unwrap_or(1);
            if (slot.idx..slot.idx + span).contains(&pos.idx) {
                if let Some(cell) = self
                    .row_elements
                    .get_mut(pos.row_idx)
                    .and_then(|r| r.cells_mut().get_mut(cell_index))
                {
                    cell.focus();
                }
                return;
            }
            cell_index += 1;
        }
    }
}
