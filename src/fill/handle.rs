//! Fill-handle DOM element and gesture listener plumbing (wasm32 only).
//!
//! The handle is one small `div` mounted on the selected cell. A
//! primary-button press starts a gesture and attaches `mouseover` and
//! `mouseup` listeners to the window, so the gesture survives the
//! pointer leaving the handle's bounds; both are removed on every exit
//! path. A hover whose button state shows the primary button up is
//! treated as a release (the native `mouseup` can be lost when the
//! button is released outside the embedding frame).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDivElement, MouseEvent};

use crate::error::{GridError, Result};

use super::engine::PRIMARY_BUTTON;

/// Host hooks for the gesture life cycle.
pub(crate) struct DragHandleCallbacks {
    /// Gesture start; returns whether the engine accepted it.
    pub on_begin: Rc<dyn Fn(u16) -> bool>,
    /// Release, real or synthetic. Runs after the window listeners are
    /// detached.
    pub on_release: Rc<dyn Fn()>,
    /// Double-click shortcut (fill down to the last row).
    pub on_double_click: Rc<dyn Fn()>,
}

/// The window-level listeners attached for the duration of one gesture.
struct WindowListeners {
    mouseover: Closure<dyn FnMut(MouseEvent)>,
    mouseup: Closure<dyn FnMut(MouseEvent)>,
}

/// Remove the gesture listeners from the window, if attached.
fn detach(active: &Rc<Cell<bool>>, listeners: &Rc<RefCell<Option<WindowListeners>>>) {
    if !active.replace(false) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(l) = listeners.borrow().as_ref() {
        let _ = window.remove_event_listener_with_callback(
            "mouseover",
            l.mouseover.as_ref().unchecked_ref(),
        );
        let _ = window
            .remove_event_listener_with_callback("mouseup", l.mouseup.as_ref().unchecked_ref());
    }
}

/// The fill-handle element.
///
/// Created once and re-mounted onto whichever cell is selected; the
/// closures live as long as the handle does, so attaching/detaching the
/// window listeners never destroys a closure mid-call.
pub(crate) struct DragHandle {
    element: HtmlDivElement,
    active: Rc<Cell<bool>>,
    listeners: Rc<RefCell<Option<WindowListeners>>>,
    #[allow(dead_code)] // Kept alive for the listeners' sake
    mousedown: Closure<dyn FnMut(MouseEvent)>,
    #[allow(dead_code)]
    dblclick: Closure<dyn FnMut(MouseEvent)>,
}

impl DragHandle {
    pub(crate) fn new(
        document: &Document,
        class_name: &str,
        callbacks: DragHandleCallbacks,
    ) -> Result<Self> {
        let element = document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlDivElement>().ok())
            .ok_or_else(|| GridError::Dom("failed to create drag handle".into()))?;

        element.set_class_name(class_name);
        let style = element.style();
        let _ = style.set_property("cursor", "move");
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("right", "0");
        let _ = style.set_property("bottom", "0");
        let _ = style.set_property("width", "8px");
        let _ = style.set_property("height", "8px");
        let _ = style.set_property("background-color", "var(--gv-selection-color, #66afe9)");

        let active = Rc::new(Cell::new(false));
        let listeners: Rc<RefCell<Option<WindowListeners>>> = Rc::new(RefCell::new(None));

        // Mouse up: tear down, then commit.
        let mouseup = {
            let active = Rc::clone(&active);
            let listeners = Rc::clone(&listeners);
            let on_release = Rc::clone(&callbacks.on_release);
            Closure::wrap(Box::new(move |_event: MouseEvent| {
                detach(&active, &listeners);
                on_release();
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        // Mouse over anywhere: synthetic release when the primary button
        // is no longer pressed.
        let mouseover = {
            let active = Rc::clone(&active);
            let listeners = Rc::clone(&listeners);
            let on_release = Rc::clone(&callbacks.on_release);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                if event.buttons() != PRIMARY_BUTTON {
                    detach(&active, &listeners);
                    on_release();
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        *listeners.borrow_mut() = Some(WindowListeners { mouseover, mouseup });

        // Mouse down on the handle: start the gesture and go global.
        let mousedown = {
            let active = Rc::clone(&active);
            let listeners = Rc::clone(&listeners);
            let on_begin = Rc::clone(&callbacks.on_begin);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                if active.get() || !on_begin(event.buttons()) {
                    return;
                }
                let Some(window) = web_sys::window() else {
                    return;
                };
                if let Some(l) = listeners.borrow().as_ref() {
                    window
                        .add_event_listener_with_callback(
                            "mouseover",
                            l.mouseover.as_ref().unchecked_ref(),
                        )
                        .ok();
                    window
                        .add_event_listener_with_callback(
                            "mouseup",
                            l.mouseup.as_ref().unchecked_ref(),
                        )
                        .ok();
                    active.set(true);
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        element
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())
            .ok();

        let dblclick = {
            let on_double_click = Rc::clone(&callbacks.on_double_click);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                event.stop_propagation();
                on_double_click();
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        element
            .add_event_listener_with_callback("dblclick", dblclick.as_ref().unchecked_ref())
            .ok();

        Ok(Self {
            element,
            active,
            listeners,
            mousedown,
            dblclick,
        })
    }

    pub(crate) fn element(&self) -> &HtmlDivElement {
        &self.element
    }
}

impl Drop for DragHandle {
    fn drop(&mut self) {
        detach(&self.active, &self.listeners);
        if let Some(parent) = self.element.parent_node() {
            let _ = parent.remove_child(&self.element);
        }
    }
}
