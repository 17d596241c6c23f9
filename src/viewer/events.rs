//! Pointer, keyboard and input handlers for `CanvasGrid`.
//!
//! Closures only translate DOM events into grid calls; every handler ends in
//! [`CanvasGrid::after_event`], which mirrors the editor into the `<input>`
//! and schedules a frame when the grid asked for one.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDivElement, HtmlElement, KeyboardEvent, MouseEvent, PointerEvent};

use super::{CanvasGrid, SharedState};
use crate::grid::Modifiers;

/// Pointer position relative to the visible box of `container`.
fn local_xy(container: &HtmlElement, event: &MouseEvent) -> (f64, f64) {
    let rect = container.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

/// Presses on the editing input belong to the input, not the grid.
fn from_text_field(event: &web_sys::Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
}

impl CanvasGrid {
    pub(crate) fn wire_pointer(
        state: &Rc<RefCell<SharedState>>,
        container: &HtmlDivElement,
    ) -> Vec<(&'static str, Closure<dyn FnMut(PointerEvent)>)> {
        let mut closures: Vec<(&'static str, Closure<dyn FnMut(PointerEvent)>)> = Vec::new();
        let element: &HtmlElement = container.as_ref();

        // Pointer down
        {
            let state = state.clone();
            let container_ref = element.clone();
            let closure = Closure::wrap(Box::new(move |event: PointerEvent| {
                if from_text_field(&event) {
                    return;
                }
                let (x, y) = local_xy(&container_ref, &event);
                if Self::internal_pointer_down(&state, x, y) {
                    // Keep focus on the editing input and route the drag here.
                    event.prevent_default();
                    let _ = container_ref.set_pointer_capture(event.pointer_id());
                }
            }) as Box<dyn FnMut(PointerEvent)>);
            closures.push(("pointerdown", closure));
        }

        // Pointer move (drag + hover cursor)
        {
            let state = state.clone();
            let container_ref = element.clone();
            let closure = Closure::wrap(Box::new(move |event: PointerEvent| {
                let (x, y) = local_xy(&container_ref, &event);
                let cursor = Self::internal_pointer_move(&state, x, y);
                let _ = container_ref.style().set_property("cursor", cursor);
            }) as Box<dyn FnMut(PointerEvent)>);
            closures.push(("pointermove", closure));
        }

        // Pointer up / cancel
        for event_name in ["pointerup", "pointercancel"] {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |_event: PointerEvent| {
                Self::internal_pointer_up(&state);
            }) as Box<dyn FnMut(PointerEvent)>);
            closures.push((event_name, closure));
        }

        for (event_name, closure) in &closures {
            element
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
                .ok();
        }
        closures
    }

    /// Keyboard handler on the document, like a spreadsheet's global shortcuts.
    pub(crate) fn wire_keys(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
    ) -> Option<Closure<dyn FnMut(KeyboardEvent)>> {
        let state = state.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let mods = Modifiers {
                shift: event.shift_key(),
                ctrl: event.ctrl_key(),
                meta: event.meta_key(),
            };
            if Self::internal_key_down(&state, &event.key(), mods) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .ok()?;
        Some(closure)
    }

    /// Mirror every keystroke in the input into the editor draft.
    pub(crate) fn wire_input(
        state: &Rc<RefCell<SharedState>>,
    ) -> Option<Closure<dyn FnMut(web_sys::Event)>> {
        let input = state.borrow().input.element().cloned()?;
        let state = state.clone();
        let input_ref = input.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            state.borrow_mut().grid.set_draft(input_ref.value());
        }) as Box<dyn FnMut(web_sys::Event)>);

        input
            .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
            .ok()?;
        Some(closure)
    }

    pub(crate) fn internal_pointer_down(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) -> bool {
        let claimed = state.borrow_mut().grid.on_pointer_down(x, y);
        Self::after_event(state);
        claimed
    }

    /// Returns the CSS cursor for the position.
    pub(crate) fn internal_pointer_move(
        state: &Rc<RefCell<SharedState>>,
        x: f64,
        y: f64,
    ) -> &'static str {
        let cursor = {
            let mut s = state.borrow_mut();
            s.grid.on_pointer_move(x, y);
            s.grid.cursor_at(x, y)
        };
        Self::after_event(state);
        cursor
    }

    pub(crate) fn internal_pointer_up(state: &Rc<RefCell<SharedState>>) {
        state.borrow_mut().grid.on_pointer_up();
        Self::after_event(state);
    }

    pub(crate) fn internal_key_down(
        state: &Rc<RefCell<SharedState>>,
        key: &str,
        mods: Modifiers,
    ) -> bool {
        let handled = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let focused = s.input.has_focus();
            if !focused && !(mods.ctrl || mods.meta) {
                // Editor keys only apply while typing in the cell.
                return false;
            }
            if !focused && Self::other_text_field_focused(s) {
                return false;
            }
            // Pick up a keystroke whose input event has not arrived yet.
            if let Some(value) = focused.then(|| s.input.value()).flatten() {
                s.grid.set_draft(value);
            }
            s.grid.set_editor_focused(focused);
            s.grid.on_key_down(key, mods)
        };
        Self::after_event(state);
        handled
    }

    /// Another input or textarea on the page owns the keyboard.
    fn other_text_field_focused(s: &SharedState) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .is_some_and(|active| {
                let ours = s
                    .input
                    .element()
                    .is_some_and(|input| active.is_same_node(Some(input.as_ref())));
                !ours && matches!(active.tag_name().as_str(), "INPUT" | "TEXTAREA")
            })
    }

    /// Mirror the editor into the input and schedule a frame if one was requested.
    pub(crate) fn after_event(state: &Rc<RefCell<SharedState>>) {
        let schedule = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let generation = s.grid.editor_generation();
            if generation != s.editor_generation {
                s.editor_generation = generation;
                match (s.grid.editor_rect(), s.grid.editor_value()) {
                    (Some(rect), Some(value)) => {
                        s.input.show(rect, s.grid.editor_clip(), value);
                    }
                    _ => s.input.hide(),
                }
            }
            s.grid.take_frame_request()
        };
        if schedule {
            Self::schedule_frame(state);
        }
    }
}
