//! Scroll events and animation-frame scheduling for `CanvasGrid`.
//!
//! Scroll events only record offsets in the grid; the frame callback applies
//! the latest ones, repositions the surfaces and redraws.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlDivElement;

use super::{CanvasGrid, SharedState};

fn scroll_left_f64(element: &HtmlDivElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_left()))
}

fn scroll_top_f64(element: &HtmlDivElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

/// Write fractional scroll offsets (the integer setters would round).
fn set_scroll(element: &HtmlDivElement, left: f64, top: f64) {
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str("scrollLeft"),
        &JsValue::from_f64(left),
    );
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str("scrollTop"),
        &JsValue::from_f64(top),
    );
}

impl CanvasGrid {
    pub(crate) fn wire_scroll(
        state: &Rc<RefCell<SharedState>>,
        container: &HtmlDivElement,
    ) -> Option<Closure<dyn FnMut(web_sys::Event)>> {
        let state = state.clone();
        let container_for_scroll = container.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let left = scroll_left_f64(&container_for_scroll);
            let top = scroll_top_f64(&container_for_scroll);
            state.borrow_mut().grid.on_scroll(left, top);
            Self::after_event(&state);
        }) as Box<dyn FnMut(web_sys::Event)>);

        container
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .ok()?;
        Some(closure)
    }

    /// Request an animation frame unless one is already pending.
    pub(crate) fn schedule_frame(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.raf_handle.is_some() {
            return;
        }
        if s.frame_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    CanvasGrid::run_frame(&state);
                }
            }) as Box<dyn FnMut()>);
            s.frame_closure = Some(closure);
        }
        let Some(callback) = s.frame_closure.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => s.raf_handle = Some(id),
            Err(_) => {
                tracing::warn!("requestAnimationFrame failed");
                s.grid.cancel_frame();
            }
        }
    }

    /// Cancel the pending animation frame, if any.
    pub(crate) fn cancel_frame(state: &Rc<RefCell<SharedState>>) {
        let Ok(mut s) = state.try_borrow_mut() else {
            return;
        };
        if let Some(id) = s.raf_handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        s.grid.cancel_frame();
    }

    /// Animation-frame callback.
    pub(crate) fn run_frame(state: &Rc<RefCell<SharedState>>) {
        let (scroll_to, container, toolbar) = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.raf_handle = None;

            let outcome = s.grid.on_frame();
            let layout = s.grid.surface_layout();
            let spacer_style = s.spacer.style();
            let _ = spacer_style.set_property("width", &format!("{}px", layout.content_width));
            let _ = spacer_style.set_property("height", &format!("{}px", layout.content_height));

            s.surfaces.place(&layout, s.dpr);
            let summary = s.grid.render(s.surfaces.as_surfaces());

            // Sizes or scroll may have changed under the open editor.
            if let Some(rect) = s.grid.editor_rect() {
                s.input.place(rect, s.grid.editor_clip());
            }

            let toolbar = (s.toolbar_enabled != Some(summary.toolbar_enabled)).then(|| {
                s.toolbar_enabled = Some(summary.toolbar_enabled);
                (s.toolbar_callback.clone(), summary.toolbar_enabled)
            });
            (outcome.scroll_to, s.container.clone(), toolbar)
        }; // borrow dropped here - safe to touch the DOM and call into JS

        if let Some((left, top)) = scroll_to {
            set_scroll(&container, left, top);
        }
        if let Some((callback, enabled)) = toolbar {
            Self::invoke_toolbar_callback(callback, enabled);
        }
        // Auto-scroll keeps asking for frames while the drag sits at an edge.
        Self::after_event(state);
    }
}
