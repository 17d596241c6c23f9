//! DOM `<input>` overlay for cell editing.
//!
//! The element is created once inside the scroll container and moved over
//! the editing cell. Keystrokes are routed back to the grid by the host.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::layout::Rect;

pub(crate) struct InputOverlay {
    input: Option<HtmlInputElement>,
}

impl InputOverlay {
    /// Create the input inside `container`, hidden.
    pub(crate) fn new(document: &Document, container: &HtmlElement) -> Self {
        let input = document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if let Some(ref input) = input {
            input.set_type("text");
            let style = input.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("z-index", "10");
            let _ = style.set_property("box-sizing", "border-box");
            let _ = style.set_property("border", "none");
            let _ = style.set_property("outline", "none");
            let _ = style.set_property("padding", "0 4px");
            let _ = style.set_property("font", "14px Arial");
            let _ = style.set_property("background", "#fff");
            let _ = style.set_property("display", "none");
            let _ = container.append_child(input);
        }
        Self { input }
    }

    pub(crate) fn element(&self) -> Option<&HtmlInputElement> {
        self.input.as_ref()
    }

    /// Show over `rect` (container coordinates) with `value`, focused.
    pub(crate) fn show(&self, rect: Rect, clip: Option<Rect>, value: &str) {
        let Some(ref input) = self.input else {
            return;
        };
        self.place(rect, clip);
        if input.value() != value {
            input.set_value(value);
        }
        let _ = input.focus();
    }

    /// Move over `rect` without touching text or focus. Only the `clip` part
    /// is painted so the input never covers the headers.
    pub(crate) fn place(&self, rect: Rect, clip: Option<Rect>) {
        let Some(ref input) = self.input else {
            return;
        };
        let style = input.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.width));
        let _ = style.set_property("height", &format!("{}px", rect.height));
        // Clipped away entirely rather than hidden, which would drop focus.
        let clip_path = clip.map_or_else(
            || "inset(50%)".to_string(),
            |visible| {
                format!(
                    "inset({}px {}px {}px {}px)",
                    visible.y - rect.y,
                    rect.right() - visible.right(),
                    rect.bottom() - visible.bottom(),
                    visible.x - rect.x
                )
            },
        );
        let _ = style.set_property("clip-path", &clip_path);
    }

    pub(crate) fn hide(&self) {
        if let Some(ref input) = self.input {
            let _ = input.style().set_property("display", "none");
            let _ = input.blur();
        }
    }

    pub(crate) fn value(&self) -> Option<String> {
        self.input.as_ref().map(HtmlInputElement::value)
    }

    /// Whether the input is the document's active element.
    pub(crate) fn has_focus(&self) -> bool {
        let Some(ref input) = self.input else {
            return false;
        };
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .is_some_and(|active| active.is_same_node(Some(input.as_ref())))
    }
}

impl Drop for InputOverlay {
    fn drop(&mut self) {
        if let Some(ref input) = self.input {
            if let Some(parent) = input.parent_node() {
                let _ = parent.remove_child(input);
            }
        }
    }
}
