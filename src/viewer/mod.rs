//! `CanvasGrid` - the browser host of a [`Grid`].
//!
//! This module provides the WASM-exported `CanvasGrid` struct that:
//! - Builds a scroll container with a spacer sized to the content extent
//! - Pins four canvases (corner, column header, row header, body) to the
//!   visible corner of the container
//! - Moves an `<input>` over the cell being edited
//! - Forwards scroll, pointer, keyboard and input events to the grid and
//!   redraws at most once per animation frame
//!
//! Event listeners are registered when the grid is created and removed when
//! it is dropped - no manual JavaScript wiring required.

mod events;
mod scroll;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDivElement, HtmlElement, KeyboardEvent, PointerEvent};

use crate::aggregate::AggregateKind;
use crate::editor::input::InputOverlay;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::layout::SurfaceLayout;
use crate::render::{CanvasSurface, Surfaces};
use crate::types::{CellPos, GridConfig};

/// The four canvases of one grid.
pub(crate) struct HostSurfaces {
    corner: CanvasSurface,
    col_header: CanvasSurface,
    row_header: CanvasSurface,
    grid: CanvasSurface,
}

impl HostSurfaces {
    fn new(document: &Document, container: &HtmlDivElement) -> Result<Self> {
        let surfaces = Self {
            grid: CanvasSurface::new(document)?,
            row_header: CanvasSurface::new(document)?,
            col_header: CanvasSurface::new(document)?,
            corner: CanvasSurface::new(document)?,
        };
        // Headers paint over the body, the corner over both headers.
        for (surface, z) in [
            (&surfaces.grid, "1"),
            (&surfaces.row_header, "2"),
            (&surfaces.col_header, "2"),
            (&surfaces.corner, "3"),
        ] {
            let style = surface.element().style();
            let _ = style.set_property("z-index", z);
            let _ = style.set_property("pointer-events", "none");
            container
                .append_child(surface.element())
                .map_err(|_| GridError::Render("failed to attach canvas".into()))?;
        }
        Ok(surfaces)
    }

    fn place(&mut self, layout: &SurfaceLayout, dpr: f64) {
        self.corner.place(layout.corner, dpr);
        self.col_header.place(layout.col_header, dpr);
        self.row_header.place(layout.row_header, dpr);
        self.grid.place(layout.grid, dpr);
    }

    fn as_surfaces(&mut self) -> Surfaces<'_> {
        Surfaces {
            corner: &mut self.corner,
            col_header: &mut self.col_header,
            row_header: &mut self.row_header,
            grid: &mut self.grid,
        }
    }
}

/// Shared state that can be accessed by event handlers
pub(crate) struct SharedState {
    pub(crate) grid: Grid,
    pub(crate) surfaces: HostSurfaces,
    pub(crate) input: InputOverlay,
    pub(crate) container: HtmlDivElement,
    pub(crate) spacer: HtmlDivElement,
    pub(crate) dpr: f64,
    /// Pending `requestAnimationFrame` handle
    pub(crate) raf_handle: Option<i32>,
    pub(crate) frame_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) toolbar_callback: Option<Function>,
    /// Toolbar state last reported to the callback
    pub(crate) toolbar_enabled: Option<bool>,
    /// Editor generation last mirrored into the input
    pub(crate) editor_generation: u64,
}

/// A virtualized, canvas-rendered grid inside a parent element.
#[wasm_bindgen]
pub struct CanvasGrid {
    state: Rc<RefCell<SharedState>>,
    container: HtmlDivElement,
    pointer_closures: Vec<(&'static str, Closure<dyn FnMut(PointerEvent)>)>,
    key_closure: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    input_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
    scroll_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl CanvasGrid {
    /// Create a grid filling `parent`. `config` is a plain object with
    /// `GridConfig` fields (camelCase); `undefined` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(parent: HtmlElement, config: JsValue) -> std::result::Result<CanvasGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| GridError::Config(e.to_string()))?
        };
        let window = web_sys::window().ok_or_else(|| GridError::Render("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GridError::Render("no document".into()))?;

        let (container, spacer) = Self::build_container(&document, &parent)?;
        let surfaces = HostSurfaces::new(&document, &container)?;
        let input = InputOverlay::new(&document, container.as_ref());
        let grid = Grid::with_size(
            config,
            f64::from(container.client_width()),
            f64::from(container.client_height()),
        )?;

        let state = Rc::new(RefCell::new(SharedState {
            grid,
            surfaces,
            input,
            container: container.clone(),
            spacer,
            dpr: window.device_pixel_ratio(),
            raf_handle: None,
            frame_closure: None,
            toolbar_callback: None,
            toolbar_enabled: None,
            editor_generation: 0,
        }));

        let scroll_closure = Self::wire_scroll(&state, &container);
        let pointer_closures = Self::wire_pointer(&state, &container);
        let key_closure = Self::wire_keys(&state, &document);
        let input_closure = Self::wire_input(&state);

        // First draw.
        Self::schedule_frame(&state);

        Ok(CanvasGrid {
            state,
            container,
            pointer_closures,
            key_closure,
            input_closure,
            scroll_closure,
        })
    }

    /// Scroll container and spacer, appended to `parent`.
    fn build_container(
        document: &Document,
        parent: &HtmlElement,
    ) -> Result<(HtmlDivElement, HtmlDivElement)> {
        let create_div = || -> Result<HtmlDivElement> {
            document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlDivElement>().ok())
                .ok_or_else(|| GridError::Render("failed to create div".into()))
        };
        let container = create_div()?;
        let spacer = create_div()?;

        // Ensure parent has position for absolute children
        let parent_style = parent.style();
        if parent_style
            .get_property_value("position")
            .unwrap_or_default()
            .is_empty()
        {
            let _ = parent_style.set_property("position", "relative");
        }

        let style = container.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("inset", "0");
        let _ = style.set_property("overflow", "auto");
        let _ = style.set_property("outline", "none");
        let _ = container.set_attribute("data-canvasgrid-scroll", "");

        // Spacer: sized to content to create the scroll area.
        let spacer_style = spacer.style();
        let _ = spacer_style.set_property("position", "absolute");
        let _ = spacer_style.set_property("top", "0");
        let _ = spacer_style.set_property("left", "0");
        let _ = spacer_style.set_property("width", "1px");
        let _ = spacer_style.set_property("height", "1px");

        container
            .append_child(&spacer)
            .map_err(|_| GridError::Render("failed to attach spacer".into()))?;
        parent
            .append_child(&container)
            .map_err(|_| GridError::Render("failed to attach grid".into()))?;
        Ok((container, spacer))
    }

    /// Undo the last command. Returns whether one ran.
    pub fn undo(&mut self) -> bool {
        let ran = self.state.borrow_mut().grid.undo();
        Self::after_event(&self.state);
        ran
    }

    /// Redo the last undone command. Returns whether one ran.
    pub fn redo(&mut self) -> bool {
        let ran = self.state.borrow_mut().grid.redo();
        Self::after_event(&self.state);
        ran
    }

    /// Aggregates of the selection, or `null` without one.
    ///
    /// With `kind` (`sum`, `min`, `max`, `count`, `avg`) returns that single
    /// number; otherwise the full aggregate object.
    pub fn aggregate(&self, kind: Option<String>) -> std::result::Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let Some(agg) = s.grid.aggregate() else {
            return Ok(JsValue::NULL);
        };
        match kind {
            Some(name) => {
                let kind = AggregateKind::from_name(&name)
                    .ok_or_else(|| GridError::Other(format!("unknown aggregate {name:?}")))?;
                Ok(agg.get(kind).map_or(JsValue::NULL, JsValue::from_f64))
            }
            None => {
                serde_wasm_bindgen::to_value(&agg).map_err(|e| JsValue::from_str(&e.to_string()))
            }
        }
    }

    /// Replace all cells with a JSON table. Returns the number of cells written.
    #[wasm_bindgen(js_name = "loadJson")]
    pub fn load_json(&mut self, text: &str) -> std::result::Result<usize, JsValue> {
        let count = self.state.borrow_mut().grid.load_json(text)?;
        Self::after_event(&self.state);
        Ok(count)
    }

    /// Replace all cells with CSV text. Returns the number of cells written.
    #[wasm_bindgen(js_name = "loadCsv")]
    pub fn load_csv(&mut self, text: &str) -> std::result::Result<usize, JsValue> {
        let count = self.state.borrow_mut().grid.load_csv(text)?;
        Self::after_event(&self.state);
        Ok(count)
    }

    /// Called with `true`/`false` whenever range-dependent toolbar actions
    /// become available or unavailable.
    #[wasm_bindgen(js_name = "setToolbarCallback")]
    pub fn set_toolbar_callback(&mut self, callback: Option<Function>) {
        let (callback, enabled) = {
            let mut s = self.state.borrow_mut();
            s.toolbar_callback = callback;
            let enabled = s.grid.toolbar_enabled();
            s.toolbar_enabled = Some(enabled);
            (s.toolbar_callback.clone(), enabled)
        };
        Self::invoke_toolbar_callback(callback, enabled);
    }

    /// Normalized selection `{ startRow, endRow, startCol, endCol }` or `null`.
    #[wasm_bindgen(js_name = "getSelection")]
    pub fn get_selection(&self) -> std::result::Result<JsValue, JsValue> {
        match self.state.borrow().grid.get_selection() {
            Some(range) => {
                serde_wasm_bindgen::to_value(&range).map_err(|e| JsValue::from_str(&e.to_string()))
            }
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = "selectRange")]
    pub fn select_range(
        &mut self,
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    ) -> std::result::Result<(), JsValue> {
        let start = CellPos::new(start_row, start_col);
        let end = CellPos::new(end_row, end_col);
        self.state.borrow_mut().grid.select_range(start, end)?;
        Self::after_event(&self.state);
        Ok(())
    }

    /// Set a cell through the undo history.
    #[wasm_bindgen(js_name = "setCellValue")]
    pub fn set_cell_value(
        &mut self,
        row: u32,
        col: u32,
        value: &str,
    ) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().grid.set_cell_value(row, col, value)?;
        Self::after_event(&self.state);
        Ok(())
    }

    #[wasm_bindgen(js_name = "getCellValue")]
    pub fn get_cell_value(&self, row: u32, col: u32) -> Option<String> {
        self.state
            .borrow()
            .grid
            .get_cell_value(row, col)
            .map(str::to_string)
    }

    #[wasm_bindgen(js_name = "insertRow")]
    pub fn insert_row(&mut self, index: u32) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().grid.insert_row(index)?;
        Self::after_event(&self.state);
        Ok(())
    }

    #[wasm_bindgen(js_name = "insertColumn")]
    pub fn insert_column(&mut self, index: u32) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().grid.insert_column(index)?;
        Self::after_event(&self.state);
        Ok(())
    }

    #[wasm_bindgen(js_name = "deleteRow")]
    pub fn delete_row(&mut self, index: u32) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().grid.delete_row(index)?;
        Self::after_event(&self.state);
        Ok(())
    }

    #[wasm_bindgen(js_name = "deleteColumn")]
    pub fn delete_column(&mut self, index: u32) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().grid.delete_column(index)?;
        Self::after_event(&self.state);
        Ok(())
    }

    /// Re-measure the container after its size or the device pixel ratio changed.
    pub fn resize(&mut self) {
        {
            let mut s = self.state.borrow_mut();
            let width = f64::from(s.container.client_width());
            let height = f64::from(s.container.client_height());
            if let Some(window) = web_sys::window() {
                s.dpr = window.device_pixel_ratio();
            }
            s.grid.on_resize(width, height);
        }
        Self::after_event(&self.state);
    }

    /// Total scrollable width in logical pixels, headers included.
    #[wasm_bindgen(js_name = "contentWidth")]
    pub fn content_width(&self) -> f64 {
        self.state.borrow().grid.surface_layout().content_width
    }

    /// Total scrollable height in logical pixels, headers included.
    #[wasm_bindgen(js_name = "contentHeight")]
    pub fn content_height(&self) -> f64 {
        self.state.borrow().grid.surface_layout().content_height
    }
}

impl CanvasGrid {
    pub(crate) fn invoke_toolbar_callback(callback: Option<Function>, enabled: bool) {
        if let Some(callback) = callback {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_bool(enabled));
        }
    }
}

impl Drop for CanvasGrid {
    fn drop(&mut self) {
        Self::cancel_frame(&self.state);

        let target: &web_sys::EventTarget = self.container.as_ref();
        for (event, closure) in &self.pointer_closures {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = self.scroll_closure.take() {
            let _ = target
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = self.key_closure.take() {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                let _ = document.remove_event_listener_with_callback(
                    "keydown",
                    closure.as_ref().unchecked_ref(),
                );
            }
        }
        if let Some(closure) = self.input_closure.take() {
            if let Ok(s) = self.state.try_borrow() {
                if let Some(input) = s.input.element() {
                    let _ = input.remove_event_listener_with_callback(
                        "input",
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }
        }
        if let Some(parent) = self.container.parent_node() {
            let _ = parent.remove_child(&self.container);
        }
    }
}
