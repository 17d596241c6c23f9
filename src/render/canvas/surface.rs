//! `DrawSurface` over a Canvas 2D context.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::{GridError, Result};
use crate::layout::Rect;
use crate::render::backend::{DrawSurface, TextStyle};

/// One absolutely positioned canvas with a DPR-scaled backing store.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    /// Create a canvas element and its 2d context.
    pub fn new(document: &Document) -> Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|_| GridError::Render("failed to create canvas".into()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GridError::Render("element is not a canvas".into()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GridError::Render("failed to get 2d context".into()))?
            .ok_or_else(|| GridError::Render("no 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Render("failed to cast to CanvasRenderingContext2d".into()))?;

        let style = canvas.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("display", "block");

        Ok(Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Move and size the canvas to `rect` (container coordinates).
    ///
    /// The backing store is only reallocated when the size or DPR changed.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn place(&mut self, rect: Rect, dpr: f64) {
        let style = self.canvas.style();
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));

        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let unchanged = (self.width - rect.width).abs() < f64::EPSILON
            && (self.height - rect.height).abs() < f64::EPSILON
            && (self.dpr - dpr).abs() < f64::EPSILON;
        if unchanged {
            return;
        }
        self.width = rect.width.max(0.0);
        self.height = rect.height.max(0.0);
        self.dpr = dpr;

        let _ = style.set_property("width", &format!("{}px", self.width));
        let _ = style.set_property("height", &format!("{}px", self.height));
        // Physical pixels; bounded by the window size.
        self.canvas.set_width((self.width * dpr).round() as u32);
        self.canvas.set_height((self.height * dpr).round() as u32);
        // Resizing resets the transform; all drawing uses logical coordinates.
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn dpr(&self) -> f64 {
        self.dpr
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle<'_>) {
        self.ctx.set_font(style.font);
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_text_align(style.align.as_css());
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }
}
