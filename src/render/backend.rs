//! Draw contract between the render coordinator and a drawing surface.
//!
//! The coordinator only speaks [`DrawSurface`]; the browser host implements it
//! over Canvas 2D and tests use [`RecordingSurface`].

use crate::layout::Rect;

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// CSS `textAlign` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Text drawing parameters. `y` is the vertical middle of the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub font: &'a str,
    pub color: &'a str,
    pub align: TextAlign,
}

/// Drawing operations a surface must support. Coordinates are CSS pixels.
pub trait DrawSurface {
    /// Logical `(width, height)`.
    fn size(&self) -> (f64, f64);

    /// Device pixel ratio of the backing store.
    fn dpr(&self) -> f64;

    /// Erase everything.
    fn clear(&mut self);

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64);

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle<'_>);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    /// Outline `rect`. Defaults to four lines.
    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64) {
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.draw_line(l, t, r, t, color, width);
        self.draw_line(r, t, r, b, color, width);
        self.draw_line(r, b, l, b, color, width);
        self.draw_line(l, b, l, t, color, width);
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        align: TextAlign,
        color: String,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    dpr: f64,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
            ops: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Operations recorded since the last `clear`.
    pub fn frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear))
            .map_or(0, |i| i + 1);
        self.ops.get(start..).unwrap_or_default()
    }

    /// Text drawn in the current frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.frame()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The text op for `text` in the current frame, if any.
    pub fn find_text(&self, text: &str) -> Option<&DrawOp> {
        self.frame()
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text: t, .. } if t == text))
    }

    /// Rectangles filled with `color` in the current frame.
    pub fn fills(&self, color: &str) -> Vec<Rect> {
        self.frame()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, color: c } if c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn dpr(&self) -> f64 {
        self.dpr
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: color.to_string(),
            width,
        });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle<'_>) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            align: style.align,
            color: style.color.to_string(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_string(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stroke_rect_draws_four_lines() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.stroke_rect(Rect::new(10.0, 10.0, 20.0, 30.0), "#000", 2.0);
        assert_eq!(surface.ops().len(), 4);
        assert!(matches!(
            &surface.ops()[1],
            DrawOp::Line { x1, y2, .. } if *x1 == 30.0 && *y2 == 40.0
        ));
    }

    #[test]
    fn test_frame_starts_after_last_clear() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let style = TextStyle {
            font: "12px Arial",
            color: "#000",
            align: TextAlign::Left,
        };
        surface.draw_text("old", 0.0, 0.0, style);
        surface.clear();
        surface.draw_text("new", 0.0, 0.0, style);
        assert_eq!(surface.texts(), vec!["new"]);
        assert!(surface.find_text("old").is_none());
    }
}
