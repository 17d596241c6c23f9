//! Animation-frame coalescing and drag auto-scroll.

use crate::layout::Rect;

/// Coalesces redraw requests into at most one pending animation frame.
///
/// Scroll events only record their offsets; the frame applies the latest
/// pair, so any number of events between two frames costs one redraw.
#[derive(Debug, Default, Clone)]
pub struct FrameScheduler {
    pending: bool,
    scroll: Option<(f64, f64)>,
    requests: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame. True only when no frame was pending, i.e. the
    /// caller must schedule one.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.requests += 1;
        true
    }

    /// Remember the latest scroll offsets for the next frame.
    pub fn set_scroll(&mut self, left: f64, top: f64) {
        self.scroll = Some((left, top));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frames requested since creation.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Start the frame: clears the pending flag and hands out the latest offsets.
    pub fn begin(&mut self) -> Option<(f64, f64)> {
        self.pending = false;
        self.scroll.take()
    }

    /// Forget a pending frame the host cancelled.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

/// Edge auto-scroll while a selection drag is near the container border.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AutoScroll {
    dx: f64,
    dy: f64,
    pointer: (f64, f64),
}

impl AutoScroll {
    /// Update direction from the pointer position. Returns whether scrolling is active.
    pub fn track(&mut self, x: f64, y: f64, bounds: Rect, threshold: f64, step: f64) -> bool {
        self.pointer = (x, y);
        self.dx = edge_direction(x, bounds.x, bounds.right(), threshold) * step;
        self.dy = edge_direction(y, bounds.y, bounds.bottom(), threshold) * step;
        self.is_active()
    }

    #[allow(clippy::float_cmp)]
    pub fn is_active(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }

    pub fn stop(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
    }

    /// Last pointer position seen by [`track`](Self::track).
    pub fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    /// One step from `scroll`, clamped to `[0, max]` on both axes.
    pub fn step(&self, scroll: (f64, f64), max: (f64, f64)) -> (f64, f64) {
        (
            (scroll.0 + self.dx).clamp(0.0, max.0.max(0.0)),
            (scroll.1 + self.dy).clamp(0.0, max.1.max(0.0)),
        )
    }
}

fn edge_direction(v: f64, low: f64, high: f64, threshold: f64) -> f64 {
    if v < low + threshold {
        -1.0
    } else if v > high - threshold {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_request_coalesces() {
        let mut frames = FrameScheduler::new();
        assert!(frames.request());
        assert!(!frames.request());
        assert!(!frames.request());
        assert_eq!(frames.requests(), 1);
        frames.begin();
        assert!(frames.request());
        assert_eq!(frames.requests(), 2);
    }

    #[test]
    fn test_latest_scroll_wins() {
        let mut frames = FrameScheduler::new();
        frames.set_scroll(0.0, 30.0);
        frames.set_scroll(0.0, 3000.0);
        assert_eq!(frames.begin(), Some((0.0, 3000.0)));
        assert_eq!(frames.begin(), None);
    }

    #[test]
    fn test_auto_scroll_direction() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut auto = AutoScroll::default();
        assert!(!auto.track(400.0, 300.0, bounds, 40.0, 20.0));
        assert!(auto.track(790.0, 10.0, bounds, 40.0, 20.0));
        assert_eq!(auto.step((100.0, 100.0), (1000.0, 1000.0)), (120.0, 80.0));
        assert_eq!(auto.step((995.0, 5.0), (1000.0, 1000.0)), (1000.0, 0.0));
        auto.stop();
        assert!(!auto.is_active());
    }
}
