//! Redraws the column header, row header and grid from model state.

use super::backend::{DrawSurface, TextAlign, TextStyle};
use super::colors::palette;
use super::selection::{axis_span, selection_rect};
use crate::cell_ref::col_to_letter;
use crate::editor::GridModel;
use crate::layout::{Rect, Viewport};
use crate::types::{parse_numeric, CellRange, GridConfig, Selection};

/// Everything a frame depends on.
pub struct RenderParams<'a> {
    pub config: &'a GridConfig,
    pub model: &'a GridModel,
    pub viewport: &'a Viewport,
    pub selection: Selection,
}

/// The four drawing surfaces of one grid.
pub struct Surfaces<'s> {
    pub corner: &'s mut dyn DrawSurface,
    pub col_header: &'s mut dyn DrawSurface,
    pub row_header: &'s mut dyn DrawSurface,
    pub grid: &'s mut dyn DrawSurface,
}

/// What the last frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub start_row: u32,
    pub start_col: u32,
    /// Rows materialized this frame
    pub rows: u32,
    /// Columns materialized this frame
    pub cols: u32,
    /// Whether range-dependent toolbar actions are available
    pub toolbar_enabled: bool,
}

/// Visible index window for one axis: `(index, surface_start, size)`.
type Lines = Vec<(u32, f64, f64)>;

/// Redraws all surfaces of a grid.
#[derive(Debug, Default)]
pub struct RenderCoordinator {
    frames: u64,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw column header, then row header, then grid.
    pub fn render(&mut self, params: &RenderParams<'_>, surfaces: Surfaces<'_>) -> RenderSummary {
        let (grid_w, grid_h) = surfaces.grid.size();
        let cols = visible_cols(params, grid_w);
        let rows = visible_rows(params, grid_h);
        let range = params
            .selection
            .selected_range(params.model.total_rows(), params.model.total_cols());

        draw_corner(params.config, surfaces.corner);
        draw_col_header(params, &cols, range, surfaces.col_header);
        draw_row_header(params, &rows, range, surfaces.row_header);
        draw_grid(params, &rows, &cols, range, surfaces.grid);

        self.frames += 1;
        RenderSummary {
            start_row: params.viewport.start_row,
            start_col: params.viewport.start_col,
            rows: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            cols: u32::try_from(cols.len()).unwrap_or(u32::MAX),
            toolbar_enabled: range.is_some(),
        }
    }
}

/// Walks the size table until the surface is covered; a configured
/// `visibleCols` caps the count further.
#[allow(clippy::cast_precision_loss)]
fn visible_cols(params: &RenderParams<'_>, width: f64) -> Lines {
    let vp = params.viewport;
    let limit = cap(params.config.visible_cols);
    params
        .model
        .cols
        .iter_from(vp.start_col)
        .map(|(i, at, size)| (i, at as f64 - vp.scroll_left, f64::from(size)))
        .take_while(|&(_, x, _)| x < width)
        .take(limit)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn visible_rows(params: &RenderParams<'_>, height: f64) -> Lines {
    let vp = params.viewport;
    let limit = cap(params.config.visible_rows);
    params
        .model
        .rows
        .iter_from(vp.start_row)
        .map(|(i, at, size)| (i, at as f64 - vp.scroll_top, f64::from(size)))
        .take_while(|&(_, y, _)| y < height)
        .take(limit)
        .collect()
}

fn cap(configured: Option<u32>) -> usize {
    configured.map_or(usize::MAX, |n| n as usize)
}

/// Snap a coordinate to the pixel center so 1px lines stay crisp.
fn crisp(v: f64) -> f64 {
    v.floor() + 0.5
}

fn draw_corner(config: &GridConfig, surface: &mut dyn DrawSurface) {
    let (w, h) = surface.size();
    let style = &config.header;
    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), &style.background_color);
    surface.draw_line(
        crisp(w - 1.0),
        0.0,
        crisp(w - 1.0),
        h,
        &style.border_color,
        1.0,
    );
    surface.draw_line(
        0.0,
        crisp(h - 1.0),
        w,
        crisp(h - 1.0),
        &style.border_color,
        1.0,
    );
}

fn draw_col_header(
    params: &RenderParams<'_>,
    cols: &Lines,
    range: Option<CellRange>,
    surface: &mut dyn DrawSurface,
) {
    let (w, h) = surface.size();
    let style = &params.config.header;
    let full = params.selection.col_span();
    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), &style.background_color);

    for &(col, x, width) in cols {
        let fully = full.is_some_and(|(a, b)| (a..=b).contains(&col));
        let touched = range.is_some_and(|r| r.contains_col(col));
        let text_color = if fully {
            surface.fill_rect(Rect::new(x, 0.0, width, h), &style.active_bg_color);
            style.active_text_color.as_str()
        } else {
            if touched {
                surface.fill_rect(Rect::new(x, 0.0, width, h), &style.selected_bg_color);
            }
            style.text_color.as_str()
        };
        let right = crisp(x + width - 1.0);
        surface.draw_line(right, 0.0, right, h, &style.border_color, 1.0);
        surface.draw_text(
            &col_to_letter(col),
            x + width / 2.0,
            h / 2.0,
            TextStyle {
                font: palette::HEADER_FONT,
                color: text_color,
                align: TextAlign::Center,
            },
        );
    }
    surface.draw_line(
        0.0,
        crisp(h - 1.0),
        w,
        crisp(h - 1.0),
        &style.border_color,
        1.0,
    );
}

fn draw_row_header(
    params: &RenderParams<'_>,
    rows: &Lines,
    range: Option<CellRange>,
    surface: &mut dyn DrawSurface,
) {
    let (w, h) = surface.size();
    let style = &params.config.header;
    let full = params.selection.row_span();
    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), &style.background_color);

    for &(row, y, height) in rows {
        let fully = full.is_some_and(|(a, b)| (a..=b).contains(&row));
        let touched = range.is_some_and(|r| r.contains_row(row));
        let text_color = if fully {
            surface.fill_rect(Rect::new(0.0, y, w, height), &style.active_bg_color);
            style.active_text_color.as_str()
        } else {
            if touched {
                surface.fill_rect(Rect::new(0.0, y, w, height), &style.selected_bg_color);
            }
            style.text_color.as_str()
        };
        let bottom = crisp(y + height - 1.0);
        surface.draw_line(0.0, bottom, w, bottom, &style.border_color, 1.0);
        surface.draw_text(
            &(u64::from(row) + 1).to_string(),
            w - palette::CELL_PADDING,
            y + height / 2.0,
            TextStyle {
                font: palette::HEADER_FONT,
                color: text_color,
                align: TextAlign::Right,
            },
        );
    }
    surface.draw_line(
        crisp(w - 1.0),
        0.0,
        crisp(w - 1.0),
        h,
        &style.border_color,
        1.0,
    );
}

fn draw_grid(
    params: &RenderParams<'_>,
    rows: &Lines,
    cols: &Lines,
    range: Option<CellRange>,
    surface: &mut dyn DrawSurface,
) {
    let (w, h) = surface.size();
    let style = &params.config.header;
    let vp = params.viewport;
    let model = params.model;
    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), palette::WHITE);

    // Tint whole-row/column selections under the lines and text.
    if let Some((first, last)) = params.selection.row_span() {
        if let Some((y1, y2, _, _)) = axis_span(&model.rows, vp.scroll_top, first, last, h) {
            surface.fill_rect(Rect::new(0.0, y1, w, y2 - y1), &style.row_col_tint);
        }
    }
    if let Some((first, last)) = params.selection.col_span() {
        if let Some((x1, x2, _, _)) = axis_span(&model.cols, vp.scroll_left, first, last, w) {
            surface.fill_rect(Rect::new(x1, 0.0, x2 - x1, h), &style.row_col_tint);
        }
    }

    let bottom = rows.last().map_or(0.0, |&(_, y, s)| (y + s).min(h));
    let right = cols.last().map_or(0.0, |&(_, x, s)| (x + s).min(w));
    for &(_, x, width) in cols {
        let line = crisp(x + width - 1.0);
        surface.draw_line(line, 0.0, line, bottom, &style.grid_line_color, 1.0);
    }
    for &(_, y, height) in rows {
        let line = crisp(y + height - 1.0);
        surface.draw_line(0.0, line, right, line, &style.grid_line_color, 1.0);
    }

    if let (
        Some(&(first_row, _, _)),
        Some(&(last_row, _, _)),
        Some(&(first_col, _, _)),
        Some(&(last_col, _, _)),
    ) = (rows.first(), rows.last(), cols.first(), cols.last())
    {
        let window = CellRange {
            start_row: first_row,
            end_row: last_row,
            start_col: first_col,
            end_col: last_col,
        };
        for (pos, text) in model.cells.get_range(window) {
            let Some(&(_, y, height)) = rows.get((pos.row - first_row) as usize) else {
                continue;
            };
            let Some(&(_, x, width)) = cols.get((pos.col - first_col) as usize) else {
                continue;
            };
            let (tx, align) = if parse_numeric(text).is_some() {
                (x + width - palette::CELL_PADDING, TextAlign::Right)
            } else {
                (x + palette::CELL_PADDING, TextAlign::Left)
            };
            surface.draw_text(
                text,
                tx,
                y + height / 2.0,
                TextStyle {
                    font: palette::CELL_FONT,
                    color: &style.cell_text_color,
                    align,
                },
            );
        }
    }

    let Some(range) = range else {
        return;
    };
    let Some(sel) = selection_rect(range, vp, &model.rows, &model.cols, (w, h)) else {
        return;
    };
    if matches!(params.selection, Selection::Range { .. }) && !range.is_single_cell() {
        surface.fill_rect(sel.rect, &style.range_fill);
    }
    let r = sel.rect;
    let color = style.range_border.as_str();
    let width = palette::RANGE_BORDER_WIDTH;
    if sel.draw_top {
        surface.draw_line(r.x, r.y + 1.0, r.right(), r.y + 1.0, color, width);
    }
    if sel.draw_bottom {
        surface.draw_line(
            r.x,
            r.bottom() - 1.0,
            r.right(),
            r.bottom() - 1.0,
            color,
            width,
        );
    }
    if sel.draw_left {
        surface.draw_line(r.x + 1.0, r.y, r.x + 1.0, r.bottom(), color, width);
    }
    if sel.draw_right {
        surface.draw_line(
            r.right() - 1.0,
            r.y,
            r.right() - 1.0,
            r.bottom(),
            color,
            width,
        );
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::render::backend::{DrawOp, RecordingSurface};
    use crate::types::CellPos;

    struct Fixture {
        corner: RecordingSurface,
        col_header: RecordingSurface,
        row_header: RecordingSurface,
        grid: RecordingSurface,
    }

    impl Fixture {
        fn new(config: &GridConfig, width: f64, height: f64) -> Self {
            let rhw = f64::from(config.row_header_width);
            let chh = f64::from(config.col_header_height);
            Self {
                corner: RecordingSurface::new(rhw, chh),
                col_header: RecordingSurface::new(width - rhw, chh),
                row_header: RecordingSurface::new(rhw, height - chh),
                grid: RecordingSurface::new(width - rhw, height - chh),
            }
        }

        fn render(
            &mut self,
            coordinator: &mut RenderCoordinator,
            params: &RenderParams<'_>,
        ) -> RenderSummary {
            coordinator.render(
                params,
                Surfaces {
                    corner: &mut self.corner,
                    col_header: &mut self.col_header,
                    row_header: &mut self.row_header,
                    grid: &mut self.grid,
                },
            )
        }
    }

    fn config() -> GridConfig {
        GridConfig {
            total_rows: 1000,
            total_cols: 50,
            ..GridConfig::default()
        }
    }

    #[test]
    fn test_numeric_right_text_left() {
        let config = config();
        let mut model = GridModel::new(&config);
        model.cells.set_cell_value(0, 0, "Name");
        model.cells.set_cell_value(1, 0, "42");
        let vp = Viewport::new(400.0, 300.0);
        let mut fx = Fixture::new(&config, 400.0, 300.0);
        let params = RenderParams {
            config: &config,
            model: &model,
            viewport: &vp,
            selection: Selection::None,
        };
        let summary = fx.render(&mut RenderCoordinator::new(), &params);
        assert!(!summary.toolbar_enabled);

        let Some(DrawOp::Text { x, align, .. }) = fx.grid.find_text("Name") else {
            panic!("Name not drawn");
        };
        assert_eq!(*align, TextAlign::Left);
        assert_eq!(*x, 4.0);
        let Some(DrawOp::Text { x, align, .. }) = fx.grid.find_text("42") else {
            panic!("42 not drawn");
        };
        assert_eq!(*align, TextAlign::Right);
        assert_eq!(*x, 66.0);
    }

    #[test]
    fn test_headers_letters_and_numbers() {
        let config = config();
        let model = GridModel::new(&config);
        let vp = Viewport::new(400.0, 300.0);
        let mut fx = Fixture::new(&config, 400.0, 300.0);
        let params = RenderParams {
            config: &config,
            model: &model,
            viewport: &vp,
            selection: Selection::None,
        };
        let summary = fx.render(&mut RenderCoordinator::new(), &params);
        let letters = fx.col_header.texts();
        assert_eq!(&letters[..3], &["A", "B", "C"]);
        assert_eq!(letters.len(), summary.cols as usize);
        assert_eq!(fx.row_header.texts()[0], "1");
        assert_eq!(summary.rows, 9);
        assert_eq!(summary.cols, 5);
    }

    #[test]
    fn test_rows_selection_highlights_header_and_tints_grid() {
        let config = config();
        let model = GridModel::new(&config);
        let vp = Viewport::new(400.0, 300.0);
        let mut fx = Fixture::new(&config, 400.0, 300.0);
        let params = RenderParams {
            config: &config,
            model: &model,
            viewport: &vp,
            selection: Selection::Rows { start: 2, end: 1 },
        };
        let summary = fx.render(&mut RenderCoordinator::new(), &params);
        assert!(summary.toolbar_enabled);
        let strong = fx.row_header.fills(&config.header.active_bg_color);
        assert_eq!(strong.len(), 2);
        let tint = fx.grid.fills(&config.header.row_col_tint);
        assert_eq!(tint, vec![Rect::new(0.0, 30.0, 350.0, 60.0)]);
        // every visible column is touched by a full-row selection
        let touched = fx.col_header.fills(&config.header.selected_bg_color);
        assert_eq!(touched.len(), summary.cols as usize);
    }

    #[test]
    fn test_range_overlay_and_idempotence() {
        let config = config();
        let model = GridModel::new(&config);
        let vp = Viewport::new(400.0, 300.0);
        let mut fx = Fixture::new(&config, 400.0, 300.0);
        let params = RenderParams {
            config: &config,
            model: &model,
            viewport: &vp,
            selection: Selection::Range {
                start: CellPos::new(2, 2),
                end: CellPos::new(0, 1),
            },
        };
        let mut coordinator = RenderCoordinator::new();
        fx.render(&mut coordinator, &params);
        let first = fx.grid.frame().to_vec();
        assert_eq!(
            fx.grid.fills(&config.header.range_fill),
            vec![Rect::new(70.0, 0.0, 140.0, 90.0)]
        );
        fx.render(&mut coordinator, &params);
        assert_eq!(fx.grid.frame(), first.as_slice());
        assert_eq!(coordinator.frames(), 2);
    }
}
