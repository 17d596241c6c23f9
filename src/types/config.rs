use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::render::colors::parse_color_rgba;

/// Grid configuration.
///
/// Deserialized from a plain JS object (camelCase keys); every field has a
/// default so callers only pass what they want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Default column width in pixels
    pub cell_width: u32,
    /// Default row height in pixels
    pub cell_height: u32,
    /// Logical row count
    pub total_rows: u32,
    /// Logical column count
    pub total_cols: u32,
    /// Cap on rows materialized per frame; the surface height decides when `None`
    pub visible_rows: Option<u32>,
    /// Cap on columns materialized per frame; the surface width decides when `None`
    pub visible_cols: Option<u32>,
    /// Width of the row header strip
    pub row_header_width: u32,
    /// Height of the column header strip
    pub col_header_height: u32,
    /// Smallest size a row or column can be resized to
    pub min_size: u32,
    /// Distance (px) from a header boundary that arms resize/insert
    pub resize_handle: f64,
    /// Distance (px) from a viewport edge that starts auto-scroll during a drag
    pub edge_threshold: f64,
    /// Pixels scrolled per auto-scroll step
    pub auto_scroll_step: f64,
    /// Header colors
    pub header: HeaderStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: 70,
            cell_height: 30,
            total_rows: 100_000,
            total_cols: 1_000,
            visible_rows: None,
            visible_cols: None,
            row_header_width: 50,
            col_header_height: 30,
            min_size: 20,
            resize_handle: 5.0,
            edge_threshold: 40.0,
            auto_scroll_step: 20.0,
            header: HeaderStyle::default(),
        }
    }
}

impl GridConfig {
    /// Parse a JSON config object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the grid cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.total_rows == 0 || self.total_cols == 0 {
            return Err(GridError::Config(
                "totalRows and totalCols must be at least 1".into(),
            ));
        }
        if self.min_size == 0 {
            return Err(GridError::Config("minSize must be at least 1".into()));
        }
        if self.cell_width < self.min_size || self.cell_height < self.min_size {
            return Err(GridError::Config(format!(
                "cellWidth/cellHeight must be at least minSize ({})",
                self.min_size
            )));
        }
        if self.visible_rows == Some(0) || self.visible_cols == Some(0) {
            return Err(GridError::Config(
                "visibleRows/visibleCols must be at least 1".into(),
            ));
        }
        self.header.validate()
    }
}

/// Colors for grid, headers and selection layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderStyle {
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    /// Header tint for rows/columns touched by the selection
    pub selected_bg_color: String,
    /// Header fill for fully selected rows/columns
    pub active_bg_color: String,
    pub active_text_color: String,
    pub grid_line_color: String,
    pub cell_text_color: String,
    /// Grid tint behind whole-row/column selections
    pub row_col_tint: String,
    /// Translucent range overlay
    pub range_fill: String,
    pub range_border: String,
}

impl HeaderStyle {
    fn colors(&self) -> [(&'static str, &str); 11] {
        [
            ("backgroundColor", self.background_color.as_str()),
            ("textColor", self.text_color.as_str()),
            ("borderColor", self.border_color.as_str()),
            ("selectedBgColor", self.selected_bg_color.as_str()),
            ("activeBgColor", self.active_bg_color.as_str()),
            ("activeTextColor", self.active_text_color.as_str()),
            ("gridLineColor", self.grid_line_color.as_str()),
            ("cellTextColor", self.cell_text_color.as_str()),
            ("rowColTint", self.row_col_tint.as_str()),
            ("rangeFill", self.range_fill.as_str()),
            ("rangeBorder", self.range_border.as_str()),
        ]
    }

    /// Every color must be a hex or `rgb()`/`rgba()` value.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.colors() {
            if parse_color_rgba(value).is_none() {
                return Err(GridError::Config(format!("{name}: invalid color {value:?}")));
            }
        }
        Ok(())
    }
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            background_color: "#F5F5F5".to_string(),
            text_color: "#000000".to_string(),
            border_color: "#CCCCCC".to_string(),
            selected_bg_color: "#CAEAD8".to_string(),
            active_bg_color: "#107C41".to_string(),
            active_text_color: "#FFFFFF".to_string(),
            grid_line_color: "#CCCCCC".to_string(),
            cell_text_color: "#000000".to_string(),
            row_col_tint: "#E8F2EC".to_string(),
            range_fill: "rgba(180, 215, 255, 0.3)".to_string(),
            range_border: "#107C41".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.cell_width, 70);
        assert_eq!(config.cell_height, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_camel_case_partial() {
        let config =
            GridConfig::from_json(r#"{"cellWidth": 100, "totalRows": 500, "visibleRows": 35}"#)
                .unwrap();
        assert_eq!(config.cell_width, 100);
        assert_eq!(config.total_rows, 500);
        assert_eq!(config.visible_rows, Some(35));
        assert_eq!(config.cell_height, 30);
    }

    #[test]
    fn test_rejects_zero_rows() {
        assert!(GridConfig::from_json(r#"{"totalRows": 0}"#).is_err());
    }

    #[test]
    fn test_rejects_cell_below_floor() {
        assert!(GridConfig::from_json(r#"{"cellHeight": 10}"#).is_err());
    }

    #[test]
    fn test_rejects_bad_color() {
        let err = GridConfig::from_json(r#"{"header": {"rangeBorder": "greenish"}}"#).unwrap_err();
        assert!(err.to_string().contains("rangeBorder"));
    }
}
