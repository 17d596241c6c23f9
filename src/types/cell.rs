use serde::{Deserialize, Serialize};

/// Logical address of a cell (0-indexed).
///
/// Ordered row-major so a `BTreeMap<CellPos, _>` iterates rows top to bottom
/// and cells left to right within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A populated cell together with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEntry {
    pub row: u32,
    pub col: u32,
    pub value: String,
}

impl CellEntry {
    pub fn new(row: u32, col: u32, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }

    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Normalized rectangular range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

impl CellRange {
    /// Build a range from two corners in any order.
    pub fn from_corners(a: CellPos, b: CellPos) -> Self {
        Self {
            start_row: a.row.min(b.row),
            end_row: a.row.max(b.row),
            start_col: a.col.min(b.col),
            end_col: a.col.max(b.col),
        }
    }

    pub fn single(pos: CellPos) -> Self {
        Self::from_corners(pos, pos)
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        (self.start_row..=self.end_row).contains(&pos.row)
            && (self.start_col..=self.end_col).contains(&pos.col)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
    }

    pub fn contains_col(&self, col: u32) -> bool {
        (self.start_col..=self.end_col).contains(&col)
    }

    pub fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// Returns true when `value` reads as a number (right-aligned, aggregated).
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalizes_corners() {
        let range = CellRange::from_corners(CellPos::new(5, 2), CellPos::new(1, 7));
        assert_eq!(
            range,
            CellRange {
                start_row: 1,
                end_row: 5,
                start_col: 2,
                end_col: 7,
            }
        );
        assert!(range.contains(CellPos::new(3, 7)));
        assert!(!range.contains(CellPos::new(0, 3)));
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(42.0));
        assert_eq!(parse_numeric(" -1.5 "), Some(-1.5));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("Name"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("inf"), None);
    }
}
