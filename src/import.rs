//! Bulk import from JSON and CSV/TSV.
//!
//! Parsing produces an [`ImportBatch`] that is validated against the grid
//! extent before anything is written, so a bad input leaves the store as it
//! was.

use serde_json::Value;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::store::SparseCellStore;
use crate::types::CellEntry;

/// Field separator for delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Input formats the grid accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Delimited(Delimiter),
}

impl ImportFormat {
    /// Guess the format from a file name.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Delimited(Delimiter::Comma)),
            "tsv" | "tab" => Some(Self::Delimited(Delimiter::Tab)),
            _ => None,
        }
    }

    pub fn parse(self, text: &str) -> Result<ImportBatch> {
        match self {
            Self::Json => parse_json(text),
            Self::Delimited(delim) => parse_delimited(text, delim),
        }
    }
}

/// Parsed cells staged for writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    cells: Vec<CellEntry>,
}

impl ImportBatch {
    pub fn cells(&self) -> &[CellEntry] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reject the batch if any cell lies outside `total_rows × total_cols`.
    pub fn check_extent(&self, total_rows: u32, total_cols: u32) -> Result<()> {
        match self
            .cells
            .iter()
            .find(|c| c.row >= total_rows || c.col >= total_cols)
        {
            Some(c) => Err(GridError::Import(format!(
                "cell ({}, {}) is outside the {total_rows}x{total_cols} grid",
                c.row, c.col
            ))),
            None => Ok(()),
        }
    }

    /// Replace the store contents with the batch.
    pub fn write_into(self, store: &mut SparseCellStore) {
        store.clear();
        for cell in self.cells {
            store.set_cell_value(cell.row, cell.col, cell.value);
        }
    }
}

fn index(i: usize, what: &str) -> Result<u32> {
    u32::try_from(i).map_err(|_| GridError::Import(format!("too many {what}")))
}

/// Parse delimited text. Blank lines keep their row; fields are trimmed.
pub fn parse_delimited(text: &str, delim: Delimiter) -> Result<ImportBatch> {
    let sep = delim.as_char();
    let mut cells = Vec::new();

    for (row_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = index(row_idx, "rows")?;
        let fields = split_csv_line(line, sep)
            .ok_or_else(|| GridError::Import(format!("line {}: unterminated quote", row_idx + 1)))?;
        for (col_idx, field) in fields.into_iter().enumerate() {
            let value = field.trim();
            if value.is_empty() {
                continue;
            }
            cells.push(CellEntry::new(row, index(col_idx, "columns")?, value));
        }
    }

    debug!(cells = cells.len(), ?delim, "parsed delimited text");
    Ok(ImportBatch { cells })
}

/// Split a line respecting quoted fields. `None` if a quote is left open.
fn split_csv_line(line: &str, sep: char) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(current);
    Some(fields)
}

/// Parse a JSON table.
///
/// Accepts an array of objects (the first object's keys become the header
/// row, each object one row below it) or an array of arrays (rows as given).
pub fn parse_json(text: &str) -> Result<ImportBatch> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| GridError::Import(format!("invalid JSON: {e}")))?;
    let Value::Array(rows) = value else {
        return Err(GridError::Import("expected a JSON array".into()));
    };

    let cells = match rows.first() {
        None => Vec::new(),
        Some(Value::Object(_)) => objects_to_cells(&rows)?,
        Some(Value::Array(_)) => arrays_to_cells(&rows)?,
        Some(_) => {
            return Err(GridError::Import(
                "expected an array of objects or an array of arrays".into(),
            ))
        }
    };

    debug!(cells = cells.len(), "parsed JSON table");
    Ok(ImportBatch { cells })
}

fn objects_to_cells(rows: &[Value]) -> Result<Vec<CellEntry>> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(Vec::new());
    };
    let header: Vec<&String> = first.keys().collect();
    let mut cells = Vec::new();
    for (col, key) in header.iter().enumerate() {
        push_text(&mut cells, 0, index(col, "columns")?, key);
    }

    for (i, row) in rows.iter().enumerate() {
        let Value::Object(map) = row else {
            return Err(GridError::Import(format!("row {}: expected an object", i + 1)));
        };
        if let Some(extra) = map.keys().find(|k| !first.contains_key(k.as_str())) {
            return Err(GridError::Import(format!(
                "row {}: key {extra:?} is not in the header",
                i + 1
            )));
        }
        let r = index(i + 1, "rows")?;
        for (col, key) in header.iter().enumerate() {
            if let Some(v) = map.get(key.as_str()) {
                push_value(&mut cells, r, index(col, "columns")?, v)?;
            }
        }
    }
    Ok(cells)
}

fn arrays_to_cells(rows: &[Value]) -> Result<Vec<CellEntry>> {
    let mut cells = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let Value::Array(values) = row else {
            return Err(GridError::Import(format!("row {}: expected an array", i + 1)));
        };
        let r = index(i, "rows")?;
        for (col, v) in values.iter().enumerate() {
            push_value(&mut cells, r, index(col, "columns")?, v)?;
        }
    }
    Ok(cells)
}

fn push_text(cells: &mut Vec<CellEntry>, row: u32, col: u32, text: &str) {
    if !text.is_empty() {
        cells.push(CellEntry::new(row, col, text));
    }
}

fn push_value(cells: &mut Vec<CellEntry>, row: u32, col: u32, value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::String(s) => push_text(cells, row, col, s),
        Value::Number(n) => push_text(cells, row, col, &n.to_string()),
        Value::Bool(b) => push_text(cells, row, col, if *b { "true" } else { "false" }),
        Value::Array(_) | Value::Object(_) => {
            return Err(GridError::Import(format!(
                "cell ({row}, {col}): nested values are not supported"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn value_at(batch: &ImportBatch, row: u32, col: u32) -> Option<&str> {
        batch
            .cells()
            .iter()
            .find(|c| c.row == row && c.col == col)
            .map(|c| c.value.as_str())
    }

    #[test]
    fn test_parse_csv_basic() {
        let batch =
            parse_delimited("Name,Age,City\nAlice,30,NYC\nBob,25,LA", Delimiter::Comma).unwrap();
        assert_eq!(batch.len(), 9);
        assert_eq!(value_at(&batch, 1, 0), Some("Alice"));
        assert_eq!(value_at(&batch, 2, 1), Some("25"));
    }

    #[test]
    fn test_parse_tsv_keeps_blank_line_rows() {
        let batch = parse_delimited("A\tB\n\n1\t2", Delimiter::Tab).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(value_at(&batch, 2, 1), Some("2"));
    }

    #[test]
    fn test_quoted_csv() {
        let text = "\"Hello, World\",42\n\"She said \"\"hi\"\"\",0";
        let batch = parse_delimited(text, Delimiter::Comma).unwrap();
        assert_eq!(value_at(&batch, 0, 0), Some("Hello, World"));
        assert_eq!(value_at(&batch, 1, 0), Some("She said \"hi\""));
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let err = parse_delimited("a,b\n\"oops,c", Delimiter::Comma).unwrap_err();
        assert!(matches!(err, GridError::Import(ref m) if m.contains("line 2")));
    }

    #[test]
    fn test_json_objects_header_from_first_keys() {
        let batch = parse_json(r#"[{"name": "a", "qty": 3}, {"name": "b", "qty": 4.5}]"#).unwrap();
        assert_eq!(value_at(&batch, 0, 0), Some("name"));
        assert_eq!(value_at(&batch, 0, 1), Some("qty"));
        assert_eq!(value_at(&batch, 1, 0), Some("a"));
        assert_eq!(value_at(&batch, 2, 1), Some("4.5"));
    }

    #[test]
    fn test_json_arrays() {
        let batch = parse_json(r#"[["Name", "Score"], ["x", 1], ["y", null, true]]"#).unwrap();
        assert_eq!(value_at(&batch, 1, 1), Some("1"));
        assert_eq!(value_at(&batch, 2, 1), None);
        assert_eq!(value_at(&batch, 2, 2), Some("true"));
    }

    #[test]
    fn test_json_rejects_unknown_key_and_nesting() {
        assert!(parse_json(r#"[{"a": 1}, {"b": 2}]"#).is_err());
        assert!(parse_json(r#"[[{"a": 1}]]"#).is_err());
        assert!(parse_json(r#"{"a": 1}"#).is_err());
        assert!(parse_json("[1, 2]").is_err());
    }

    #[test]
    fn test_extent_check() {
        let batch = parse_delimited("a,b,c", Delimiter::Comma).unwrap();
        assert!(batch.check_extent(1, 3).is_ok());
        assert!(batch.check_extent(1, 2).is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImportFormat::from_path("data.JSON"), Some(ImportFormat::Json));
        assert_eq!(
            ImportFormat::from_path("a/b.tsv"),
            Some(ImportFormat::Delimited(Delimiter::Tab))
        );
        assert_eq!(ImportFormat::from_path("noext"), None);
    }
}
