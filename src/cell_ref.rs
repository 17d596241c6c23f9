//! A1-style cell references and column letters.

use crate::types::{CellPos, CellRange};

/// Convert a 0-based column index to letters (A, B, ..., Z, AA, AB, ...).
pub fn col_to_letter(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        // n % 26 < 26, so the digit always fits in a byte.
        let digit = u8::try_from(n % 26).unwrap_or(0);
        letters.push(char::from(b'A' + digit));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Parse a reference like "A1" or "$C$51" into a 0-indexed position.
///
/// Letters must precede digits; row 0 and overflowing values are rejected.
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellPos> {
    let s = cell_ref.trim();
    let split = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(split);
    let letters = letters.replace('$', "");
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        let value = u32::from(ch.to_ascii_uppercase()) - u32::from('A') + 1;
        col = col.checked_mul(26)?.checked_add(value)?;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some(CellPos::new(row - 1, col - 1))
}

/// Parse "A1:B10" or a single "A1" into a normalized range.
pub fn parse_cell_range(range: &str) -> Option<CellRange> {
    match range.split_once(':') {
        Some((start, end)) => Some(CellRange::from_corners(
            parse_cell_ref(start)?,
            parse_cell_ref(end)?,
        )),
        None => parse_cell_ref(range).map(CellRange::single),
    }
}

/// Format a position as "A1".
pub fn format_cell_ref(pos: CellPos) -> String {
    format!("{}{}", col_to_letter(pos.col), u64::from(pos.row) + 1)
}
