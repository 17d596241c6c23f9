//! CSS color handling for grid rendering.
//!
//! Colors travel as CSS strings, which Canvas 2D consumes directly. Config
//! colors are validated here before they reach a surface.

/// Parse a color and return RGBA components (0-255 for RGB, 0.0-1.0 for alpha).
///
/// Supports `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
pub fn parse_color_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let s = s.trim();

    if s.starts_with('#') {
        parse_hex_rgba(s)
    } else if s.starts_with("rgba(") {
        parse_rgba_string(s)
    } else if s.starts_with("rgb(") {
        parse_rgb_string(s)
    } else {
        None
    }
}

fn parse_hex_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let hex = s.strip_prefix('#')?;
    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

    match hex.len() {
        3 => {
            let nib = |i: usize| byte(i..i + 1).map(|v| v * 17);
            Some((nib(0)?, nib(1)?, nib(2)?, 1.0))
        }
        6 => Some((byte(0..2)?, byte(2..4)?, byte(4..6)?, 1.0)),
        8 => {
            let a = byte(6..8)?;
            Some((byte(0..2)?, byte(2..4)?, byte(4..6)?, f64::from(a) / 255.0))
        }
        _ => None,
    }
}

fn parse_rgb_string(s: &str) -> Option<(u8, u8, u8, f64)> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b, 1.0))
}

fn parse_rgba_string(s: &str) -> Option<(u8, u8, u8, f64)> {
    let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    let a: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(0.0..=1.0).contains(&a) {
        return None;
    }
    Some((r, g, b, a))
}

/// Fixed rendering constants.
pub mod palette {
    pub const WHITE: &str = "#FFFFFF";

    /// Cell text font
    pub const CELL_FONT: &str = "14px Arial";

    /// Header label font
    pub const HEADER_FONT: &str = "12px Arial";

    /// Horizontal padding between a cell edge and its text
    pub const CELL_PADDING: f64 = 4.0;

    /// Width of the range border
    pub const RANGE_BORDER_WIDTH: f64 = 2.0;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_color_rgba("#107C41"), Some((16, 124, 65, 1.0)));
        assert_eq!(parse_color_rgba("#107c41"), Some((16, 124, 65, 1.0)));
    }

    #[test]
    fn test_parse_hex_3() {
        assert_eq!(parse_color_rgba("#ccc"), Some((204, 204, 204, 1.0)));
    }

    #[test]
    fn test_parse_rgba() {
        let (r, g, b, a) = parse_color_rgba("rgba(180, 215, 255, 0.3)").unwrap();
        assert_eq!((r, g, b), (180, 215, 255));
        assert_eq!(a, 0.3);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_color_rgba("blue-ish"), None);
        assert_eq!(parse_color_rgba("#12345"), None);
        assert_eq!(parse_color_rgba("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color_rgba("rgba(0, 0, 0, 2)"), None);
    }
}
