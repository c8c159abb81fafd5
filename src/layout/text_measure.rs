//! Text Measurement
//!
//! Label sizes in terminal cells. Labels are single-line, so height is 1 for
//! any non-empty text.

use unicode_width::UnicodeWidthStr;

/// Measures a label for the label layout callback.
pub trait TextMeasure {
    /// `(width, height)` of `text`.
    fn measure(&self, text: &str) -> (f32, f32);
}

/// Unicode display width in cells (CJK and most emoji take two).
#[derive(Debug, Clone, Copy, Default)]
pub struct CellTextMeasure;

impl TextMeasure for CellTextMeasure {
    fn measure(&self, text: &str) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        (string_width(text) as f32, 1.0)
    }
}

/// Display width of a single-line string, control characters excluded.
pub fn string_width(s: &str) -> usize {
    s.lines().next().map(UnicodeWidthStr::width).unwrap_or(0)
}
