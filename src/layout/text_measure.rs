//! Text Measurement
//!
//! Display width of text in terminal cells, per grapheme cluster:
//! - ASCII printable: 1 cell, control characters: 0 cells
//! - CJK and emoji (including ZWJ sequences, flags, skin tones): 2 cells
//! - Combining marks and zero-width characters: 0 cells
//!
//! Node text never wraps: every `\n` starts a new row and long rows are
//! clipped by whoever paints them.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Width of one codepoint in cells.
pub fn char_width(c: char) -> u16 {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }
    // Terminals draw these emoji blocks wide
    match c as u32 {
        0x2600..=0x27BF | 0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1F9FF
        | 0x1FA70..=0x1FAFF => 2,
        _ => c.width().map_or(0, |w| w as u16),
    }
}

/// Width of one grapheme cluster in cells.
pub fn grapheme_width(grapheme: &str) -> u16 {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if grapheme.len() == first.len_utf8() {
        return char_width(first);
    }

    // Flag: regional indicator pair
    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }
    // ZWJ, VS16, skin tone and keycap make an emoji sequence
    if chars.any(|c| matches!(c as u32, 0x200D | 0xFE0F | 0x1F3FB..=0x1F3FF | 0x20E3)) {
        return 2;
    }
    // Base plus combining marks
    char_width(first)
}

/// Measure the display width of a single-line string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    if s.is_ascii() {
        return s.bytes().filter(|b| !b.is_ascii_control()).count().min(usize::from(u16::MAX)) as u16;
    }
    s.graphemes(true)
        .fold(0u16, |width, g| width.saturating_add(grapheme_width(g)))
}

/// Width and height of a block of text: the widest line and the number of
/// lines. Empty text measures 0x0.
pub fn text_size(text: &str) -> (u16, u16) {
    if text.is_empty() {
        return (0, 0);
    }
    let mut width = 0;
    let mut height = 0u16;
    for line in text.split('\n') {
        width = width.max(string_width(line));
        height = height.saturating_add(1);
    }
    (width, height)
}

/// Truncate a line to fit `width` cells, ending in an ellipsis when cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    if string_width(text) <= width {
        return text.to_string();
    }

    // Leave room for the ellipsis
    let target_width = width - 1;
    let mut result = String::new();
    let mut current_width = 0u16;
    for grapheme in text.graphemes(true) {
        let w = grapheme_width(grapheme);
        if current_width + w > target_width {
            break;
        }
        result.push_str(grapheme);
        current_width += w;
    }
    result.push('…');
    result
}
