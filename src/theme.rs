//! Palette for the terminal backend.
//!
//! Two fixed palettes selected by [`ThemeMode`]. Colors use ANSI palette
//! indices so the terminal's own scheme still shows through.

use crossterm::style::Color;

use crate::renderer::Tone;
use crate::types::ThemeMode;

/// Colors the terminal backend paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub background: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            text: Color::AnsiValue(252),
            muted: Color::AnsiValue(242),
            accent: Color::AnsiValue(75),
            background: Color::AnsiValue(234),
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color::AnsiValue(235),
            muted: Color::AnsiValue(247),
            accent: Color::AnsiValue(25),
            background: Color::AnsiValue(255),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Foreground for a cell of the given tone.
    pub fn foreground(&self, tone: Tone) -> Color {
        match tone {
            Tone::Normal => self.text,
            Tone::Disabled => self.muted,
            Tone::Focused => self.accent,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selects_palette() {
        assert_eq!(Palette::for_mode(ThemeMode::Dark), Palette::dark());
        assert_eq!(Palette::for_mode(ThemeMode::Light), Palette::light());
        assert_ne!(Palette::dark().background, Palette::light().background);
    }

    #[test]
    fn test_tones_are_distinct() {
        let palette = Palette::default();
        let normal = palette.foreground(Tone::Normal);
        assert_ne!(normal, palette.foreground(Tone::Disabled));
        assert_ne!(normal, palette.foreground(Tone::Focused));
    }
}
