//! Core types shared by every layer of the gallery.
//!
//! - [`Size`] / [`Point`] - surface geometry in cells
//! - [`Attr`] - text attributes carried by presentation nodes
//! - [`ThemeMode`] - the dark/light flag passed in at startup

use serde::Deserialize;

// =============================================================================
// Geometry
// =============================================================================

/// Width and height of the surface (or of a control that fills it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<(u16, u16)> for Size {
    fn from((width, height): (u16, u16)) -> Self {
        Self { width, height }
    }
}

/// A position on the surface (0-indexed column/row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle produced by layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check whether a point falls inside this rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && (point.x as u32) < self.x as u32 + self.width as u32
            && (point.y as u32) < self.y as u32 + self.height as u32
    }

    /// Horizontal position of `x` inside the rectangle, normalized to 0..=1.
    pub fn fraction_x(&self, x: u16) -> f64 {
        if self.width <= 1 {
            return 0.0;
        }
        let offset = x.saturating_sub(self.x).min(self.width - 1);
        offset as f64 / (self.width - 1) as f64
    }

    /// Vertical counterpart of [`Rect::fraction_x`].
    pub fn fraction_y(&self, y: u16) -> f64 {
        if self.height <= 1 {
            return 0.0;
        }
        let offset = y.saturating_sub(self.y).min(self.height - 1);
        offset as f64 / (self.height - 1) as f64
    }

    /// Both fractions for a point.
    pub fn fraction(&self, point: Point) -> (f64, f64) {
        (self.fraction_x(point.x), self.fraction_y(point.y))
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Theme Mode
// =============================================================================

/// Dark or light palette, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 4)));
        assert!(!rect.contains(Point::new(6, 4)));
        assert!(!rect.contains(Point::new(5, 5)));
        assert!(!rect.contains(Point::new(1, 3)));
    }

    #[test]
    fn test_rect_fraction() {
        let rect = Rect::new(10, 0, 11, 1);
        assert_eq!(rect.fraction_x(10), 0.0);
        assert_eq!(rect.fraction_x(15), 0.5);
        assert_eq!(rect.fraction_x(20), 1.0);
        // Outside the track clamps to the ends
        assert_eq!(rect.fraction_x(3), 0.0);
        assert_eq!(rect.fraction_x(40), 1.0);
    }

    #[test]
    fn test_attr_combine() {
        let attrs = Attr::BOLD | Attr::UNDERLINE;
        assert!(attrs.contains(Attr::BOLD));
        assert!(!attrs.contains(Attr::DIM));
    }
}
