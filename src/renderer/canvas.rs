//! Character canvas.
//!
//! Paints a laid-out presentation tree into a grid of cells. Node text is
//! clipped to the node's rectangle and to the canvas; later nodes paint over
//! earlier ones, so the background (first child of the page) sits underneath
//! everything else.

use crate::error::Result;
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::{compute_layout, grapheme_width, LayoutMap};
use crate::pipeline::Node;
use crate::types::{Attr, Size};

/// How a cell should be colored, inherited from the nearest control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Disabled,
    Focused,
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Base character of the grapheme painted here; combining marks are
    /// not kept. `'\0'` marks the second half of a wide character.
    pub ch: char,
    pub attrs: Attr,
    pub tone: Tone,
}

impl Cell {
    const CONTINUATION: char = '\0';

    pub fn is_continuation(&self) -> bool {
        self.ch == Self::CONTINUATION
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attrs: Attr::NONE,
            tone: Tone::Normal,
        }
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            cells: vec![Cell::default(); size.area()],
        }
    }

    /// Lay out `tree` on `size` cells and paint it.
    pub fn paint(tree: &Node, size: Size) -> Result<Self> {
        let layout = compute_layout(tree, size)?;
        let mut canvas = Self::new(size);
        canvas.paint_node(tree, &layout, Tone::Normal);
        Ok(canvas)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(self.index(x, y))
    }

    /// Cells of one row.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = usize::from(y) * usize::from(self.width);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Plain text of every row, trailing spaces kept.
    pub fn lines(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                self.row(y)
                    .iter()
                    .filter(|cell| !cell.is_continuation())
                    .map(|cell| cell.ch)
                    .collect()
            })
            .collect()
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.cells[index] = cell;
        }
    }

    fn paint_node(&mut self, node: &Node, layout: &LayoutMap, inherited: Tone) {
        let tone = if !node.enabled {
            Tone::Disabled
        } else if node.focused {
            Tone::Focused
        } else {
            inherited
        };

        if !node.text.is_empty() {
            if let Some(rect) = layout.rect(node.id) {
                let right = rect.x.saturating_add(rect.width).min(self.width);
                let bottom = rect.y.saturating_add(rect.height).min(self.height);
                for (row, line) in node.text.split('\n').enumerate() {
                    let Some(y) = u16::try_from(row).ok().map(|row| rect.y.saturating_add(row)) else {
                        break;
                    };
                    if y >= bottom {
                        break;
                    }
                    self.paint_line(line, rect.x, right, y, node.attrs, tone);
                }
            }
        }

        for child in &node.children {
            self.paint_node(child, layout, tone);
        }
    }

    fn paint_line(&mut self, line: &str, left: u16, right: u16, y: u16, attrs: Attr, tone: Tone) {
        let mut x = left;
        for grapheme in line.graphemes(true) {
            let width = grapheme_width(grapheme);
            let Some(ch) = grapheme.chars().next().filter(|_| width > 0) else {
                continue;
            };
            if x.saturating_add(width) > right {
                break;
            }
            self.set(x, y, Cell { ch, attrs, tone });
            if width == 2 {
                self.set(
                    x + 1,
                    y,
                    Cell {
                        ch: Cell::CONTINUATION,
                        attrs,
                        tone,
                    },
                );
            }
            x += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{allocate_id, reset_node_ids, NodeKind};

    fn setup() {
        reset_node_ids();
    }

    fn text(content: &str) -> Node {
        Node::new(allocate_id(), NodeKind::Text).with_text(content)
    }

    fn page(children: Vec<Node>) -> Node {
        Node::new(allocate_id(), NodeKind::Page).with_children(children)
    }

    #[test]
    fn test_paints_with_page_padding() {
        setup();
        let canvas = Canvas::paint(&page(vec![text("hello")]), Size::new(10, 3)).unwrap();
        let lines = canvas.lines();
        assert_eq!(lines[0], "          ");
        assert_eq!(lines[1], "  hello   ");
        assert_eq!(canvas.get(2, 1).unwrap().ch, 'h');
    }

    #[test]
    fn test_clips_to_canvas() {
        setup();
        let canvas = Canvas::paint(&page(vec![text("a long line of text")]), Size::new(8, 3)).unwrap();
        assert_eq!(canvas.lines()[1], "  a long");
        assert!(canvas.get(8, 1).is_none());
    }

    #[test]
    fn test_wide_chars_take_two_cells() {
        setup();
        let canvas = Canvas::paint(&page(vec![text("日本")]), Size::new(8, 3)).unwrap();
        assert_eq!(canvas.get(2, 1).unwrap().ch, '日');
        assert!(canvas.get(3, 1).unwrap().is_continuation());
        assert_eq!(canvas.lines()[1], "  日本  ");
    }

    #[test]
    fn test_combining_marks_share_a_cell() {
        setup();
        let canvas = Canvas::paint(&page(vec![text("e\u{301}x\u{200B}y")]), Size::new(8, 3)).unwrap();
        assert_eq!(canvas.get(2, 1).unwrap().ch, 'e');
        assert_eq!(canvas.get(3, 1).unwrap().ch, 'x');
        assert_eq!(canvas.get(4, 1).unwrap().ch, 'y');
    }

    #[test]
    fn test_tone_inherited_from_control() {
        setup();
        let part = text("x");
        let part_id = part.id;
        let disabled = Node::new(allocate_id(), NodeKind::Row)
            .with_enabled(false)
            .with_children(vec![part]);
        let tree = page(vec![disabled]);
        let layout = compute_layout(&tree, Size::new(6, 3)).unwrap();
        let rect = layout.rect(part_id).unwrap();

        let canvas = Canvas::paint(&tree, Size::new(6, 3)).unwrap();
        assert_eq!(canvas.get(rect.x, rect.y).unwrap().tone, Tone::Disabled);
        assert_eq!(canvas.get(0, 0).unwrap().tone, Tone::Normal);
    }

    #[test]
    fn test_attrs_carried() {
        setup();
        let bold = text("B").with_attrs(Attr::BOLD);
        let canvas = Canvas::paint(&page(vec![bold]), Size::new(5, 3)).unwrap();
        assert_eq!(canvas.get(2, 1).unwrap().attrs, Attr::BOLD);
    }
}
