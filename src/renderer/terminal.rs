//! Terminal backend for fullscreen mode.
//!
//! Keeps its own copy of the presentation tree, applies patches to it, and
//! on `present` lays the tree out, paints a [`Canvas`] and writes only the
//! rows that differ from the previous frame.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each row of the new canvas:
//!    - If the previous frame has the same size and the row is unchanged: skip
//!    - Otherwise: move to the row start and print it in style runs
//! 3. Flush output (single write)
//! 4. Store the canvas as previous for the next comparison

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::{Backend, Flow, Node, Patch, Surface};
use crate::theme::Palette;
use crate::types::{Attr, Size};

use super::canvas::{Canvas, Cell, Tone};
use super::input;

/// Crossterm-backed [`Backend`].
pub struct TerminalBackend<W: Write> {
    out: W,
    palette: Palette,
    size: Size,
    tree: Option<Node>,
    previous: Option<Canvas>,
    dirty: bool,
    last_repaint: usize,
    /// Raw mode and alternate screen are only touched for a real terminal
    owns_terminal: bool,
    entered: bool,
}

impl TerminalBackend<Stdout> {
    /// Backend on the process's terminal, sized to it.
    pub fn stdout(palette: Palette) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let mut backend = Self::new(io::stdout(), Size::new(width, height), palette);
        backend.owns_terminal = true;
        Ok(backend)
    }
}

impl<W: Write> TerminalBackend<W> {
    /// Backend writing to any sink. Terminal modes are left alone.
    pub fn new(out: W, size: Size, palette: Palette) -> Self {
        Self {
            out,
            palette,
            size,
            tree: None,
            previous: None,
            dirty: false,
            last_repaint: 0,
            owns_terminal: false,
            entered: false,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Last painted frame.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.previous.as_ref()
    }

    /// Rows written by the last `present`.
    pub fn last_repaint(&self) -> usize {
        self.last_repaint
    }

    /// Force a full redraw on the next present.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.dirty = true;
    }

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        if self.owns_terminal {
            terminal::enable_raw_mode()?;
            execute!(
                self.out,
                EnterAlternateScreen,
                EnableMouseCapture,
                EnableBracketedPaste,
                Hide,
                Clear(ClearType::All)
            )?;
        }
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        if self.owns_terminal {
            execute!(
                self.out,
                SetAttribute(Attribute::Reset),
                ResetColor,
                DisableBracketedPaste,
                DisableMouseCapture,
                Show,
                LeaveAlternateScreen
            )?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Paint the tree and write the rows that changed.
    fn draw(&mut self) -> Result<usize> {
        let Some(tree) = self.tree.as_ref() else {
            return Ok(0);
        };
        let canvas = Canvas::paint(tree, self.size)?;

        let comparable = self
            .previous
            .as_ref()
            .filter(|previous| previous.size() == canvas.size());

        queue!(self.out, BeginSynchronizedUpdate)?;
        let mut repainted = 0;
        for y in 0..canvas.size().height {
            let changed = comparable.is_none_or(|previous| previous.row(y) != canvas.row(y));
            if changed {
                paint_row(&mut self.out, &self.palette, y, canvas.row(y))?;
                repainted += 1;
            }
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(canvas);
        Ok(repainted)
    }
}

/// Print one row in runs of equal style.
fn paint_row<W: Write>(out: &mut W, palette: &Palette, y: u16, row: &[Cell]) -> io::Result<()> {
    queue!(out, MoveTo(0, y))?;
    let mut current: Option<(Attr, Tone)> = None;
    for cell in row.iter().filter(|cell| !cell.is_continuation()) {
        if current != Some((cell.attrs, cell.tone)) {
            apply_style(out, palette, cell.attrs, cell.tone)?;
            current = Some((cell.attrs, cell.tone));
        }
        queue!(out, Print(cell.ch))?;
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)
}

fn apply_style<W: Write>(out: &mut W, palette: &Palette, attrs: Attr, tone: Tone) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(palette.foreground(tone)),
        SetBackgroundColor(palette.background)
    )?;
    let mapping = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
    ];
    for (flag, attribute) in mapping {
        if attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

impl<W: Write> Backend for TerminalBackend<W> {
    fn mount(&mut self, tree: &Node) -> Result<()> {
        self.enter()?;
        self.tree = Some(tree.clone());
        self.invalidate();
        Ok(())
    }

    fn patch(&mut self, patch: &Patch) -> Result<()> {
        if let Some(tree) = self.tree.as_mut() {
            if !tree.apply(patch) {
                debug!(target_id = %patch.target(), "patch target not in tree");
            }
            self.dirty = true;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if !self.dirty {
            self.last_repaint = 0;
            return Ok(());
        }
        self.last_repaint = self.draw()?;
        self.dirty = false;
        Ok(())
    }

    fn resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        self.invalidate();
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.tree = None;
        self.previous = None;
        self.leave()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalBackend<W> {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            warn!(%err, "failed to restore terminal");
        }
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Process pending input once (waits up to ~16ms).
///
/// Returns [`Flow::Quit`] when a quit key was pressed.
pub fn tick<W: Write>(surface: &mut Surface<TerminalBackend<W>>) -> Result<Flow> {
    for event in input::poll_events(Duration::from_millis(16))? {
        if surface.dispatch(event)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

/// Mount the surface and process input until quit, then unmount.
///
/// # Example
///
/// ```ignore
/// let backend = TerminalBackend::stdout(Palette::for_mode(config.theme))?;
/// let mut surface = Surface::new(config, backend)?;
/// run(&mut surface)?;  // Blocks here until Ctrl+C / Ctrl+Q
/// ```
pub fn run<W: Write>(surface: &mut Surface<TerminalBackend<W>>) -> Result<()> {
    let size = surface.backend().size();
    surface.mount()?;
    surface.resize(size)?;
    while tick(surface)? == Flow::Continue {}
    surface.unmount()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{allocate_id, reset_node_ids, NodeId, NodeKind};

    fn setup() -> TerminalBackend<Vec<u8>> {
        reset_node_ids();
        TerminalBackend::new(Vec::new(), Size::new(12, 4), Palette::dark())
    }

    fn output(backend: &mut TerminalBackend<Vec<u8>>) -> String {
        String::from_utf8_lossy(&std::mem::take(backend.writer_mut())).into_owned()
    }

    fn page(lines: &[&str]) -> (Node, Vec<NodeId>) {
        let texts: Vec<Node> = lines
            .iter()
            .map(|line| Node::new(allocate_id(), NodeKind::Text).with_text(*line))
            .collect();
        let ids = texts.iter().map(|t| t.id).collect();
        (Node::new(allocate_id(), NodeKind::Page).with_children(texts), ids)
    }

    #[test]
    fn test_first_present_paints_every_row() {
        let mut backend = setup();
        let (tree, _) = page(&["hello"]);
        backend.mount(&tree).unwrap();
        backend.present().unwrap();

        assert_eq!(backend.last_repaint(), 4);
        assert!(output(&mut backend).contains("hello"));
        assert_eq!(backend.canvas().unwrap().lines()[1], "  hello     ");
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut backend = setup();
        let (tree, _) = page(&["hello"]);
        backend.mount(&tree).unwrap();
        backend.present().unwrap();
        output(&mut backend);

        backend.present().unwrap();
        assert_eq!(backend.last_repaint(), 0);
        assert!(output(&mut backend).is_empty());
    }

    #[test]
    fn test_patch_repaints_changed_row_only() {
        let mut backend = setup();
        let (tree, ids) = page(&["one"]);
        backend.mount(&tree).unwrap();
        backend.present().unwrap();
        output(&mut backend);

        let replacement = Node::new(ids[0], NodeKind::Text).with_text("two");
        backend.patch(&Patch::Replace(replacement)).unwrap();
        backend.present().unwrap();
        assert_eq!(backend.last_repaint(), 1);
        let written = output(&mut backend);
        assert!(written.contains("two"));
        assert!(!written.contains("one"));
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut backend = setup();
        let (tree, _) = page(&["x"]);
        backend.mount(&tree).unwrap();
        backend.present().unwrap();

        backend.resize(Size::new(6, 3)).unwrap();
        backend.present().unwrap();
        assert_eq!(backend.last_repaint(), 3);
        assert_eq!(backend.canvas().unwrap().size(), Size::new(6, 3));
    }

    #[test]
    fn test_teardown_forgets_tree() {
        let mut backend = setup();
        let (tree, _) = page(&["x"]);
        backend.mount(&tree).unwrap();
        backend.teardown().unwrap();
        backend.present().unwrap();
        assert!(backend.canvas().is_none());
    }
}
