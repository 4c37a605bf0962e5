//! Background - dot pattern filling the surface.
//!
//! The pattern depends on the surface size, so the surface hands every
//! resize to [`Background::set_size`], which queues a redraw.

use spark_signals::{signal, Signal};

use crate::pipeline::{Node, NodeId};
use crate::types::{Attr, Size};

use super::{control_base_impl, Control, ControlBase, ControlEvent, ControlKind};

const DOT: char = '·';

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundProps {
    /// Columns between dots; rows use half of it
    pub spacing: u16,
    pub size: Size,
}

impl Default for BackgroundProps {
    fn default() -> Self {
        Self {
            spacing: 4,
            size: Size::new(0, 0),
        }
    }
}

#[derive(Clone)]
pub struct Background {
    base: ControlBase,
    spacing: u16,
    size: Signal<Size>,
}

impl Background {
    pub fn new(props: BackgroundProps) -> Self {
        Self {
            base: ControlBase::new(true),
            spacing: props.spacing.max(1),
            size: signal(props.size),
        }
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Follow the surface size. Redraws only when it changed.
    pub fn set_size(&self, size: Size) {
        if self.size.get() != size {
            self.size.set(size);
            self.refresh();
        }
    }

    fn pattern(&self) -> String {
        let Size { width, height } = self.size.get();
        let row_spacing = (self.spacing / 2).max(1);
        let dotted: String = (0..width)
            .map(|x| if x % self.spacing == 0 { DOT } else { ' ' })
            .collect();
        let blank = " ".repeat(usize::from(width));
        (0..height)
            .map(|y| if y % row_spacing == 0 { dotted.as_str() } else { blank.as_str() })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Control for Background {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Background
    }

    fn render(&self) -> Node {
        self.base
            .node(ControlKind::Background)
            .with_text(self.pattern())
            .with_attrs(Attr::DIM)
    }

    fn handle_input(&self, _event: &ControlEvent) -> bool {
        false
    }

    fn is_focusable(&self) -> bool {
        false
    }

    fn hit(&self, _target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::setup_mounted;
    use crate::pipeline::patch;

    #[test]
    fn test_pattern_fills_size() {
        setup_mounted();
        let background = Background::new(BackgroundProps { spacing: 4, size: Size::new(9, 3) });
        let text = background.render().text;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["·   ·   ·", "         ", "·   ·   ·"]);
    }

    #[test]
    fn test_resize_redraws_once() {
        setup_mounted();
        let background = Background::new(BackgroundProps { spacing: 4, size: Size::new(8, 2) });
        background.set_size(Size::new(12, 4));
        background.set_size(Size::new(12, 4));
        assert_eq!(patch::pending_len(), 1);
        assert_eq!(background.render().text.lines().count(), 4);
    }
}
