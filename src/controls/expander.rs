//! Expander - header row that shows or hides a content element.
//!
//! The header is an [`Element`], so it can carry its own controls (a
//! checkbox next to the title, for instance). Those stay interactive on
//! their own; only hits on the header itself toggle the expander.

use spark_signals::{signal, Signal};
use std::rc::Rc;
use tracing::debug;

use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};

use super::{
    control_base_impl, Control, ControlBase, ControlEvent, ControlKind, Element, ToggleCallback,
};

#[derive(Clone)]
pub struct ExpanderProps {
    pub header: Element,
    pub content: Option<Element>,
    pub expanded: bool,
    pub enabled: bool,
    pub on_change: Option<ToggleCallback>,
}

impl Default for ExpanderProps {
    fn default() -> Self {
        Self {
            header: Element::text(""),
            content: None,
            expanded: false,
            enabled: true,
            on_change: None,
        }
    }
}

#[derive(Clone)]
pub struct Expander {
    base: ControlBase,
    header_row: NodeId,
    chevron: NodeId,
    header: Element,
    content: Option<Element>,
    expanded: Signal<bool>,
    on_change: Option<ToggleCallback>,
}

impl Expander {
    pub fn new(props: ExpanderProps) -> Self {
        Self {
            base: ControlBase::new(props.enabled),
            header_row: allocate_id(),
            chevron: allocate_id(),
            header: props.header,
            content: props.content,
            expanded: signal(props.expanded),
            on_change: props.on_change,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Expand or collapse without firing the callback.
    pub fn set_expanded(&self, expanded: bool) {
        if self.expanded.get() != expanded {
            self.expanded.set(expanded);
            self.refresh();
        }
    }

    fn flip(&self) -> bool {
        let expanded = !self.expanded.get();
        self.expanded.set(expanded);
        self.refresh();
        if let Some(on_change) = &self.on_change {
            on_change(expanded);
        }
        true
    }
}

impl Control for Expander {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Expander
    }

    fn render(&self) -> Node {
        let expanded = self.expanded.get();
        let chevron = if expanded { "▾ " } else { "▸ " };
        let header = Node::new(self.header_row, NodeKind::Row).with_children(vec![
            Node::new(self.chevron, NodeKind::Part).with_text(chevron),
            self.header.render(),
        ]);

        let mut children = vec![header];
        if expanded {
            if let Some(content) = &self.content {
                children.push(content.render());
            }
        }
        self.base.node(ControlKind::Expander).with_children(children)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled expander ignored input");
            return false;
        }
        match event {
            ControlEvent::Activate => self.flip(),
            ControlEvent::Key(key) if key.is_activation() => self.flip(),
            _ => false,
        }
    }

    /// Header controls always; content controls only while expanded.
    fn children(&self) -> Vec<Rc<dyn Control>> {
        let mut controls = self.header.controls();
        if self.expanded.get() {
            if let Some(content) = &self.content {
                controls.extend(content.controls());
            }
        }
        controls
    }

    fn hit(&self, target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        let on_header = target == self.header_row
            || target == self.chevron
            || (target == self.header.id() && !matches!(self.header, Element::Control(_)));
        on_header.then_some(ControlEvent::Activate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::setup;
    use crate::controls::{Button, ButtonProps, Checkbox, CheckboxProps};
    use std::cell::RefCell;

    fn basic() -> (Expander, Button) {
        let button = Button::new(ButtonProps::labeled("Click me"));
        let expander = Expander::new(ExpanderProps {
            header: Element::text("Basic String Header"),
            content: Some(Element::column(vec![
                Element::text("This is some content"),
                button.clone().into(),
            ])),
            ..Default::default()
        });
        (expander, button)
    }

    #[test]
    fn test_collapsed_omits_content() {
        setup();
        let (expander, _) = basic();
        let node = expander.render();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.plain_text(), "▸ \nBasic String Header");
    }

    #[test]
    fn test_toggle_shows_content() {
        setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let expander = Expander::new(ExpanderProps {
            header: Element::text("Header"),
            content: Some(Element::text("Body")),
            on_change: Some(Rc::new(move |open| seen_clone.borrow_mut().push(open))),
            ..Default::default()
        });

        expander.handle_input(&ControlEvent::Activate);
        assert!(expander.is_expanded());
        assert!(expander.render().plain_text().contains("Body"));
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn test_children_follow_expanded_state() {
        setup();
        let (expander, button) = basic();
        assert!(expander.children().is_empty());
        expander.set_expanded(true);
        let ids: Vec<NodeId> = expander.children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![button.id()]);
    }

    #[test]
    fn test_header_control_keeps_its_hits() {
        setup();
        let checkbox = Checkbox::new(CheckboxProps::default());
        let expander = Expander::new(ExpanderProps {
            header: Element::row(vec![checkbox.clone().into(), Element::text("Header with Action")]),
            content: Some(Element::text("Content with fancy header")),
            ..Default::default()
        });

        assert_eq!(expander.children().len(), 1);
        assert_eq!(expander.hit(checkbox.id(), (0.0, 0.0)), None);
        assert_eq!(expander.hit(expander.header.id(), (0.0, 0.0)), Some(ControlEvent::Activate));
        assert_eq!(expander.hit(expander.id(), (0.0, 0.0)), None);
    }

    #[test]
    fn test_disabled_ignores_input() {
        setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let expander = Expander::new(ExpanderProps {
            header: Element::text("Header"),
            content: Some(Element::text("Body")),
            enabled: false,
            on_change: Some(Rc::new(move |open| seen_clone.borrow_mut().push(open))),
            ..Default::default()
        });

        assert!(!expander.handle_input(&ControlEvent::Activate));
        let enter = crate::state::KeyboardEvent::new("Enter");
        assert!(!expander.handle_input(&ControlEvent::Key(enter)));
        assert!(!expander.is_expanded());
        assert_eq!(expander.render().children.len(), 1);
        assert!(seen.borrow().is_empty());

        expander.set_expanded(true);
        assert!(expander.is_expanded());
        assert!(seen.borrow().is_empty());
    }
}
