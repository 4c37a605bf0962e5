//! Element - a control subtree.
//!
//! Display items and expanders hold an `Element` as their body: a single
//! control, a static text, or a row/column of further elements.

use std::rc::Rc;

use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};
use crate::types::Attr;

use super::{
    Background, Button, Calendar, Checkbox, Control, Dropdown, Expander, ListItem,
    ProgressIndicator, RadioGroup, Slider, TextField, Toggle,
};

/// Node of a composed control tree.
#[derive(Clone)]
pub enum Element {
    Control(Rc<dyn Control>),
    Text { id: NodeId, content: String, attrs: Attr },
    Row { id: NodeId, children: Vec<Element> },
    Column { id: NodeId, children: Vec<Element> },
}

impl Element {
    pub fn control(control: impl Control + 'static) -> Self {
        Element::Control(Rc::new(control))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::styled_text(content, Attr::NONE)
    }

    pub fn styled_text(content: impl Into<String>, attrs: Attr) -> Self {
        Element::Text {
            id: allocate_id(),
            content: content.into(),
            attrs,
        }
    }

    pub fn row(children: Vec<Element>) -> Self {
        Element::Row {
            id: allocate_id(),
            children,
        }
    }

    pub fn column(children: Vec<Element>) -> Self {
        Element::Column {
            id: allocate_id(),
            children,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Element::Control(control) => control.id(),
            Element::Text { id, .. } | Element::Row { id, .. } | Element::Column { id, .. } => *id,
        }
    }

    pub fn render(&self) -> Node {
        match self {
            Element::Control(control) => control.render(),
            Element::Text { id, content, attrs } => Node::new(*id, NodeKind::Text)
                .with_text(content.as_str())
                .with_attrs(*attrs),
            Element::Row { id, children } => Node::new(*id, NodeKind::Row)
                .with_children(children.iter().map(Element::render).collect()),
            Element::Column { id, children } => Node::new(*id, NodeKind::Column)
                .with_children(children.iter().map(Element::render).collect()),
        }
    }

    /// Every control in the subtree in document order, including controls
    /// nested inside other controls.
    pub fn controls(&self) -> Vec<Rc<dyn Control>> {
        let mut out = Vec::new();
        self.collect_controls(&mut out);
        out
    }

    fn collect_controls(&self, out: &mut Vec<Rc<dyn Control>>) {
        match self {
            Element::Control(control) => push_with_children(control, out),
            Element::Text { .. } => {}
            Element::Row { children, .. } | Element::Column { children, .. } => {
                for child in children {
                    child.collect_controls(out);
                }
            }
        }
    }
}

fn push_with_children(control: &Rc<dyn Control>, out: &mut Vec<Rc<dyn Control>>) {
    out.push(Rc::clone(control));
    for child in control.children() {
        push_with_children(&child, out);
    }
}

impl From<&str> for Element {
    fn from(content: &str) -> Self {
        Element::text(content)
    }
}

impl From<String> for Element {
    fn from(content: String) -> Self {
        Element::text(content)
    }
}

impl From<Rc<dyn Control>> for Element {
    fn from(control: Rc<dyn Control>) -> Self {
        Element::Control(control)
    }
}

macro_rules! element_from_control {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(control: $ty) -> Self {
                    Element::control(control)
                }
            }
        )*
    };
}

element_from_control!(
    Background,
    Button,
    Calendar,
    Checkbox,
    Dropdown,
    Expander,
    ListItem,
    ProgressIndicator,
    RadioGroup,
    Slider,
    TextField,
    Toggle,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::setup;
    use crate::controls::{ButtonProps, CheckboxProps, ExpanderProps};

    #[test]
    fn test_render_nested() {
        setup();
        let element = Element::column(vec![
            Element::text("heading"),
            Element::row(vec![Element::text("a"), Element::text("b")]),
        ]);
        let node = element.render();
        assert_eq!(node.kind, NodeKind::Column);
        assert_eq!(node.children[1].kind, NodeKind::Row);
        assert_eq!(node.plain_text(), "heading\na\nb");
    }

    #[test]
    fn test_controls_in_document_order() {
        setup();
        let first = Button::new(ButtonProps::labeled("one"));
        let second = Checkbox::new(CheckboxProps::labeled("two"));
        let element = Element::row(vec![first.clone().into(), Element::text("x"), second.clone().into()]);

        let ids: Vec<NodeId> = element.controls().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn test_controls_include_nested_children() {
        setup();
        let inner = Button::new(ButtonProps::labeled("inner"));
        let expander = Expander::new(ExpanderProps {
            header: Element::text("header"),
            content: Some(inner.clone().into()),
            expanded: true,
            ..Default::default()
        });
        let element: Element = expander.clone().into();

        let ids: Vec<NodeId> = element.controls().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![expander.id(), inner.id()]);
    }
}
