//! TextField - single-line text entry with optional trailing affordance.
//!
//! The change callback and the trailing action can be bound after
//! construction (`set_on_change`, `set_trailing_action`), which is how a
//! binding wires a field that already sits in the tree. Both are shared by
//! every clone of the handle.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::grapheme_width;
use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};
use crate::types::Attr;

use super::{
    control_base_impl, ClickCallback, Control, ControlBase, ControlEvent, ControlKind,
    TextChangeCallback,
};

const MASK: char = '•';

/// Trailing affordance: a glyph after the text, optionally clickable.
#[derive(Clone)]
pub struct Trailing {
    pub glyph: String,
    pub action: Option<ClickCallback>,
}

impl Trailing {
    pub fn glyph(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: ClickCallback) -> Self {
        self.action = Some(action);
        self
    }
}

#[derive(Clone)]
pub struct TextFieldProps {
    pub text: String,
    pub placeholder: String,
    pub password: bool,
    /// Visible width of the entry area in cells
    pub width: u16,
    pub enabled: bool,
    pub trailing: Option<Trailing>,
    pub on_change: Option<TextChangeCallback>,
}

impl Default for TextFieldProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            placeholder: String::new(),
            password: false,
            width: 24,
            enabled: true,
            trailing: None,
            on_change: None,
        }
    }
}

#[derive(Clone)]
pub struct TextField {
    base: ControlBase,
    entry_id: NodeId,
    trailing_id: NodeId,
    placeholder: String,
    password: bool,
    width: u16,
    trailing_glyph: Option<String>,
    text: Signal<String>,
    on_change: Rc<RefCell<Option<TextChangeCallback>>>,
    trailing_action: Rc<RefCell<Option<ClickCallback>>>,
}

impl TextField {
    pub fn new(props: TextFieldProps) -> Self {
        let (trailing_glyph, trailing_action) = match props.trailing {
            Some(trailing) => (Some(trailing.glyph), trailing.action),
            None => (None, None),
        };
        Self {
            base: ControlBase::new(props.enabled),
            entry_id: allocate_id(),
            trailing_id: allocate_id(),
            placeholder: props.placeholder,
            password: props.password,
            width: props.width.max(1),
            trailing_glyph,
            text: signal(props.text),
            on_change: Rc::new(RefCell::new(props.on_change)),
            trailing_action: Rc::new(RefCell::new(trailing_action)),
        }
    }

    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Replace the text without firing the change callback.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        if self.text.get() != text {
            self.text.set(text);
            self.refresh();
        }
    }

    pub fn set_on_change(&self, on_change: TextChangeCallback) {
        *self.on_change.borrow_mut() = Some(on_change);
    }

    pub fn set_trailing_action(&self, action: ClickCallback) {
        *self.trailing_action.borrow_mut() = Some(action);
    }

    pub fn has_trailing(&self) -> bool {
        self.trailing_glyph.is_some()
    }

    /// Node id of the trailing affordance.
    pub fn trailing_id(&self) -> NodeId {
        self.trailing_id
    }

    /// Text as painted: masked for passwords, placeholder when empty.
    pub fn display_text(&self) -> String {
        let text = self.text.get();
        if text.is_empty() {
            self.placeholder.clone()
        } else if self.password {
            std::iter::repeat_n(MASK, text.chars().count()).collect()
        } else {
            text
        }
    }

    fn edit(&self, text: String) -> bool {
        if self.text.get() == text {
            return false;
        }
        self.text.set(text.clone());
        self.refresh();
        let on_change = self.on_change.borrow().clone();
        if let Some(on_change) = on_change {
            on_change(&text);
        }
        true
    }

    fn run_trailing(&self) -> bool {
        let action = self.trailing_action.borrow().clone();
        match action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    /// Tail of the shown text that fits the entry width.
    fn visible(&self, shown: &str) -> String {
        let width = usize::from(self.width);
        let mut tail: Vec<&str> = Vec::new();
        let mut used = 0;
        for grapheme in shown.graphemes(true).rev() {
            let w = usize::from(grapheme_width(grapheme));
            if used + w > width {
                break;
            }
            used += w;
            tail.push(grapheme);
        }
        let mut out: String = tail.into_iter().rev().collect();
        out.extend(std::iter::repeat_n(' ', width - used));
        out
    }
}

impl Control for TextField {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::TextField
    }

    fn render(&self) -> Node {
        let mut entry = Node::new(self.entry_id, NodeKind::Part)
            .with_text(self.visible(&self.display_text()))
            .with_attrs(Attr::UNDERLINE);
        if self.text.get().is_empty() {
            entry.attrs |= Attr::DIM;
        }

        let mut children = vec![entry];
        if let Some(glyph) = &self.trailing_glyph {
            children.push(Node::new(self.trailing_id, NodeKind::Part).with_text(format!(" {glyph}")));
        }
        self.base.node(ControlKind::TextField).with_children(children)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled text field ignored input");
            return false;
        }
        match event {
            ControlEvent::Input(text) => self.edit(text.clone()),
            ControlEvent::Paste(pasted) => {
                // Single line: line breaks and other control characters are dropped
                let mut text = self.text.get();
                text.extend(pasted.chars().filter(|c| !c.is_control()));
                self.edit(text)
            }
            ControlEvent::ActivateTrailing => self.run_trailing(),
            ControlEvent::Key(key) if key.is_press() => {
                if let Some(c) = key.printable() {
                    let mut text = self.text.get();
                    text.push(c);
                    self.edit(text)
                } else if key.key == "Backspace" {
                    let mut text = self.text.get();
                    text.pop().is_some() && self.edit(text)
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn hit(&self, target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        if target == self.trailing_id && self.trailing_glyph.is_some() {
            Some(ControlEvent::ActivateTrailing)
        } else if target == self.entry_id || target == self.id() {
            Some(ControlEvent::Activate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::setup;
    use crate::state::KeyboardEvent;
    use std::cell::Cell;

    fn key(name: &str) -> ControlEvent {
        ControlEvent::Key(KeyboardEvent::new(name))
    }

    #[test]
    fn test_typing_and_backspace() {
        setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let field = TextField::new(TextFieldProps {
            on_change: Some(Rc::new(move |text: &str| {
                seen_clone.borrow_mut().push(text.to_string())
            })),
            ..Default::default()
        });

        field.handle_input(&key("h"));
        field.handle_input(&key("i"));
        field.handle_input(&key("Backspace"));
        assert_eq!(field.text(), "h");
        assert_eq!(*seen.borrow(), vec!["h", "hi", "h"]);

        field.handle_input(&key("Backspace"));
        assert!(!field.handle_input(&key("Backspace")));
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_input_replaces_text() {
        setup();
        let field = TextField::new(TextFieldProps::default());
        assert!(field.handle_input(&ControlEvent::Input("0.7".into())));
        assert!(!field.handle_input(&ControlEvent::Input("0.7".into())));
        assert_eq!(field.text(), "0.7");
    }

    #[test]
    fn test_placeholder_and_password() {
        setup();
        let field = TextField::new(TextFieldProps {
            placeholder: "TextBox".into(),
            password: true,
            width: 8,
            ..Default::default()
        });
        assert_eq!(field.render().children[0].text, "TextBox ");
        assert!(field.render().children[0].attrs.contains(Attr::DIM));

        field.set_text("abc");
        assert_eq!(field.display_text(), "•••");
        assert_eq!(field.render().children[0].text, "•••     ");
    }

    #[test]
    fn test_long_text_shows_tail() {
        setup();
        let field = TextField::new(TextFieldProps {
            text: "abcdefgh".into(),
            width: 4,
            ..Default::default()
        });
        assert_eq!(field.render().children[0].text, "efgh");
    }

    #[test]
    fn test_padding_counts_cells() {
        setup();
        let field = TextField::new(TextFieldProps {
            text: "cafe\u{301}".into(),
            width: 6,
            ..Default::default()
        });
        assert_eq!(field.render().children[0].text, "cafe\u{301}  ");

        field.set_text("日本語");
        assert_eq!(field.render().children[0].text, "日本語");
        field.set_text("日本語x");
        assert_eq!(field.render().children[0].text, "本語x ");
    }

    #[test]
    fn test_trailing_action_late_bound() {
        setup();
        let field = TextField::new(TextFieldProps {
            trailing: Some(Trailing::glyph("+")),
            ..Default::default()
        });
        assert!(!field.handle_input(&ControlEvent::ActivateTrailing));

        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        field.clone().set_trailing_action(Rc::new(move || runs_clone.set(runs_clone.get() + 1)));

        assert_eq!(field.hit(field.trailing_id(), (0.5, 0.5)), Some(ControlEvent::ActivateTrailing));
        assert!(field.handle_input(&ControlEvent::ActivateTrailing));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_set_text_is_silent() {
        setup();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        let field = TextField::new(TextFieldProps::default());
        field.set_on_change(Rc::new(move |_: &str| fired_clone.set(true)));
        field.set_text("0.3");
        assert_eq!(field.text(), "0.3");
        assert!(!fired.get());
    }

    #[test]
    fn test_disabled_ignores_typing() {
        setup();
        let field = TextField::new(TextFieldProps { enabled: false, ..Default::default() });
        assert!(!field.handle_input(&key("a")));
        assert_eq!(field.text(), "");
    }
}
