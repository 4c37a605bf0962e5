//! Dropdown - pick one option from a list that opens below the button.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::layout::{string_width, truncate_text};
use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};
use crate::types::Attr;

use super::{control_base_impl, Control, ControlBase, ControlEvent, ControlKind, SelectCallback};

#[derive(Clone)]
pub struct DropdownProps {
    pub options: Vec<String>,
    /// Initially selected option, matched by text
    pub initial: Option<String>,
    /// Width of the button in cells
    pub max_width: u16,
    pub enabled: bool,
    pub on_select: Option<SelectCallback>,
}

impl Default for DropdownProps {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            initial: None,
            max_width: 16,
            enabled: true,
            on_select: None,
        }
    }
}

#[derive(Clone)]
pub struct Dropdown {
    base: ControlBase,
    button_id: NodeId,
    options: Vec<(NodeId, String)>,
    max_width: u16,
    selected: Signal<Option<usize>>,
    /// Highlighted option while open
    highlight: Signal<usize>,
    open: Signal<bool>,
    on_select: Option<SelectCallback>,
}

impl Dropdown {
    pub fn new(props: DropdownProps) -> Self {
        let base = ControlBase::new(props.enabled);
        let selected = props
            .initial
            .as_ref()
            .and_then(|initial| props.options.iter().position(|o| o == initial));
        Self {
            base,
            button_id: allocate_id(),
            options: props.options.into_iter().map(|o| (allocate_id(), o)).collect(),
            max_width: props.max_width.max(4),
            selected: signal(selected),
            highlight: signal(selected.unwrap_or(0)),
            open: signal(false),
            on_select: props.on_select,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    pub fn selected_value(&self) -> Option<String> {
        self.selected.get().and_then(|i| self.options.get(i)).map(|(_, o)| o.clone())
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Node id of the option at `index` (present while open).
    pub fn option_id(&self, index: usize) -> Option<NodeId> {
        self.options.get(index).map(|(id, _)| *id)
    }

    fn set_open(&self, open: bool) -> bool {
        if self.open.get() == open {
            return false;
        }
        if open {
            self.highlight.set(self.selected.get().unwrap_or(0));
        }
        self.open.set(open);
        self.refresh();
        true
    }

    fn choose(&self, index: usize) -> bool {
        let Some((_, value)) = self.options.get(index) else {
            return false;
        };
        let changed = self.selected.get() != Some(index);
        self.selected.set(Some(index));
        self.open.set(false);
        self.refresh();
        if changed {
            if let Some(on_select) = &self.on_select {
                on_select(value);
            }
        }
        true
    }

    fn move_highlight(&self, forward: bool) -> bool {
        let count = self.options.len();
        if count == 0 {
            return false;
        }
        let current = self.highlight.get();
        let next = if forward {
            (current + 1).min(count - 1)
        } else {
            current.saturating_sub(1)
        };
        if next == current {
            return false;
        }
        self.highlight.set(next);
        self.refresh();
        true
    }

    fn fit(&self, text: &str) -> String {
        let width = self.max_width - 2;
        let shown = truncate_text(text, width);
        let pad = usize::from(width - string_width(&shown));
        format!("{shown}{} ⌄", " ".repeat(pad))
    }
}

impl Control for Dropdown {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Dropdown
    }

    fn render(&self) -> Node {
        let label = self.selected_value().unwrap_or_default();
        let mut children =
            vec![Node::new(self.button_id, NodeKind::Part).with_text(self.fit(&label))];

        if self.open.get() {
            let highlight = self.highlight.get();
            let selected = self.selected.get();
            for (i, (id, option)) in self.options.iter().enumerate() {
                let mut attrs = Attr::NONE;
                if i == highlight {
                    attrs |= Attr::INVERSE;
                }
                if Some(i) == selected {
                    attrs |= Attr::BOLD;
                }
                children.push(
                    Node::new(*id, NodeKind::Part)
                        .with_text(format!("  {option}"))
                        .with_attrs(attrs),
                );
            }
        }
        self.base.node(ControlKind::Dropdown).with_children(children)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled dropdown ignored input");
            return false;
        }
        let open = self.open.get();
        match event {
            ControlEvent::Activate => self.set_open(!open),
            ControlEvent::Pick(index) => self.choose(*index),
            ControlEvent::Key(key) if key.is_press() => match key.key.as_str() {
                "ArrowDown" if open => self.move_highlight(true),
                "ArrowUp" if open => self.move_highlight(false),
                "ArrowDown" => self.set_open(true),
                "Escape" => self.set_open(false),
                _ if key.is_activation() && open => self.choose(self.highlight.get()),
                _ if key.is_activation() => self.set_open(true),
                _ => false,
            },
            _ => false,
        }
    }

    fn hit(&self, target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        if target == self.id() || target == self.button_id {
            return Some(ControlEvent::Activate);
        }
        if !self.open.get() {
            return None;
        }
        self.options
            .iter()
            .position(|(id, _)| *id == target)
            .map(ControlEvent::Pick)
    }
}
