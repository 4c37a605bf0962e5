//! ListItem - selectable row of a list view.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::Node;
use crate::types::Attr;

use super::{control_base_impl, ClickCallback, Control, ControlBase, ControlEvent, ControlKind};

#[derive(Clone)]
pub struct ListItemProps {
    pub label: String,
    pub selected: bool,
    pub enabled: bool,
    pub on_click: Option<ClickCallback>,
}

impl Default for ListItemProps {
    fn default() -> Self {
        Self {
            label: String::new(),
            selected: false,
            enabled: true,
            on_click: None,
        }
    }
}

impl ListItemProps {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct ListItem {
    base: ControlBase,
    label: String,
    selected: Signal<bool>,
    on_click: Option<ClickCallback>,
}

impl ListItem {
    pub fn new(props: ListItemProps) -> Self {
        Self {
            base: ControlBase::new(props.enabled),
            label: props.label,
            selected: signal(props.selected),
            on_click: props.on_click,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn set_selected(&self, selected: bool) {
        if self.selected.get() != selected {
            self.selected.set(selected);
            self.refresh();
        }
    }

    fn activate(&self) -> bool {
        if !self.selected.get() {
            self.selected.set(true);
            self.refresh();
        }
        if let Some(on_click) = &self.on_click {
            on_click();
        }
        true
    }
}

impl Control for ListItem {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::ListItem
    }

    fn render(&self) -> Node {
        let selected = self.selected.get();
        let marker = if selected { "▌" } else { " " };
        let mut node = self
            .base
            .node(ControlKind::ListItem)
            .with_text(format!("{marker} {}", self.label));
        if selected {
            node.attrs |= Attr::BOLD;
        }
        node
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled list item ignored input");
            return false;
        }
        match event {
            ControlEvent::Activate => self.activate(),
            ControlEvent::Key(key) if key.is_activation() => self.activate(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::setup;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_activate_selects() {
        setup();
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let item = ListItem::new(ListItemProps {
            label: "Kendall Collins".into(),
            on_click: Some(Rc::new(move || clicks_clone.set(clicks_clone.get() + 1))),
            ..Default::default()
        });

        assert_eq!(item.render().text, "  Kendall Collins");
        item.handle_input(&ControlEvent::Activate);
        assert!(item.is_selected());
        assert_eq!(item.render().text, "▌ Kendall Collins");
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_programmatic_deselect() {
        setup();
        let item = ListItem::new(ListItemProps { selected: true, ..ListItemProps::labeled("Henry Ross") });
        item.set_selected(false);
        assert!(!item.is_selected());
    }

    #[test]
    fn test_disabled_ignores_input() {
        setup();
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let item = ListItem::new(ListItemProps {
            label: "Nicole Wagner".into(),
            enabled: false,
            on_click: Some(Rc::new(move || clicks_clone.set(clicks_clone.get() + 1))),
            ..Default::default()
        });

        assert!(!item.handle_input(&ControlEvent::Activate));
        assert!(!item.handle_input(&ControlEvent::Key(crate::state::KeyboardEvent::new(" "))));
        assert!(!item.is_selected());
        assert_eq!(clicks.get(), 0);
    }
}
