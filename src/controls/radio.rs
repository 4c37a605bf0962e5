//! Radio group - mutually exclusive options.
//!
//! The group owns the selection as a single index, so moving the selection
//! from one radio to another is one write: no observer can see two radios
//! selected, or none, in between.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};
use crate::types::Attr;

use super::{control_base_impl, Control, ControlBase, ControlEvent, ControlKind, SelectCallback};

/// One option of a [`RadioGroup`].
#[derive(Debug, Clone, PartialEq)]
pub struct Radio {
    /// Value reported to the change callback
    pub value: String,
    pub label: String,
    pub enabled: bool,
}

impl Radio {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Clone)]
pub struct RadioGroupProps {
    pub radios: Vec<Radio>,
    pub selected: Option<usize>,
    pub enabled: bool,
    pub on_change: Option<SelectCallback>,
}

impl Default for RadioGroupProps {
    fn default() -> Self {
        Self {
            radios: Vec::new(),
            selected: None,
            enabled: true,
            on_change: None,
        }
    }
}

#[derive(Clone)]
pub struct RadioGroup {
    base: ControlBase,
    radios: Vec<(NodeId, Radio)>,
    selected: Signal<Option<usize>>,
    on_change: Option<SelectCallback>,
}

impl RadioGroup {
    pub fn new(props: RadioGroupProps) -> Self {
        let base = ControlBase::new(props.enabled);
        let radios: Vec<(NodeId, Radio)> =
            props.radios.into_iter().map(|radio| (allocate_id(), radio)).collect();
        let selected = props.selected.filter(|&i| i < radios.len());
        Self {
            base,
            radios,
            selected: signal(selected),
            on_change: props.on_change,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    /// Value of the selected radio.
    pub fn selected_value(&self) -> Option<String> {
        self.selected
            .get()
            .and_then(|i| self.radios.get(i))
            .map(|(_, radio)| radio.value.clone())
    }

    pub fn len(&self) -> usize {
        self.radios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radios.is_empty()
    }

    /// Node id of the radio at `index`.
    pub fn radio_id(&self, index: usize) -> Option<NodeId> {
        self.radios.get(index).map(|(id, _)| *id)
    }

    /// Select programmatically (no callback). Out-of-range clears.
    pub fn set_selected(&self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.radios.len());
        if self.selected.get() != index {
            self.selected.set(index);
            self.refresh();
        }
    }

    fn select(&self, index: usize) -> bool {
        let Some((_, radio)) = self.radios.get(index) else {
            return false;
        };
        if !radio.enabled {
            debug!(id = %self.id(), index, "disabled radio ignored input");
            return false;
        }
        if self.selected.get() == Some(index) {
            return false;
        }
        self.selected.set(Some(index));
        self.refresh();
        if let Some(on_change) = &self.on_change {
            on_change(&radio.value);
        }
        true
    }

    /// Next enabled radio from the current selection, wrapping. `forward`
    /// picks the direction.
    fn step(&self, forward: bool) -> Option<usize> {
        let count = self.radios.len();
        if count == 0 {
            return None;
        }
        let start = match (self.selected.get(), forward) {
            (Some(i), _) => i,
            (None, true) => count - 1,
            (None, false) => 0,
        };
        (1..=count)
            .map(|offset| {
                if forward {
                    (start + offset) % count
                } else {
                    (start + count - offset % count) % count
                }
            })
            .find(|&i| self.radios[i].1.enabled)
    }
}

impl Control for RadioGroup {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::RadioGroup
    }

    fn render(&self) -> Node {
        let selected = self.selected.get();
        let group_enabled = self.base.enabled();
        let children = self
            .radios
            .iter()
            .enumerate()
            .map(|(i, (id, radio))| {
                let mark = if selected == Some(i) { "(•)" } else { "( )" };
                let mut node = Node::new(*id, NodeKind::Part)
                    .with_text(format!("{mark} {}", radio.label))
                    .with_enabled(group_enabled && radio.enabled);
                if selected == Some(i) {
                    node.attrs |= Attr::BOLD;
                }
                node
            })
            .collect();
        self.base.node(ControlKind::RadioGroup).with_children(children)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled radio group ignored input");
            return false;
        }
        match event {
            ControlEvent::Pick(index) => self.select(*index),
            ControlEvent::Key(key) if key.is_press() => match key.key.as_str() {
                "ArrowDown" | "ArrowRight" => self.step(true).is_some_and(|i| self.select(i)),
                "ArrowUp" | "ArrowLeft" => self.step(false).is_some_and(|i| self.select(i)),
                _ if key.is_activation() && self.selected.get().is_none() => {
                    self.step(true).is_some_and(|i| self.select(i))
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn hit(&self, target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        self.radios
            .iter()
            .position(|(id, _)| *id == target)
            .map(ControlEvent::Pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::{setup, setup_mounted};
    use crate::pipeline::patch;
    use crate::state::KeyboardEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn options() -> Vec<Radio> {
        vec![
            Radio::new("radio1", "Option 1"),
            Radio::new("radio2", "Option 2"),
            Radio::new("radio3", "Option 3").disabled(),
        ]
    }

    fn recording() -> (RadioGroup, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let group = RadioGroup::new(RadioGroupProps {
            radios: options(),
            on_change: Some(Rc::new(move |value: &str| {
                seen_clone.borrow_mut().push(value.to_string())
            })),
            ..Default::default()
        });
        (group, seen)
    }

    #[test]
    fn test_selection_is_exclusive() {
        setup();
        let (group, seen) = recording();
        assert!(group.handle_input(&ControlEvent::Pick(0)));
        assert!(group.handle_input(&ControlEvent::Pick(1)));

        assert_eq!(group.selected(), Some(1));
        assert_eq!(*seen.borrow(), vec!["radio1", "radio2"]);

        let marks: Vec<String> = group.render().children.iter().map(|c| c.text.clone()).collect();
        assert_eq!(marks, vec!["( ) Option 1", "(•) Option 2", "( ) Option 3"]);
    }

    #[test]
    fn test_disabled_radio_cannot_be_picked() {
        setup();
        let (group, seen) = recording();
        group.handle_input(&ControlEvent::Pick(0));
        assert!(!group.handle_input(&ControlEvent::Pick(2)));
        assert_eq!(group.selected_value().as_deref(), Some("radio1"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_reselect_is_noop() {
        setup();
        let (group, seen) = recording();
        group.handle_input(&ControlEvent::Pick(1));
        assert!(!group.handle_input(&ControlEvent::Pick(1)));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_arrows_skip_disabled() {
        setup();
        let (group, _) = recording();
        let down = ControlEvent::Key(KeyboardEvent::new("ArrowDown"));
        let up = ControlEvent::Key(KeyboardEvent::new("ArrowUp"));

        group.handle_input(&down);
        assert_eq!(group.selected(), Some(0));
        group.handle_input(&down);
        assert_eq!(group.selected(), Some(1));
        // Option 3 is disabled, wraps to Option 1
        group.handle_input(&down);
        assert_eq!(group.selected(), Some(0));
        group.handle_input(&up);
        assert_eq!(group.selected(), Some(1));
    }

    #[test]
    fn test_hit_maps_radio_part() {
        setup();
        let (group, _) = recording();
        let second = group.radio_id(1).unwrap();
        assert_eq!(group.hit(second, (0.0, 0.0)), Some(ControlEvent::Pick(1)));
        assert_eq!(group.hit(group.id(), (0.0, 0.0)), None);
    }

    #[test]
    fn test_single_patch_per_selection() {
        setup_mounted();
        let (group, _) = recording();
        group.handle_input(&ControlEvent::Pick(0));
        assert_eq!(patch::pending_len(), 1);
    }

    #[test]
    fn test_disabled_group_ignores_input() {
        setup_mounted();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let group = RadioGroup::new(RadioGroupProps {
            radios: options(),
            selected: Some(0),
            enabled: false,
            on_change: Some(Rc::new(move |value: &str| {
                seen_clone.borrow_mut().push(value.to_string())
            })),
        });
        patch::take_pending();

        assert!(!group.handle_input(&ControlEvent::Pick(1)));
        assert!(!group.handle_input(&ControlEvent::Key(KeyboardEvent::new("ArrowDown"))));
        assert_eq!(group.selected(), Some(0));
        assert!(seen.borrow().is_empty());
        assert_eq!(patch::pending_len(), 0);

        // Programmatic selection still works
        group.set_selected(Some(1));
        assert_eq!(group.selected(), Some(1));
        assert!(seen.borrow().is_empty());
    }
}
