//! Checkbox - two- or three-state check box.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::Node;

use super::{control_base_impl, CheckCallback, Control, ControlBase, ControlEvent, ControlKind};

/// Check box state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckState {
    /// State after one toggle.
    ///
    /// Two-state boxes alternate Unchecked/Checked; an Indeterminate
    /// starting state moves to Checked. Three-state boxes cycle
    /// Unchecked → Checked → Indeterminate → Unchecked.
    pub fn next(self, three_state: bool) -> Self {
        match (self, three_state) {
            (CheckState::Unchecked, _) => CheckState::Checked,
            (CheckState::Checked, true) => CheckState::Indeterminate,
            (CheckState::Checked, false) => CheckState::Unchecked,
            (CheckState::Indeterminate, true) => CheckState::Unchecked,
            (CheckState::Indeterminate, false) => CheckState::Checked,
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            CheckState::Unchecked => "[ ]",
            CheckState::Checked => "[x]",
            CheckState::Indeterminate => "[-]",
        }
    }
}

#[derive(Clone)]
pub struct CheckboxProps {
    pub label: String,
    pub state: CheckState,
    pub three_state: bool,
    pub enabled: bool,
    pub on_change: Option<CheckCallback>,
}

impl Default for CheckboxProps {
    fn default() -> Self {
        Self {
            label: String::new(),
            state: CheckState::Unchecked,
            three_state: false,
            enabled: true,
            on_change: None,
        }
    }
}

impl CheckboxProps {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct Checkbox {
    base: ControlBase,
    label: String,
    three_state: bool,
    state: Signal<CheckState>,
    on_change: Option<CheckCallback>,
}

impl Checkbox {
    pub fn new(props: CheckboxProps) -> Self {
        Self {
            base: ControlBase::new(props.enabled),
            label: props.label,
            three_state: props.three_state,
            state: signal(props.state),
            on_change: props.on_change,
        }
    }

    pub fn state(&self) -> CheckState {
        self.state.get()
    }

    /// Set the state without firing the callback.
    pub fn set_state(&self, state: CheckState) {
        if self.state.get() != state {
            self.state.set(state);
            self.refresh();
        }
    }

    fn toggle(&self) -> bool {
        let next = self.state.get().next(self.three_state);
        self.state.set(next);
        self.refresh();
        if let Some(on_change) = &self.on_change {
            on_change(next);
        }
        true
    }
}

impl Control for Checkbox {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Checkbox
    }

    fn render(&self) -> Node {
        let glyph = self.state.get().glyph();
        let text = if self.label.is_empty() {
            glyph.to_string()
        } else {
            format!("{glyph} {}", self.label)
        };
        self.base.node(ControlKind::Checkbox).with_text(text)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled checkbox ignored input");
            return false;
        }
        match event {
            ControlEvent::Activate => self.toggle(),
            ControlEvent::Key(key) if key.is_activation() => self.toggle(),
            _ => false,
        }
    }
}
