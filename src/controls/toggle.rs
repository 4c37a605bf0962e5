//! Toggle - on/off switch.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::Node;

use super::{control_base_impl, Control, ControlBase, ControlEvent, ControlKind, ToggleCallback};

/// Label shown next to the switch.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleLabel {
    /// Same text in both states
    Fixed(String),
    /// Text depends on the state
    OnOff { on: String, off: String },
}

impl Default for ToggleLabel {
    fn default() -> Self {
        ToggleLabel::Fixed(String::new())
    }
}

impl ToggleLabel {
    pub fn on_off(on: impl Into<String>, off: impl Into<String>) -> Self {
        ToggleLabel::OnOff {
            on: on.into(),
            off: off.into(),
        }
    }

    fn text(&self, on: bool) -> &str {
        match self {
            ToggleLabel::Fixed(text) => text,
            ToggleLabel::OnOff { on: text, .. } if on => text,
            ToggleLabel::OnOff { off: text, .. } => text,
        }
    }
}

impl From<&str> for ToggleLabel {
    fn from(text: &str) -> Self {
        ToggleLabel::Fixed(text.to_string())
    }
}

#[derive(Clone)]
pub struct ToggleProps {
    pub label: ToggleLabel,
    pub on: bool,
    pub enabled: bool,
    pub on_change: Option<ToggleCallback>,
}

impl Default for ToggleProps {
    fn default() -> Self {
        Self {
            label: ToggleLabel::default(),
            on: false,
            enabled: true,
            on_change: None,
        }
    }
}

#[derive(Clone)]
pub struct Toggle {
    base: ControlBase,
    label: ToggleLabel,
    on: Signal<bool>,
    on_change: Option<ToggleCallback>,
}

impl Toggle {
    pub fn new(props: ToggleProps) -> Self {
        Self {
            base: ControlBase::new(props.enabled),
            label: props.label,
            on: signal(props.on),
            on_change: props.on_change,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    /// Set without firing the callback.
    pub fn set_on(&self, on: bool) {
        if self.on.get() != on {
            self.on.set(on);
            self.refresh();
        }
    }

    fn flip(&self) -> bool {
        let on = !self.on.get();
        self.on.set(on);
        self.refresh();
        if let Some(on_change) = &self.on_change {
            on_change(on);
        }
        true
    }
}

impl Control for Toggle {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Toggle
    }

    fn render(&self) -> Node {
        let on = self.on.get();
        let switch = if on { "(──●)" } else { "(●──)" };
        let label = self.label.text(on);
        let text = if label.is_empty() {
            switch.to_string()
        } else {
            format!("{switch} {label}")
        };
        self.base.node(ControlKind::Toggle).with_text(text)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled toggle ignored input");
            return false;
        }
        match event {
            ControlEvent::Activate => self.flip(),
            ControlEvent::Key(key) if key.is_activation() => self.flip(),
            _ => false,
        }
    }
}
