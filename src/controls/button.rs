//! Button - push button in four variants.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::Node;
use crate::types::Attr;

use super::{
    control_base_impl, ClickCallback, Control, ControlBase, ControlEvent, ControlKind,
    ToggleCallback,
};

/// Visual and behavioral variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Standard,
    /// Emphasized call to action
    Accent,
    /// Latching button with a pressed state
    Toggle,
    /// Rendered as link text
    Hyperlink,
}

/// Button configuration.
#[derive(Clone)]
pub struct ButtonProps {
    pub label: String,
    pub variant: ButtonVariant,
    pub enabled: bool,
    /// Initial pressed state (Toggle variant only)
    pub pressed: bool,
    pub on_click: Option<ClickCallback>,
    /// Called with the new pressed state (Toggle variant only)
    pub on_toggle: Option<ToggleCallback>,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self {
            label: String::new(),
            variant: ButtonVariant::Standard,
            enabled: true,
            pressed: false,
            on_click: None,
            on_toggle: None,
        }
    }
}

impl ButtonProps {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct Button {
    base: ControlBase,
    label: String,
    variant: ButtonVariant,
    pressed: Signal<bool>,
    on_click: Option<ClickCallback>,
    on_toggle: Option<ToggleCallback>,
}

impl Button {
    pub fn new(props: ButtonProps) -> Self {
        Self {
            base: ControlBase::new(props.enabled),
            label: props.label,
            variant: props.variant,
            pressed: signal(props.pressed && props.variant == ButtonVariant::Toggle),
            on_click: props.on_click,
            on_toggle: props.on_toggle,
        }
    }

    pub fn variant(&self) -> ButtonVariant {
        self.variant
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.get()
    }

    fn activate(&self) -> bool {
        if self.variant == ButtonVariant::Toggle {
            let pressed = !self.pressed.get();
            self.pressed.set(pressed);
            self.refresh();
            if let Some(on_toggle) = &self.on_toggle {
                on_toggle(pressed);
            }
        }
        if let Some(on_click) = &self.on_click {
            on_click();
        }
        true
    }
}

impl Control for Button {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Button
    }

    fn render(&self) -> Node {
        let (text, attrs) = match self.variant {
            ButtonVariant::Standard => (format!("[ {} ]", self.label), Attr::NONE),
            ButtonVariant::Accent => (format!("[ {} ]", self.label), Attr::BOLD),
            ButtonVariant::Toggle if self.pressed.get() => {
                (format!("[■{} ]", self.label), Attr::BOLD)
            }
            ButtonVariant::Toggle => (format!("[ {} ]", self.label), Attr::NONE),
            ButtonVariant::Hyperlink => (self.label.clone(), Attr::UNDERLINE),
        };
        let mut node = self.base.node(ControlKind::Button).with_text(text);
        node.attrs |= attrs;
        node
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled button ignored input");
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
    use crate::controls::test_support::{setup, setup_mounted};
    use crate::pipeline::patch;
    use crate::state::KeyboardEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_click_fires_callback() {
        setup();
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let button = Button::new(ButtonProps {
            label: "Button".into(),
            on_click: Some(Rc::new(move || clicks_clone.set(clicks_clone.get() + 1))),
            ..Default::default()
        });

        assert!(button.handle_input(&ControlEvent::Activate));
        assert!(button.handle_input(&ControlEvent::Key(KeyboardEvent::new("Enter"))));
        assert!(!button.handle_input(&ControlEvent::Key(KeyboardEvent::new("a"))));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn test_disabled_ignores_input() {
        setup();
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let button = Button::new(ButtonProps {
            label: "Button".into(),
            enabled: false,
            on_click: Some(Rc::new(move || clicks_clone.set(clicks_clone.get() + 1))),
            ..Default::default()
        });

        assert!(!button.handle_input(&ControlEvent::Activate));
        assert_eq!(clicks.get(), 0);
        assert!(button.render().attrs.contains(Attr::DIM));
    }

    #[test]
    fn test_toggle_variant_latches() {
        setup_mounted();
        let seen = Rc::new(Cell::new(None));
        let seen_clone = seen.clone();
        let button = Button::new(ButtonProps {
            label: "Button".into(),
            variant: ButtonVariant::Toggle,
            on_toggle: Some(Rc::new(move |pressed| seen_clone.set(Some(pressed)))),
            ..Default::default()
        });

        button.handle_input(&ControlEvent::Activate);
        assert!(button.is_pressed());
        assert_eq!(seen.get(), Some(true));
        assert_eq!(button.render().text, "[■Button ]");
        assert_eq!(patch::pending_len(), 1);

        button.handle_input(&ControlEvent::Activate);
        assert!(!button.is_pressed());
        assert_eq!(seen.get(), Some(false));
    }

    #[test]
    fn test_variant_rendering() {
        setup();
        let link = Button::new(ButtonProps {
            label: "Docs".into(),
            variant: ButtonVariant::Hyperlink,
            ..Default::default()
        });
        let node = link.render();
        assert_eq!(node.text, "Docs");
        assert!(node.attrs.contains(Attr::UNDERLINE));

        let accent = Button::new(ButtonProps {
            label: "Go".into(),
            variant: ButtonVariant::Accent,
            ..Default::default()
        });
        assert!(accent.render().attrs.contains(Attr::BOLD));
    }

    #[test]
    fn test_set_enabled_queues_refresh() {
        setup_mounted();
        let button = Button::new(ButtonProps::labeled("Button"));
        button.set_enabled(false);
        button.set_enabled(false);
        assert_eq!(patch::pending_len(), 1);
        assert!(!button.is_enabled());
    }
}
