//! Controls - interactive leaf elements.
//!
//! Every control is a cheap-to-clone handle over reactive state (signals), so
//! the same control can sit in the presentation tree, in a focus ring and in
//! a binding closure at once. All of them implement [`Control`]:
//!
//! - `render()` is a pure function of the current state
//! - `handle_input()` is ignored while disabled; otherwise it stores the new
//!   state, queues a re-render patch, and only then calls the change callback
//!
//! Each control is configured through a `*Props` record that lists every
//! recognized option and implements `Default`.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_gallery::controls::{Checkbox, CheckboxProps, CheckState};
//!
//! let checkbox = Checkbox::new(CheckboxProps {
//!     label: "Three-state".into(),
//!     three_state: true,
//!     on_change: Some(Rc::new(|state| println!("{state:?}"))),
//!     ..Default::default()
//! });
//! ```

use std::rc::Rc;

use chrono::NaiveDate;
use spark_signals::{signal, Signal};

use crate::pipeline::{allocate_id, patch, Node, NodeId, NodeKind};
use crate::state::{focus, KeyboardEvent};

mod background;
mod button;
mod calendar;
mod checkbox;
mod dropdown;
mod element;
mod expander;
mod list_item;
mod progress;
mod radio;
mod slider;
mod text_field;
mod toggle;

pub use background::{Background, BackgroundProps};
pub use button::{Button, ButtonProps, ButtonVariant};
pub use calendar::{Calendar, CalendarProps};
pub use checkbox::{CheckState, Checkbox, CheckboxProps};
pub use dropdown::{Dropdown, DropdownProps};
pub use element::Element;
pub use expander::{Expander, ExpanderProps};
pub use list_item::{ListItem, ListItemProps};
pub use progress::{ProgressIndicator, ProgressProps};
pub use radio::{Radio, RadioGroup, RadioGroupProps};
pub use slider::{Slider, SliderOrientation, SliderProps};
pub use text_field::{TextField, TextFieldProps, Trailing};
pub use toggle::{Toggle, ToggleLabel, ToggleProps};

// =============================================================================
// Callback Types
// =============================================================================

/// Cleanup function returned by registrations.
pub type Cleanup = Box<dyn FnOnce()>;

/// Plain activation callback (button click, trailing action, list item).
pub type ClickCallback = Rc<dyn Fn()>;

/// Checkbox state change callback.
pub type CheckCallback = Rc<dyn Fn(CheckState)>;

/// Numeric value change callback (slider).
pub type ValueChangeCallback = Rc<dyn Fn(f64)>;

/// Text change callback (text field).
pub type TextChangeCallback = Rc<dyn Fn(&str)>;

/// Selection callback receiving the selected option's value (radio, dropdown).
pub type SelectCallback = Rc<dyn Fn(&str)>;

/// On/off callback (toggle, expander).
pub type ToggleCallback = Rc<dyn Fn(bool)>;

/// Date selection callback; `None` when the selection was cleared.
pub type DateCallback = Rc<dyn Fn(Option<NaiveDate>)>;

// =============================================================================
// Kinds and Events
// =============================================================================

/// Control variant, carried by presentation nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Button,
    Checkbox,
    Slider,
    RadioGroup,
    TextField,
    Calendar,
    Toggle,
    Dropdown,
    ListItem,
    Progress,
    Expander,
    Background,
}

/// Input delivered to one control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Pointer click on the control body
    Activate,
    /// Pointer click on the control's trailing affordance
    ActivateTrailing,
    /// Key press while the control has focus
    Key(KeyboardEvent),
    /// Whole-text replacement from the backend's text entry
    Input(String),
    /// Text pasted while the control has focus
    Paste(String),
    /// Pointer dragged along the control; position along the track from
    /// its start (left or top), normalized to 0..=1
    Drag { fraction: f64 },
    /// Pick the option at an index (radio, dropdown)
    Pick(usize),
    /// Pick a date (calendar)
    PickDate(NaiveDate),
}

// =============================================================================
// Control Trait
// =============================================================================

/// Polymorphic interactive element.
pub trait Control {
    /// Stable id of the control's root node.
    fn id(&self) -> NodeId;

    fn kind(&self) -> ControlKind;

    /// Presentation of the current state. Must not mutate state.
    fn render(&self) -> Node;

    /// Apply user input. Returns whether it changed state or ran an action.
    fn handle_input(&self, event: &ControlEvent) -> bool;

    fn is_enabled(&self) -> bool;

    /// Enable or disable. Programmatic; fires no callback.
    fn set_enabled(&self, enabled: bool);

    /// Whether Tab cycling stops here.
    fn is_focusable(&self) -> bool {
        self.is_enabled()
    }

    /// Controls nested inside this one (expander header/content).
    fn children(&self) -> Vec<Rc<dyn Control>> {
        Vec::new()
    }

    /// Translate a pointer hit on node `target` into an event for this
    /// control. `at` is the hit position inside the target, each axis
    /// normalized to 0..=1.
    fn hit(&self, target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        (target == self.id()).then_some(ControlEvent::Activate)
    }

    /// Queue a re-render of this control for the next flush.
    fn refresh(&self) {
        patch::queue_replace(self.render());
    }
}

// =============================================================================
// Shared Base
// =============================================================================

/// Identity and enabled flag shared by every control.
#[derive(Clone)]
pub(crate) struct ControlBase {
    id: NodeId,
    enabled: Signal<bool>,
}

impl ControlBase {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            id: allocate_id(),
            enabled: signal(enabled),
        }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Returns whether the flag changed.
    pub(crate) fn set_enabled(&self, enabled: bool) -> bool {
        if self.enabled.get() == enabled {
            return false;
        }
        self.enabled.set(enabled);
        true
    }

    /// Root node for this control with the enabled/focus decorations.
    pub(crate) fn node(&self, kind: ControlKind) -> Node {
        Node::new(self.id, NodeKind::Control(kind))
            .with_enabled(self.enabled())
            .with_focused(focus::is_focused(self.id))
    }
}

/// Implements the boilerplate half of [`Control`] for a handle with a
/// `base: ControlBase` field.
macro_rules! control_base_impl {
    () => {
        fn id(&self) -> $crate::pipeline::NodeId {
            self.base.id()
        }

        fn is_enabled(&self) -> bool {
            self.base.enabled()
        }

        fn set_enabled(&self, enabled: bool) {
            if self.base.set_enabled(enabled) {
                $crate::controls::Control::refresh(self);
            }
        }
    };
}
pub(crate) use control_base_impl;
