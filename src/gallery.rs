//! The showcase: four display groups covering every control.
//!
//! | Group | Items |
//! |-------|-------|
//! | 1 | Buttons, Checkboxes, Sliders |
//! | 2 | Radio Buttons, TextBox, Expander |
//! | 3 | Calendar View, Dropdown, Toggle |
//! | 4 | ListView, Progress Ring |
//!
//! Control callbacks log at `info`. The progress item hosts a
//! [`LinkedPair`] over one [`BindableValue`].

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use chrono::NaiveDate;
use tracing::info;

use crate::binding::{LinkedPair, LinkedPairProps};
use crate::controls::{
    Background, BackgroundProps, Button, ButtonProps, ButtonVariant, Calendar, CalendarProps,
    CheckState, Checkbox, CheckboxProps, Cleanup, Dropdown, DropdownProps, Element, Expander,
    ExpanderProps, ListItem, ListItemProps, ProgressIndicator, ProgressProps, Radio, RadioGroup,
    RadioGroupProps, Slider, SliderOrientation, SliderProps, TextField, TextFieldProps, Toggle,
    ToggleLabel, ToggleProps, Trailing,
};
use crate::display::{DisplayGroup, DisplayItem};
use crate::pipeline::{Backend, Interest, Surface, SurfaceListener};
use crate::state::BindableValue;
use crate::types::Point;

const LIST_NAMES: [&str; 3] = ["Kendall Collins", "Henry Ross", "Nicole Wagner"];
const DROPDOWN_OPTIONS: [&str; 4] = ["Option 1", "Option 2", "Option 3", "Option 4"];

/// Logs every drag-and-drop event the surface delivers.
struct DropLogger;

impl SurfaceListener for DropLogger {
    fn on_drag_enter(&self, point: Point) {
        info!(x = point.x, y = point.y, "drag entered");
    }

    fn on_drag_over(&self, point: Point) {
        info!(x = point.x, y = point.y, "dragging over");
    }

    fn on_drag_leave(&self) {
        info!("drag left");
    }

    fn on_files_dropped(&self, files: &[PathBuf]) {
        info!(?files, "got files");
    }
}

/// Everything the showcase puts on a surface.
pub struct Gallery {
    groups: Vec<DisplayGroup>,
    background: Background,
    progress: BindableValue,
    progress_edit: TextField,
    list: Rc<RefCell<Vec<ListItem>>>,
    cleanups: Vec<Cleanup>,
}

impl Gallery {
    /// Build the four groups. `today` anchors the calendar.
    pub fn new(today: NaiveDate) -> Self {
        let list = Rc::new(RefCell::new(Vec::new()));
        let progress = BindableValue::new(0.3, 0.0, 1.0);
        let (progress_item, progress_edit) = progress_item(progress.clone());

        let groups = vec![
            DisplayGroup::new(vec![buttons(), checkboxes(), sliders()]),
            DisplayGroup::new(vec![radios(), text_boxes(), expanders()]),
            DisplayGroup::new(vec![calendar(today), dropdown(), toggles()]),
            DisplayGroup::new(vec![list_view(&list), progress_item]),
        ];

        Self {
            groups,
            background: Background::new(BackgroundProps::default()),
            progress,
            progress_edit,
            list,
            cleanups: Vec::new(),
        }
    }

    pub fn groups(&self) -> &[DisplayGroup] {
        &self.groups
    }

    /// The cell shared by the progress ring and its edit field.
    pub fn progress(&self) -> &BindableValue {
        &self.progress
    }

    pub fn progress_edit(&self) -> &TextField {
        &self.progress_edit
    }

    pub fn list_items(&self) -> Vec<ListItem> {
        self.list.borrow().clone()
    }

    /// Put the background and groups on `surface` and log its drag events.
    pub fn install<B: Backend>(&mut self, surface: &mut Surface<B>) {
        surface.set_background(self.background.clone());
        for group in &self.groups {
            surface.add_group(group.clone());
        }
        self.cleanups.push(surface.listen(Rc::new(DropLogger), Interest::DRAG));
        let background = self.background.clone();
        self.cleanups.push(surface.on_resize(move |size| {
            info!(width = size.width, height = size.height, dots = ?background.size(), "surface resized");
        }));
    }

    /// Unregister the gallery's surface listeners.
    pub fn uninstall(&mut self) {
        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
    }
}

// =============================================================================
// Group 1
// =============================================================================

fn buttons() -> DisplayItem {
    let row = |enabled: bool| {
        let make = |label: &str, variant: ButtonVariant| {
            Element::from(Button::new(ButtonProps {
                variant,
                enabled,
                ..ButtonProps::labeled(label)
            }))
        };
        let clicked = Button::new(ButtonProps {
            enabled,
            on_click: Some(Rc::new(|| info!("button clicked"))),
            ..ButtonProps::labeled("Button")
        });
        let toggle = Button::new(ButtonProps {
            variant: ButtonVariant::Toggle,
            enabled,
            on_toggle: Some(Rc::new(|pressed: bool| info!(pressed, "toggle button"))),
            ..ButtonProps::labeled("Button")
        });
        Element::row(vec![
            clicked.into(),
            make("Button", ButtonVariant::Accent),
            toggle.into(),
            make("+", ButtonVariant::Standard),
            make("Button", ButtonVariant::Hyperlink),
        ])
    };
    DisplayItem::with_body("Buttons", Element::column(vec![row(true), row(false)]))
}

fn checkboxes() -> DisplayItem {
    let logged = |label: &str, state: CheckState, three_state: bool| {
        Element::from(Checkbox::new(CheckboxProps {
            state,
            three_state,
            on_change: Some(Rc::new(|state: CheckState| info!(?state, "checkbox changed"))),
            ..CheckboxProps::labeled(label)
        }))
    };
    let disabled = |label: &str, state: CheckState| {
        Element::from(Checkbox::new(CheckboxProps {
            state,
            enabled: false,
            ..CheckboxProps::labeled(label)
        }))
    };
    DisplayItem::with_body(
        "Checkboxes",
        Element::column(vec![
            logged("Two-state Checkbox", CheckState::Unchecked, false),
            logged("Three-state Checkbox", CheckState::Unchecked, true),
            logged("Three-state (Initially Checked)", CheckState::Checked, true),
            logged("Three-state (Initially Indeterminate)", CheckState::Indeterminate, true),
            disabled("Disabled", CheckState::Unchecked),
            disabled("Disabled Checked", CheckState::Checked),
            disabled("Disabled Indeterminate", CheckState::Indeterminate),
        ]),
    )
}

fn sliders() -> DisplayItem {
    let vertical = Slider::new(SliderProps {
        value: 50.0,
        orientation: SliderOrientation::Vertical,
        length: 8,
        ..Default::default()
    });
    let horizontal = Slider::new(SliderProps {
        value: 50.0,
        min: 0.0,
        max: 100.0,
        on_change: Some(Rc::new(|value: f64| info!(value = value.round(), "slider changed"))),
        ..Default::default()
    });
    DisplayItem::with_body("Sliders", Element::row(vec![vertical.into(), horizontal.into()]))
}

// =============================================================================
// Group 2
// =============================================================================

fn radios() -> DisplayItem {
    let group = RadioGroup::new(RadioGroupProps {
        radios: vec![
            Radio::new("radio1", "Option 1"),
            Radio::new("radio2", "Option 2"),
            Radio::new("radio3", "Option 3").disabled(),
        ],
        on_change: Some(Rc::new(|value: &str| info!(value, "radio changed"))),
        ..Default::default()
    });
    DisplayItem::with_body("Radio Buttons", group)
}

fn text_boxes() -> DisplayItem {
    let plain = TextField::new(TextFieldProps {
        placeholder: "TextBox".into(),
        width: 40,
        on_change: Some(Rc::new(|text: &str| info!(text, "text changed"))),
        ..Default::default()
    });
    let password = TextField::new(TextFieldProps {
        placeholder: "TextBox".into(),
        width: 40,
        password: true,
        trailing: Some(Trailing::glyph("👁")),
        ..Default::default()
    });
    DisplayItem::with_body("TextBox", Element::column(vec![plain.into(), password.into()]))
}

fn expanders() -> DisplayItem {
    let basic = Expander::new(ExpanderProps {
        header: Element::text("Basic String Header"),
        content: Some(Element::column(vec![
            Element::text("This is some content"),
            Button::new(ButtonProps::labeled("Click me")).into(),
        ])),
        ..Default::default()
    });
    let with_icon = Expander::new(ExpanderProps {
        header: Element::row(vec![Element::text("⚙"), Element::text("Header with Icon")]),
        content: Some(Element::text("Content with fancy header")),
        ..Default::default()
    });
    let with_action = Expander::new(ExpanderProps {
        header: Element::row(vec![
            Checkbox::new(CheckboxProps::default()).into(),
            Element::text("Header with Action"),
        ]),
        content: Some(Element::text("Content with fancy header")),
        ..Default::default()
    });
    DisplayItem::with_body(
        "Expander",
        Element::column(vec![basic.into(), with_icon.into(), with_action.into()]),
    )
}

// =============================================================================
// Group 3
// =============================================================================

fn calendar(today: NaiveDate) -> DisplayItem {
    let calendar = Calendar::new(CalendarProps {
        today,
        on_select: Some(Rc::new(|date: Option<NaiveDate>| match date {
            Some(date) => info!(date = %date.format("%Y-%m-%d"), "date selected"),
            None => info!("date selection cleared"),
        })),
        ..Default::default()
    });
    DisplayItem::with_body("Calendar View", calendar)
}

fn dropdown() -> DisplayItem {
    let dropdown = Dropdown::new(DropdownProps {
        options: DROPDOWN_OPTIONS.iter().map(|o| o.to_string()).collect(),
        initial: Some(DROPDOWN_OPTIONS[0].to_string()),
        max_width: 15,
        on_select: Some(Rc::new(|value: &str| info!(value, "selected"))),
        ..Default::default()
    });
    DisplayItem::with_body("Dropdown", dropdown)
}

fn toggles() -> DisplayItem {
    let fixed = Toggle::new(ToggleProps {
        label: ToggleLabel::from("toggle"),
        ..Default::default()
    });
    let on_off = Toggle::new(ToggleProps {
        label: ToggleLabel::on_off("On", "Off"),
        on_change: Some(Rc::new(|on: bool| info!(on, "toggle changed"))),
        ..Default::default()
    });
    let disabled = Toggle::new(ToggleProps {
        label: ToggleLabel::from("disabled switch"),
        enabled: false,
        ..Default::default()
    });
    DisplayItem::with_body(
        "Toggle",
        Element::column(vec![fixed.into(), on_off.into(), disabled.into()]),
    )
}

// =============================================================================
// Group 4
// =============================================================================

/// Single-selection list: activating an item deselects its siblings.
fn list_view(list: &Rc<RefCell<Vec<ListItem>>>) -> DisplayItem {
    for name in LIST_NAMES {
        let peers: Weak<RefCell<Vec<ListItem>>> = Rc::downgrade(list);
        let item = ListItem::new(ListItemProps {
            on_click: Some(Rc::new(move || {
                let Some(peers) = peers.upgrade() else {
                    return;
                };
                for peer in peers.borrow().iter().filter(|peer| peer.label() != name) {
                    peer.set_selected(false);
                }
                info!(name, "list item clicked");
            })),
            ..ListItemProps::labeled(name)
        });
        list.borrow_mut().push(item);
    }
    let rows = list.borrow().iter().cloned().map(Element::from).collect();
    DisplayItem::with_body("ListView", Element::column(rows))
}

/// Indeterminate ring next to a determinate one bound to `cell`.
fn progress_item(cell: BindableValue) -> (DisplayItem, TextField) {
    let spinner = ProgressIndicator::new(ProgressProps::default());
    let pair = LinkedPair::new(
        cell,
        LinkedPairProps {
            placeholder: "0.3".into(),
            ..Default::default()
        },
    );
    let edit = pair.edit().clone();
    let item = DisplayItem::with_body("Progress Ring", Element::row(vec![spinner.into(), pair.element()]));
    pair.attach(&item);
    (item, edit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::setup;
    use crate::controls::{Control, ControlEvent};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn titles(gallery: &Gallery) -> Vec<Vec<String>> {
        gallery
            .groups()
            .iter()
            .map(|g| g.items().iter().map(|i| i.title().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_layout_of_groups() {
        setup();
        let gallery = Gallery::new(today());
        assert_eq!(
            titles(&gallery),
            vec![
                vec!["Buttons", "Checkboxes", "Sliders"],
                vec!["Radio Buttons", "TextBox", "Expander"],
                vec!["Calendar View", "Dropdown", "Toggle"],
                vec!["ListView", "Progress Ring"],
            ]
        );
    }

    #[test]
    fn test_list_is_single_select() {
        setup();
        let gallery = Gallery::new(today());
        let items = gallery.list_items();
        assert_eq!(items.len(), 3);

        items[0].handle_input(&ControlEvent::Activate);
        items[2].handle_input(&ControlEvent::Activate);
        let selected: Vec<bool> = items.iter().map(ListItem::is_selected).collect();
        assert_eq!(selected, vec![false, false, true]);
    }

    #[test]
    fn test_progress_pair_bound() {
        setup();
        let gallery = Gallery::new(today());
        assert_eq!(gallery.progress().subscriber_count(), 2);

        gallery.progress_edit().handle_input(&ControlEvent::ActivateTrailing);
        assert_eq!(gallery.progress().get(), 0.4);
        assert_eq!(gallery.progress_edit().text(), "0.4");
    }

    #[test]
    fn test_disabled_buttons_are_skipped_by_focus() {
        setup();
        let gallery = Gallery::new(today());
        let buttons = gallery.groups()[0].items()[0].controls();
        assert_eq!(buttons.len(), 10);
        assert_eq!(buttons.iter().filter(|b| b.is_focusable()).count(), 5);
    }
}
