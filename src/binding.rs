//! Linked pair - a progress indicator and a numeric text field sharing one
//! [`BindableValue`].
//!
//! ```text
//!   TextField ──edit──▶ parse ──ok──▶ cell.set ──notify──▶ ProgressIndicator
//!       ▲                 │                        └──────▶ TextField (resync)
//!       └─ EditPending ◀──┘ malformed
//! ```
//!
//! The display side only ever follows the cell. The edit side is `Synced`
//! after every commit and `EditPending` while its text does not parse;
//! malformed text never touches the cell.
//!
//! # Example
//!
//! ```ignore
//! let cell = BindableValue::new(0.3, 0.0, 1.0);
//! let pair = LinkedPair::new(cell, LinkedPairProps::default());
//! let item = DisplayItem::with_body("Progress", pair.element());
//! pair.attach(&item);
//! ```

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::controls::{Element, ProgressIndicator, ProgressProps, TextField, TextFieldProps, Trailing};
use crate::display::DisplayItem;
use crate::state::{BindableValue, Subscription};

// =============================================================================
// Numeric Text
// =============================================================================

/// Parse edit text as a non-negative decimal.
///
/// Accepts ASCII digits with at most one `.`, at least one digit, and no
/// trailing `.` (`"3"`, `"0.25"`, `".5"`). Signs, exponents, whitespace and
/// everything else are rejected.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let mut digits = 0;
    let mut dots = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 || text.ends_with('.') {
        return None;
    }
    text.parse().ok()
}

/// Round to `precision` decimal places.
fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

// =============================================================================
// Linked Pair
// =============================================================================

/// Edit-side synchronization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairState {
    #[default]
    Synced,
    /// Edit text does not parse; the cell keeps its last committed value
    EditPending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkedPairProps {
    /// Amount added by the increment affordance
    pub step: f64,
    /// Decimal places shown in the edit text
    pub precision: usize,
    pub placeholder: String,
    /// Glyph of the increment affordance
    pub increment_glyph: String,
    pub edit_width: u16,
    pub progress_width: u16,
}

impl Default for LinkedPairProps {
    fn default() -> Self {
        Self {
            step: 0.1,
            precision: 1,
            placeholder: String::new(),
            increment_glyph: "+".to_string(),
            edit_width: 8,
            progress_width: 10,
        }
    }
}

struct PairInner {
    cell: BindableValue,
    display: ProgressIndicator,
    edit: TextField,
    state: Cell<PairState>,
    step: f64,
    precision: usize,
}

impl PairInner {
    fn format(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.precision)
    }

    fn on_edit(&self, text: &str) {
        match parse_numeric(text) {
            Some(value) => {
                self.state.set(PairState::Synced);
                self.cell.set(value);
            }
            None => {
                debug!(text, "edit text is not a number; cell unchanged");
                self.state.set(PairState::EditPending);
            }
        }
    }

    fn increment(&self) {
        let next = round_to(self.cell.get() + self.step, self.precision);
        self.cell.set(next);
        self.state.set(PairState::Synced);
        self.edit.set_text(self.format(self.cell.get()));
    }

    /// Follow a committed value on the edit side.
    fn resync_edit(&self, value: f64) {
        if parse_numeric(&self.edit.text()) != Some(value) {
            self.edit.set_text(self.format(value));
        }
        self.state.set(PairState::Synced);
    }
}

/// Two controls kept numerically consistent through one cell.
///
/// The cell's subscriptions keep the pair alive. Hand them to the display
/// item showing the pair with [`LinkedPair::attach`] so the binding goes
/// away with the item; a pair dropped without being attached unsubscribes
/// at once.
pub struct LinkedPair {
    inner: Rc<PairInner>,
    element: Element,
    subscriptions: Vec<Subscription>,
}

impl LinkedPair {
    pub fn new(cell: BindableValue, props: LinkedPairProps) -> Self {
        let display = ProgressIndicator::new(ProgressProps {
            value: Some(cell.get()),
            width: props.progress_width,
        });
        let edit = TextField::new(TextFieldProps {
            placeholder: props.placeholder,
            width: props.edit_width,
            trailing: Some(Trailing::glyph(props.increment_glyph)),
            ..Default::default()
        });

        let inner = Rc::new(PairInner {
            cell: cell.clone(),
            display: display.clone(),
            edit: edit.clone(),
            state: Cell::new(PairState::Synced),
            step: props.step,
            precision: props.precision,
        });

        // Callbacks stored in the field hold the pair weakly; only the cell's
        // subscribers keep it alive.
        let weak: Weak<PairInner> = Rc::downgrade(&inner);
        edit.set_on_change(Rc::new(move |text: &str| {
            if let Some(inner) = weak.upgrade() {
                inner.on_edit(text);
            }
        }));
        let weak = Rc::downgrade(&inner);
        edit.set_trailing_action(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.increment();
            }
        }));

        let display_sub = {
            let display = display.clone();
            cell.subscribe(move |value| display.set_value(value))
        };
        let edit_sub = {
            let inner = Rc::clone(&inner);
            cell.subscribe(move |value| inner.resync_edit(value))
        };

        let element = Element::row(vec![display.into(), edit.into()]);
        Self {
            inner,
            element,
            subscriptions: vec![display_sub, edit_sub],
        }
    }

    pub fn cell(&self) -> &BindableValue {
        &self.inner.cell
    }

    pub fn display(&self) -> &ProgressIndicator {
        &self.inner.display
    }

    pub fn edit(&self) -> &TextField {
        &self.inner.edit
    }

    pub fn state(&self) -> PairState {
        self.inner.state.get()
    }

    /// Row holding the display and edit controls.
    pub fn element(&self) -> Element {
        self.element.clone()
    }

    /// Run the increment affordance.
    pub fn increment(&self) {
        self.inner.increment();
    }

    /// Tie the binding's lifetime to `item`.
    pub fn attach(mut self, item: &DisplayItem) {
        for subscription in std::mem::take(&mut self.subscriptions) {
            item.hold(subscription);
        }
    }

    /// Release the binding now. Same as dropping the pair unattached.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for LinkedPair {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}
