//! ProgressIndicator - determinate or indeterminate progress display.
//!
//! Display only: it takes no input and is skipped by focus cycling.

use spark_signals::{signal, Signal};

use crate::pipeline::Node;

use super::{control_base_impl, Control, ControlBase, ControlEvent, ControlKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressProps {
    /// Fraction in 0..=1, or `None` for indeterminate
    pub value: Option<f64>,
    /// Bar length in cells
    pub width: u16,
}

impl Default for ProgressProps {
    fn default() -> Self {
        Self {
            value: None,
            width: 10,
        }
    }
}

#[derive(Clone)]
pub struct ProgressIndicator {
    base: ControlBase,
    width: u16,
    value: Signal<Option<f64>>,
}

impl ProgressIndicator {
    pub fn new(props: ProgressProps) -> Self {
        let value = props.value.filter(|v| !v.is_nan()).map(|v| v.clamp(0.0, 1.0));
        Self {
            base: ControlBase::new(true),
            width: props.width.max(1),
            value: signal(value),
        }
    }

    /// Current fraction; `None` while indeterminate.
    pub fn value(&self) -> Option<f64> {
        self.value.get()
    }

    /// Set the fraction, clamped to 0..=1. NaN is ignored.
    pub fn set_value(&self, value: f64) {
        if value.is_nan() {
            return;
        }
        let value = Some(value.clamp(0.0, 1.0));
        if self.value.get() != value {
            self.value.set(value);
            self.refresh();
        }
    }

    /// Switch back to indeterminate.
    pub fn clear_value(&self) {
        if self.value.get().is_some() {
            self.value.set(None);
            self.refresh();
        }
    }
}

impl Control for ProgressIndicator {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Progress
    }

    fn render(&self) -> Node {
        let width = usize::from(self.width);
        let text = match self.value.get() {
            Some(value) => {
                let filled = (value * width as f64).round() as usize;
                format!(
                    "[{}{}] {:>3}%",
                    "█".repeat(filled),
                    "░".repeat(width - filled),
                    (value * 100.0).round()
                )
            }
            None => format!("[{}]  ...", "·".repeat(width)),
        };
        self.base.node(ControlKind::Progress).with_text(text)
    }

    fn handle_input(&self, _event: &ControlEvent) -> bool {
        false
    }

    fn is_focusable(&self) -> bool {
        false
    }
}
