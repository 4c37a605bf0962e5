//! Slider - bounded numeric value on a horizontal or vertical track.

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::{Node, NodeId};

use super::{
    control_base_impl, Control, ControlBase, ControlEvent, ControlKind, ValueChangeCallback,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliderOrientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Clone)]
pub struct SliderProps {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Keyboard step and drag snap; 0 disables snapping
    pub step: f64,
    pub orientation: SliderOrientation,
    /// Track length in cells
    pub length: u16,
    pub enabled: bool,
    pub on_change: Option<ValueChangeCallback>,
}

impl Default for SliderProps {
    fn default() -> Self {
        Self {
            value: 0.0,
            min: 0.0,
            max: 100.0,
            step: 1.0,
            orientation: SliderOrientation::Horizontal,
            length: 20,
            enabled: true,
            on_change: None,
        }
    }
}

#[derive(Clone)]
pub struct Slider {
    base: ControlBase,
    min: f64,
    max: f64,
    step: f64,
    orientation: SliderOrientation,
    length: u16,
    value: Signal<f64>,
    on_change: Option<ValueChangeCallback>,
}

impl Slider {
    /// Bounds given in the wrong order are swapped. A track needs finite
    /// ends: `NaN` or infinite bounds fall back to the default 0..=100.
    pub fn new(props: SliderProps) -> Self {
        let (min, max) = if !props.min.is_finite() || !props.max.is_finite() {
            debug!(min = props.min, max = props.max, "slider bounds not finite; using 0..=100");
            (0.0, 100.0)
        } else if props.min <= props.max {
            (props.min, props.max)
        } else {
            (props.max, props.min)
        };
        let value = if props.value.is_nan() { min } else { props.value.clamp(min, max) };
        Self {
            base: ControlBase::new(props.enabled),
            min,
            max,
            step: props.step.abs(),
            orientation: props.orientation,
            length: props.length.max(2),
            value: signal(value),
            on_change: props.on_change,
        }
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn orientation(&self) -> SliderOrientation {
        self.orientation
    }

    /// Set the value without firing the callback. NaN is ignored.
    pub fn set_value(&self, value: f64) {
        if value.is_nan() {
            return;
        }
        let value = value.clamp(self.min, self.max);
        if value != self.value.get() {
            self.value.set(value);
            self.refresh();
        }
    }

    fn snap(&self, value: f64) -> f64 {
        let snapped = if self.step > 0.0 {
            self.min + ((value - self.min) / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }

    fn commit(&self, value: f64) -> bool {
        if value.is_nan() || value == self.value.get() {
            return false;
        }
        self.value.set(value);
        self.refresh();
        if let Some(on_change) = &self.on_change {
            on_change(value);
        }
        true
    }

    /// Position of the thumb along the track, 0..length-1.
    fn thumb(&self) -> usize {
        let span = self.max - self.min;
        let fraction = if span > 0.0 {
            (self.value.get() - self.min) / span
        } else {
            0.0
        };
        (fraction * f64::from(self.length - 1)).round() as usize
    }
}

impl Control for Slider {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Slider
    }

    fn render(&self) -> Node {
        let thumb = self.thumb();
        let cells: Vec<char> = (0..usize::from(self.length))
            .map(|i| match i.cmp(&thumb) {
                std::cmp::Ordering::Less => '━',
                std::cmp::Ordering::Equal => '●',
                std::cmp::Ordering::Greater => '─',
            })
            .collect();

        let text = match self.orientation {
            SliderOrientation::Horizontal => {
                let track: String = cells.into_iter().collect();
                format!("{track} {}", self.value.get().round())
            }
            // Vertical tracks fill from the bottom.
            SliderOrientation::Vertical => cells
                .into_iter()
                .rev()
                .map(|c| match c {
                    '━' => '┃',
                    '─' => '│',
                    other => other,
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join("\n"),
        };
        self.base.node(ControlKind::Slider).with_text(text)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled slider ignored input");
            return false;
        }
        let step = if self.step > 0.0 { self.step } else { (self.max - self.min) / 100.0 };
        match event {
            ControlEvent::Drag { fraction } => {
                let fraction = fraction.clamp(0.0, 1.0);
                let fraction = match self.orientation {
                    SliderOrientation::Horizontal => fraction,
                    SliderOrientation::Vertical => 1.0 - fraction,
                };
                self.commit(self.snap(self.min + fraction * (self.max - self.min)))
            }
            ControlEvent::Key(key) if key.is_press() => match key.key.as_str() {
                "ArrowRight" | "ArrowUp" => self.commit(self.snap(self.value.get() + step)),
                "ArrowLeft" | "ArrowDown" => self.commit(self.snap(self.value.get() - step)),
                "Home" => self.commit(self.min),
                "End" => self.commit(self.max),
                _ => false,
            },
            _ => false,
        }
    }

    fn hit(&self, target: NodeId, at: (f64, f64)) -> Option<ControlEvent> {
        let fraction = match self.orientation {
            // The value suffix shares the row; rescale onto the track alone
            SliderOrientation::Horizontal => {
                let suffix = format!(" {}", self.value.get().round()).chars().count();
                let columns = f64::from(self.length) + suffix as f64 - 1.0;
                at.0 * columns / f64::from(self.length - 1)
            }
            SliderOrientation::Vertical => at.1,
        };
        (target == self.id()).then_some(ControlEvent::Drag { fraction })
    }
}
