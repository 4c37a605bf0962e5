//! Bindable Value - a bounded numeric cell with ordered subscribers.
//!
//! One cell exists per shared quantity. Controls that present or edit the
//! quantity subscribe to it; whoever writes goes through [`BindableValue::set`].
//!
//! # Policy
//!
//! - Writes are clamped to `[min, max]`, never rejected. `NaN` is ignored.
//! - Subscribers run synchronously inside `set`, in subscription order.
//! - A subscriber may call `set` on the cell that notified it. The nested
//!   write is stored at once and delivered in one more notification round
//!   before the outermost `set` returns, so the last value every subscriber
//!   saw is the cell's final value. A nested write that does not change the
//!   value schedules nothing.
//!
//! # Example
//!
//! ```ignore
//! use spark_gallery::state::BindableValue;
//!
//! let progress = BindableValue::new(0.3, 0.0, 1.0);
//! let sub = progress.subscribe(|v| println!("progress = {v:.1}"));
//!
//! progress.set(1.7); // prints "progress = 1.0"
//! sub.unsubscribe();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::warn;

/// Subscriber callback type.
pub type ValueCallback = Rc<dyn Fn(f64)>;

/// Upper bound on notification rounds triggered by nested writes.
const MAX_NOTIFY_ROUNDS: usize = 32;

// =============================================================================
// CELL STATE
// =============================================================================

struct CellState {
    value: f64,
    min: f64,
    max: f64,
    subscribers: Vec<(u64, ValueCallback)>,
    next_id: u64,
    notifying: bool,
    pending: bool,
}

impl CellState {
    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.iter().any(|(sub_id, _)| *sub_id == id)
    }
}

// =============================================================================
// BINDABLE VALUE
// =============================================================================

/// Shared numeric value with bounds and change notification.
///
/// Cloning yields another handle to the same cell.
#[derive(Clone)]
pub struct BindableValue {
    state: Rc<RefCell<CellState>>,
}

impl BindableValue {
    /// Create a cell. Bounds given in the wrong order are swapped and the
    /// initial value is clamped like any other write.
    ///
    /// A `NaN` bound leaves that side open. A `NaN` initial value starts at
    /// the lower bound, or the upper one when the lower is open.
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        let min = if min.is_nan() { f64::NEG_INFINITY } else { min };
        let max = if max.is_nan() { f64::INFINITY } else { max };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let value = if !value.is_nan() {
            value.clamp(min, max)
        } else if min.is_finite() {
            min
        } else if max.is_finite() {
            max
        } else {
            0.0
        };

        Self {
            state: Rc::new(RefCell::new(CellState {
                value,
                min,
                max,
                subscribers: Vec::new(),
                next_id: 0,
                notifying: false,
                pending: false,
            })),
        }
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.state.borrow().value
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.state.borrow().min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.state.borrow().max
    }

    /// Clamp `value` to the cell's range without storing it.
    pub fn clamp(&self, value: f64) -> f64 {
        let state = self.state.borrow();
        value.clamp(state.min, state.max)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    /// Store `value` (clamped) and notify every subscriber.
    pub fn set(&self, value: f64) {
        if value.is_nan() {
            return;
        }

        {
            let mut state = self.state.borrow_mut();
            state.value = value.clamp(state.min, state.max);
            if state.notifying {
                // Nested write from a subscriber: the running loop picks it up
                state.pending = true;
                return;
            }
            state.notifying = true;
        }

        let mut rounds = 0;
        loop {
            let (broadcast, subscribers) = {
                let state = self.state.borrow();
                (state.value, state.subscribers.clone())
            };

            for (id, callback) in subscribers {
                // Skip callbacks removed earlier in this round
                if !self.state.borrow().is_subscribed(id) {
                    continue;
                }
                callback(broadcast);
            }
            rounds += 1;

            let mut state = self.state.borrow_mut();
            let again = state.pending && state.value != broadcast;
            state.pending = false;

            if !again {
                state.notifying = false;
                break;
            }
            if rounds >= MAX_NOTIFY_ROUNDS {
                warn!(rounds, value = state.value, "bindable value stopped notifying: subscribers keep rewriting it");
                state.notifying = false;
                break;
            }
        }
    }

    /// Register a callback invoked with every new value.
    ///
    /// The callback is not invoked for the current value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(f64) + 'static,
    {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, Rc::new(callback)));
            id
        };

        Subscription {
            id,
            cell: Rc::downgrade(&self.state),
            active: Cell::new(true),
        }
    }

    /// Check whether two handles refer to the same cell.
    pub fn ptr_eq(&self, other: &BindableValue) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl std::fmt::Debug for BindableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("BindableValue")
            .field("value", &state.value)
            .field("min", &state.min)
            .field("max", &state.max)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Token returned by [`BindableValue::subscribe`].
///
/// Dropping the token does not unsubscribe; call [`Subscription::unsubscribe`]
/// or hand it to a [`DisplayItem`](crate::display::DisplayItem) that releases
/// it when the item goes away.
pub struct Subscription {
    id: u64,
    cell: Weak<RefCell<CellState>>,
    active: Cell<bool>,
}

impl Subscription {
    /// Remove exactly this callback. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(cell) = self.cell.upgrade() {
            cell.borrow_mut().subscribers.retain(|(id, _)| *id != self.id);
        }
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.active.get() && self.cell.upgrade().is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(cell: &BindableValue) -> (Rc<RefCell<Vec<f64>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let sub = cell.subscribe(move |v| seen_clone.borrow_mut().push(v));
        (seen, sub)
    }

    #[test]
    fn test_initial_value_clamped() {
        let cell = BindableValue::new(5.0, 0.0, 1.0);
        assert_eq!(cell.get(), 1.0);

        let cell = BindableValue::new(f64::NAN, -1.0, 1.0);
        assert_eq!(cell.get(), -1.0);
    }

    #[test]
    fn test_nan_bounds_are_open() {
        let cell = BindableValue::new(0.5, f64::NAN, 1.0);
        assert_eq!(cell.min(), f64::NEG_INFINITY);
        cell.set(-3.0);
        assert_eq!(cell.get(), -3.0);
        cell.set(2.0);
        assert_eq!(cell.get(), 1.0);

        let cell = BindableValue::new(f64::NAN, f64::NAN, 1.0);
        assert_eq!(cell.get(), 1.0);

        let cell = BindableValue::new(f64::NAN, f64::NAN, f64::NAN);
        assert_eq!(cell.get(), 0.0);
        cell.set(1e9);
        assert_eq!(cell.get(), 1e9);
    }

    #[test]
    fn test_swapped_bounds() {
        let cell = BindableValue::new(0.5, 1.0, 0.0);
        assert_eq!(cell.min(), 0.0);
        assert_eq!(cell.max(), 1.0);
        assert_eq!(cell.get(), 0.5);
    }

    #[test]
    fn test_set_clamps_and_notifies() {
        let cell = BindableValue::new(0.0, 0.0, 10.0);
        let (seen, _sub) = recorder(&cell);

        for (input, expected) in [(3.0, 3.0), (-4.0, 0.0), (11.5, 10.0), (10.0, 10.0), (7.25, 7.25)] {
            cell.set(input);
            assert_eq!(cell.get(), expected);
            assert!(cell.get() >= cell.min() && cell.get() <= cell.max());
            assert_eq!(*seen.borrow().last().unwrap(), expected);
        }
        assert_eq!(seen.borrow().len(), 5);
    }

    #[test]
    fn test_nan_ignored() {
        let cell = BindableValue::new(0.4, 0.0, 1.0);
        let (seen, _sub) = recorder(&cell);

        cell.set(f64::NAN);
        assert_eq!(cell.get(), 0.4);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_subscription_order() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let order = Rc::new(RefCell::new(Vec::new()));

        let subs: Vec<Subscription> = (0..3)
            .map(|i| {
                let order = order.clone();
                cell.subscribe(move |_| order.borrow_mut().push(i))
            })
            .collect();

        cell.set(0.5);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let (seen, sub) = recorder(&cell);
        let (other, _keep) = recorder(&cell);

        cell.set(0.1);
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(cell.subscriber_count(), 1);

        cell.set(0.2);
        assert_eq!(*seen.borrow(), vec![0.1]);
        assert_eq!(*other.borrow(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_unsubscribe_during_round() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim_clone = victim.clone();
        let _first = cell.subscribe(move |_| {
            if let Some(sub) = victim_clone.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let (seen, sub) = recorder(&cell);
        *victim.borrow_mut() = Some(sub);

        cell.set(0.5);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_nested_set_reaches_everyone() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);

        // First subscriber snaps values to the nearest tenth
        let writer = cell.clone();
        let _snap = cell.subscribe(move |v| writer.set((v * 10.0).round() / 10.0));
        let (seen, _sub) = recorder(&cell);

        cell.set(0.34);
        assert_eq!(cell.get(), 0.3);
        assert_eq!(*seen.borrow().last().unwrap(), 0.3);
    }

    #[test]
    fn test_nested_set_same_value_terminates() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let calls = Rc::new(Cell::new(0));

        let writer = cell.clone();
        let calls_clone = calls.clone();
        let _echo = cell.subscribe(move |v| {
            calls_clone.set(calls_clone.get() + 1);
            writer.set(v);
        });

        cell.set(0.5);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_oscillating_subscriber_is_capped() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let calls = Rc::new(Cell::new(0));

        let writer = cell.clone();
        let calls_clone = calls.clone();
        let flip = cell.subscribe(move |v| {
            calls_clone.set(calls_clone.get() + 1);
            writer.set(1.0 - v);
        });

        cell.set(1.0);
        assert_eq!(calls.get(), MAX_NOTIFY_ROUNDS);

        // The cell is usable afterwards
        let (seen, _sub) = recorder(&cell);
        flip.unsubscribe();
        cell.set(0.25);
        assert_eq!(*seen.borrow(), vec![0.25]);
    }

    #[test]
    fn test_subscription_outlives_cell() {
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let sub = cell.subscribe(|_| {});
        drop(cell);
        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
