//! Focus System - Keyboard focus over the surface's controls
//!
//! Holds the focused control id in a signal and cycles it through an ordered
//! list of focusable ids (Tab / Shift+Tab). The Surface computes that list
//! from its control tree each time, so controls removed from the tree simply
//! drop out of the cycle.
//!
//! # Example
//!
//! ```ignore
//! use spark_gallery::state::focus;
//!
//! let order = surface.focus_order();
//! focus::focus_next(&order);
//! assert!(focus::has_focus());
//! ```

use spark_signals::{signal, Signal};

use crate::pipeline::NodeId;

// =============================================================================
// FOCUSED ID SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED: Signal<Option<NodeId>> = signal(None);
}

/// Get the currently focused control id
pub fn focused() -> Option<NodeId> {
    FOCUSED.with(|s| s.get())
}

/// Check if any control is focused
pub fn has_focus() -> bool {
    focused().is_some()
}

/// Check if a specific control is focused
pub fn is_focused(id: NodeId) -> bool {
    focused() == Some(id)
}

/// Focus a control. Returns the previously focused id.
pub fn focus(id: NodeId) -> Option<NodeId> {
    let previous = focused();
    if previous != Some(id) {
        FOCUSED.with(|s| s.set(Some(id)));
    }
    previous
}

/// Clear focus. Returns the previously focused id.
pub fn blur() -> Option<NodeId> {
    let previous = focused();
    if previous.is_some() {
        FOCUSED.with(|s| s.set(None));
    }
    previous
}

// =============================================================================
// CYCLING
// =============================================================================

/// Move focus to the next id in `order`, wrapping at the end.
///
/// Starts at the first entry when nothing (or an id not in `order`) is focused.
pub fn focus_next(order: &[NodeId]) -> Option<NodeId> {
    step(order, 1)
}

/// Move focus to the previous id in `order`, wrapping at the start.
pub fn focus_previous(order: &[NodeId]) -> Option<NodeId> {
    step(order, -1)
}

fn step(order: &[NodeId], direction: isize) -> Option<NodeId> {
    if order.is_empty() {
        blur();
        return None;
    }

    let len = order.len() as isize;
    let next = match focused().and_then(|id| order.iter().position(|o| *o == id)) {
        Some(pos) => (pos as isize + direction).rem_euclid(len),
        None if direction > 0 => 0,
        None => len - 1,
    };

    let id = order[next as usize];
    focus(id);
    Some(id)
}

/// Reset focus state (for testing)
pub fn reset_focus_state() {
    FOCUSED.with(|s| s.set(None));
}
