//! Drag-and-drop gesture tracking.
//!
//! A gesture is `enter → over* → (leave | drop)`. The tracker only answers
//! whether an incoming event is legal in the current phase; the Surface
//! forwards legal events to its listeners and drops the rest. Nothing is kept
//! once a gesture ends.

use crate::types::Point;

/// Phase of the current drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No gesture in progress
    #[default]
    Idle,
    /// Pointer entered the surface carrying a payload
    Active { last: Point },
}

/// Tracks one drag gesture at a time.
#[derive(Debug, Default)]
pub struct DragTracker {
    phase: DragPhase,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, DragPhase::Active { .. })
    }

    /// Start a gesture. Rejected while one is already active.
    pub fn enter(&mut self, point: Point) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = DragPhase::Active { last: point };
        true
    }

    /// Pointer moved during a gesture.
    pub fn over(&mut self, point: Point) -> bool {
        match &mut self.phase {
            DragPhase::Active { last } => {
                *last = point;
                true
            }
            DragPhase::Idle => false,
        }
    }

    /// Gesture ends without a drop.
    pub fn leave(&mut self) -> bool {
        self.finish()
    }

    /// Gesture ends with a drop.
    pub fn drop_files(&mut self) -> bool {
        self.finish()
    }

    fn finish(&mut self) -> bool {
        let was_active = self.is_active();
        self.phase = DragPhase::Idle;
        was_active
    }
}
