//! State Module - Runtime state shared across controls
//!
//! - **Bindable** - bounded numeric cells with ordered subscribers
//! - **Keyboard** - key event records and their common interpretations
//! - **Focus** - focused control id and Tab cycling
//! - **Drag** - drag-and-drop gesture phases

pub mod bindable;
pub mod drag;
pub mod focus;
mod keyboard;

pub use bindable::{BindableValue, Subscription, ValueCallback};
pub use drag::{DragPhase, DragTracker};
pub use keyboard::*;
