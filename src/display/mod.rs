//! Display containers.
//!
//! A [`DisplayItem`] is a titled panel around an optional body element; a
//! [`DisplayGroup`] is a vertical stack of items that can grow and shrink
//! while mounted. Every group mutation queues exactly one patch scoped to
//! the group.

mod group;
mod item;

pub use group::DisplayGroup;
pub use item::DisplayItem;
