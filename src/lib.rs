//! # spark-gallery
//!
//! Reactive widget gallery for the terminal.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for control state.
//!
//! ## Architecture
//!
//! Controls are cheap-to-clone handles over signals. They render to a
//! presentation tree of [`Node`]s; every state change queues a scoped
//! [`Patch`] that the [`Surface`] hands to its [`Backend`]:
//!
//! ```text
//! BindableValue ──notify──▶ Control ──refresh──▶ Patch queue ──flush──▶ Backend
//!                              ▲                                          │
//!                              └──────────── Surface::dispatch ◀── input ─┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Size, Point, Rect, Attr, ThemeMode)
//! - [`state`] - Bindable values, keyboard records, focus, drag tracking
//! - [`controls`] - The `Control` trait, every control, and `Element`
//! - [`display`] - Display items and groups
//! - [`binding`] - Linked progress/edit pair over one bindable value
//! - [`pipeline`] - Nodes, patches, backends and the Surface
//! - [`layout`] - Taffy layout of the presentation tree
//! - [`renderer`] - Canvas painting and the crossterm backend
//! - [`gallery`] - The showcase composition

pub mod binding;
pub mod config;
pub mod controls;
pub mod display;
pub mod error;
pub mod gallery;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use binding::{parse_numeric, LinkedPair, LinkedPairProps, PairState};
pub use config::GalleryConfig;
pub use controls::{Control, ControlEvent, ControlKind, Element};
pub use display::{DisplayGroup, DisplayItem};
pub use error::{GalleryError, Result};
pub use gallery::Gallery;
pub use layout::{compute_layout, LayoutMap};
pub use pipeline::{
    Backend, Flow, Interest, Node, NodeId, NodeKind, Patch, RecordingBackend, Surface,
    SurfaceEvent, SurfaceListener,
};
pub use renderer::{Canvas, TerminalBackend};
pub use state::{BindableValue, KeyboardEvent, Modifiers, Subscription};
pub use theme::Palette;
