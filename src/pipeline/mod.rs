//! Presentation Pipeline
//!
//! Connects control state to whatever presents it.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Control state change → refresh() → Patch queue → Surface::flush → Backend
//! ```
//!
//! ## Data Flow
//!
//! 1. **node** - Controls and containers render to a [`Node`] tree
//! 2. **patch** - State changes queue scoped [`Patch`]es while mounted
//! 3. **surface** - Owns the groups, routes events, flushes patches
//! 4. **backend** - Receives the tree once, then patches
//!
//! ## Key Design Principles
//!
//! - **Pure renders**: `render()` reads state and builds nodes, nothing else
//! - **Scoped updates**: a control replaces only its own node; groups
//!   append, remove or clear only their own children

mod backend;
mod node;
pub mod patch;
mod surface;

pub use backend::{Backend, RecordingBackend};
pub use node::{allocate_id, reset_node_ids, Node, NodeId, NodeKind};
pub use patch::Patch;
pub use surface::{Flow, Interest, Surface, SurfaceEvent, SurfaceListener};
