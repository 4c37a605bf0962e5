//! Layout Module
//!
//! Flexbox layout of the presentation tree using
//! [Taffy](https://github.com/DioxusLabs/taffy). The bridge:
//!
//! 1. Styles each [`Node`](crate::pipeline::Node) by its kind
//! 2. Builds a Taffy tree mirroring the node tree
//! 3. Measures text leaves in terminal cells
//! 4. Flattens the result into absolute rectangles ([`LayoutMap`])
//!
//! The layout is recomputed from scratch whenever the painter or the hit
//! tester needs it; nothing is cached between frames.
//!
//! # Example
//!
//! ```ignore
//! use spark_gallery::layout::compute_layout;
//!
//! let layout = compute_layout(&tree, Size::new(160, 48))?;
//! let path = layout.hit_path(&tree, Point::new(10, 4));
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::{compute_layout, LayoutMap};
pub use text_measure::*;
