//! Renderer Module
//!
//! Turns a presentation tree into terminal output.
//!
//! - [`Canvas`] - character grid painted from the computed layout
//! - [`TerminalBackend`] - crossterm backend repainting only changed rows
//! - [`translate`] - crossterm events to surface events
//!
//! # Example
//!
//! ```ignore
//! use spark_gallery::renderer::{run, TerminalBackend};
//!
//! let backend = TerminalBackend::stdout(Palette::dark())?;
//! let mut surface = Surface::new(config, backend)?;
//! run(&mut surface)?;
//! ```

mod canvas;
mod input;
mod terminal;

pub use canvas::{Canvas, Cell, Tone};
pub use input::{convert_key_event, poll_events, translate};
pub use terminal::{run, tick, TerminalBackend};
