//! Error types.
//!
//! User input never produces an error: out-of-range values are clamped and
//! malformed text is ignored at the control boundary. Errors are reserved for
//! startup, layout and backend I/O.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("a surface is already live on this thread")]
    SurfaceExists,

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("backend I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
