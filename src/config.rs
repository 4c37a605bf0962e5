//! Gallery configuration.
//!
//! Loaded once at startup from an optional `gallery.toml`, overridden by CLI
//! flags, then validated. Nothing revalidates it at runtime.
//!
//! ```toml
//! width = 160
//! height = 48
//! title = "Spark Gallery"
//! theme = "dark"
//! accepts_drops = true
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{GalleryError, Result};
use crate::types::{Size, ThemeMode};

/// Startup configuration for the surface.
///
/// Unknown keys in the file are rejected rather than silently accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryConfig {
    /// Initial surface width in cells (the terminal size wins once mounted)
    #[serde(default = "default_width")]
    pub width: u16,

    /// Initial surface height in cells
    #[serde(default = "default_height")]
    pub height: u16,

    /// Window title shown in the header row
    #[serde(default = "default_title")]
    pub title: String,

    /// Dark or light palette
    #[serde(default)]
    pub theme: ThemeMode,

    /// Whether drag-and-drop gestures are delivered to listeners
    #[serde(default = "default_accepts_drops")]
    pub accepts_drops: bool,
}

fn default_width() -> u16 {
    160
}

fn default_height() -> u16 {
    48
}

fn default_title() -> String {
    "Spark Gallery".to_string()
}

fn default_accepts_drops() -> bool {
    true
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            theme: ThemeMode::default(),
            accepts_drops: default_accepts_drops(),
        }
    }
}

impl GalleryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| GalleryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents).map_err(|source| GalleryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loaded gallery config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Check the values once, failing fast with a descriptive error.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GalleryError::InvalidConfig(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.title.trim().is_empty() {
            return Err(GalleryError::InvalidConfig("title must not be empty".to_string()));
        }
        Ok(())
    }

    /// Initial surface size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
