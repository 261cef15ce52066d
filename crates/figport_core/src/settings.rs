//! Import settings.
//!
//! The constants that drive coordinate conversion and post-processing live
//! here and are passed explicitly to the builder. They can be loaded from a
//! TOML file; every key is optional.
//!
//! ```toml
//! position_scale = 0.001
//! slider_default_width = 764.0
//! default_font = "SegoeUI SDF"
//! visibility = "visible"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading importer configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Custom map entry '{entry}' references unknown prefab '{prefab}'")]
    UnknownPrefab { entry: String, prefab: String },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read a config file, tagging IO errors with the path.
pub(crate) fn read_config(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// How a node's `visible` flag maps to the active state of its scene node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityPolicy {
    /// Active when visible
    #[default]
    Visible,
    /// Active when *not* visible, matching scenes produced by older importers
    Legacy,
}

impl VisibilityPolicy {
    /// Active state for a node. Nodes without a bounding box (pages) are
    /// always active.
    pub fn is_active(self, visible: bool, has_bounding_box: bool) -> bool {
        if !has_bounding_box {
            return true;
        }
        match self {
            VisibilityPolicy::Visible => visible,
            VisibilityPolicy::Legacy => !visible,
        }
    }
}

/// Settings threaded through the scene builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Scene units per Figma unit
    pub position_scale: f32,

    /// Text rect size per Figma unit; text nodes are scaled up by its inverse
    pub text_size_factor: f32,

    /// Font size used when a TEXT node has no style
    pub default_font_size: f32,

    /// Font assigned to every text label, unless the custom map overrides it
    pub default_font: Option<String>,

    /// Design width the slider prefab was authored at
    pub slider_default_width: f32,

    pub visibility: VisibilityPolicy,

    /// Prefab sub-container holding the buttons of a collection
    pub button_collection_container: String,

    /// Source group whose children label the buttons of a collection
    pub button_source_group: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            position_scale: 0.001,
            text_size_factor: 0.1,
            default_font_size: 36.0,
            default_font: None,
            slider_default_width: 764.0,
            visibility: VisibilityPolicy::default(),
            button_collection_container: "ButtonCollection".to_string(),
            button_source_group: "Buttons".to_string(),
        }
    }
}

impl ImportSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_config(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
