//! Name-to-prefab substitution table.
//!
//! Maps Figma component names to a prefab, a post-process kind and a local
//! offset. The builder only sees the [`PrefabLookup`] trait, so tests and
//! embedders can supply their own table.
//!
//! ```toml
//! default_font = "SegoeUI SDF"
//!
//! [entries.PrimaryButton]
//! prefab = "PressableButton"
//! process = "button"
//! offset = [0.0, 0.0, -0.008]
//!
//! [entries.Divider]
//! # No prefab: instances fall back to an empty group
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use figport_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::prefab::{Prefab, PrefabLibrary};
use crate::settings::{read_config, ConfigError, ConfigResult};

/// Post-processing applied to a freshly instantiated prefab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcessKind {
    #[default]
    Default,
    Button,
    ButtonCollection,
    Backplate,
    Slider,
}

/// What to substitute for a named component.
#[derive(Clone, Debug, Default)]
pub struct CustomMapEntry {
    /// `None` means the name is mapped but has no prefab
    pub prefab: Option<Arc<Prefab>>,
    pub process: PostProcessKind,
    /// Applied in the instance's own space after anchoring
    pub offset: Vec3,
}

impl CustomMapEntry {
    pub fn new(prefab: Arc<Prefab>, process: PostProcessKind) -> Self {
        Self {
            prefab: Some(prefab),
            process,
            offset: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }
}

/// Read-only view of a substitution table used by the builder.
pub trait PrefabLookup {
    /// Entry for a component name, if it is mapped at all.
    fn lookup(&self, name: &str) -> Option<&CustomMapEntry>;

    /// Font applied to every text label.
    fn default_font(&self) -> Option<&str> {
        None
    }
}

/// A [`PrefabLookup`] backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct CustomMap {
    entries: HashMap<String, CustomMapEntry>,
    default_font: Option<String>,
}

#[derive(Deserialize)]
struct CustomMapFile {
    default_font: Option<String>,
    #[serde(default)]
    entries: HashMap<String, EntryDef>,
}

#[derive(Deserialize)]
struct EntryDef {
    #[serde(default)]
    prefab: Option<String>,
    #[serde(default)]
    process: PostProcessKind,
    #[serde(default)]
    offset: Vec3,
}

impl CustomMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: CustomMapEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = Some(font.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a map from TOML, resolving prefab names against `library`.
    pub fn from_toml_str(content: &str, library: &PrefabLibrary) -> ConfigResult<Self> {
        let file: CustomMapFile = toml::from_str(content)?;

        let mut map = Self {
            entries: HashMap::with_capacity(file.entries.len()),
            default_font: file.default_font,
        };

        for (name, def) in file.entries {
            let prefab = match def.prefab.as_deref() {
                None | Some("") => None,
                Some(prefab_name) => Some(library.get(prefab_name).ok_or_else(|| {
                    ConfigError::UnknownPrefab {
                        entry: name.clone(),
                        prefab: prefab_name.to_string(),
                    }
                })?),
            };

            map.entries.insert(
                name,
                CustomMapEntry {
                    prefab,
                    process: def.process,
                    offset: def.offset,
                },
            );
        }

        Ok(map)
    }

    /// Load a TOML map file.
    pub fn load<P: AsRef<Path>>(path: P, library: &PrefabLibrary) -> ConfigResult<Self> {
        let path = path.as_ref();
        let map = Self::from_toml_str(&read_config(path)?, library)?;
        log::info!("Loaded {} custom map entries from {}", map.len(), path.display());
        Ok(map)
    }
}

impl PrefabLookup for CustomMap {
    fn lookup(&self, name: &str) -> Option<&CustomMapEntry> {
        self.entries.get(name)
    }

    fn default_font(&self) -> Option<&str> {
        self.default_font.as_deref()
    }
}
