//! figport core - Figma documents to scene graphs.
//!
//! This crate provides:
//!
//! - **Figma schema**: strict decoding of `GET /v1/files/:key` responses
//! - **Scene graph types**: `Scene`, `SceneNode`, `Transform`, text and button labels
//! - **Prefab substitution**: prefab libraries, custom maps and post-processing
//! - **Scene building**: one scene node per Figma node, instances replaced by prefabs
//!
//! # Example
//!
//! ```ignore
//! use figport_core::{import_figma_file, CustomMap, ImportSettings, PrefabLibrary};
//!
//! let library = PrefabLibrary::load("prefabs.toml")?;
//! let map = CustomMap::load("custom_map.toml", &library)?;
//! let (scene, report) = import_figma_file("FigmaFiles/abc.json", &ImportSettings::default(), &map)?;
//! println!("Built {} nodes, {} instances", report.nodes_built, report.instances_substituted);
//! ```

pub mod builder;
pub mod custom_map;
pub mod figma;
pub mod post_process;
pub mod prefab;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use builder::{
    build_file, import_figma_file, import_figma_str, BuildError, BuildReport, LookupMiss,
    MissReason, SceneBuilder,
};
pub use custom_map::{CustomMap, CustomMapEntry, PostProcessKind, PrefabLookup};
pub use figma::{decode_file, FileResponse, Node, NodeType, SchemaError};
pub use post_process::PostProcessError;
pub use prefab::{Prefab, PrefabLibrary, PrefabNode};
pub use scene::{NodeId, Scene, SceneNode, Transform};
pub use settings::{ConfigError, ImportSettings, VisibilityPolicy};
