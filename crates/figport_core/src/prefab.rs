//! Prefab templates.
//!
//! A prefab is a named template subtree that the builder clones into the
//! scene in place of a Figma INSTANCE node. Templates are loaded from a
//! library file (JSON or TOML):
//!
//! ```toml
//! [[prefabs]]
//! name = "PressableButton"
//!
//! [prefabs.root]
//! name = "PressableButton"
//! renderer = { min = [0.0, -0.032, 0.0], max = [0.032, 0.0, 0.016] }
//! button = { label = "Button" }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use figport_math::{Aabb, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{ButtonLabel, NodeId, Scene, Transform};
use crate::settings::{read_config, ConfigError, ConfigResult};

fn vec3_one() -> Vec3 {
    Vec3::ONE
}

/// Local-space bounds of a template node's renderable geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RendererBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl RendererBounds {
    pub fn to_aabb(self) -> Aabb {
        Aabb::from_points(self.min, self.max)
    }
}

/// Marks a template node as carrying a button label component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonSlot {
    #[serde(default)]
    pub label: Option<String>,
}

/// One node of a prefab template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrefabNode {
    pub name: String,

    #[serde(default)]
    pub translation: Vec3,

    #[serde(default)]
    pub rotation: Quat,

    #[serde(default = "vec3_one")]
    pub scale: Vec3,

    #[serde(default)]
    pub renderer: Option<RendererBounds>,

    #[serde(default)]
    pub button: Option<ButtonSlot>,

    #[serde(default)]
    pub children: Vec<PrefabNode>,
}

impl PrefabNode {
    /// An empty template node with an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            renderer: None,
            button: None,
            children: Vec::new(),
        }
    }

    fn transform(&self) -> Transform {
        Transform {
            translation: self.translation,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

/// A named, externally owned template subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    pub root: PrefabNode,
}

impl Prefab {
    pub fn new(name: impl Into<String>, root: PrefabNode) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Clone the template into `scene` with its root at `position` (world
    /// space) under `parent`. The root keeps the template's rotation and
    /// local scale.
    pub fn instantiate(&self, scene: &mut Scene, position: Vec3, parent: Option<NodeId>) -> NodeId {
        let root = spawn(scene, &self.root);
        scene.node_mut(root).prefab = Some(self.name.clone());

        if parent.is_some() {
            scene.set_parent(root, parent, false);
        }
        scene.set_world_rotation(root, self.root.rotation);
        scene.set_world_position(root, position);

        log::debug!("Instantiated prefab '{}' at {:?}", self.name, position);
        root
    }
}

/// Create scene nodes for a template subtree; returns the subtree root.
fn spawn(scene: &mut Scene, template: &PrefabNode) -> NodeId {
    let id = scene.create_node(template.name.clone());
    {
        let node = scene.node_mut(id);
        node.transform = template.transform();
        node.renderer = template.renderer.map(RendererBounds::to_aabb);
        node.button = template.button.as_ref().map(|slot| ButtonLabel {
            main_label: slot.label.clone(),
        });
    }

    for child in &template.children {
        let child_id = spawn(scene, child);
        scene.set_parent(child_id, Some(id), false);
    }

    id
}

#[derive(Deserialize)]
struct PrefabLibraryFile {
    #[serde(default)]
    prefabs: Vec<Prefab>,
}

/// Named prefabs available to the custom map.
#[derive(Clone, Debug, Default)]
pub struct PrefabLibrary {
    prefabs: HashMap<String, Arc<Prefab>>,
}

impl PrefabLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefab, replacing any prefab with the same name.
    pub fn insert(&mut self, prefab: Prefab) -> Arc<Prefab> {
        let prefab = Arc::new(prefab);
        self.prefabs.insert(prefab.name.clone(), Arc::clone(&prefab));
        prefab
    }

    pub fn get(&self, name: &str) -> Option<Arc<Prefab>> {
        self.prefabs.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Parse a library from JSON text.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let file: PrefabLibraryFile = serde_json::from_str(content)?;
        Ok(Self::from_file(file))
    }

    /// Parse a library from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let file: PrefabLibraryFile = toml::from_str(content)?;
        Ok(Self::from_file(file))
    }

    /// Load a library file; the format follows the extension (`.json` or `.toml`).
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let parse: fn(&str) -> ConfigResult<Self> = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        let library = parse(&read_config(path)?)?;
        log::info!("Loaded {} prefabs from {}", library.len(), path.display());
        Ok(library)
    }

    fn from_file(file: PrefabLibraryFile) -> Self {
        let mut library = Self::new();
        for prefab in file.prefabs {
            library.insert(prefab);
        }
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_prefab() -> Prefab {
        let mut root = PrefabNode::new("PressableButton");
        root.scale = Vec3::new(2.0, 2.0, 1.0);
        root.button = Some(ButtonSlot { label: Some("Default".to_string()) });

        let mut plate = PrefabNode::new("Backplate");
        plate.translation = Vec3::new(0.0, 0.0, 0.5);
        plate.renderer = Some(RendererBounds {
            min: Vec3::new(0.0, -1.0, 0.0),
            max: Vec3::new(1.0, 0.0, 0.0),
        });
        root.children.push(plate);

        Prefab::new("PressableButton", root)
    }

    #[test]
    fn test_instantiate_copies_template() {
        let mut scene = Scene::new("test");
        let parent = scene.create_node("parent");
        let prefab = button_prefab();

        let id = prefab.instantiate(&mut scene, Vec3::new(3.0, -4.0, 0.0), Some(parent));

        let node = scene.node(id);
        assert_eq!(node.parent, Some(parent));
        assert_eq!(node.prefab.as_deref(), Some("PressableButton"));
        assert_eq!(node.transform.scale, Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(node.button.as_ref().unwrap().main_label.as_deref(), Some("Default"));
        assert_eq!(node.children.len(), 1);
        assert!((scene.world_position(id) - Vec3::new(3.0, -4.0, 0.0)).length() < 1e-5);

        // Child bounds are scaled by the root
        let bounds = scene.world_render_bounds(id).unwrap();
        assert!((bounds.top_left() - Vec3::new(3.0, -4.0, 0.0)).length() < 1e-5);
        assert!((bounds.size().x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut scene = Scene::new("test");
        let prefab = button_prefab();
        let a = prefab.instantiate(&mut scene, Vec3::ZERO, None);
        let b = prefab.instantiate(&mut scene, Vec3::ONE, None);

        scene.node_mut(a).button.as_mut().unwrap().main_label = Some("Changed".to_string());
        assert_eq!(scene.node(b).button.as_ref().unwrap().main_label.as_deref(), Some("Default"));
        assert_eq!(scene.node_count(), 4);
    }

    #[test]
    fn test_library_from_toml() {
        let library = PrefabLibrary::from_toml_str(
            r#"
[[prefabs]]
name = "Slider"

[prefabs.root]
name = "PinchSlider"
scale = [1.0, 1.0, 1.0]
renderer = { min = [0.0, -0.1, 0.0], max = [0.764, 0.0, 0.0] }

[[prefabs.root.children]]
name = "Thumb"
translation = [0.382, -0.05, 0.0]
"#,
        )
        .unwrap();

        let slider = library.get("Slider").unwrap();
        assert_eq!(slider.root.name, "PinchSlider");
        assert_eq!(slider.root.rotation, Quat::IDENTITY);
        assert_eq!(slider.root.children[0].scale, Vec3::ONE);
        assert!(library.get("Missing").is_none());
    }

    #[test]
    fn test_library_from_json() {
        let library = PrefabLibrary::from_json_str(
            r#"{ "prefabs": [
                { "name": "Backplate", "root": { "name": "Quad", "renderer": { "min": [-0.5, -0.5, 0], "max": [0.5, 0.5, 0] } } }
            ] }"#,
        )
        .unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.get("Backplate").unwrap().root.renderer.is_some());
    }

    #[test]
    fn test_library_rejects_unknown_extension() {
        let err = PrefabLibrary::load("/tmp/prefabs.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }
}
