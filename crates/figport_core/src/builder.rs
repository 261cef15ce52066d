//! Scene building from decoded Figma documents.
//!
//! This module provides the main entry point for turning a Figma file into a
//! figport [`Scene`]. Every Figma node yields exactly one scene node, named
//! `"<name> [<Type>]"`, parented under the node built for its Figma parent.
//! INSTANCE nodes are replaced by prefabs from a [`PrefabLookup`]; their
//! Figma children are never visited.

use std::collections::BTreeMap;
use std::path::Path;

use figport_math::{Vec3, Vec2};
use thiserror::Error;

use crate::custom_map::{CustomMapEntry, PrefabLookup};
use crate::figma::{
    decode_file, ComponentDescriptor, FileResponse, Node, NodeType, SchemaError,
    TextAlignHorizontal,
};
use crate::post_process::{post_process, PostProcessError};
use crate::prefab::Prefab;
use crate::scene::{NodeId, Scene, TextAlignment, TextLabel};
use crate::settings::ImportSettings;

/// Errors that abort an import.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Result type for building operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Why an INSTANCE node fell back to an empty group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissReason {
    /// The name has no custom map entry
    NotMapped,
    /// The entry exists but has no prefab
    NoPrefab,
}

/// An INSTANCE node that could not be substituted.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupMiss {
    pub node_id: String,
    pub node_name: String,
    /// Master component name, when the file's component table knows it
    pub component: Option<String>,
    pub reason: MissReason,
}

/// Summary of a build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Root node the document was built under
    pub document_root: Option<NodeId>,
    /// Scene nodes created for Figma nodes (prefab internals not counted)
    pub nodes_built: usize,
    pub instances_substituted: usize,
    pub lookup_misses: Vec<LookupMiss>,
    /// Figma node name paired with the step that was skipped
    pub post_process_failures: Vec<(String, PostProcessError)>,
}

impl BuildReport {
    /// True when every instance was substituted and post-processed.
    pub fn is_clean(&self) -> bool {
        self.lookup_misses.is_empty() && self.post_process_failures.is_empty()
    }
}

/// Builds scene nodes for Figma nodes, one tree walk at a time.
pub struct SceneBuilder<'a> {
    settings: &'a ImportSettings,
    lookup: &'a dyn PrefabLookup,
    /// Component table used to annotate lookup misses
    components: Option<&'a BTreeMap<String, ComponentDescriptor>>,
    report: BuildReport,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(settings: &'a ImportSettings, lookup: &'a dyn PrefabLookup) -> Self {
        Self {
            settings,
            lookup,
            components: None,
            report: BuildReport::default(),
        }
    }

    pub fn with_components(mut self, components: &'a BTreeMap<String, ComponentDescriptor>) -> Self {
        self.components = Some(components);
        self
    }

    /// Build `nodes` under the root node named `document_name`, creating the
    /// root if the scene has none. Importing again reuses the same root.
    pub fn build_document(mut self, scene: &mut Scene, document_name: &str, nodes: &[Node]) -> BuildReport {
        let root = match scene.find_root(document_name) {
            Some(root) => {
                log::debug!("Reusing document root '{}'", document_name);
                root
            }
            None => scene.create_node(document_name),
        };
        self.report.document_root = Some(root);

        for node in nodes {
            self.build_node(scene, node, root);
        }

        self.finish()
    }

    /// Build the pages of a decoded file under a root named after the file.
    pub fn build_file(self, scene: &mut Scene, file: &'a FileResponse) -> BuildReport {
        self.with_components(&file.components)
            .build_document(scene, &file.name, file.document.children())
    }

    /// Build one Figma node (and its children) under `parent`.
    pub fn build_node(&mut self, scene: &mut Scene, node: &Node, parent: NodeId) -> NodeId {
        let id = match node.node_type {
            NodeType::Canvas | NodeType::Group | NodeType::Rectangle => self.build_base(scene, node),
            NodeType::Frame => self.build_frame(scene, node),
            NodeType::Text => self.build_text(scene, node),
            NodeType::Instance => self.build_instance(scene, node, parent),
            NodeType::Boolean
            | NodeType::Component
            | NodeType::ComponentSet
            | NodeType::Document
            | NodeType::Ellipse
            | NodeType::Line
            | NodeType::RegularPolygon
            | NodeType::Slice
            | NodeType::Star
            | NodeType::Vector => {
                log::trace!("{} '{}' built as an empty group", node.node_type, node.name);
                self.build_base(scene, node)
            }
        };
        self.report.nodes_built += 1;

        // Instances are created under their parent already
        if scene.node(id).parent.is_none() {
            scene.set_parent(id, Some(parent), true);
        }

        if !matches!(node.node_type, NodeType::Instance | NodeType::ComponentSet) {
            for child in node.children() {
                self.build_node(scene, child, id);
            }
        }

        let active = self
            .settings
            .visibility
            .is_active(node.visible, node.absolute_bounding_box.is_some());

        let scene_node = scene.node_mut(id);
        scene_node.active = active;
        scene_node.name = format!("{} [{}]", node.name, node.node_type.tag());

        id
    }

    /// Finish building and return the report.
    pub fn finish(self) -> BuildReport {
        let report = self.report;
        log::info!(
            "Built {} nodes ({} prefab instances, {} lookup misses, {} skipped post-process steps)",
            report.nodes_built,
            report.instances_substituted,
            report.lookup_misses.len(),
            report.post_process_failures.len()
        );
        report
    }

    fn build_base(&mut self, scene: &mut Scene, node: &Node) -> NodeId {
        scene.create_node(node.name.clone())
    }

    /// Empty group at the scaled bounding-box top-left.
    fn build_frame(&mut self, scene: &mut Scene, node: &Node) -> NodeId {
        let id = self.build_base(scene, node);
        if let Some(bbox) = &node.absolute_bounding_box {
            scene.node_mut(id).transform.translation = bbox.position() * self.settings.position_scale;
        }
        id
    }

    fn build_text(&mut self, scene: &mut Scene, node: &Node) -> NodeId {
        let settings = self.settings;
        let id = scene.create_node(node.name.clone());

        let style = node.style.as_ref();
        let alignment = match style.and_then(|s| s.text_align_horizontal) {
            Some(TextAlignHorizontal::Center) => TextAlignment::Center,
            Some(TextAlignHorizontal::Justified) => TextAlignment::Justified,
            Some(TextAlignHorizontal::Right) => TextAlignment::Right,
            Some(TextAlignHorizontal::Left) | None => TextAlignment::RendererDefault,
        };
        let font = self
            .lookup
            .default_font()
            .map(str::to_string)
            .or_else(|| settings.default_font.clone());

        let bbox = node.absolute_bounding_box;
        let label = TextLabel {
            text: node.characters.clone().unwrap_or_default(),
            font_size: style
                .and_then(|s| s.font_size)
                .unwrap_or(settings.default_font_size),
            font,
            alignment,
            rect_size: bbox.map_or(Vec2::ZERO, |b| b.size() * settings.text_size_factor),
        };
        let local_top_left = label.local_top_left();

        let scene_node = scene.node_mut(id);
        scene_node.transform.scale = Vec3::splat(settings.position_scale / settings.text_size_factor);
        scene_node.text = Some(label);

        match bbox {
            Some(bbox) => {
                // Place, then shift so the rendered top-left lands on the anchor
                let anchor = bbox.position() * settings.position_scale;
                scene.set_world_position(id, anchor);
                let top_left = scene.world_matrix(id).transform_point3(local_top_left);
                scene.translate_self(id, anchor - top_left);
            }
            None => log::debug!("Text '{}' has no bounding box; left at the origin", node.name),
        }

        id
    }

    fn build_instance(&mut self, scene: &mut Scene, node: &Node, parent: NodeId) -> NodeId {
        let lookup = self.lookup;
        let reason = match lookup.lookup(&node.name) {
            Some(entry) => match &entry.prefab {
                Some(prefab) => return self.instantiate(scene, node, entry, prefab, parent),
                None => MissReason::NoPrefab,
            },
            None => MissReason::NotMapped,
        };

        let component = node
            .component_id
            .as_deref()
            .and_then(|cid| self.components.and_then(|c| c.get(cid)))
            .map(|c| c.name.clone());
        match &component {
            Some(component) => log::warn!(
                "{} (component '{}') not found in prefab library",
                node.name,
                component
            ),
            None => log::warn!("{} not found in prefab library", node.name),
        }

        self.report.lookup_misses.push(LookupMiss {
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            component,
            reason,
        });

        self.build_frame(scene, node)
    }

    fn instantiate(
        &mut self,
        scene: &mut Scene,
        node: &Node,
        entry: &CustomMapEntry,
        prefab: &Prefab,
        parent: NodeId,
    ) -> NodeId {
        let settings = self.settings;
        let anchor = match &node.absolute_bounding_box {
            Some(bbox) => bbox.position() * settings.position_scale,
            None => {
                log::warn!("Instance '{}' has no bounding box; placing at the origin", node.name);
                Vec3::ZERO
            }
        };

        let id = prefab.instantiate(scene, anchor, Some(parent));
        scene.node_mut(id).name = node.name.clone();

        if let Err(err) = post_process(entry.process, node, scene, id, settings) {
            log::error!("Skipped {:?} post-process for '{}': {}", entry.process, node.name, err);
            self.report.post_process_failures.push((node.name.clone(), err));
        }

        match scene.world_render_bounds(id) {
            Some(bounds) => {
                let delta = scene.world_position(id) - bounds.top_left();
                scene.translate_self(id, delta);
            }
            None => log::warn!(
                "Prefab '{}' for '{}' renders nothing; skipping re-anchoring",
                prefab.name,
                node.name
            ),
        }

        scene.translate_self(id, entry.offset);
        self.report.instances_substituted += 1;
        id
    }
}

/// Build every page of `file` into `scene`.
pub fn build_file(
    scene: &mut Scene,
    file: &FileResponse,
    settings: &ImportSettings,
    lookup: &dyn PrefabLookup,
) -> BuildReport {
    SceneBuilder::new(settings, lookup).build_file(scene, file)
}

/// Decode Figma JSON and build it into a new scene named after the file.
///
/// # Example
///
/// ```ignore
/// use figport_core::{import_figma_str, CustomMap, ImportSettings};
///
/// let (scene, report) = import_figma_str(&json, &ImportSettings::default(), &CustomMap::new())?;
/// print!("{}", scene.dump());
/// ```
pub fn import_figma_str(
    json: &str,
    settings: &ImportSettings,
    lookup: &dyn PrefabLookup,
) -> BuildResult<(Scene, BuildReport)> {
    let file = decode_file(json)?;
    let mut scene = Scene::new(file.name.clone());
    let report = build_file(&mut scene, &file, settings, lookup);
    Ok((scene, report))
}

/// Read a Figma JSON file and build it into a new scene.
pub fn import_figma_file<P: AsRef<Path>>(
    path: P,
    settings: &ImportSettings,
    lookup: &dyn PrefabLookup,
) -> BuildResult<(Scene, BuildReport)> {
    let content = std::fs::read_to_string(path.as_ref())?;
    import_figma_str(&content, settings, lookup)
}
