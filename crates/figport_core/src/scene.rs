//! Scene graph types for figport.
//!
//! The scene is an arena of nodes addressed by [`NodeId`]. Each node owns a
//! local [`Transform`], an active flag and a parent/child relation, plus the
//! few presentation components the importer writes to: text labels, button
//! labels and renderer bounds. Lifetime management beyond construction is
//! left to whoever consumes the scene.

use std::fmt::Write;

use figport_math::{Aabb, Mat4, Mat4Ext, Quat, Vec2, Vec3};

/// Handle to a node inside a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform from a 4x4 matrix.
    ///
    /// Decomposes the matrix into translation, rotation, and scale.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Horizontal alignment of a text label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlignment {
    /// Whatever the text renderer uses when nothing is set
    #[default]
    RendererDefault,
    Center,
    Justified,
    Right,
}

/// A text label component.
///
/// The label's rect is centred on the node origin, so its rendered corners
/// follow directly from `rect_size` and the node's world matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub font_size: f32,
    pub font: Option<String>,
    pub alignment: TextAlignment,
    /// Rect size in local units
    pub rect_size: Vec2,
}

impl TextLabel {
    /// Local bounds of the rect (flat, centred pivot).
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_size(Vec3::new(self.rect_size.x, self.rect_size.y, 0.0))
    }

    /// Local top-left corner of the rect.
    pub fn local_top_left(&self) -> Vec3 {
        Vec3::new(-self.rect_size.x * 0.5, self.rect_size.y * 0.5, 0.0)
    }
}

/// A button configuration component exposing its main label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ButtonLabel {
    pub main_label: Option<String>,
}

/// A node of the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,

    /// Transform relative to the parent
    pub transform: Transform,

    pub active: bool,

    pub parent: Option<NodeId>,

    pub children: Vec<NodeId>,

    pub text: Option<TextLabel>,

    pub button: Option<ButtonLabel>,

    /// Local-space bounds of renderable geometry
    pub renderer: Option<Aabb>,

    /// Name of the prefab this node was instantiated from (root only)
    pub prefab: Option<String>,
}

impl SceneNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            active: true,
            parent: None,
            children: Vec::new(),
            text: None,
            button: None,
            renderer: None,
            prefab: None,
        }
    }

    /// Local bounds of everything this node renders itself.
    fn own_bounds(&self) -> Option<Aabb> {
        match (&self.renderer, &self.text) {
            (Some(r), Some(t)) => Some(Aabb::surrounding(r, &t.local_bounds())),
            (Some(r), None) => Some(*r),
            (None, Some(t)) => Some(t.local_bounds()),
            (None, None) => None,
        }
    }
}

/// A complete scene: an arena of nodes forming a forest.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually the imported file name)
    pub name: String,

    nodes: Vec<SceneNode>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a root-level node with an identity transform.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode::new(name));
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    /// Get total node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes without a parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| NodeId(i))
    }

    /// Find a root-level node by name.
    pub fn find_root(&self, name: &str) -> Option<NodeId> {
        self.roots().find(|&id| self.node(id).name == name)
    }

    /// Find a direct child by name.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).name == name)
    }

    /// Re-parent a node.
    ///
    /// With `world_position_stays` the node keeps its world transform,
    /// otherwise its local transform is kept as-is.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>, world_position_stays: bool) {
        let world = self.world_matrix(child);

        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }

        if let Some(p) = parent {
            self.nodes[p.0].children.push(child);
            self.nodes[child.0].parent = Some(p);
        }

        if world_position_stays {
            let parent_world = parent.map_or(Mat4::IDENTITY, |p| self.world_matrix(p));
            let local = parent_world.inverse() * world;
            self.nodes[child.0].transform = Transform::from_matrix(local);
        }
    }

    /// Compose local transforms from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = self.node(id);
        let local = node.transform.to_matrix();
        match node.parent {
            Some(p) => self.world_matrix(p) * local,
            None => local,
        }
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Compose local rotations from the root down to `id`. Scale is never
    /// decomposed, so a zero-scale axis leaves the rotation intact.
    pub fn world_rotation(&self, id: NodeId) -> Quat {
        let node = self.node(id);
        let local = node.transform.rotation;
        match node.parent {
            Some(p) => self.world_rotation(p) * local,
            None => local,
        }
    }

    fn parent_world_matrix(&self, id: NodeId) -> Mat4 {
        self.node(id)
            .parent
            .map_or(Mat4::IDENTITY, |p| self.world_matrix(p))
    }

    /// Move a node so its origin lands on `position` in world space.
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) {
        let local = self.parent_world_matrix(id).inverse_transform_point3(position);
        self.node_mut(id).transform.translation = local;
    }

    /// Set the world rotation while keeping the world position.
    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) {
        let parent_rotation = self
            .node(id)
            .parent
            .map_or(Quat::IDENTITY, |p| self.world_rotation(p));
        self.node_mut(id).transform.rotation = parent_rotation.inverse() * rotation;
    }

    /// Move a node along its own axes (rotation applies, scale does not).
    pub fn translate_self(&mut self, id: NodeId, delta: Vec3) {
        let world_delta = self.world_rotation(id) * delta;
        let target = self.world_position(id) + world_delta;
        self.set_world_position(id, target);
    }

    /// This node and all its descendants in depth-first pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        out
    }

    /// Nodes in the subtree that carry a button component, in pre-order.
    pub fn buttons_in_subtree(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.node(n).button.is_some())
            .collect()
    }

    /// World-space bounds of all rendered geometry in a subtree.
    ///
    /// Returns `None` when nothing in the subtree renders.
    pub fn world_render_bounds(&self, id: NodeId) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        for n in self.descendants(id) {
            if let Some(local) = self.node(n).own_bounds() {
                let world = self.world_matrix(n).transform_aabb(&local);
                bounds = Some(match bounds {
                    Some(b) => Aabb::surrounding(&b, &world),
                    None => world,
                });
            }
        }
        bounds
    }

    /// Human-readable outline of the hierarchy.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            self.dump_node(root, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let p = node.transform.translation;
        let _ = write!(
            out,
            "{:indent$}{} @ ({:.4}, {:.4}, {:.4})",
            "",
            node.name,
            p.x,
            p.y,
            p.z,
            indent = depth * 2
        );
        if !node.active {
            out.push_str(" (inactive)");
        }
        if let Some(text) = &node.text {
            let _ = write!(out, " text={:?}", text.text);
        }
        if let Some(label) = node.button.as_ref().and_then(|b| b.main_label.as_ref()) {
            let _ = write!(out, " label={:?}", label);
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_node(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_transform_matrix_roundtrip() {
        let transform = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };

        let matrix = transform.to_matrix();
        let recovered = Transform::from_matrix(matrix);

        assert!((recovered.translation - transform.translation).length() < 0.001);
        assert!((recovered.scale - transform.scale).length() < 0.001);
    }

    #[test]
    fn test_set_parent_keeps_world_position() {
        let mut scene = Scene::new("test");
        let parent = scene.create_node("parent");
        scene.node_mut(parent).transform.translation = Vec3::new(10.0, 0.0, 0.0);

        let child = scene.create_node("child");
        scene.node_mut(child).transform.translation = Vec3::new(15.0, 5.0, 0.0);
        scene.set_parent(child, Some(parent), true);

        assert_eq!(scene.node(child).parent, Some(parent));
        assert!(approx(scene.node(child).transform.translation, Vec3::new(5.0, 5.0, 0.0)));
        assert!(approx(scene.world_position(child), Vec3::new(15.0, 5.0, 0.0)));
        assert_eq!(scene.roots().collect::<Vec<_>>(), vec![parent]);
    }

    #[test]
    fn test_set_parent_keeps_local_transform() {
        let mut scene = Scene::new("test");
        let parent = scene.create_node("parent");
        scene.node_mut(parent).transform.translation = Vec3::new(1.0, 1.0, 0.0);
        let child = scene.create_node("child");
        scene.node_mut(child).transform.translation = Vec3::new(1.0, 0.0, 0.0);

        scene.set_parent(child, Some(parent), false);
        assert!(approx(scene.world_position(child), Vec3::new(2.0, 1.0, 0.0)));
    }

    #[test]
    fn test_reparent_detaches_from_old_parent() {
        let mut scene = Scene::new("test");
        let a = scene.create_node("a");
        let b = scene.create_node("b");
        let c = scene.create_node("c");
        scene.set_parent(c, Some(a), true);
        scene.set_parent(c, Some(b), true);

        assert!(scene.node(a).children.is_empty());
        assert_eq!(scene.node(b).children, vec![c]);
        assert_eq!(scene.find_child(b, "c"), Some(c));
        assert_eq!(scene.find_child(a, "c"), None);
    }

    #[test]
    fn test_translate_self_follows_rotation() {
        let mut scene = Scene::new("test");
        let node = scene.create_node("node");
        scene.node_mut(node).transform.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        scene.node_mut(node).transform.scale = Vec3::splat(3.0);

        scene.translate_self(node, Vec3::new(1.0, 0.0, 0.0));
        // Local X points along world Y; scale does not stretch the move
        assert!(approx(scene.world_position(node), Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_translate_self_with_zero_scale() {
        let mut scene = Scene::new("test");
        let parent = scene.create_node("parent");
        scene.node_mut(parent).transform.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let node = scene.create_node("line");
        scene.set_parent(node, Some(parent), false);
        scene.node_mut(node).transform.scale = Vec3::new(1.0, 0.0, 1.0);

        assert!(scene.world_rotation(node).is_finite());
        scene.translate_self(node, Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(scene.world_position(node), Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_set_world_position_under_scaled_parent() {
        let mut scene = Scene::new("test");
        let parent = scene.create_node("parent");
        scene.node_mut(parent).transform.scale = Vec3::splat(2.0);
        let child = scene.create_node("child");
        scene.set_parent(child, Some(parent), false);

        scene.set_world_position(child, Vec3::new(4.0, 2.0, 0.0));
        assert!(approx(scene.node(child).transform.translation, Vec3::new(2.0, 1.0, 0.0)));
        assert!(approx(scene.world_position(child), Vec3::new(4.0, 2.0, 0.0)));
    }

    #[test]
    fn test_world_render_bounds() {
        let mut scene = Scene::new("test");
        let root = scene.create_node("root");
        scene.node_mut(root).transform.translation = Vec3::new(1.0, 1.0, 0.0);
        assert!(scene.world_render_bounds(root).is_none());

        let quad = scene.create_node("quad");
        scene.node_mut(quad).renderer = Some(Aabb::from_size(Vec3::new(2.0, 2.0, 0.0)));
        scene.set_parent(quad, Some(root), false);

        let label = scene.create_node("label");
        scene.node_mut(label).text = Some(TextLabel {
            text: "Hi".to_string(),
            font_size: 12.0,
            font: None,
            alignment: TextAlignment::default(),
            rect_size: Vec2::new(6.0, 1.0),
        });
        scene.set_parent(label, Some(root), false);

        let bounds = scene.world_render_bounds(root).unwrap();
        assert!(approx(bounds.min(), Vec3::new(-2.0, 0.0, 0.0)));
        assert!(approx(bounds.max(), Vec3::new(4.0, 2.0, 0.0)));
        assert!(approx(bounds.top_left(), Vec3::new(-2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_descendants_and_buttons_order() {
        let mut scene = Scene::new("test");
        let root = scene.create_node("root");
        let a = scene.create_node("a");
        let a1 = scene.create_node("a1");
        let b = scene.create_node("b");
        scene.set_parent(a, Some(root), false);
        scene.set_parent(a1, Some(a), false);
        scene.set_parent(b, Some(root), false);
        scene.node_mut(a1).button = Some(ButtonLabel::default());
        scene.node_mut(b).button = Some(ButtonLabel::default());

        assert_eq!(scene.descendants(root), vec![root, a, a1, b]);
        assert_eq!(scene.buttons_in_subtree(root), vec![a1, b]);
    }

    #[test]
    fn test_dump_marks_inactive_nodes() {
        let mut scene = Scene::new("test");
        let root = scene.create_node("Page [Canvas]");
        let child = scene.create_node("Hidden [Frame]");
        scene.set_parent(child, Some(root), false);
        scene.node_mut(child).active = false;

        let dump = scene.dump();
        assert!(dump.starts_with("Page [Canvas]"));
        assert!(dump.contains("  Hidden [Frame] @ (0.0000, 0.0000, 0.0000) (inactive)"));
    }
}
