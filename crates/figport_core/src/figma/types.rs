//! Figma file-export schema types.
//!
//! These types mirror the JSON returned by `GET /v1/files/:key` before any
//! conversion to figport scene graph types. Field names follow the wire
//! format (camelCase); optional fields stay `None` when absent.

use std::collections::BTreeMap;

use figport_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::wire::*;

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Response of `GET /v1/files/:key`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File name as shown in the editor
    #[serde(default)]
    pub name: String,

    /// Component ID -> component metadata
    #[serde(default)]
    pub components: BTreeMap<String, ComponentDescriptor>,

    /// The root node, of type DOCUMENT
    pub document: Node,

    #[serde(default)]
    pub schema_version: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl FileResponse {
    /// Look up the component an instance was created from.
    pub fn component(&self, component_id: &str) -> Option<&ComponentDescriptor> {
        self.components.get(component_id)
    }
}

/// Metadata about a master component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
}

/// Response of `GET /v1/images/:key`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,

    /// Node ID -> rendered image URL (null when rendering failed)
    #[serde(default)]
    pub images: BTreeMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// A node of the document tree.
///
/// All node types share this shape; `node_type` says which of the
/// type-dependent fields are meaningful.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique within the document
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,

    /// Bounding box in absolute canvas coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rect>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<Vec<ExportSetting>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clips_content: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<LayoutConstraint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mask: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_grids: Option<Vec<LayoutGrid>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_ratio: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_node_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_align: Option<StrokeAlign>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<Paint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,

    /// Text content (TEXT nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_style_overrides: Option<Vec<f32>>,

    /// Text style (TEXT nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_override_table: Option<BTreeMap<String, TypeStyle>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Master component of an INSTANCE node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl Node {
    /// Create a bare node with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            visible: true,
            children: None,
            absolute_bounding_box: None,
            background_color: None,
            export_settings: None,
            blend_mode: None,
            clips_content: None,
            constraints: None,
            effects: None,
            is_mask: None,
            layout_grids: None,
            opacity: None,
            preserve_ratio: None,
            transition_node_id: None,
            fills: None,
            stroke_align: None,
            strokes: None,
            stroke_weight: None,
            corner_radius: None,
            characters: None,
            character_style_overrides: None,
            style: None,
            style_override_table: None,
            description: None,
            component_id: None,
        }
    }

    /// Builder-style setter for the bounding box.
    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.absolute_bounding_box = Some(Rect { x, y, width, height });
        self
    }

    /// Builder-style setter that appends a child.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Direct children (empty for leaf nodes).
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth-first, pre-order iteration over this node and its descendants.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Find a node in this subtree by ID.
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.iter().find(|n| n.id == id)
    }

    /// First text content found by a depth-first search of this subtree.
    ///
    /// A TEXT node without `characters` does not stop the search.
    pub fn find_text(&self) -> Option<&str> {
        if self.node_type == NodeType::Text {
            return self.characters.as_deref();
        }
        self.children().iter().find_map(Node::find_text)
    }
}

/// Pre-order iterator over a node subtree.
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// A rectangle in absolute canvas coordinates (top-left origin, Y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Top-left corner in scene orientation: Y is flipped so it grows upwards.
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, -self.y, 0.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// An RGBA color, each channel in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// Layout constraint relative to the containing frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutConstraint {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

/// A visual effect such as a shadow or blur.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector2>,
}

/// Format and size of an image export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    pub format: Format,

    pub constraint: Constraint,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,

    pub value: f32,
}

/// A solid color, gradient or image fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: FillType,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_handle_positions: Option<Vec<Vector2>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_stops: Option<Vec<ColorStop>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_mode: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: Color,
}

/// Guides shown on top of a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGrid {
    pub pattern: Pattern,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_size: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter_size: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f32>,
}

/// Character formatting of a TEXT node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_post_script_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<TextAlignHorizontal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<TextAlignVertical>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_px: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_percent: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Node {
        Node::new("0:0", "Document", NodeType::Document).with_child(
            Node::new("1:0", "Page 1", NodeType::Canvas)
                .with_child(
                    Node::new("2:0", "Card", NodeType::Frame)
                        .with_bounds(0.0, 0.0, 200.0, 100.0)
                        .with_child(Node::new("3:0", "Icon", NodeType::Vector))
                        .with_child(Node {
                            characters: Some("Hello".to_string()),
                            ..Node::new("3:1", "Title", NodeType::Text)
                        }),
                )
                .with_child(Node::new("2:1", "Divider", NodeType::Line)),
        )
    }

    #[test]
    fn test_rect_position_flips_y() {
        let rect = Rect { x: 10.0, y: 20.0, width: 100.0, height: 50.0 };
        assert_eq!(rect.position(), Vec3::new(10.0, -20.0, 0.0));
        assert_eq!(rect.size(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_iter_is_pre_order() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["0:0", "1:0", "2:0", "3:0", "3:1", "2:1"]);
        assert_eq!(tree.count(), 6);
    }

    #[test]
    fn test_find_text_first_match_wins() {
        let tree = sample_tree();
        assert_eq!(tree.find_text(), Some("Hello"));

        let empty = Node::new("9:9", "Nothing", NodeType::Group)
            .with_child(Node::new("9:10", "Box", NodeType::Rectangle));
        assert_eq!(empty.find_text(), None);
    }

    #[test]
    fn test_find_text_skips_text_without_characters() {
        let node = Node::new("1", "Root", NodeType::Group)
            .with_child(Node::new("2", "Blank", NodeType::Text))
            .with_child(Node {
                characters: Some("Second".to_string()),
                ..Node::new("3", "Label", NodeType::Text)
            });
        assert_eq!(node.find_text(), Some("Second"));
    }

    #[test]
    fn test_find_by_id() {
        let tree = sample_tree();
        assert_eq!(tree.find_by_id("3:0").map(|n| n.name.as_str()), Some("Icon"));
        assert!(tree.find_by_id("nope").is_none());
    }
}
