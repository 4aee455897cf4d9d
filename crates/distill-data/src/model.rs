use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Response for a whole-file request: the document root plus file metadata.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub name: String,
    pub last_modified: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub document: RawNode,
}

/// Response for a named-nodes request. Nodes the server could not resolve come back as `null`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NodesResponse {
    pub name: String,
    pub last_modified: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub nodes: BTreeMap<String, Option<NodeEntry>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NodeEntry {
    pub document: RawNode,
}

/// Either response shape. Dispatch is structural: `nodes` vs `document`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum DesignResponse {
    Nodes(NodesResponse),
    File(FileResponse),
}

impl DesignResponse {
    /// Parses a response of any nesting depth.
    ///
    /// Every node level costs two levels of JSON nesting, so the default
    /// `serde_json` recursion limit rejects documents past roughly sixty
    /// node levels. The limit is lifted here and the stack grows on demand.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(raw);
        de.disable_recursion_limit();
        let response = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(response)
    }

    pub fn name(&self) -> &str {
        match self {
            DesignResponse::Nodes(r) => &r.name,
            DesignResponse::File(r) => &r.name,
        }
    }

    pub fn last_modified(&self) -> &str {
        match self {
            DesignResponse::Nodes(r) => &r.last_modified,
            DesignResponse::File(r) => &r.last_modified,
        }
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        match self {
            DesignResponse::Nodes(r) => r.thumbnail_url.as_deref(),
            DesignResponse::File(r) => r.thumbnail_url.as_deref(),
        }
    }

    /// The top-level nodes to walk: the document's pages for a file, or each
    /// resolved node's document (sorted by requested id) for a nodes request.
    pub fn roots(&self) -> Vec<&RawNode> {
        match self {
            DesignResponse::File(r) => r.document.children.iter().collect(),
            DesignResponse::Nodes(r) => r
                .nodes
                .values()
                .filter_map(|entry| entry.as_ref().map(|e| &e.document))
                .collect(),
        }
    }
}

// Nodes

/// A raw document node. The `type` tag decides which of the optional
/// property groups are meaningful; every group is optional on every node.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub visible: Option<bool>,

    #[serde(flatten)]
    pub geometry: GeometryProps,
    #[serde(flatten)]
    pub text: TextProps,
    #[serde(flatten)]
    pub layout: LayoutProps,

    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Nodes are visible unless explicitly hidden.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// Node type tag. Unknown tags are kept verbatim so the output can echo them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Text,
    Slice,
    Component,
    ComponentSet,
    Instance,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Canvas => "CANVAS",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Star => "STAR",
            NodeType::Line => "LINE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::RegularPolygon => "REGULAR_POLYGON",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Text => "TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "DOCUMENT" => NodeType::Document,
            "CANVAS" => NodeType::Canvas,
            "FRAME" => NodeType::Frame,
            "GROUP" => NodeType::Group,
            "SECTION" => NodeType::Section,
            "VECTOR" => NodeType::Vector,
            "BOOLEAN_OPERATION" => NodeType::BooleanOperation,
            "STAR" => NodeType::Star,
            "LINE" => NodeType::Line,
            "ELLIPSE" => NodeType::Ellipse,
            "REGULAR_POLYGON" => NodeType::RegularPolygon,
            "RECTANGLE" => NodeType::Rectangle,
            "TEXT" => NodeType::Text,
            "SLICE" => NodeType::Slice,
            "COMPONENT" => NodeType::Component,
            "COMPONENT_SET" => NodeType::ComponentSet,
            "INSTANCE" => NodeType::Instance,
            _ => NodeType::Other(tag),
        }
    }
}

impl From<NodeType> for String {
    fn from(kind: NodeType) -> Self {
        match kind {
            NodeType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paint, stroke, shape and effect properties.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeometryProps {
    #[serde(default)]
    pub fills: Option<Vec<Paint>>,
    #[serde(default)]
    pub strokes: Option<Vec<Paint>>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub stroke_dashes: Option<Vec<f64>>,
    // Shape is validated at the boundary, not here.
    #[serde(default)]
    pub individual_stroke_weights: Option<serde_json::Value>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub rectangle_corner_radii: Option<serde_json::Value>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub effects: Option<Vec<Effect>>,
    #[serde(default)]
    pub absolute_bounding_box: Option<Rectangle>,
    /// Named styles applied to the node (style kind -> style key).
    #[serde(default)]
    pub styles: Option<BTreeMap<String, String>>,
}

/// Text content and formatting.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub style: Option<TypeStyle>,
}

/// Auto-layout and constraint properties. Enum-like values stay as the
/// source's upper-case strings (`HORIZONTAL`, `SPACE_BETWEEN`, ...).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProps {
    #[serde(default)]
    pub layout_mode: Option<String>,
    #[serde(default)]
    pub primary_axis_align_items: Option<String>,
    #[serde(default)]
    pub counter_axis_align_items: Option<String>,
    #[serde(default)]
    pub layout_align: Option<String>,
    #[serde(default)]
    pub layout_wrap: Option<String>,
    #[serde(default)]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub padding_top: Option<f64>,
    #[serde(default)]
    pub padding_right: Option<f64>,
    #[serde(default)]
    pub padding_bottom: Option<f64>,
    #[serde(default)]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub layout_sizing_horizontal: Option<String>,
    #[serde(default)]
    pub layout_sizing_vertical: Option<String>,
    #[serde(default)]
    pub layout_positioning: Option<String>,
    #[serde(default)]
    pub layout_grow: Option<f64>,
    #[serde(default)]
    pub clips_content: Option<bool>,
    #[serde(default)]
    pub overflow_direction: Option<String>,
    #[serde(default)]
    pub preserve_ratio: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<f64>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub line_height_px: Option<f64>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub text_case: Option<String>,
    #[serde(default)]
    pub text_align_horizontal: Option<String>,
    #[serde(default)]
    pub text_align_vertical: Option<String>,
}

// Paint

/// A fill or stroke entry. The `type` tag is kept as text; classification
/// (and rejection of unknown kinds) belongs to the consumer.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub gradient_handle_positions: Option<Vec<Vector>>,
    #[serde(default)]
    pub gradient_stops: Option<Vec<ColorStop>>,
    #[serde(default)]
    pub scale_mode: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// RGBA color, channels in 0..=1.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// Effects

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub offset: Option<Vector>,
    #[serde(default)]
    pub spread: Option<f64>,
}

fn default_visible() -> bool {
    true
}
