//! # Types Module
//!
//! Shared output data types of the simplification engine.
//!
//! ## Responsibilities
//! - **Nodes**: `SimplifiedNode`, either a normalized element or a collapsed image placeholder.
//! - **Style payloads**: text styles, paints, effects and stroke weights stored as global variables.
//! - **Result**: `SimplifiedDesign`, the serializable contract with the tool layer.
//!
//! ## Key Types
//! - `VarId`: Generated global variable identifier (`fill_AB12C3`).
//! - `StyleValue`: Any payload the global variable store can hold.
//! - `GlobalVars`: Emitted variable map plus the vector content grouping.

use crate::layout::SimplifiedLayout;
use crate::prune::prune_empty;
use distill_data::model::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Identifier of a global variable, `{category}_{XXXXXX}`.
pub type VarId = String;

/// A node of the simplified tree.
///
/// `Collapsed` nodes are produced only by vector grouping and replace an
/// element (same `id`) whose subtree was effectively a flattened image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimplifiedNode {
    Element(ElementNode),
    Collapsed(CollapsedNode),
}

impl SimplifiedNode {
    pub fn id(&self) -> &str {
        match self {
            SimplifiedNode::Element(n) => &n.id,
            SimplifiedNode::Collapsed(n) => &n.id,
        }
    }

    pub fn node_type(&self) -> &str {
        match self {
            SimplifiedNode::Element(n) => &n.node_type,
            SimplifiedNode::Collapsed(n) => &n.node_type,
        }
    }

    /// Children of an element; collapsed nodes have none.
    pub fn children(&self) -> &[SimplifiedNode] {
        match self {
            SimplifiedNode::Element(n) => &n.children,
            SimplifiedNode::Collapsed(_) => &[],
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            SimplifiedNode::Element(n) => Some(n),
            SimplifiedNode::Collapsed(_) => None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, SimplifiedNode::Collapsed(_))
    }

    /// Depth-first, pre-order search by id.
    pub fn find(&self, id: &str) -> Option<&SimplifiedNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }
}

/// A normalized document node. Style-like payloads are references into
/// `GlobalVars`; every optional field is omitted when it carries nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<VarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fills: Option<VarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<VarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<VarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<VarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dashes: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_stroke_weights: Option<VarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SimplifiedNode>,
}

/// Image placeholder standing in for a parent of vector art.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedNode {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<SimplifiedPaint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// --- Style payloads ---

/// Canonical text formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Pixels. Falls back to the font size when the source has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// Pixels. Zero spacing is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
}

/// A color token: uppercase `#RRGGBB` plus a 0..=1 opacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorValue {
    pub hex: String,
    pub opacity: f64,
}

/// A normalized fill or stroke entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SimplifiedPaint {
    #[serde(rename = "SOLID")]
    Solid { hex: String, opacity: f64 },
    #[serde(rename = "IMAGE", rename_all = "camelCase")]
    Image {
        #[serde(skip_serializing_if = "Option::is_none")]
        image_ref: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        scale_mode: Option<String>,
    },
    #[serde(rename = "GRADIENT_LINEAR")]
    GradientLinear(Gradient),
    #[serde(rename = "GRADIENT_RADIAL")]
    GradientRadial(Gradient),
    #[serde(rename = "GRADIENT_ANGULAR")]
    GradientAngular(Gradient),
    #[serde(rename = "GRADIENT_DIAMOND")]
    GradientDiamond(Gradient),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub gradient_handle_positions: Vec<Vector>,
    pub gradient_stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: ColorValue,
}

/// CSS-like effect strings.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedEffects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
}

impl SimplifiedEffects {
    pub fn is_empty(&self) -> bool {
        *self == SimplifiedEffects::default()
    }
}

/// Per-side stroke widths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeWeights {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Anything the global variable store can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Text(TextStyle),
    Paints(Vec<SimplifiedPaint>),
    Effects(SimplifiedEffects),
    Layout(SimplifiedLayout),
    StrokeWeights(StrokeWeights),
    /// A simplified vector node without its id.
    Vector(Value),
}

/// The emitted variable table.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVars {
    #[serde(flatten)]
    pub styles: BTreeMap<VarId, StyleValue>,
    /// Vector content id -> parents whose vector art matched it, in discovery order.
    pub children_to_parents: BTreeMap<VarId, Vec<String>>,
}

/// The result of one simplification run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDesign {
    pub name: String,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub nodes: Vec<SimplifiedNode>,
    pub global_vars: GlobalVars,
}

impl SimplifiedDesign {
    /// Serializes the design, passing every node through the empty-key pruner.
    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(Value::Array(nodes)) = value.get_mut("nodes") {
            let pruned = std::mem::take(nodes).into_iter().map(prune_empty).collect();
            *nodes = pruned;
        }
        Ok(value)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, serde_json::Error> {
        let value = self.to_json_value()?;
        if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
    }

    /// Finds a node anywhere in the tree by id.
    pub fn find_node(&self, id: &str) -> Option<&SimplifiedNode> {
        self.nodes.iter().find_map(|node| node.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_serializes_only_present_fields() {
        let node = ElementNode {
            id: "1:1".into(),
            node_type: "FRAME".into(),
            fills: Some("fill_ABC123".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(SimplifiedNode::Element(node)).unwrap();
        assert_eq!(value, json!({ "id": "1:1", "type": "FRAME", "fills": "fill_ABC123" }));
    }

    #[test]
    fn test_paint_variants_carry_type_tag() {
        let solid = SimplifiedPaint::Solid { hex: "#FF0000".into(), opacity: 0.5 };
        assert_eq!(
            serde_json::to_value(&solid).unwrap(),
            json!({ "type": "SOLID", "hex": "#FF0000", "opacity": 0.5 })
        );

        let image = SimplifiedPaint::Image { image_ref: Some("abc".into()), scale_mode: Some("FILL".into()) };
        assert_eq!(
            serde_json::to_value(&image).unwrap(),
            json!({ "type": "IMAGE", "imageRef": "abc", "scaleMode": "FILL" })
        );

        let gradient = SimplifiedPaint::GradientRadial(Gradient {
            gradient_handle_positions: vec![Vector { x: 0.5, y: 0.5 }],
            gradient_stops: vec![],
        });
        let value = serde_json::to_value(&gradient).unwrap();
        assert_eq!(value["type"], "GRADIENT_RADIAL");
        assert_eq!(value["gradientHandlePositions"][0]["x"], 0.5);
    }

    #[test]
    fn test_global_vars_flatten_alongside_grouping() {
        let mut vars = GlobalVars::default();
        vars.styles.insert(
            "weight_AAAAAA".into(),
            StyleValue::StrokeWeights(StrokeWeights { top: 1.0, right: 0.0, bottom: 1.0, left: 0.0 }),
        );
        vars.children_to_parents.insert("vector_BBBBBB".into(), vec!["1:1".into()]);
        let value = serde_json::to_value(&vars).unwrap();
        assert_eq!(value["weight_AAAAAA"]["top"], 1.0);
        assert_eq!(value["childrenToParents"]["vector_BBBBBB"], json!(["1:1"]));
    }

    #[test]
    fn test_find_descends_into_children() {
        let leaf = SimplifiedNode::Element(ElementNode {
            id: "1:3".into(),
            node_type: "TEXT".into(),
            ..Default::default()
        });
        let root = SimplifiedNode::Element(ElementNode {
            id: "1:1".into(),
            node_type: "FRAME".into(),
            children: vec![leaf],
            ..Default::default()
        });
        assert_eq!(root.find("1:3").map(|n| n.node_type()), Some("TEXT"));
        assert!(root.find("9:9").is_none());
    }
}
