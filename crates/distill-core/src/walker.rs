//! # Tree Walker
//!
//! Recursive, depth-first, left-to-right descent over the raw node tree.
//!
//! ## Responsibilities
//! - **Filtering**: hidden nodes (and their subtrees) are dropped.
//! - **Normalization**: text styles, paints, effects, stroke weights and layout
//!   become references into the global variable store.
//! - **Vector bookkeeping**: every vector node's payload is registered and its
//!   parent recorded for the grouping pass.

use crate::color::parse_paints;
use crate::effects::build_effects;
use crate::errors::SimplifyError;
use crate::layout::{AutoLayoutBuilder, LayoutBuilder};
use crate::options::SimplifyOptions;
use crate::predicates::{as_corner_radii, as_stroke_weights, has_value, is_truthy};
use crate::prune::prune_empty;
use crate::types::{
    BoundingBox, ElementNode, SimplifiedNode, Size, StyleValue, TextStyle, VarId,
};
use crate::vars::{GlobalVarStore, VectorParentRecord};
use distill_data::model::{NodeType, Paint, RawNode, TypeStyle};
use serde_json::Value;

/// Simplifies raw nodes with a configurable layout builder.
pub struct Simplifier<'a> {
    options: &'a SimplifyOptions,
    layout: &'a dyn LayoutBuilder,
}

impl<'a> Simplifier<'a> {
    pub fn new(options: &'a SimplifyOptions) -> Self {
        Self {
            options,
            layout: &AutoLayoutBuilder,
        }
    }

    pub fn with_layout_builder(mut self, layout: &'a dyn LayoutBuilder) -> Self {
        self.layout = layout;
        self
    }

    pub fn options(&self) -> &SimplifyOptions {
        self.options
    }

    /// Simplifies `node` and its visible descendants. Returns `None` for a hidden node.
    pub fn simplify_node(
        &self,
        store: &mut GlobalVarStore,
        node: &RawNode,
        parent: Option<&RawNode>,
    ) -> Result<Option<SimplifiedNode>, SimplifyError> {
        self.walk(store, node, parent, 0)
    }

    fn walk(
        &self,
        store: &mut GlobalVarStore,
        node: &RawNode,
        parent: Option<&RawNode>,
        depth: usize,
    ) -> Result<Option<SimplifiedNode>, SimplifyError> {
        if !node.is_visible() {
            return Ok(None);
        }

        let mut out = ElementNode {
            id: node.id.clone(),
            name: Some(node.name.clone()).filter(|n| !n.is_empty()),
            node_type: node.kind.as_str().to_string(),
            ..Default::default()
        };
        let geometry = &node.geometry;

        // Registered only when a canonical field survives normalization.
        let style = node.text.style.as_ref().map(text_style);
        if let Some(style) = style.filter(|s| *s != TextStyle::default()) {
            out.text_style = Some(store.find_or_create(StyleValue::Text(style), "style")?);
        }

        out.fills = register_paints(store, node, geometry.fills.as_ref(), "fill")?;
        out.strokes = register_paints(store, node, geometry.strokes.as_ref(), "stroke")?;
        if out.strokes.is_some() {
            out.stroke_weight = geometry.stroke_weight;
            if has_value(geometry.stroke_dashes.as_ref(), |d| !d.is_empty()) {
                out.stroke_dashes = geometry.stroke_dashes.clone();
            }
        }

        let effects = build_effects(node);
        if !effects.is_empty() {
            out.effects = Some(store.find_or_create(StyleValue::Effects(effects), "effect")?);
        }

        if let Some(opacity) = geometry.opacity.filter(|o| *o != 1.0) {
            out.opacity = Some(opacity);
        }

        out.border_radius = border_radius(node);

        if let Some(weights) = geometry.individual_stroke_weights.as_ref().and_then(as_stroke_weights) {
            out.individual_stroke_weights =
                Some(store.find_or_create(StyleValue::StrokeWeights(weights), "weight")?);
        }

        let layout = self.layout.build(node, parent);
        if layout.field_count() > 1 {
            out.layout = Some(store.find_or_create(StyleValue::Layout(layout), "layout")?);
        }

        if is_truthy(node.text.characters.as_ref()) {
            out.text = node.text.characters.clone();
        }

        out.styles = geometry.styles.clone().filter(|s| !s.is_empty());

        if self.options.include_bounding_box {
            out.bounding_box = geometry.absolute_bounding_box.map(|b| BoundingBox {
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
            });
        }

        if self.options.max_depth.map_or(true, |max| depth < max) {
            for child in &node.children {
                if let Some(simplified) = self.walk(store, child, Some(node), depth + 1)? {
                    out.children.push(simplified);
                }
            }
        }

        if node.kind == NodeType::Vector {
            let children_id = store.find_or_create(StyleValue::Vector(vector_payload(&out)?), "vector")?;
            if let Some(parent) = parent {
                store.record_vector_parent(VectorParentRecord {
                    parent_id: parent.id.clone(),
                    parent_name: parent.name.clone(),
                    parent_type: parent.kind.as_str().to_string(),
                    children_id,
                    parent_size: parent.geometry.absolute_bounding_box.map(|b| Size {
                        width: b.width,
                        height: b.height,
                    }),
                });
            }
        }

        Ok(Some(SimplifiedNode::Element(out)))
    }
}

/// Simplifies one node with the default layout builder.
pub fn simplify_node(
    store: &mut GlobalVarStore,
    node: &RawNode,
    parent: Option<&RawNode>,
    options: &SimplifyOptions,
) -> Result<Option<SimplifiedNode>, SimplifyError> {
    Simplifier::new(options).simplify_node(store, node, parent)
}

fn text_style(style: &TypeStyle) -> TextStyle {
    TextStyle {
        font_family: style.font_family.clone(),
        font_weight: style.font_weight,
        font_size: style.font_size,
        line_height: style.line_height_px.or(style.font_size),
        letter_spacing: style.letter_spacing.filter(|ls| *ls != 0.0),
        text_case: style.text_case.clone(),
        text_align_horizontal: style.text_align_horizontal.clone(),
        text_align_vertical: style.text_align_vertical.clone(),
    }
}

/// Registers a non-empty paint list as one variable; order is significant.
fn register_paints(
    store: &mut GlobalVarStore,
    node: &RawNode,
    paints: Option<&Vec<Paint>>,
    category: &str,
) -> Result<Option<VarId>, SimplifyError> {
    let Some(paints) = paints.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let simplified = parse_paints(paints).map_err(|source| SimplifyError::Paint {
        node_id: node.id.clone(),
        source,
    })?;
    if simplified.is_empty() {
        return Ok(None);
    }
    Ok(Some(store.find_or_create(StyleValue::Paints(simplified), category)?))
}

fn border_radius(node: &RawNode) -> Option<String> {
    let geometry = &node.geometry;
    if let Some([tl, tr, br, bl]) = geometry.rectangle_corner_radii.as_ref().and_then(as_corner_radii) {
        return Some(format!("{}px {}px {}px {}px", tl, tr, br, bl));
    }
    if is_truthy(geometry.corner_radius.as_ref()) {
        return geometry.corner_radius.map(|r| format!("{}px", r));
    }
    None
}

/// The vector's content identity: its simplified form without placement.
fn vector_payload(node: &ElementNode) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(node)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
        map.remove("boundingBox");
    }
    Ok(prune_empty(value))
}
