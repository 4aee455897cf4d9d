//! # Layout Builder
//!
//! Derives a flexbox-like layout abstraction from a raw node's auto-layout
//! and geometry properties.
//!
//! ## Responsibilities
//! - **Container values**: direction, alignment, wrap, gap, padding, overflow.
//! - **Item values**: sizing, absolute positioning, location relative to parent, fixed dimensions.
//!
//! ## Key Types
//! - `LayoutBuilder`: Pluggable seam; the walker only sees this trait.
//! - `AutoLayoutBuilder`: Default implementation.
//! - `SimplifiedLayout`: The emitted layout record.

use crate::color::round2;
use crate::predicates::{has_value, is_truthy};
use distill_data::model::RawNode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    None,
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexAlign {
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    Baseline,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    Fixed,
    Fill,
    Hug,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl Dimensions {
    fn is_empty(&self) -> bool {
        *self == Dimensions::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Sizing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<SizingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<SizingMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedLayout {
    pub mode: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<FlexAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<FlexAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_self: Option<FlexAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relative_to_parent: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<Sizing>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overflow_scroll: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl SimplifiedLayout {
    /// Number of fields that would be emitted, `mode` included.
    pub fn field_count(&self) -> usize {
        1 + [
            self.justify_content.is_some(),
            self.align_items.is_some(),
            self.align_self.is_some(),
            self.wrap.is_some(),
            self.gap.is_some(),
            self.location_relative_to_parent.is_some(),
            self.dimensions.is_some(),
            self.padding.is_some(),
            self.sizing.is_some(),
            !self.overflow_scroll.is_empty(),
            self.position.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Produces the layout abstraction of a node given its (optional) parent.
pub trait LayoutBuilder: Send + Sync {
    fn build(&self, node: &RawNode, parent: Option<&RawNode>) -> SimplifiedLayout;
}

/// Maps auto-layout frames onto flexbox terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoLayoutBuilder;

impl LayoutBuilder for AutoLayoutBuilder {
    fn build(&self, node: &RawNode, parent: Option<&RawNode>) -> SimplifiedLayout {
        let mut layout = frame_values(node);
        item_values(node, parent, &mut layout);
        layout
    }
}

// A frame is anything that can clip its content.
fn is_frame(node: &RawNode) -> bool {
    node.layout.clips_content.is_some()
}

fn is_absolute(node: &RawNode) -> bool {
    node.layout.layout_positioning.as_deref() == Some("ABSOLUTE")
}

fn layout_mode(node: &RawNode) -> LayoutMode {
    match node.layout.layout_mode.as_deref() {
        Some("HORIZONTAL") => LayoutMode::Row,
        Some("VERTICAL") => LayoutMode::Column,
        _ => LayoutMode::None,
    }
}

fn in_auto_layout_flow(node: &RawNode, parent: &RawNode) -> bool {
    is_frame(parent) && layout_mode(parent) != LayoutMode::None && !is_absolute(node)
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Primary,
    Counter,
}

/// `stretch` when every child fills along the axis direction (absolute children don't count against it).
fn children_stretch(node: &RawNode, axis: Axis, mode: LayoutMode) -> bool {
    let horizontal = matches!(
        (axis, mode),
        (Axis::Primary, LayoutMode::Row) | (Axis::Counter, LayoutMode::Column)
    );
    !node.children.is_empty()
        && node.children.iter().all(|child| {
            if is_absolute(child) {
                return true;
            }
            let sizing = if horizontal {
                &child.layout.layout_sizing_horizontal
            } else {
                &child.layout.layout_sizing_vertical
            };
            sizing.as_deref() == Some("FILL")
        })
}

fn convert_align(node: &RawNode, align: Option<&str>, axis: Axis, mode: LayoutMode) -> Option<FlexAlign> {
    if mode != LayoutMode::None && children_stretch(node, axis, mode) {
        return Some(FlexAlign::Stretch);
    }
    match align.unwrap_or("MIN") {
        "MAX" => Some(FlexAlign::FlexEnd),
        "CENTER" => Some(FlexAlign::Center),
        "SPACE_BETWEEN" => Some(FlexAlign::SpaceBetween),
        "BASELINE" => Some(FlexAlign::Baseline),
        // MIN is the default start alignment.
        _ => None,
    }
}

fn convert_self_align(align: Option<&str>) -> Option<FlexAlign> {
    match align? {
        "MAX" => Some(FlexAlign::FlexEnd),
        "CENTER" => Some(FlexAlign::Center),
        "STRETCH" => Some(FlexAlign::Stretch),
        _ => None,
    }
}

fn convert_sizing(sizing: Option<&str>) -> Option<SizingMode> {
    match sizing? {
        "FIXED" => Some(SizingMode::Fixed),
        "FILL" => Some(SizingMode::Fill),
        "HUG" => Some(SizingMode::Hug),
        _ => None,
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

/// CSS box shorthand (`8px`, `8px 4px`, `8px 4px 2px`, `8px 4px 2px 1px`); all-zero yields `None`.
pub fn css_shorthand(top: f64, right: f64, bottom: f64, left: f64) -> Option<String> {
    if top == 0.0 && right == 0.0 && bottom == 0.0 && left == 0.0 {
        return None;
    }
    let shorthand = if top == right && right == bottom && bottom == left {
        px(top)
    } else if right == left {
        if top == bottom {
            format!("{} {}", px(top), px(right))
        } else {
            format!("{} {} {}", px(top), px(right), px(bottom))
        }
    } else {
        format!("{} {} {} {}", px(top), px(right), px(bottom), px(left))
    };
    Some(shorthand)
}

fn frame_values(node: &RawNode) -> SimplifiedLayout {
    if !is_frame(node) {
        return SimplifiedLayout::default();
    }
    let props = &node.layout;
    let mode = layout_mode(node);
    let mut layout = SimplifiedLayout {
        mode,
        ..Default::default()
    };

    if let Some(direction) = props.overflow_direction.as_deref() {
        if direction.contains("HORIZONTAL") {
            layout.overflow_scroll.push("x".to_string());
        }
        if direction.contains("VERTICAL") {
            layout.overflow_scroll.push("y".to_string());
        }
    }

    if mode == LayoutMode::None {
        return layout;
    }

    layout.justify_content = convert_align(node, props.primary_axis_align_items.as_deref(), Axis::Primary, mode);
    layout.align_items = convert_align(node, props.counter_axis_align_items.as_deref(), Axis::Counter, mode);
    layout.align_self = convert_self_align(props.layout_align.as_deref());
    layout.wrap = (props.layout_wrap.as_deref() == Some("WRAP")).then_some(true);
    if is_truthy(props.item_spacing.as_ref()) {
        layout.gap = props.item_spacing.map(px);
    }

    let paddings = [
        props.padding_top,
        props.padding_right,
        props.padding_bottom,
        props.padding_left,
    ];
    if paddings.iter().any(|p| is_truthy(p.as_ref())) {
        let [top, right, bottom, left] = paddings.map(|p| p.unwrap_or(0.0));
        layout.padding = css_shorthand(top, right, bottom, left);
    }
    layout
}

fn item_values(node: &RawNode, parent: Option<&RawNode>, layout: &mut SimplifiedLayout) {
    let Some(bounds) = node.geometry.absolute_bounding_box else {
        return;
    };
    let props = &node.layout;

    let sizing = Sizing {
        horizontal: convert_sizing(props.layout_sizing_horizontal.as_deref()),
        vertical: convert_sizing(props.layout_sizing_vertical.as_deref()),
    };
    if sizing != Sizing::default() {
        layout.sizing = Some(sizing);
    }

    if let Some(parent) = parent.filter(|p| is_frame(p) && !in_auto_layout_flow(node, p)) {
        if is_absolute(node) {
            layout.position = Some("absolute".to_string());
        }
        if let Some(parent_bounds) = parent.geometry.absolute_bounding_box {
            layout.location_relative_to_parent = Some(Point {
                x: round2(bounds.x - parent_bounds.x),
                y: round2(bounds.y - parent_bounds.y),
            });
        }
    }

    let fixed = |sizing: &Option<String>| sizing.as_deref() == Some("FIXED");
    let grows = has_value(props.layout_grow.as_ref(), |g| *g != 0.0);
    let stretched = props.layout_align.as_deref() == Some("STRETCH");

    let mut dimensions = Dimensions::default();
    match layout.mode {
        LayoutMode::Row => {
            if !grows && fixed(&props.layout_sizing_horizontal) {
                dimensions.width = Some(bounds.width);
            }
            if !stretched && fixed(&props.layout_sizing_vertical) {
                dimensions.height = Some(bounds.height);
            }
        }
        LayoutMode::Column => {
            if !stretched && fixed(&props.layout_sizing_horizontal) {
                dimensions.width = Some(bounds.width);
            }
            if !grows && fixed(&props.layout_sizing_vertical) {
                dimensions.height = Some(bounds.height);
            }
            if props.preserve_ratio == Some(true) && bounds.height != 0.0 {
                dimensions.aspect_ratio = Some(round2(bounds.width / bounds.height));
            }
        }
        LayoutMode::None => {
            if props.layout_sizing_horizontal.is_none() || fixed(&props.layout_sizing_horizontal) {
                dimensions.width = Some(bounds.width);
            }
            if props.layout_sizing_vertical.is_none() || fixed(&props.layout_sizing_vertical) {
                dimensions.height = Some(bounds.height);
            }
        }
    }
    dimensions.width = dimensions.width.map(round2);
    dimensions.height = dimensions.height.map(round2);
    if !dimensions.is_empty() {
        layout.dimensions = Some(dimensions);
    }
}
