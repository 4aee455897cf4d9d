//! Shadow and blur effects as CSS-like strings.

use crate::color::format_rgba;
use crate::types::SimplifiedEffects;
use distill_data::model::{Color, Effect, NodeType, RawNode};

const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

fn shadow(effect: &Effect) -> String {
    let offset = effect.offset.unwrap_or_default();
    format!(
        "{}px {}px {}px {}px {}",
        offset.x,
        offset.y,
        effect.radius,
        effect.spread.unwrap_or(0.0),
        format_rgba(effect.color.as_ref().unwrap_or(&BLACK), 1.0)
    )
}

fn joined<'a>(
    effects: &'a [&'a Effect],
    kind: &'a str,
    render: impl Fn(&Effect) -> String + 'a,
) -> impl Iterator<Item = String> + 'a {
    effects
        .iter()
        .filter(move |e| e.kind == kind)
        .map(move |e| render(*e))
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Collapses the node's visible effects. Shadows land on `textShadow` for
/// text nodes and `boxShadow` for everything else.
pub fn build_effects(node: &RawNode) -> SimplifiedEffects {
    let visible: Vec<&Effect> = node
        .geometry
        .effects
        .iter()
        .flatten()
        .filter(|e| e.visible)
        .collect();
    if visible.is_empty() {
        return SimplifiedEffects::default();
    }

    let shadows: Vec<String> = joined(&visible, "DROP_SHADOW", shadow)
        .chain(joined(&visible, "INNER_SHADOW", |e| format!("inset {}", shadow(e))))
        .collect();
    let blur = |e: &Effect| format!("blur({}px)", e.radius);
    let filter: Vec<String> = joined(&visible, "LAYER_BLUR", blur).collect();
    let backdrop: Vec<String> = joined(&visible, "BACKGROUND_BLUR", blur).collect();

    let shadow = non_empty(shadows.join(", "));
    let (box_shadow, text_shadow) = if node.kind == NodeType::Text {
        (None, shadow)
    } else {
        (shadow, None)
    };

    SimplifiedEffects {
        box_shadow,
        text_shadow,
        filter: non_empty(filter.join(" ")),
        backdrop_filter: non_empty(backdrop.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_effects() {
        let n = node(json!({ "id": "1", "type": "FRAME" }));
        assert!(build_effects(&n).is_empty());
    }

    #[test]
    fn test_shadows_and_blurs() {
        let n = node(json!({
            "id": "1",
            "type": "RECTANGLE",
            "effects": [
                { "type": "DROP_SHADOW", "radius": 4, "spread": 1, "offset": { "x": 0, "y": 2 },
                  "color": { "r": 0, "g": 0, "b": 0, "a": 0.25 } },
                { "type": "INNER_SHADOW", "radius": 2, "offset": { "x": 1, "y": 1 },
                  "color": { "r": 1, "g": 1, "b": 1, "a": 1 } },
                { "type": "LAYER_BLUR", "radius": 8 },
                { "type": "BACKGROUND_BLUR", "radius": 16 },
                { "type": "LAYER_BLUR", "radius": 99, "visible": false }
            ]
        }));
        let effects = build_effects(&n);
        assert_eq!(
            effects.box_shadow.as_deref(),
            Some("0px 2px 4px 1px rgba(0, 0, 0, 0.25), inset 1px 1px 2px 0px rgba(255, 255, 255, 1)")
        );
        assert_eq!(effects.text_shadow, None);
        assert_eq!(effects.filter.as_deref(), Some("blur(8px)"));
        assert_eq!(effects.backdrop_filter.as_deref(), Some("blur(16px)"));
    }

    #[test]
    fn test_text_nodes_get_text_shadow() {
        let n = node(json!({
            "id": "1",
            "type": "TEXT",
            "effects": [{ "type": "DROP_SHADOW", "radius": 1, "offset": { "x": 1, "y": 1 } }]
        }));
        let effects = build_effects(&n);
        assert_eq!(effects.box_shadow, None);
        assert_eq!(effects.text_shadow.as_deref(), Some("1px 1px 1px 0px rgba(0, 0, 0, 1)"));
    }
}
