#![recursion_limit = "256"]

use design_distill::{simplify_str, simplify_value, SimplifyOptions};
use serde_json::{json, Value};

fn landing_page() -> Value {
    json!({
        "name": "Landing",
        "lastModified": "2024-03-01T12:00:00Z",
        "thumbnailUrl": "https://example.com/thumb.png",
        "version": "42",
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "name": "Page 1",
                "type": "CANVAS",
                "children": [{
                    "id": "1:1",
                    "name": "Hero",
                    "type": "FRAME",
                    "clipsContent": true,
                    "layoutMode": "HORIZONTAL",
                    "primaryAxisAlignItems": "SPACE_BETWEEN",
                    "counterAxisAlignItems": "CENTER",
                    "itemSpacing": 24,
                    "paddingTop": 32, "paddingRight": 48, "paddingBottom": 32, "paddingLeft": 48,
                    "absoluteBoundingBox": { "x": 0, "y": 0, "width": 1440, "height": 600 },
                    "fills": [{
                        "type": "GRADIENT_LINEAR",
                        "gradientHandlePositions": [{ "x": 0, "y": 0 }, { "x": 1, "y": 1 }],
                        "gradientStops": [
                            { "position": 0, "color": { "r": 1, "g": 1, "b": 1, "a": 1 } },
                            { "position": 1, "color": { "r": 0, "g": 0, "b": 0, "a": 1 } }
                        ]
                    }],
                    "effects": [{ "type": "DROP_SHADOW", "visible": true, "radius": 8,
                                  "color": { "r": 0, "g": 0, "b": 0, "a": 0.2 },
                                  "offset": { "x": 0, "y": 4 }, "spread": 0 }],
                    "children": [
                        {
                            "id": "1:2",
                            "name": "Headline",
                            "type": "TEXT",
                            "characters": "Build faster",
                            "style": { "fontFamily": "Inter", "fontWeight": 700, "fontSize": 48, "lineHeightPx": 56 },
                            "fills": [{ "type": "SOLID", "color": { "r": 0.1, "g": 0.1, "b": 0.1, "a": 1 } }]
                        },
                        {
                            "id": "1:3",
                            "name": "Logo",
                            "type": "GROUP",
                            "absoluteBoundingBox": { "x": 1300, "y": 280, "width": 40, "height": 40 },
                            "children": [{
                                "id": "1:4",
                                "name": "Mark",
                                "type": "VECTOR",
                                "fills": [{ "type": "SOLID", "color": { "r": 0.1, "g": 0.1, "b": 0.1, "a": 1 } }]
                            }]
                        },
                        { "id": "1:5", "name": "Draft", "type": "TEXT", "visible": false, "characters": "TODO" }
                    ]
                }]
            }]
        }
    })
}

#[test]
fn landing_page_end_to_end() {
    let design = simplify_value(landing_page(), &SimplifyOptions::default()).unwrap();
    let value = design.to_json_value().unwrap();

    assert_eq!(value["name"], "Landing");
    assert_eq!(value["lastModified"], "2024-03-01T12:00:00Z");
    assert_eq!(value["thumbnailUrl"], "https://example.com/thumb.png");

    let canvas = &value["nodes"][0];
    assert_eq!(canvas["type"], "CANVAS");
    let hero = &canvas["children"][0];
    assert_eq!(hero["id"], "1:1");
    assert_eq!(hero["children"].as_array().unwrap().len(), 2);

    let vars = &value["globalVars"];
    let layout = &vars[hero["layout"].as_str().unwrap()];
    assert_eq!(layout["mode"], "row");
    assert_eq!(layout["justifyContent"], "space-between");
    assert_eq!(layout["alignItems"], "center");
    assert_eq!(layout["gap"], "24px");
    assert_eq!(layout["padding"], "32px 48px");

    let fills = &vars[hero["fills"].as_str().unwrap()];
    assert_eq!(fills[0]["type"], "GRADIENT_LINEAR");
    let effects = &vars[hero["effects"].as_str().unwrap()];
    assert_eq!(effects["boxShadow"], "0px 4px 8px 0px rgba(0, 0, 0, 0.2)");

    let headline = &hero["children"][0];
    assert_eq!(headline["text"], "Build faster");
    let style = &vars[headline["textStyle"].as_str().unwrap()];
    assert_eq!(style["lineHeight"], 56.0);

    // Headline and vector share one solid fill variable.
    let logo = &hero["children"][1];
    assert_eq!(logo["type"], "IMAGE");
    assert_eq!(logo["size"], json!({ "width": 40.0, "height": 40.0 }));
    let groups = vars["childrenToParents"].as_object().unwrap();
    assert_eq!(groups.len(), 1);
    let (content_id, parents) = groups.iter().next().unwrap();
    assert_eq!(parents, &json!(["1:3"]));
    assert_eq!(logo["fills"][0]["imageRef"], Value::String(format!("images/{}.png", content_id)));

    assert!(!value.to_string().contains("1:5"));
}

#[test]
fn output_has_no_empty_collections() {
    fn check(value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, v) in map {
                    if key != "childrenToParents" {
                        let empty = matches!(v, Value::Array(a) if a.is_empty())
                            || matches!(v, Value::Object(o) if o.is_empty());
                        assert!(!empty, "empty value under {}", key);
                    }
                    check(v);
                }
            }
            Value::Array(items) => items.iter().for_each(check),
            _ => {}
        }
    }

    let design = simplify_value(landing_page(), &SimplifyOptions::default()).unwrap();
    check(&design.to_json_value().unwrap()["nodes"]);
}

#[test]
fn invalid_document_is_rejected() {
    let err = simplify_value(json!({ "name": "x" }), &SimplifyOptions::default()).unwrap_err();
    assert!(matches!(err, design_distill::SimplifyError::Serialization(_)));
}

#[test]
fn deep_documents_honour_max_depth() {
    let mut node = json!({ "id": "leaf", "type": "RECTANGLE" });
    for i in (0..100).rev() {
        node = json!({ "id": format!("g{}", i), "type": "GROUP", "children": [node] });
    }
    let raw = json!({
        "name": "Deep",
        "lastModified": "2024-01-01T00:00:00Z",
        "document": { "id": "0:0", "type": "DOCUMENT", "children": [node] }
    });

    let options = SimplifyOptions { max_depth: Some(2), ..Default::default() };
    let from_text = simplify_str(&raw.to_string(), &options).unwrap();
    let from_value = simplify_value(raw, &options).unwrap();
    assert_eq!(from_text, from_value);
    assert!(from_text.find_node("g2").unwrap().children().is_empty());
    assert!(from_text.find_node("g3").is_none());
}
