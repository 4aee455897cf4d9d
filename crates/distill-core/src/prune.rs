//! Empty-key pruning for emitted JSON.

use serde_json::Value;

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Recursively drops object keys whose (pruned) value is an empty array or
/// an empty object. Arrays keep their length; scalars and `null` pass through.
///
/// Idempotent: `prune_empty(prune_empty(v)) == prune_empty(v)`.
pub fn prune_empty(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(prune_empty).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(key, value)| {
                    let value = prune_empty(value);
                    (!is_empty_container(&value)).then_some((key, value))
                })
                .collect(),
        ),
        scalar => scalar,
    }
}
