//! Boundary helpers that narrow optional raw fields before they are read.

use crate::types::StrokeWeights;
use serde_json::Value;

/// Values with a notion of "meaningful content".
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.is_truthy()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// True when the field is present and satisfies `predicate`.
pub fn has_value<T>(field: Option<&T>, predicate: impl FnOnce(&T) -> bool) -> bool {
    field.is_some_and(predicate)
}

/// Shorthand for `has_value(field, Truthy::is_truthy)`.
pub fn is_truthy<T: Truthy>(field: Option<&T>) -> bool {
    has_value(field, T::is_truthy)
}

/// Accepts `{ top, right, bottom, left }` when all four sides are numbers.
pub fn as_stroke_weights(value: &Value) -> Option<StrokeWeights> {
    let side = |key: &str| value.get(key).and_then(Value::as_f64);
    Some(StrokeWeights {
        top: side("top")?,
        right: side("right")?,
        bottom: side("bottom")?,
        left: side("left")?,
    })
}

/// Accepts an array of exactly four numbers (top-left, top-right, bottom-right, bottom-left).
pub fn as_corner_radii(value: &Value) -> Option<[f64; 4]> {
    match value.as_array()?.as_slice() {
        [a, b, c, d] => Some([a.as_f64()?, b.as_f64()?, c.as_f64()?, d.as_f64()?]),
        _ => None,
    }
}
