//! FILENAME: core/cube-format/src/field.rs
//! Reading descriptor fields out of JSON items.
//!
//! Items come from user uploads, so nothing here fails: a missing or oddly
//! typed field becomes `CubeValue::Empty` (dimensions) or `None` (measures).

use cube_engine::CubeValue;
use serde_json::Value;

/// Looks up `field` as an exact key first, then as a dot-separated path
/// into nested objects.
pub fn lookup_field<'a>(item: &'a Value, field: &str) -> Option<&'a Value> {
    let object = item.as_object()?;
    if let Some(value) = object.get(field) {
        return Some(value);
    }
    if !field.contains('.') {
        return None;
    }
    field
        .split('.')
        .try_fold(item, |current, part| current.as_object()?.get(part))
}

/// Dimension value of a JSON field.
pub fn json_to_cube_value(value: Option<&Value>) -> CubeValue {
    match value {
        None | Some(Value::Null) => CubeValue::Empty,
        Some(Value::Bool(b)) => CubeValue::Boolean(*b),
        Some(Value::Number(n)) => n.as_f64().map_or(CubeValue::Empty, CubeValue::number),
        Some(Value::String(s)) => CubeValue::Text(s.clone()),
        Some(other) => CubeValue::Text(other.to_string()),
    }
}

/// Measure value of a JSON field: numbers, or strings that parse as numbers.
pub fn json_to_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
