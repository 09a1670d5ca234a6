//! Scalar cleaning: null sentinel handling plus numeric and boolean coercion.
//!
//! Every function here is pure and total; a value that cannot be coerced is
//! either returned unchanged (numeric) or mapped to null (boolean).

use crate::constants::NULL_SENTINEL;
use crate::normalizer::models::{FieldRule, FlatRecord};
use serde_json::{Number, Value};

/// Maps the exact string `"NULL"` to `null`; every other value passes through.
pub fn clean_null(value: Value) -> Value {
    match value {
        Value::String(text) if text == NULL_SENTINEL => Value::Null,
        other => other,
    }
}

/// Parses a string holding an integer or a finite float.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is not
/// unambiguously a number, including `"inf"` and `"NaN"`.
pub fn parse_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => Number::from_f64(float).map(Value::Number),
        _ => None,
    }
}

/// Numeric coercion: numeric strings become numbers, everything else is returned unchanged.
pub fn coerce_numeric(value: Value) -> Value {
    match value {
        Value::String(text) => parse_number(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

/// Boolean coercion.
///
/// Native booleans pass through, `"true"`/`"false"` (any case) map to booleans,
/// and everything else maps to null. Unknown is never reported as `false`.
pub fn coerce_bool(value: Value) -> Value {
    match value {
        Value::Bool(flag) => Value::Bool(flag),
        Value::String(text) if text.eq_ignore_ascii_case("true") => Value::Bool(true),
        Value::String(text) if text.eq_ignore_ascii_case("false") => Value::Bool(false),
        _ => Value::Null,
    }
}

/// Full cleaning of one value: sentinel first, then the field's coercion rule.
pub fn clean_value(value: Value, rule: FieldRule) -> Value {
    let value = clean_null(value);
    match rule {
        FieldRule::Passthrough => value,
        FieldRule::Numeric => coerce_numeric(value),
        FieldRule::Boolean => coerce_bool(value),
    }
}

/// Applies the null sentinel rule to every value of a flat record.
///
/// Opaque containers left behind by the flattener are cleaned recursively.
pub fn clean_record(record: FlatRecord) -> FlatRecord {
    record
        .into_iter()
        .map(|(key, value)| (key, clean_nested(value)))
        .collect()
}

fn clean_nested(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(clean_nested).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, clean_nested(value)))
                .collect(),
        ),
        scalar => clean_null(scalar),
    }
}

/// Builds a JSON number, preferring an integer when the float is whole.
pub fn number_value(float: f64) -> Value {
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Value::from(float as i64)
    } else {
        Number::from_f64(float).map_or(Value::Null, Value::Number)
    }
}
