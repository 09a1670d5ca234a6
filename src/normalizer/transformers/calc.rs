//! Helpers shared by calculated-field definitions.

use crate::normalizer::models::NormalizedRecord;
use crate::normalizer::processors::cleaner::number_value;
use serde_json::Value;

/// Numeric value of a field; `None` for null, missing or non-numeric
pub fn number(record: &NormalizedRecord, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_f64)
}

pub fn difference(record: &NormalizedRecord, minuend: &str, subtrahend: &str) -> Option<Value> {
    Some(number_value(number(record, minuend)? - number(record, subtrahend)?))
}

pub fn sum(record: &NormalizedRecord, left: &str, right: &str) -> Option<Value> {
    Some(number_value(number(record, left)? + number(record, right)?))
}

/// `numerator / denominator`, null when the denominator is zero
pub fn ratio(record: &NormalizedRecord, numerator: &str, denominator: &str) -> Option<Value> {
    let denominator = number(record, denominator)?;
    if denominator == 0.0 {
        return None;
    }
    Some(number_value(number(record, numerator)? / denominator))
}

/// 1 above zero, 0 at zero, -1 below
pub fn outcome(value: f64) -> Value {
    if value > 0.0 {
        Value::from(1)
    } else if value < 0.0 {
        Value::from(-1)
    } else {
        Value::from(0)
    }
}

/// Non-empty string value of a field
pub fn text<'a>(record: &'a NormalizedRecord, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> NormalizedRecord {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_arithmetic_helpers() {
        let r = record(json!({"a": 75, "b": 70, "c": null, "d": "x", "z": 0}));
        assert_eq!(difference(&r, "a", "b"), Some(json!(5)));
        assert_eq!(sum(&r, "a", "b"), Some(json!(145)));
        assert_eq!(difference(&r, "a", "c"), None);
        assert_eq!(sum(&r, "a", "d"), None);
        assert_eq!(difference(&r, "a", "missing"), None);
        assert_eq!(ratio(&r, "b", "z"), None);
        assert_eq!(ratio(&r, "a", "a"), Some(json!(1)));
    }

    #[test]
    fn test_outcome() {
        assert_eq!(outcome(3.5), json!(1));
        assert_eq!(outcome(0.0), json!(0));
        assert_eq!(outcome(-0.5), json!(-1));
    }

    #[test]
    fn test_text_skips_blank() {
        let r = record(json!({"city": "Durham", "state": "  ", "n": 3}));
        assert_eq!(text(&r, "city"), Some("Durham"));
        assert_eq!(text(&r, "state"), None);
        assert_eq!(text(&r, "n"), None);
    }
}
