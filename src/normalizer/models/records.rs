use serde_json::{Map, Value};

/// A decoded API record: string keys, arbitrarily nested values, source key order preserved.
pub type RawRecord = Map<String, Value>;

/// Single-level record keyed by joined paths (e.g. `homeTeam.name`).
///
/// Values are scalars, or opaque containers where flattening stopped
/// (depth limit, unexpanded sequences).
pub type FlatRecord = Map<String, Value>;

/// Logical field name to cleaned scalar (or `Value::Null`).
pub type NormalizedRecord = Map<String, Value>;

/// Outcome of resolving a logical field against a record.
///
/// Keeps "absent from the source" apart from "present but null", which both
/// collapse to `Value::Null` once a record is normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Present(Value),
    Missing,
}

impl Resolved {
    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing)
    }

    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    /// True for a present `null` as well as for a missing field
    pub fn is_null_or_missing(&self) -> bool {
        matches!(self, Resolved::Missing | Resolved::Present(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Present(value) => Some(value),
            Resolved::Missing => None,
        }
    }

    /// Collapses to a plain value, missing becoming `null`
    pub fn into_value(self) -> Value {
        match self {
            Resolved::Present(value) => value,
            Resolved::Missing => Value::Null,
        }
    }
}

impl From<Option<&Value>> for Resolved {
    fn from(value: Option<&Value>) -> Self {
        value.map_or(Resolved::Missing, |v| Resolved::Present(v.clone()))
    }
}
