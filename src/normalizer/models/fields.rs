use super::records::NormalizedRecord;
use serde_json::Value;

/// Per-field cleaning override applied after the null sentinel is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldRule {
    #[default]
    Passthrough,
    /// Parse numeric strings into numbers
    Numeric,
    /// Native booleans and "true"/"false" strings; anything else becomes null
    Boolean,
}

/// A stable output field and the source keys it may arrive under.
///
/// Aliases are tried in declared order and the first key present in the record
/// wins, even when its value cleans to null. A `.` inside an alias denotes a
/// nested path and is joined with the configured flatten separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalField {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub rule: FieldRule,
}

impl LogicalField {
    pub const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            rule: FieldRule::Passthrough,
        }
    }

    pub const fn numeric(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            rule: FieldRule::Numeric,
        }
    }

    pub const fn boolean(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            rule: FieldRule::Boolean,
        }
    }
}

/// Derives a value from already-resolved fields of the same record.
/// Returning `None` yields a null cell.
pub type CalculationFn = fn(&NormalizedRecord) -> Option<Value>;

#[derive(Debug, Clone, Copy)]
pub struct CalculatedField {
    pub name: &'static str,
    pub compute: CalculationFn,
}

impl CalculatedField {
    pub const fn new(name: &'static str, compute: CalculationFn) -> Self {
        Self { name, compute }
    }
}

/// A sub-object (e.g. the home team of a game) whose fields are resolved
/// under a path prefix and emitted as `<output_prefix>_<field>`.
///
/// The first source prefix with any key present in the record is used.
#[derive(Debug, Clone, Copy)]
pub struct NestedObject {
    pub output_prefix: &'static str,
    pub source_prefixes: &'static [&'static str],
    pub fields: &'static [LogicalField],
}

/// A sequence of scalars (e.g. per-period points) spread into numbered
/// columns `<output_prefix>_1 .. <output_prefix>_n`.
#[derive(Debug, Clone, Copy)]
pub struct SequenceExpansion {
    pub output_prefix: &'static str,
    pub aliases: &'static [&'static str],
}
