//! Structure flattening: nested records to single-level path-keyed records.

use crate::constants::DEFAULT_FLATTEN_SEPARATOR;
use crate::error::AppError;
use crate::normalizer::models::{FlatRecord, RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What to do when two distinct paths join to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// The value written last in traversal order is kept
    #[default]
    LastWriteWins,
    /// Flattening fails with [`AppError::KeyCollision`]
    Error,
}

/// Options controlling [`flatten`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    pub separator: String,
    /// Expand sequences into indexed paths (`players.0.name`); otherwise keep them opaque
    pub expand_sequences: bool,
    /// Number of container levels to descend; deeper structure is kept as an opaque value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_limit: Option<usize>,
    pub collision_mode: CollisionMode,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_FLATTEN_SEPARATOR.to_string(),
            expand_sequences: true,
            depth_limit: None,
            collision_mode: CollisionMode::default(),
        }
    }
}

impl FlattenOptions {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_expand_sequences(mut self, expand: bool) -> Self {
        self.expand_sequences = expand;
        self
    }

    pub fn with_depth_limit(mut self, limit: Option<usize>) -> Self {
        self.depth_limit = limit;
        self
    }

    pub fn with_collision_mode(mut self, mode: CollisionMode) -> Self {
        self.collision_mode = mode;
        self
    }

    /// Joins a parent path and a child segment with the configured separator
    pub fn join(&self, parent: &str, segment: &str) -> String {
        if parent.is_empty() {
            segment.to_string()
        } else {
            format!("{parent}{}{segment}", self.separator)
        }
    }

    fn may_descend(&self, depth: usize) -> bool {
        self.depth_limit.is_none_or(|limit| depth < limit)
    }
}

/// Flattens a record into a [`FlatRecord`].
///
/// Keys are visited in source order. Nested mappings always recurse (within
/// the depth limit); sequences recurse with positional indices when
/// `expand_sequences` is set. Empty mappings and empty expanded sequences
/// contribute no keys, while `null` leaves keep their key.
///
/// # Errors
/// Only in [`CollisionMode::Error`], when two paths join to the same key.
///
/// # Examples
/// ```
/// use cbbd_normalizer::normalizer::processors::flattener::{flatten, FlattenOptions};
/// use serde_json::json;
///
/// let raw = json!({"homeTeam": {"name": "Duke"}, "players": [{"name": "A"}]});
/// let flat = flatten(raw.as_object().unwrap(), &FlattenOptions::default()).unwrap();
/// assert_eq!(flat["homeTeam.name"], json!("Duke"));
/// assert_eq!(flat["players.0.name"], json!("A"));
/// ```
pub fn flatten(record: &RawRecord, options: &FlattenOptions) -> Result<FlatRecord, AppError> {
    let mut out = FlatRecord::new();
    for (key, value) in record {
        flatten_into(&mut out, key.clone(), value, 0, options)?;
    }
    Ok(out)
}

/// Flattens any decoded JSON value, rejecting non-mappings with a shape error.
pub fn flatten_value(value: &Value, options: &FlattenOptions) -> Result<FlatRecord, AppError> {
    match value {
        Value::Object(record) => flatten(record, options),
        other => Err(AppError::shape_error(format!(
            "expected a JSON object, found {}",
            value_kind(other)
        ))),
    }
}

fn flatten_into(
    out: &mut FlatRecord,
    path: String,
    value: &Value,
    depth: usize,
    options: &FlattenOptions,
) -> Result<(), AppError> {
    match value {
        Value::Object(map) if options.may_descend(depth) => {
            for (key, child) in map {
                flatten_into(out, options.join(&path, key), child, depth + 1, options)?;
            }
            Ok(())
        }
        Value::Array(items) if options.expand_sequences && options.may_descend(depth) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(
                    out,
                    options.join(&path, &index.to_string()),
                    child,
                    depth + 1,
                    options,
                )?;
            }
            Ok(())
        }
        leaf => insert(out, path, leaf.clone(), options.collision_mode),
    }
}

fn insert(
    out: &mut FlatRecord,
    key: String,
    value: Value,
    mode: CollisionMode,
) -> Result<(), AppError> {
    if out.contains_key(&key) {
        match mode {
            CollisionMode::Error => return Err(AppError::key_collision(key)),
            CollisionMode::LastWriteWins => {
                tracing::debug!("Flattened key collision at '{key}', keeping last value");
            }
        }
    }
    out.insert(key, value);
    Ok(())
}

/// Human-readable name of a JSON value's type, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Counts the scalar leaves reachable in a value, descending into every container.
pub fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::Array(items) => items.iter().map(count_leaves).sum(),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_flatten_nested_mappings_preserve_order() {
        let raw = object(json!({
            "id": 1,
            "homeTeam": {"id": 150, "name": "Duke", "conference": "ACC"},
            "season": 2024
        }));
        let flat = flatten(&raw, &FlattenOptions::default()).unwrap();
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["id", "homeTeam.id", "homeTeam.name", "homeTeam.conference", "season"]
        );
    }

    #[test]
    fn test_flatten_expands_sequences_with_index() {
        let raw = object(json!({
            "players": [{"name": "Cooper Flagg"}, {"name": "Kon Knueppel"}],
            "homeLineScores": [40, 35]
        }));
        let flat = flatten(&raw, &FlattenOptions::default()).unwrap();
        assert_eq!(flat["players.0.name"], json!("Cooper Flagg"));
        assert_eq!(flat["players.1.name"], json!("Kon Knueppel"));
        assert_eq!(flat["homeLineScores.0"], json!(40));
        assert_eq!(flat["homeLineScores.1"], json!(35));
    }

    #[test]
    fn test_flatten_keeps_sequences_opaque_when_not_expanding() {
        let raw = object(json!({"homeLineScores": [40, 35], "team": {"name": "Duke"}}));
        let options = FlattenOptions::default().with_expand_sequences(false);
        let flat = flatten(&raw, &options).unwrap();
        assert_eq!(flat["homeLineScores"], json!([40, 35]));
        assert_eq!(flat["team.name"], json!("Duke"));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_flatten_custom_separator() {
        let raw = object(json!({"hometown": {"city": "Newport", "state": "ME"}}));
        let options = FlattenOptions::default().with_separator("_");
        let flat = flatten(&raw, &options).unwrap();
        assert_eq!(flat["hometown_city"], json!("Newport"));
        assert_eq!(flat["hometown_state"], json!("ME"));
    }

    #[test]
    fn test_flatten_depth_limit_retains_substructure() {
        let raw = object(json!({
            "game": {"venue": {"name": "Cameron Indoor", "capacity": 9314}},
            "id": 7
        }));

        let flat = flatten(&raw, &FlattenOptions::default().with_depth_limit(Some(1))).unwrap();
        assert_eq!(
            flat["game.venue"],
            json!({"name": "Cameron Indoor", "capacity": 9314})
        );
        assert_eq!(flat["id"], json!(7));

        let flat = flatten(&raw, &FlattenOptions::default().with_depth_limit(Some(0))).unwrap();
        assert_eq!(flat["game"]["venue"]["capacity"], json!(9314));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_flatten_null_and_empty_substructures() {
        let raw = object(json!({"a": null, "b": {}, "c": [], "d": {"e": null}}));
        let flat = flatten(&raw, &FlattenOptions::default()).unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat["a"], Value::Null);
        assert_eq!(flat["d.e"], Value::Null);
        assert!(!flat.contains_key("b"));
        assert!(!flat.contains_key("c"));
    }

    #[test]
    fn test_flatten_collision_last_write_wins() {
        let raw = object(json!({"a.b": 1, "a": {"b": 2}}));
        let flat = flatten(&raw, &FlattenOptions::default()).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["a.b"], json!(2));
    }

    #[test]
    fn test_flatten_collision_error_mode() {
        let raw = object(json!({"a.b": 1, "a": {"b": 2}}));
        let options = FlattenOptions::default().with_collision_mode(CollisionMode::Error);
        let result = flatten(&raw, &options);
        assert!(matches!(result, Err(AppError::KeyCollision { ref key }) if key == "a.b"));
    }

    #[test]
    fn test_leaf_count_matches_flat_key_count() {
        let raw = json!({
            "id": 401,
            "homeTeam": {"id": 150, "name": "Duke", "mascot": null},
            "awayTeam": {"id": 153, "name": "North Carolina"},
            "homeLineScores": [40, 35],
            "notes": "NULL",
            "venue": {"location": {"city": "Durham", "state": "NC"}}
        });
        let flat = flatten_value(&raw, &FlattenOptions::default()).unwrap();
        assert_eq!(count_leaves(&raw), flat.len());
    }

    #[test]
    fn test_flatten_value_rejects_non_mappings() {
        for value in [json!([1, 2]), json!("game"), json!(3), Value::Null] {
            let result = flatten_value(&value, &FlattenOptions::default());
            assert!(matches!(result, Err(AppError::Shape { .. })), "{value}");
        }
    }

    #[test]
    fn test_flatten_options_deserialize_defaults() {
        let options: FlattenOptions = toml::from_str("separator = \"_\"").unwrap();
        assert_eq!(options.separator, "_");
        assert!(options.expand_sequences);
        assert_eq!(options.depth_limit, None);
        assert_eq!(options.collision_mode, CollisionMode::LastWriteWins);

        let options: FlattenOptions = toml::from_str("collision_mode = \"error\"").unwrap();
        assert_eq!(options.collision_mode, CollisionMode::Error);
    }
}
