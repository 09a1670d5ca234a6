//! Field resolution: a logical field's value across its declared alias spellings.

use crate::constants::ALIAS_PATH_SEPARATOR;
use crate::normalizer::models::{FlatRecord, RawRecord, Resolved};
use serde_json::Value;

/// Resolves aliases against a flattened record.
///
/// Aliases are tried in the caller's order and the first one present in the
/// record wins, whatever its value. Returns [`Resolved::Missing`] when none is present.
pub fn resolve_or_missing(record: &FlatRecord, aliases: &[&str], separator: &str) -> Resolved {
    aliases
        .iter()
        .find_map(|alias| lookup(record, &alias_key(alias, separator), separator))
        .into()
}

/// Like [`resolve_or_missing`] but collapses a missing field to `null`
pub fn resolve_or_null(record: &FlatRecord, aliases: &[&str], separator: &str) -> Value {
    resolve_or_missing(record, aliases, separator).into_value()
}

/// Like [`resolve_or_missing`] but only a scalar value wins.
///
/// An alias that lands on a container the flattener kept whole (depth limit,
/// unexpanded sequence) is passed over so a later path alias can reach a
/// scalar inside it. When every present alias holds a container the field is
/// present but resolves to `null`.
pub fn resolve_scalar_or_missing(record: &FlatRecord, aliases: &[&str], separator: &str) -> Resolved {
    first_scalar(
        aliases
            .iter()
            .map(|alias| lookup(record, &alias_key(alias, separator), separator)),
    )
}

/// Resolves scalar aliases under a path prefix, e.g. `homeTeam` + `name` → `homeTeam.name`.
pub fn resolve_prefixed_scalar(
    record: &FlatRecord,
    prefix: &str,
    aliases: &[&str],
    separator: &str,
) -> Resolved {
    let prefix = alias_key(prefix, separator);
    first_scalar(aliases.iter().map(|alias| {
        let key = format!("{prefix}{separator}{}", alias_key(alias, separator));
        lookup(record, &key, separator)
    }))
}

fn first_scalar<'a>(candidates: impl Iterator<Item = Option<&'a Value>>) -> Resolved {
    let mut container_seen = false;
    for value in candidates.flatten() {
        if value.is_object() || value.is_array() {
            container_seen = true;
        } else {
            return Resolved::Present(value.clone());
        }
    }
    if container_seen {
        Resolved::Present(Value::Null)
    } else {
        Resolved::Missing
    }
}

/// True when the record holds the prefix itself or any key under it
pub fn has_prefix(record: &FlatRecord, prefix: &str, separator: &str) -> bool {
    let prefix = alias_key(prefix, separator);
    let nested = format!("{prefix}{separator}");
    record
        .keys()
        .any(|key| key == &prefix || key.starts_with(&nested))
}

/// Resolves aliases against an unflattened record.
///
/// For each alias the literal top-level key is tried first (matching a key
/// that already looks flattened), then the alias is walked as a nested path.
/// A path may end on a sub-object, which is returned whole.
pub fn resolve_raw_or_missing(record: &RawRecord, aliases: &[&str]) -> Resolved {
    aliases
        .iter()
        .find_map(|alias| record.get(*alias).or_else(|| walk_path(record, alias)))
        .into()
}

/// Looks up a joined key, falling back into opaque containers the flattener
/// kept whole (depth limit, unexpanded sequences).
pub fn lookup<'a>(record: &'a FlatRecord, key: &str, separator: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(key) {
        return Some(value);
    }
    if separator.is_empty() {
        return None;
    }
    let mut end = key.len();
    while let Some(pos) = key[..end].rfind(separator) {
        let head = record
            .get(&key[..pos])
            .filter(|value| value.is_object() || value.is_array());
        if let Some(container) = head {
            return walk(container, key[pos + separator.len()..].split(separator));
        }
        end = pos;
    }
    None
}

fn walk_path<'a>(record: &'a RawRecord, alias: &str) -> Option<&'a Value> {
    let mut segments = alias.split(ALIAS_PATH_SEPARATOR);
    let first = segments.next()?;
    walk(record.get(first)?, segments)
}

fn walk<'a, 's>(start: &'a Value, segments: impl Iterator<Item = &'s str>) -> Option<&'a Value> {
    let mut current = start;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Rewrites an alias's path separator to the flatten separator in use
fn alias_key(alias: &str, separator: &str) -> String {
    if separator.len() == 1 && separator.starts_with(ALIAS_PATH_SEPARATOR) {
        alias.to_string()
    } else {
        alias.replace(ALIAS_PATH_SEPARATOR, separator)
    }
}
