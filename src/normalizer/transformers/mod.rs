//! Endpoint transformers: one declarative field table per record kind.
//!
//! Each transformer flattens a raw record, cleans the null sentinel out of
//! every leaf, resolves its logical fields through their aliases, applies the
//! per-field coercion rule and finally computes calculated fields in order.

pub mod boxscores;
pub mod calc;
pub mod games;
pub mod lines;
pub mod player_stats;
pub mod plays;
pub mod rankings;
pub mod ratings;
pub mod roster;
pub mod teams;
pub mod venues;

use crate::error::AppError;
use crate::normalizer::models::{
    CalculatedField, FieldRule, FlatRecord, LogicalField, NestedObject, NormalizedRecord,
    Resolved, SequenceExpansion,
};
use crate::normalizer::processors::cleaner::{clean_record, clean_value};
use crate::normalizer::processors::flattener::{FlattenOptions, flatten_value};
use crate::normalizer::processors::resolver::{
    has_prefix, lookup, resolve_prefixed_scalar, resolve_scalar_or_missing,
};
use crate::normalizer::table::Table;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The record kinds the API returns and this crate knows how to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Team,
    Game,
    Roster,
    Ranking,
    Rating,
    Line,
    Play,
    PlayerStats,
    Venue,
    BoxscoreTeam,
    BoxscorePlayer,
}

impl RecordKind {
    pub const ALL: [RecordKind; 11] = [
        RecordKind::Team,
        RecordKind::Game,
        RecordKind::Roster,
        RecordKind::Ranking,
        RecordKind::Rating,
        RecordKind::Line,
        RecordKind::Play,
        RecordKind::PlayerStats,
        RecordKind::Venue,
        RecordKind::BoxscoreTeam,
        RecordKind::BoxscorePlayer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Team => "team",
            RecordKind::Game => "game",
            RecordKind::Roster => "roster",
            RecordKind::Ranking => "ranking",
            RecordKind::Rating => "rating",
            RecordKind::Line => "line",
            RecordKind::Play => "play",
            RecordKind::PlayerStats => "player_stats",
            RecordKind::Venue => "venue",
            RecordKind::BoxscoreTeam => "boxscore_team",
            RecordKind::BoxscorePlayer => "boxscore_player",
        }
    }

    /// The transformer declared for this kind
    pub fn transformer(self) -> &'static EndpointTransformer {
        match self {
            RecordKind::Team => &teams::TRANSFORMER,
            RecordKind::Game => &games::TRANSFORMER,
            RecordKind::Roster => &roster::TRANSFORMER,
            RecordKind::Ranking => &rankings::TRANSFORMER,
            RecordKind::Rating => &ratings::TRANSFORMER,
            RecordKind::Line => &lines::TRANSFORMER,
            RecordKind::Play => &plays::TRANSFORMER,
            RecordKind::PlayerStats => &player_stats::TRANSFORMER,
            RecordKind::Venue => &venues::TRANSFORMER,
            RecordKind::BoxscoreTeam => &boxscores::TEAM_TRANSFORMER,
            RecordKind::BoxscorePlayer => &boxscores::PLAYER_TRANSFORMER,
        }
    }

    /// Splits an API payload into the individual records of this kind.
    ///
    /// Handles the wrapper shapes the API uses (polls of ranks, rating systems
    /// of teams, games carrying plays or provider lines, rosters of players,
    /// boxscores of home and away sides).
    /// Anything else is treated as one record or a list of records; elements
    /// that are not mappings are passed through so they surface as shape errors.
    pub fn unpack(self, payload: &Value) -> Vec<Value> {
        match self {
            RecordKind::Ranking => rankings::unpack(payload),
            RecordKind::Rating => ratings::unpack(payload),
            RecordKind::Play => plays::unpack(payload),
            RecordKind::Line => lines::unpack(payload),
            RecordKind::Roster => roster::unpack(payload),
            RecordKind::BoxscoreTeam => boxscores::unpack_teams(payload),
            RecordKind::BoxscorePlayer => boxscores::unpack_players(payload),
            _ => unpack_records(payload),
        }
    }

    /// Finishes an assembled table with the columns derived across rows.
    pub fn finish_table(self, table: Table) -> Table {
        match self {
            RecordKind::Play => plays::with_score_change(&table),
            _ => table,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "team" | "teams" => RecordKind::Team,
            "game" | "games" => RecordKind::Game,
            "roster" | "roster_entry" | "rosters" => RecordKind::Roster,
            "ranking" | "rankings" | "poll" | "polls" => RecordKind::Ranking,
            "rating" | "ratings" => RecordKind::Rating,
            "line" | "lines" | "betting_line" | "betting_lines" => RecordKind::Line,
            "play" | "plays" | "play_event" | "play_events" => RecordKind::Play,
            "player_stats" | "stats" | "player_season_stats" => RecordKind::PlayerStats,
            "venue" | "venues" => RecordKind::Venue,
            "boxscore_team" | "boxscore_teams" | "team_boxscore" => RecordKind::BoxscoreTeam,
            "boxscore_player" | "boxscore_players" | "player_boxscore" => {
                RecordKind::BoxscorePlayer
            }
            _ => return Err(AppError::unknown_record_kind(s)),
        };
        Ok(kind)
    }
}

/// Default payload unpacking: a list yields its elements, null yields nothing,
/// anything else is a single record.
pub fn unpack_records(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Unpacks a payload whose records may wrap a child list under `list_key`.
///
/// Wrapping records are replaced by whatever `split` builds from the wrapper
/// and its children; every other element is kept as a record of its own.
pub(crate) fn unpack_wrapped<F>(payload: &Value, list_key: &str, split: F) -> Vec<Value>
where
    F: Fn(&Map<String, Value>, &[Value]) -> Vec<Value>,
{
    payload_items(payload)
        .iter()
        .flat_map(|item| match (item.as_object(), item.get(list_key)) {
            (Some(wrapper), Some(Value::Array(children))) => split(wrapper, children),
            _ => vec![item.clone()],
        })
        .collect()
}

/// Elements of a list payload, nothing for null, else the payload itself
pub(crate) fn payload_items(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        Value::Null => &[],
        other => std::slice::from_ref(other),
    }
}

/// A copy of `map` without `key`
pub(crate) fn without(map: &Map<String, Value>, key: &str) -> Map<String, Value> {
    let mut copy = map.clone();
    copy.remove(key);
    copy
}

/// Copies `context` keys onto every object in `children`.
///
/// The child's own keys always win; non-objects are passed through.
pub(crate) fn merge_context(context: &Map<String, Value>, children: &[Value]) -> Vec<Value> {
    children
        .iter()
        .map(|child| match child {
            Value::Object(own) => {
                let mut merged = context.clone();
                for (key, value) in own {
                    merged.insert(key.clone(), value.clone());
                }
                Value::Object(merged)
            }
            other => other.clone(),
        })
        .collect()
}

/// A declarative record transformer.
#[derive(Debug, Clone, Copy)]
pub struct EndpointTransformer {
    pub kind: RecordKind,
    pub fields: &'static [LogicalField],
    pub nested: &'static [NestedObject],
    pub expansions: &'static [SequenceExpansion],
    pub calculated: &'static [CalculatedField],
}

impl EndpointTransformer {
    /// Transforms one raw record with default flatten options.
    ///
    /// # Errors
    /// [`AppError::Shape`] when `raw` is not a JSON object. Missing fields never fail.
    pub fn transform(&self, raw: &Value) -> Result<NormalizedRecord, AppError> {
        self.transform_with(raw, &FlattenOptions::default())
    }

    /// Transforms one raw record.
    ///
    /// # Errors
    /// [`AppError::Shape`] for non-objects, and [`AppError::KeyCollision`] when
    /// strict collision mode is enabled and the record has colliding paths.
    pub fn transform_with(
        &self,
        raw: &Value,
        options: &FlattenOptions,
    ) -> Result<NormalizedRecord, AppError> {
        let flat = self.prepare(raw, options)?;
        let separator = options.separator.as_str();
        let mut out = NormalizedRecord::new();

        for field in self.fields {
            let value = resolve_scalar_or_missing(&flat, field.aliases, separator).into_value();
            out.insert(field.name.to_string(), clean_value(value, field.rule));
        }

        for nested in self.nested {
            extract_nested(&flat, nested, separator, &mut out);
        }

        for expansion in self.expansions {
            expand_sequence(&flat, expansion, separator, &mut out);
        }

        for calculated in self.calculated {
            let value = (calculated.compute)(&out).unwrap_or(Value::Null);
            out.insert(calculated.name.to_string(), value);
        }

        tracing::trace!(kind = %self.kind, fields = out.len(), "Normalized record");
        Ok(out)
    }

    /// Declared logical fields that are absent from `raw` under every alias.
    ///
    /// Present-but-null fields are not listed.
    pub fn missing_fields(
        &self,
        raw: &Value,
        options: &FlattenOptions,
    ) -> Result<Vec<&'static str>, AppError> {
        let flat = self.prepare(raw, options)?;
        let separator = options.separator.as_str();
        Ok(self
            .fields
            .iter()
            .filter(|field| resolve_scalar_or_missing(&flat, field.aliases, separator).is_missing())
            .map(|field| field.name)
            .collect())
    }

    /// Resolves one declared field without collapsing missing to null
    pub fn resolve_field(
        &self,
        raw: &Value,
        name: &str,
        options: &FlattenOptions,
    ) -> Result<Option<Resolved>, AppError> {
        let Some(field) = self.fields.iter().find(|f| f.name == name) else {
            return Ok(None);
        };
        let flat = self.prepare(raw, options)?;
        let resolved = match resolve_scalar_or_missing(&flat, field.aliases, &options.separator) {
            Resolved::Present(value) => Resolved::Present(clean_value(value, field.rule)),
            Resolved::Missing => Resolved::Missing,
        };
        Ok(Some(resolved))
    }

    /// Output column names in the order `transform` emits them.
    ///
    /// Sequence expansions are variable-width and not included.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self.fields.iter().map(|f| f.name.to_string()).collect();
        for nested in self.nested {
            for field in nested.fields {
                let name = format!("{}_{}", nested.output_prefix, field.name);
                if !columns.contains(&name) {
                    columns.push(name);
                }
            }
        }
        columns.extend(self.calculated.iter().map(|c| c.name.to_string()));
        columns
    }

    fn prepare(&self, raw: &Value, options: &FlattenOptions) -> Result<FlatRecord, AppError> {
        let flat = flatten_value(raw, options).map_err(|e| match e {
            AppError::Shape { message } => {
                AppError::shape_error(format!("{} record: {message}", self.kind))
            }
            other => other,
        })?;
        Ok(clean_record(flat))
    }
}

/// Writes `<prefix>_<field>` for each sub-object field.
///
/// A non-null field found under the sub-object overwrites a same-named column
/// resolved from a top-level alias; a missing or null field never does.
fn extract_nested(
    flat: &FlatRecord,
    nested: &NestedObject,
    separator: &str,
    out: &mut NormalizedRecord,
) {
    let prefix = nested
        .source_prefixes
        .iter()
        .find(|prefix| has_prefix(flat, prefix, separator));

    for field in nested.fields {
        let column = format!("{}_{}", nested.output_prefix, field.name);
        let resolved = prefix.map_or(Resolved::Missing, |prefix| {
            resolve_prefixed_scalar(flat, prefix, field.aliases, separator)
        });
        match resolved {
            Resolved::Present(value) if !value.is_null() => {
                out.insert(column, clean_value(value, field.rule));
            }
            _ => {
                out.entry(column).or_insert(Value::Null);
            }
        }
    }
}

/// Spreads a scalar sequence into numbered numeric columns starting at 1.
fn expand_sequence(
    flat: &FlatRecord,
    expansion: &SequenceExpansion,
    separator: &str,
    out: &mut NormalizedRecord,
) {
    for alias in expansion.aliases {
        let key = alias.replace(crate::constants::ALIAS_PATH_SEPARATOR, separator);
        let items: Vec<Value> = match lookup(flat, &key, separator) {
            Some(Value::Array(items)) => items.clone(),
            Some(_) => continue,
            None => (0..)
                .map_while(|index| flat.get(&format!("{key}{separator}{index}")).cloned())
                .collect(),
        };
        if items.is_empty() {
            continue;
        }
        for (index, item) in items.into_iter().enumerate() {
            out.insert(
                format!("{}_{}", expansion.output_prefix, index + 1),
                if item.is_object() || item.is_array() {
                    Value::Null
                } else {
                    clean_value(item, FieldRule::Numeric)
                },
            );
        }
        return;
    }
}

/// Sub-object fields shared by every home/away team extraction.
pub const TEAM_SUBFIELDS: &[LogicalField] = &[
    LogicalField::numeric("id", &["id", "teamId", "team_id"]),
    LogicalField::new("name", &["name", "school", "team", "displayName"]),
    LogicalField::new("conference", &["conference"]),
    LogicalField::new("mascot", &["mascot"]),
    LogicalField::new("abbreviation", &["abbreviation"]),
];

pub(crate) const HOME_AND_AWAY_TEAMS: &[NestedObject] = &[
    NestedObject {
        output_prefix: "home_team",
        source_prefixes: &["homeTeam", "home_team"],
        fields: TEAM_SUBFIELDS,
    },
    NestedObject {
        output_prefix: "away_team",
        source_prefixes: &["awayTeam", "away_team"],
        fields: TEAM_SUBFIELDS,
    },
];
