use super::calc::{difference, text};
use super::{EndpointTransformer, RecordKind, merge_context, unpack_wrapped};
use crate::normalizer::models::{CalculatedField, LogicalField, NormalizedRecord};
use serde_json::{Map, Value};

/// Team-level keys of a roster wrapper copied onto each player.
const TEAM_CONTEXT_KEYS: &[&str] = &["team", "teamId", "teamSourceId", "conference", "season"];

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("id", &["id", "athleteId", "playerId"]),
    LogicalField::new("source_id", &["sourceId", "source_id"]),
    LogicalField::new("name", &["name", "displayName"]),
    LogicalField::new("first_name", &["firstName", "first_name"]),
    LogicalField::new("last_name", &["lastName", "last_name"]),
    LogicalField::new("jersey", &["jersey"]),
    LogicalField::new("position", &["position"]),
    LogicalField::numeric("height", &["height"]),
    LogicalField::numeric("weight", &["weight"]),
    LogicalField::new("year", &["year", "class"]),
    LogicalField::numeric("start_season", &["startSeason", "start_season"]),
    LogicalField::numeric("end_season", &["endSeason", "end_season"]),
    LogicalField::new("city", &["hometown.city", "homeCity", "home_city"]),
    LogicalField::new("state", &["hometown.state", "homeState", "home_state"]),
    LogicalField::new("country", &["hometown.country", "homeCountry", "home_country"]),
    LogicalField::numeric("latitude", &["hometown.latitude"]),
    LogicalField::numeric("longitude", &["hometown.longitude"]),
    LogicalField::new("county_fips", &["hometown.countyFips", "hometown.county_fips"]),
    LogicalField::new("team", &["team", "school"]),
    LogicalField::numeric("team_id", &["teamId", "team_id"]),
    LogicalField::new("conference", &["conference"]),
    LogicalField::numeric("season", &["season"]),
];

const CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("experience", experience),
    CalculatedField::new("hometown", hometown),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Roster,
    fields: FIELDS,
    nested: &[],
    expansions: &[],
    calculated: CALCULATED,
};

/// One record per player; roster wrappers contribute their team context.
pub fn unpack(payload: &Value) -> Vec<Value> {
    unpack_wrapped(payload, "players", |roster, players| {
        let context: Map<String, Value> = TEAM_CONTEXT_KEYS
            .iter()
            .filter_map(|key| roster.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect();
        merge_context(&context, players)
    })
}

/// Seasons played before the roster season
fn experience(record: &NormalizedRecord) -> Option<Value> {
    difference(record, "season", "start_season")
}

/// "City, State", falling back to the country, or whichever single part exists.
fn hometown(record: &NormalizedRecord) -> Option<Value> {
    let city = text(record, "city");
    let region = text(record, "state").or_else(|| text(record, "country"));
    let label = match (city, region) {
        (Some(city), Some(region)) => format!("{city}, {region}"),
        (Some(part), None) | (None, Some(part)) => part.to_string(),
        (None, None) => return None,
    };
    Some(Value::String(label))
}
