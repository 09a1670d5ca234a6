use super::{EndpointTransformer, RecordKind, merge_context, unpack_wrapped, without};
use crate::normalizer::models::LogicalField;
use serde_json::{Map, Value};

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("season_type", &["seasonType", "season_type"]),
    LogicalField::numeric("week", &["week"]),
    LogicalField::new("poll", &["poll", "pollType", "poll_type"]),
    LogicalField::new("poll_date", &["pollDate", "poll_date"]),
    LogicalField::numeric("rank", &["ranking", "rank", "current"]),
    LogicalField::numeric("team_id", &["teamId", "team_id", "team.id"]),
    LogicalField::new("school", &["school", "team", "team.school", "team.name"]),
    LogicalField::new("conference", &["conference", "team.conference"]),
    LogicalField::numeric("first_place_votes", &["firstPlaceVotes", "first_place_votes"]),
    LogicalField::numeric("points", &["points"]),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Ranking,
    fields: FIELDS,
    nested: &[],
    expansions: &[],
    calculated: &[],
};

/// One record per ranked team.
///
/// Accepts `{season, polls: [{poll, ranks: [...]}]}` entries as well as flat
/// rank records. Season and poll keys are copied onto every rank.
pub fn unpack(payload: &Value) -> Vec<Value> {
    unpack_wrapped(payload, "polls", |season, polls| {
        let context = without(season, "polls");
        polls.iter().flat_map(|poll| split_poll(&context, poll)).collect()
    })
}

fn split_poll(season: &Map<String, Value>, poll: &Value) -> Vec<Value> {
    let Value::Object(poll_map) = poll else {
        return vec![poll.clone()];
    };
    let Some(Value::Array(ranks)) = poll_map.get("ranks") else {
        return merge_context(season, std::slice::from_ref(poll));
    };
    let mut context = season.clone();
    for (key, value) in poll_map {
        if key != "ranks" {
            context.insert(key.clone(), value.clone());
        }
    }
    merge_context(&context, ranks)
}
