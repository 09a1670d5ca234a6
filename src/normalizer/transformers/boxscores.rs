//! Game boxscores, split into team and player stat lines.
//!
//! A boxscore carries `homeTeam`/`awayTeam` stat objects and
//! `homePlayers`/`awayPlayers` lists. Each side becomes its own record tagged
//! with `team_type` (`home` or `away`) and carrying the boxscore's remaining
//! keys, such as the game id.

use super::calc::ratio;
use super::{EndpointTransformer, RecordKind, payload_items};
use crate::normalizer::models::{CalculatedField, LogicalField, NormalizedRecord};
use serde_json::{Map, Value};

const SIDES: [&str; 2] = ["home", "away"];
const SIDE_KEYS: [&str; 4] = ["homeTeam", "awayTeam", "homePlayers", "awayPlayers"];

const TEAM_FIELDS: &[LogicalField] = &[
    LogicalField::numeric("game_id", &["gameId", "game_id"]),
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("team_type", &["teamType", "team_type"]),
    LogicalField::numeric("team_id", &["teamId", "team_id", "id", "team.id"]),
    LogicalField::new("team_name", &["teamName", "team_name", "team", "name", "team.name"]),
    LogicalField::new("conference", &["conference", "team.conference"]),
    LogicalField::numeric("points", &["points", "points.total", "score"]),
    LogicalField::numeric("field_goals_made", &["fieldGoals.made", "fieldGoalsMade"]),
    LogicalField::numeric(
        "field_goals_attempted",
        &["fieldGoals.attempted", "fieldGoalsAttempted"],
    ),
    LogicalField::numeric(
        "three_point_made",
        &["threePointFieldGoals.made", "threePointMade"],
    ),
    LogicalField::numeric(
        "three_point_attempted",
        &["threePointFieldGoals.attempted", "threePointAttempted"],
    ),
    LogicalField::numeric("free_throws_made", &["freeThrows.made", "freeThrowsMade"]),
    LogicalField::numeric(
        "free_throws_attempted",
        &["freeThrows.attempted", "freeThrowsAttempted"],
    ),
    LogicalField::numeric("rebounds", &["rebounds.total", "rebounds", "totalRebounds"]),
    LogicalField::numeric(
        "offensive_rebounds",
        &["rebounds.offensive", "offensiveRebounds"],
    ),
    LogicalField::numeric(
        "defensive_rebounds",
        &["rebounds.defensive", "defensiveRebounds"],
    ),
    LogicalField::numeric("assists", &["assists"]),
    LogicalField::numeric("steals", &["steals"]),
    LogicalField::numeric("blocks", &["blocks"]),
    LogicalField::numeric("turnovers", &["turnovers.total", "turnovers"]),
    LogicalField::numeric("fouls", &["fouls.total", "fouls"]),
];

const PLAYER_FIELDS: &[LogicalField] = &[
    LogicalField::numeric("game_id", &["gameId", "game_id"]),
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("team_type", &["teamType", "team_type"]),
    LogicalField::numeric("team_id", &["teamId", "team_id"]),
    LogicalField::new("team", &["team", "teamName", "school"]),
    LogicalField::numeric("player_id", &["player.id", "athleteId", "playerId", "id"]),
    LogicalField::new("player_name", &["player.name", "athlete.name", "name"]),
    LogicalField::new("player_position", &["player.position", "position"]),
    LogicalField::new("player_jersey", &["player.jersey", "jersey"]),
    LogicalField::boolean("starter", &["starter", "player.starter"]),
    LogicalField::numeric("minutes", &["minutes"]),
    LogicalField::numeric("points", &["points"]),
    LogicalField::numeric("rebounds", &["rebounds.total", "rebounds", "totalRebounds"]),
    LogicalField::numeric("assists", &["assists"]),
    LogicalField::numeric("steals", &["steals"]),
    LogicalField::numeric("blocks", &["blocks"]),
    LogicalField::numeric("turnovers", &["turnovers"]),
    LogicalField::numeric("fouls", &["fouls"]),
    LogicalField::numeric("field_goals_made", &["fieldGoals.made", "fieldGoalsMade"]),
    LogicalField::numeric(
        "field_goals_attempted",
        &["fieldGoals.attempted", "fieldGoalsAttempted"],
    ),
    LogicalField::numeric(
        "three_point_made",
        &["threePointFieldGoals.made", "threePointMade"],
    ),
    LogicalField::numeric(
        "three_point_attempted",
        &["threePointFieldGoals.attempted", "threePointAttempted"],
    ),
    LogicalField::numeric("free_throws_made", &["freeThrows.made", "freeThrowsMade"]),
    LogicalField::numeric(
        "free_throws_attempted",
        &["freeThrows.attempted", "freeThrowsAttempted"],
    ),
];

const TEAM_CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("field_goal_percentage", field_goal_percentage),
    CalculatedField::new("three_point_percentage", three_point_percentage),
    CalculatedField::new("free_throw_percentage", free_throw_percentage),
];

const PLAYER_CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("field_goal_percentage", field_goal_percentage),
];

pub static TEAM_TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::BoxscoreTeam,
    fields: TEAM_FIELDS,
    nested: &[],
    expansions: &[],
    calculated: TEAM_CALCULATED,
};

pub static PLAYER_TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::BoxscorePlayer,
    fields: PLAYER_FIELDS,
    nested: &[],
    expansions: &[],
    calculated: PLAYER_CALCULATED,
};

fn is_boxscore(map: &Map<String, Value>) -> bool {
    SIDE_KEYS.iter().any(|key| map.contains_key(*key))
}

/// The boxscore keys that describe the game rather than one side of it
fn game_context(boxscore: &Map<String, Value>) -> Map<String, Value> {
    boxscore
        .iter()
        .filter(|(key, _)| !SIDE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn side_record(context: &Map<String, Value>, side: &str, own: &Map<String, Value>) -> Value {
    let mut merged = context.clone();
    merged.insert("teamType".to_string(), Value::from(side));
    for (key, value) in own {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}

/// Splits boxscores into records, one per `split` output; other items pass through.
fn unpack_sides<F>(payload: &Value, split: F) -> Vec<Value>
where
    F: Fn(&Map<String, Value>, &Map<String, Value>) -> Vec<Value>,
{
    payload_items(payload)
        .iter()
        .flat_map(|item| match item.as_object() {
            Some(boxscore) if is_boxscore(boxscore) => split(boxscore, &game_context(boxscore)),
            _ => vec![item.clone()],
        })
        .collect()
}

/// One record per team side of every boxscore.
pub fn unpack_teams(payload: &Value) -> Vec<Value> {
    unpack_sides(payload, |boxscore, context| {
        SIDES
            .iter()
            .filter_map(|side| {
                let team = boxscore.get(&format!("{side}Team"))?.as_object()?;
                Some(side_record(context, side, team))
            })
            .collect()
    })
}

/// One record per player line of every boxscore.
///
/// Player list entries that are not objects are passed through unchanged.
pub fn unpack_players(payload: &Value) -> Vec<Value> {
    unpack_sides(payload, |boxscore, context| {
        SIDES
            .iter()
            .flat_map(|side| {
                let players = boxscore
                    .get(&format!("{side}Players"))
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                players.iter().map(move |player| match player.as_object() {
                    Some(own) => side_record(context, side, own),
                    None => player.clone(),
                })
            })
            .collect()
    })
}

fn field_goal_percentage(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "field_goals_made", "field_goals_attempted")
}

fn three_point_percentage(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "three_point_made", "three_point_attempted")
}

fn free_throw_percentage(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "free_throws_made", "free_throws_attempted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn boxscore() -> Value {
        json!({
            "gameId": 77,
            "season": 2025,
            "homeTeam": {
                "teamId": 150,
                "team": "Duke",
                "points": 84,
                "fieldGoals": {"made": 30, "attempted": 60},
                "freeThrows": {"made": 0, "attempted": 0}
            },
            "awayTeam": {"teamId": 153, "team": "North Carolina", "points": "70"},
            "homePlayers": [
                {
                    "player": {"id": 9, "name": "Cooper Flagg", "position": "F", "jersey": "2"},
                    "starter": true,
                    "points": 24,
                    "fieldGoals": {"made": 9, "attempted": 15}
                }
            ],
            "awayPlayers": [{"athleteId": 11, "name": "RJ Davis", "starter": "FALSE"}, "oops"]
        })
    }

    #[test]
    fn test_unpack_teams_tags_sides() {
        let teams = unpack_teams(&boxscore());
        assert_eq!(teams.len(), 2);

        let home = TEAM_TRANSFORMER.transform(&teams[0]).unwrap();
        assert_eq!(home["team_type"], json!("home"));
        assert_eq!(home["game_id"], json!(77));
        assert_eq!(home["team_name"], json!("Duke"));
        assert_eq!(home["field_goal_percentage"], json!(0.5));
        assert_eq!(home["free_throw_percentage"], Value::Null);

        let away = TEAM_TRANSFORMER.transform(&teams[1]).unwrap();
        assert_eq!(away["team_type"], json!("away"));
        assert_eq!(away["points"], json!(70));
        assert_eq!(away["team_name"], json!("North Carolina"));
    }

    #[test]
    fn test_unpack_players_flattens_player_info() {
        let players = unpack_players(&boxscore());
        assert_eq!(players.len(), 3);
        assert_eq!(players[2], json!("oops"));

        let flagg = PLAYER_TRANSFORMER.transform(&players[0]).unwrap();
        assert_eq!(flagg["team_type"], json!("home"));
        assert_eq!(flagg["game_id"], json!(77));
        assert_eq!(flagg["player_id"], json!(9));
        assert_eq!(flagg["player_name"], json!("Cooper Flagg"));
        assert_eq!(flagg["player_jersey"], json!("2"));
        assert_eq!(flagg["starter"], json!(true));
        assert_eq!(flagg["field_goal_percentage"], json!(0.6));

        let davis = PLAYER_TRANSFORMER.transform(&players[1]).unwrap();
        assert_eq!(davis["team_type"], json!("away"));
        assert_eq!(davis["player_id"], json!(11));
        assert_eq!(davis["starter"], json!(false));
    }

    #[test]
    fn test_plain_records_pass_through() {
        let payload = json!([{"teamType": "home", "points": 60}]);
        assert_eq!(unpack_teams(&payload), vec![json!({"teamType": "home", "points": 60})]);
        assert_eq!(unpack_players(&payload).len(), 1);
        assert!(unpack_players(&json!({"gameId": 1, "homeTeam": {"points": 1}})).is_empty());
    }
}
