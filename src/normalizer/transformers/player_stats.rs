use super::calc::ratio;
use super::{EndpointTransformer, RecordKind};
use crate::normalizer::models::{CalculatedField, LogicalField, NormalizedRecord};
use serde_json::Value;

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("season_label", &["seasonLabel", "season_label"]),
    LogicalField::numeric("team_id", &["teamId", "team_id"]),
    LogicalField::new("team", &["team", "school"]),
    LogicalField::new("conference", &["conference"]),
    LogicalField::numeric("athlete_id", &["athleteId", "playerId", "athlete_id", "id"]),
    LogicalField::new("name", &["name", "athlete.name", "player.name"]),
    LogicalField::new("position", &["position", "player.position"]),
    LogicalField::numeric("games", &["games", "gamesPlayed"]),
    LogicalField::numeric("starts", &["starts", "gamesStarted"]),
    LogicalField::numeric("minutes", &["minutes"]),
    LogicalField::numeric("points", &["points"]),
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
    LogicalField::numeric(
        "true_shooting_percentage",
        &["trueShootingPct", "trueShootingPercentage"],
    ),
    LogicalField::numeric("usage", &["usage", "usageRate"]),
];

const CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("points_per_game", points_per_game),
    CalculatedField::new("rebounds_per_game", rebounds_per_game),
    CalculatedField::new("assists_per_game", assists_per_game),
    CalculatedField::new("steals_per_game", steals_per_game),
    CalculatedField::new("blocks_per_game", blocks_per_game),
    CalculatedField::new("turnovers_per_game", turnovers_per_game),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::PlayerStats,
    fields: FIELDS,
    nested: &[],
    expansions: &[],
    calculated: CALCULATED,
};

fn points_per_game(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "points", "games")
}

fn rebounds_per_game(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "rebounds", "games")
}

fn assists_per_game(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "assists", "games")
}

fn steals_per_game(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "steals", "games")
}

fn blocks_per_game(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "blocks", "games")
}

fn turnovers_per_game(record: &NormalizedRecord) -> Option<Value> {
    ratio(record, "turnovers", "games")
}
