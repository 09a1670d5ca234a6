use super::calc::{difference, number, sum};
use super::{EndpointTransformer, HOME_AND_AWAY_TEAMS, RecordKind};
use crate::normalizer::models::{
    CalculatedField, LogicalField, NormalizedRecord, SequenceExpansion,
};
use serde_json::Value;

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("id", &["id", "gameId", "game_id"]),
    LogicalField::numeric("source_id", &["sourceId", "source_id"]),
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("season_label", &["seasonLabel", "season_label"]),
    LogicalField::new("season_type", &["seasonType", "season_type"]),
    LogicalField::new("tournament", &["tournament"]),
    LogicalField::new("start_date", &["startDate", "start_date", "startTime"]),
    LogicalField::boolean("start_time_tbd", &["startTimeTbd", "start_time_tbd"]),
    LogicalField::boolean("neutral_site", &["neutralSite", "neutral_site"]),
    LogicalField::boolean("conference_game", &["conferenceGame", "conference_game"]),
    LogicalField::new("game_type", &["gameType", "game_type"]),
    LogicalField::new("status", &["status"]),
    LogicalField::new("game_notes", &["gameNotes", "game_notes", "notes"]),
    LogicalField::numeric("attendance", &["attendance"]),
    LogicalField::numeric("home_team_id", &["homeTeamId", "home_team_id"]),
    LogicalField::new(
        "home_team",
        &["homeTeam", "home_team", "homeTeam.name", "homeTeam.school"],
    ),
    LogicalField::numeric("home_conference_id", &["homeConferenceId", "home_conference_id"]),
    LogicalField::new(
        "home_conference",
        &["homeConference", "home_conference", "homeTeam.conference"],
    ),
    LogicalField::numeric("home_seed", &["homeSeed", "home_seed"]),
    LogicalField::numeric("home_points", &["homePoints", "home_points", "homeScore"]),
    LogicalField::boolean("home_winner", &["homeWinner", "home_winner"]),
    LogicalField::numeric("away_team_id", &["awayTeamId", "away_team_id"]),
    LogicalField::new(
        "away_team",
        &["awayTeam", "away_team", "awayTeam.name", "awayTeam.school"],
    ),
    LogicalField::numeric("away_conference_id", &["awayConferenceId", "away_conference_id"]),
    LogicalField::new(
        "away_conference",
        &["awayConference", "away_conference", "awayTeam.conference"],
    ),
    LogicalField::numeric("away_seed", &["awaySeed", "away_seed"]),
    LogicalField::numeric("away_points", &["awayPoints", "away_points", "awayScore"]),
    LogicalField::boolean("away_winner", &["awayWinner", "away_winner"]),
    LogicalField::numeric("excitement", &["excitement", "excitementIndex", "excitement_index"]),
    LogicalField::numeric("venue_id", &["venueId", "venue_id"]),
    LogicalField::new("venue", &["venue", "venue.name"]),
    LogicalField::new("city", &["city", "venue.city"]),
    LogicalField::new("state", &["state", "venue.state"]),
];

const EXPANSIONS: &[SequenceExpansion] = &[
    SequenceExpansion {
        output_prefix: "home_period",
        aliases: &["homePeriodPoints", "homeLineScores", "home_line_scores"],
    },
    SequenceExpansion {
        output_prefix: "away_period",
        aliases: &["awayPeriodPoints", "awayLineScores", "away_line_scores"],
    },
];

const CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("point_differential", point_differential),
    CalculatedField::new("total_points", total_points),
    CalculatedField::new("home_win", home_win),
    CalculatedField::new("away_win", away_win),
    CalculatedField::new("tie", tie),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Game,
    fields: FIELDS,
    nested: HOME_AND_AWAY_TEAMS,
    expansions: EXPANSIONS,
    calculated: CALCULATED,
};

/// Home points minus away points; positive when the home team won.
fn point_differential(record: &NormalizedRecord) -> Option<Value> {
    difference(record, "home_points", "away_points")
}

fn total_points(record: &NormalizedRecord) -> Option<Value> {
    sum(record, "home_points", "away_points")
}

fn margin(record: &NormalizedRecord) -> Option<f64> {
    Some(number(record, "home_points")? - number(record, "away_points")?)
}

fn home_win(record: &NormalizedRecord) -> Option<Value> {
    margin(record).map(|m| Value::Bool(m > 0.0))
}

fn away_win(record: &NormalizedRecord) -> Option<Value> {
    margin(record).map(|m| Value::Bool(m < 0.0))
}

fn tie(record: &NormalizedRecord) -> Option<Value> {
    margin(record).map(|m| Value::Bool(m == 0.0))
}
