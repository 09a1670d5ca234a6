use super::calc::{difference, number, sum, text};
use super::{
    EndpointTransformer, HOME_AND_AWAY_TEAMS, RecordKind, merge_context, unpack_wrapped, without,
};
use crate::constants::game_clock::{
    OVERTIME_LENGTH_SECONDS, PERIOD_LENGTH_SECONDS, REGULATION_PERIODS,
};
use crate::normalizer::models::{CalculatedField, LogicalField, NormalizedRecord};
use crate::normalizer::table::Table;
use serde_json::Value;

const TEAM_COLUMNS: [&str; 3] = ["team", "home_team", "away_team"];

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("id", &["id", "playId", "play_id"]),
    LogicalField::numeric("source_id", &["sourceId", "source_id"]),
    LogicalField::numeric("game_id", &["gameId", "game_id"]),
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("season_type", &["seasonType", "season_type"]),
    LogicalField::new("game_start_date", &["gameStartDate", "startDate", "start_date"]),
    LogicalField::numeric("period", &["period", "periodNumber", "period_number"]),
    LogicalField::new("clock", &["clock"]),
    LogicalField::numeric("team_id", &["teamId", "team_id", "team.id"]),
    LogicalField::new("team", &["team", "team.name"]),
    LogicalField::new("conference", &["conference", "team.conference"]),
    LogicalField::numeric("opponent_id", &["opponentId", "opponent_id"]),
    LogicalField::new("opponent", &["opponent"]),
    LogicalField::new("home_team", &["homeTeam", "home_team", "homeTeam.name"]),
    LogicalField::new("away_team", &["awayTeam", "away_team", "awayTeam.name"]),
    LogicalField::numeric("home_score", &["homeScore", "home_score"]),
    LogicalField::numeric("away_score", &["awayScore", "away_score"]),
    LogicalField::new("play_type", &["playType", "play_type", "type", "eventType"]),
    LogicalField::new("play_text", &["playText", "play_text", "description", "text"]),
    LogicalField::boolean("scoring_play", &["scoringPlay", "scoring_play"]),
    LogicalField::boolean("shooting_play", &["shootingPlay", "shooting_play"]),
    LogicalField::numeric("score_value", &["scoreValue", "score_value"]),
    LogicalField::numeric("sequence_number", &["sequenceNumber", "sequence_number"]),
    LogicalField::numeric("win_probability", &["homeWinProbability", "winProbability"]),
    LogicalField::new(
        "participant",
        &["participants.0.name", "athlete.name", "player"],
    ),
    LogicalField::numeric("shot_x", &["shotInfo.location.x", "coordinates.x", "coordinate_x"]),
    LogicalField::numeric("shot_y", &["shotInfo.location.y", "coordinates.y", "coordinate_y"]),
];

const CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("score_differential", score_differential),
    CalculatedField::new("total_score", total_score),
    CalculatedField::new("clock_seconds", clock_seconds),
    CalculatedField::new("game_seconds", game_seconds),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Play,
    fields: FIELDS,
    nested: HOME_AND_AWAY_TEAMS,
    expansions: &[],
    calculated: CALCULATED,
};

/// One record per play.
///
/// A game wrapper `{<game keys>, plays: [...]}` has its keys copied onto each
/// play; the play's own keys win.
pub fn unpack(payload: &Value) -> Vec<Value> {
    unpack_wrapped(payload, "plays", |game, plays| {
        merge_context(&without(game, "plays"), plays)
    })
}

fn score_differential(record: &NormalizedRecord) -> Option<Value> {
    difference(record, "home_score", "away_score")
}

fn total_score(record: &NormalizedRecord) -> Option<Value> {
    sum(record, "home_score", "away_score")
}

/// Parses an `MM:SS` game clock into remaining seconds in the period.
pub fn parse_clock(clock: &str) -> Option<i64> {
    let (minutes, seconds) = clock.trim().split_once(':')?;
    let minutes: i64 = minutes.parse().ok()?;
    let seconds: i64 = seconds.split('.').next()?.parse().ok()?;
    if minutes < 0 || !(0..60).contains(&seconds) {
        return None;
    }
    Some(minutes * 60 + seconds)
}

fn clock_seconds(record: &NormalizedRecord) -> Option<Value> {
    text(record, "clock").and_then(parse_clock).map(Value::from)
}

/// Seconds elapsed since tip-off: two 20 minute halves, then 5 minute overtimes.
fn game_seconds(record: &NormalizedRecord) -> Option<Value> {
    let period = number(record, "period")? as i64;
    if period < 1 {
        return None;
    }
    let remaining = text(record, "clock").and_then(parse_clock)?;

    let (elapsed_before, length) = if period <= REGULATION_PERIODS {
        ((period - 1) * PERIOD_LENGTH_SECONDS, PERIOD_LENGTH_SECONDS)
    } else {
        let overtimes_before = period - REGULATION_PERIODS - 1;
        (
            REGULATION_PERIODS * PERIOD_LENGTH_SECONDS + overtimes_before * OVERTIME_LENGTH_SECONDS,
            OVERTIME_LENGTH_SECONDS,
        )
    };
    Some(Value::from(elapsed_before + (length - remaining).max(0)))
}

/// Adds `score_change`, the change in `total_score` since the previous play.
pub fn with_score_change(table: &Table) -> Table {
    table.with_row_difference("total_score", "score_change")
}

/// The first signal present decides: the `scoring_play` flag, then a positive
/// `score_value`, then a positive `score_change`.
fn is_scoring(row: &NormalizedRecord) -> bool {
    if let Some(flag) = row.get("scoring_play").and_then(Value::as_bool) {
        return flag;
    }
    if let Some(value) = number(row, "score_value") {
        return value > 0.0;
    }
    number(row, "score_change").is_some_and(|change| change > 0.0)
}

pub fn scoring_plays(table: &Table) -> Table {
    table.filter(is_scoring)
}

/// Plays of one type and/or one team.
///
/// The team is matched against the first of `team`, `home_team` and
/// `away_team` that has any matching row.
pub fn play_types(table: &Table, play_type: Option<&str>, team: Option<&str>) -> Table {
    let table = match play_type {
        Some(play_type) => table.filter_text_eq_ignore_case("play_type", play_type),
        None => table.clone(),
    };
    let Some(team) = team else {
        return table;
    };
    TEAM_COLUMNS
        .iter()
        .map(|column| table.filter_text_eq_ignore_case(column, team))
        .find(|matches| !matches.is_empty())
        .unwrap_or_else(|| table.filter(|_| false))
}

/// Plays in the order they happened
pub fn game_flow(table: &Table) -> Table {
    table.sort_by_column("game_seconds", false)
}
