use super::calc::{difference, number, outcome, sum};
use super::{
    EndpointTransformer, HOME_AND_AWAY_TEAMS, RecordKind, merge_context, unpack_wrapped, without,
};
use crate::normalizer::models::{CalculatedField, LogicalField, NormalizedRecord};
use crate::normalizer::table::{Diagnostics, Table};
use serde_json::Value;

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("game_id", &["gameId", "game_id", "id"]),
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("season_type", &["seasonType", "season_type"]),
    LogicalField::new("start_date", &["startDate", "start_date"]),
    LogicalField::numeric("home_team_id", &["homeTeamId", "home_team_id"]),
    LogicalField::new("home_team", &["homeTeam", "home_team", "homeTeam.name"]),
    LogicalField::new("home_conference", &["homeConference", "home_conference"]),
    LogicalField::numeric("home_score", &["homeScore", "home_score", "homePoints"]),
    LogicalField::numeric("away_team_id", &["awayTeamId", "away_team_id"]),
    LogicalField::new("away_team", &["awayTeam", "away_team", "awayTeam.name"]),
    LogicalField::new("away_conference", &["awayConference", "away_conference"]),
    LogicalField::numeric("away_score", &["awayScore", "away_score", "awayPoints"]),
    LogicalField::new("provider", &["provider"]),
    LogicalField::numeric("spread", &["spread"]),
    LogicalField::numeric("over_under", &["overUnder", "over_under"]),
    LogicalField::numeric("spread_open", &["spreadOpen", "spread_open"]),
    LogicalField::numeric("over_under_open", &["overUnderOpen", "over_under_open"]),
    LogicalField::numeric("home_moneyline", &["homeMoneyline", "home_moneyline"]),
    LogicalField::numeric("away_moneyline", &["awayMoneyline", "away_moneyline"]),
    LogicalField::new("formatted_spread", &["formattedSpread", "formatted_spread"]),
];

const CALCULATED: &[CalculatedField] = &[
    CalculatedField::new("point_differential", point_differential),
    CalculatedField::new("total_points", total_points),
    CalculatedField::new("spread_outcome", spread_outcome),
    CalculatedField::new("over_under_outcome", over_under_outcome),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Line,
    fields: FIELDS,
    nested: HOME_AND_AWAY_TEAMS,
    expansions: &[],
    calculated: CALCULATED,
};

/// One record per provider line.
///
/// Game entries carrying a `lines` list are split into one record per line,
/// each with the game's own keys copied on. Games without lines contribute
/// nothing; anything without a `lines` key is taken as a record already.
pub fn unpack(payload: &Value) -> Vec<Value> {
    unpack_wrapped(payload, "lines", |game, lines| {
        merge_context(&without(game, "lines"), lines)
    })
}

fn point_differential(record: &NormalizedRecord) -> Option<Value> {
    difference(record, "home_score", "away_score")
}

fn total_points(record: &NormalizedRecord) -> Option<Value> {
    sum(record, "home_score", "away_score")
}

/// 1 when the home team covered, 0 on a push, -1 when the away team covered.
fn spread_outcome(record: &NormalizedRecord) -> Option<Value> {
    let margin = number(record, "home_score")? - number(record, "away_score")?;
    Some(outcome(margin + number(record, "spread")?))
}

/// 1 over, 0 push, -1 under
fn over_under_outcome(record: &NormalizedRecord) -> Option<Value> {
    let total = number(record, "home_score")? + number(record, "away_score")?;
    Some(outcome(total - number(record, "over_under")?))
}

/// Lines from one provider, matched ignoring case, or every line.
pub fn provider_lines(table: &Table, provider: Option<&str>) -> Table {
    match provider {
        Some(provider) => table.filter_text_eq_ignore_case("provider", provider),
        None => table.clone(),
    }
}

/// `Some(true)` when `team` is the home side, `Some(false)` when it is the away side
fn team_side(row: &NormalizedRecord, team: &str) -> Option<bool> {
    let team = team.trim().to_lowercase();
    let plays_as = |column: &str| {
        row.get(column)
            .and_then(Value::as_str)
            .is_some_and(|name| name.trim().to_lowercase() == team)
    };
    if plays_as("home_team") {
        Some(true)
    } else if plays_as("away_team") {
        Some(false)
    } else {
        None
    }
}

/// Every line involving `team` from its own perspective, oldest game first.
///
/// Adds `is_home` and `opponent` columns.
pub fn line_trends(table: &Table, team: &str) -> Table {
    let mut diagnostics = Diagnostics::new();
    table
        .filter(|row| team_side(row, team).is_some())
        .with_calculated_column(
            "is_home",
            |row| Ok(team_side(row, team).map_or(Value::Null, Value::Bool)),
            &mut diagnostics,
        )
        .with_calculated_column(
            "opponent",
            |row| {
                let opponent = match row.get("is_home").and_then(Value::as_bool) {
                    Some(true) => row.get("away_team"),
                    Some(false) => row.get("home_team"),
                    None => None,
                };
                Ok(opponent.cloned().unwrap_or(Value::Null))
            },
            &mut diagnostics,
        )
        .sort_by_column("start_date", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_table() -> Table {
        let payload = json!([
            {"gameId": 2, "startDate": "2025-02-01", "homeTeam": "UNC", "awayTeam": "Duke", "lines": [
                {"provider": "ESPN Bet", "spread": 2.5},
                {"provider": "Bovada", "spread": 3}
            ]},
            {"gameId": 1, "startDate": "2024-12-10", "homeTeam": "Duke", "awayTeam": "Kansas", "lines": [
                {"provider": "espn bet", "spread": -1.5}
            ]},
            {"gameId": 3, "startDate": "2025-01-04", "homeTeam": "Kansas", "awayTeam": "Houston", "lines": [
                {"provider": "Bovada", "spread": -2}
            ]}
        ]);
        Table::from_records(unpack(&payload).iter().map(|line| TRANSFORMER.transform(line).unwrap()))
    }

    #[test]
    fn test_provider_lines() {
        let table = line_table();
        assert_eq!(provider_lines(&table, Some("ESPN BET")).len(), 2);
        assert_eq!(provider_lines(&table, None).len(), 4);
        assert!(provider_lines(&table, Some("Caesars")).is_empty());
    }

    #[test]
    fn test_line_trends_team_perspective() {
        let trends = line_trends(&line_table(), "duke");
        assert_eq!(trends.len(), 3);
        assert_eq!(trends.columns()[trends.columns().len() - 2..], ["is_home", "opponent"]);

        let games: Vec<&Value> = trends.column("game_id").unwrap();
        assert_eq!(games, [&json!(1), &json!(2), &json!(2)]);
        let home: Vec<&Value> = trends.column("is_home").unwrap();
        assert_eq!(home, [&json!(true), &json!(false), &json!(false)]);
        let opponents: Vec<&Value> = trends.column("opponent").unwrap();
        assert_eq!(opponents, [&json!("Kansas"), &json!("UNC"), &json!("UNC")]);
    }

    #[test]
    fn test_unpack_splits_provider_lines() {
        let payload = json!([{
            "gameId": 7,
            "homeTeam": "Duke",
            "awayTeam": "UNC",
            "homeScore": 80,
            "awayScore": 74,
            "lines": [
                {"provider": "ESPN Bet", "spread": "-4.5", "overUnder": "150.5"},
                {"provider": "Bovada", "spread": -6, "overUnder": 154}
            ]
        }]);
        let records = unpack(&payload);
        assert_eq!(records.len(), 2);

        let first = TRANSFORMER.transform(&records[0]).unwrap();
        assert_eq!(first["game_id"], json!(7));
        assert_eq!(first["provider"], json!("ESPN Bet"));
        assert_eq!(first["spread"], json!(-4.5));
        assert_eq!(first["point_differential"], json!(6));
        assert_eq!(first["spread_outcome"], json!(1));
        assert_eq!(first["over_under_outcome"], json!(1));

        let second = TRANSFORMER.transform(&records[1]).unwrap();
        assert_eq!(second["spread_outcome"], json!(0));
        assert_eq!(second["over_under_outcome"], json!(0));
    }

    #[test]
    fn test_unplayed_game_has_null_outcomes() {
        let raw = json!({"provider": "ESPN Bet", "spread": -3, "homeScore": "NULL", "awayScore": null});
        let record = TRANSFORMER.transform(&raw).unwrap();
        assert_eq!(record["total_points"], Value::Null);
        assert_eq!(record["spread_outcome"], Value::Null);
        assert_eq!(record["over_under_outcome"], Value::Null);
    }

    #[test]
    fn test_unpack_game_without_lines_yields_nothing() {
        let payload = json!([{"gameId": 1, "lines": []}, {"provider": "flat"}]);
        let records = unpack(&payload);
        assert_eq!(records, vec![json!({"provider": "flat"})]);
    }
}
