use super::calc::{number, text};
use super::{EndpointTransformer, RecordKind, merge_context, unpack_wrapped};
use crate::normalizer::models::{CalculatedField, LogicalField, NormalizedRecord};
use crate::normalizer::processors::cleaner::number_value;
use crate::normalizer::table::Table;
use serde_json::{Map, Value};

/// Spellings of the SP+ rating system name
const SP_SYSTEMS: [&str; 3] = ["sp+", "sp", "sp plus"];

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("season", &["season"]),
    LogicalField::new("rating_system", &["ratingSystem", "rating_system", "system"]),
    LogicalField::numeric("team_id", &["teamId", "team_id", "team.id"]),
    LogicalField::new("school", &["school", "team", "team.school", "team.name"]),
    LogicalField::new("conference", &["conference", "team.conference"]),
    LogicalField::numeric("rank", &["rank", "ranking", "rankings.net"]),
    LogicalField::numeric("rating", &["rating", "netRating", "net_rating"]),
    LogicalField::numeric("offense", &["offensiveRating", "offense", "offense.rating"]),
    LogicalField::numeric("defense", &["defensiveRating", "defense", "defense.rating"]),
    LogicalField::numeric("tempo", &["tempo", "pace"]),
    LogicalField::numeric("wins", &["wins"]),
    LogicalField::numeric("losses", &["losses"]),
    LogicalField::numeric("sos", &["sos", "strengthOfSchedule"]),
];

const CALCULATED: &[CalculatedField] = &[CalculatedField::new("win_percentage", win_percentage)];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Rating,
    fields: FIELDS,
    nested: &[],
    expansions: &[],
    calculated: CALCULATED,
};

/// One record per rated team.
///
/// A rating system entry `{name, season, teams: [...]}` contributes its name
/// as `ratingSystem` and its season to every team.
pub fn unpack(payload: &Value) -> Vec<Value> {
    unpack_wrapped(payload, "teams", |system, teams| {
        merge_context(&system_context(system), teams)
    })
}

fn system_context(system: &Map<String, Value>) -> Map<String, Value> {
    system
        .iter()
        .filter(|(key, _)| key.as_str() != "teams")
        .map(|(key, value)| {
            let key = if key == "name" { "ratingSystem" } else { key.as_str() };
            (key.to_string(), value.clone())
        })
        .collect()
}

/// wins / (wins + losses), null before any game is played
fn win_percentage(record: &NormalizedRecord) -> Option<Value> {
    let wins = number(record, "wins")?;
    let played = wins + number(record, "losses")?;
    (played > 0.0).then(|| number_value(wins / played))
}

pub fn sp_ratings(table: &Table) -> Table {
    table.filter(|row| {
        text(row, "rating_system")
            .is_some_and(|system| SP_SYSTEMS.contains(&system.trim().to_lowercase().as_str()))
    })
}

/// Ratings side by side: grouped by system, best rank first within each.
///
/// With a team only that team's ratings are kept.
pub fn compare_ratings(table: &Table, team: Option<&str>) -> Table {
    let table = match team {
        Some(team) => table.filter_text_eq_ignore_case("school", team),
        None => table.clone(),
    };
    table
        .sort_by_column("rank", false)
        .sort_by_column("rating_system", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating_table() -> Table {
        let payload = json!([
            {"name": "SRS", "teams": [{"team": "Houston", "rank": 2}, {"team": "Duke", "rank": 1}]},
            {"name": "SP+", "teams": [{"team": "Duke", "rank": 3}, {"team": "Houston", "rank": 1}]},
            {"ratingSystem": " sp plus ", "team": "Kansas", "rank": 9},
            {"ratingSystem": "NET", "team": "Auburn", "rank": 1}
        ]);
        Table::from_records(unpack(&payload).iter().map(|r| TRANSFORMER.transform(r).unwrap()))
    }

    #[test]
    fn test_sp_ratings_matches_system_spellings() {
        let sp = sp_ratings(&rating_table());
        let schools: Vec<&Value> = sp.column("school").unwrap();
        assert_eq!(schools, [&json!("Duke"), &json!("Houston"), &json!("Kansas")]);
    }

    #[test]
    fn test_compare_ratings_groups_by_system() {
        let compared = compare_ratings(&rating_table(), None);
        let systems: Vec<&Value> = compared.column("rating_system").unwrap();
        assert_eq!(
            systems,
            [&json!(" sp plus "), &json!("NET"), &json!("SP+"), &json!("SP+"), &json!("SRS"), &json!("SRS")]
        );
        let ranks: Vec<&Value> = compared.column("rank").unwrap();
        assert_eq!(ranks, [&json!(9), &json!(1), &json!(1), &json!(3), &json!(1), &json!(2)]);

        let duke = compare_ratings(&rating_table(), Some("DUKE"));
        let ranks: Vec<&Value> = duke.column("rank").unwrap();
        assert_eq!(ranks, [&json!(3), &json!(1)]);
    }

    #[test]
    fn test_unpack_rating_systems() {
        let payload = json!([
            {"name": "SRS", "season": 2025, "teams": [
                {"team": "Duke", "rating": "24.6", "rank": 1, "wins": 35, "losses": 4},
                {"team": "Houston", "rating": 23.1, "rank": 2, "wins": "0", "losses": "0"}
            ]}
        ]);
        let teams = unpack(&payload);
        assert_eq!(teams.len(), 2);

        let duke = TRANSFORMER.transform(&teams[0]).unwrap();
        assert_eq!(duke["rating_system"], json!("SRS"));
        assert_eq!(duke["season"], json!(2025));
        assert_eq!(duke["school"], json!("Duke"));
        assert_eq!(duke["rating"], json!(24.6));
        let pct = duke["win_percentage"].as_f64().unwrap();
        assert!((pct - 35.0 / 39.0).abs() < 1e-9);

        let houston = TRANSFORMER.transform(&teams[1]).unwrap();
        assert_eq!(houston["win_percentage"], Value::Null);
    }

    #[test]
    fn test_adjusted_efficiency_aliases() {
        let raw = json!({
            "season": 2025,
            "team": "Duke",
            "offensiveRating": 128.1,
            "defensiveRating": 91.2,
            "netRating": 36.9,
            "rankings": {"net": 1}
        });
        let record = TRANSFORMER.transform(&raw).unwrap();
        assert_eq!(record["offense"], json!(128.1));
        assert_eq!(record["defense"], json!(91.2));
        assert_eq!(record["rating"], json!(36.9));
        assert_eq!(record["rank"], json!(1));
    }
}
