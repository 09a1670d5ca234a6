use cbbd_normalizer::normalizer::models::{FieldRule, Resolved};
use cbbd_normalizer::normalizer::processors::cleaner::{clean_null, clean_value};
use cbbd_normalizer::normalizer::processors::flattener::{count_leaves, flatten_value};
use cbbd_normalizer::normalizer::processors::resolver::resolve_or_missing;
use cbbd_normalizer::normalizer::{
    FlattenOptions, NormalizedRecord, RecordKind, Table, VisualizationOptions,
};
use serde_json::{Value, json};

fn record(value: Value) -> NormalizedRecord {
    value.as_object().cloned().unwrap()
}

/// Cleaning an already-cleaned value changes nothing
#[test]
fn test_cleaner_idempotence() {
    let inputs = [
        json!("NULL"),
        json!(" 42 "),
        json!("12.5"),
        json!("Duke"),
        json!(true),
        json!("FALSE"),
        json!(null),
        json!(7),
    ];

    for rule in [FieldRule::Passthrough, FieldRule::Numeric, FieldRule::Boolean] {
        for input in &inputs {
            let once = clean_value(input.clone(), rule);
            let twice = clean_value(once.clone(), rule);
            assert_eq!(once, twice, "cleaning {input} twice under {rule:?}");
        }
    }
}

/// Visualization readiness is idempotent on a whole table
#[test]
fn test_visualization_idempotence() {
    let table = Table::from_records(vec![
        record(json!({"season": "2024", "conference": "  ACC ", "start_date": "2024-01-15 19:00:00"})),
        record(json!({"season": "n/a", "conference": "Big Ten", "start_date": "not a date"})),
        record(json!({"season": 2023, "conference": null, "start_date": "2023-11-06"})),
    ]);
    let options = VisualizationOptions {
        numeric_columns: vec!["season".into()],
        categorical_columns: vec!["conference".into()],
        date_columns: vec!["start_date".into()],
        ..VisualizationOptions::default()
    };

    let once = table.visualization_ready(&options);
    let twice = once.visualization_ready(&options);
    assert_eq!(once, twice);
    assert_eq!(once.rows()[0]["conference"], json!("acc"));
    assert_eq!(once.rows()[0]["start_date"], json!("2024-01-15T19:00:00Z"));
    assert_eq!(once.rows()[1]["start_date"], json!(null));
}

/// Without collisions every leaf scalar lands under exactly one flat key
#[test]
fn test_flatten_preserves_leaf_count() {
    let raw = json!({
        "id": 1,
        "homeTeam": {"id": 150, "name": "Duke", "venue": {"city": "Durham", "capacity": 9314}},
        "homeLineScores": [40, 35],
        "notes": null,
        "players": [{"name": "A", "stats": {"points": 10}}, {"name": "B"}]
    });

    let flat = flatten_value(&raw, &FlattenOptions::default()).unwrap();
    assert_eq!(flat.len(), count_leaves(&raw));
    assert_eq!(flat["homeTeam.venue.city"], json!("Durham"));
    assert_eq!(flat["players.0.stats.points"], json!(10));
}

/// Only the exact "NULL" string is a sentinel
#[test]
fn test_null_sentinel_law() {
    assert_eq!(clean_null(json!("NULL")), json!(null));
    for untouched in ["null", "Null", " NULL", "NULL ", "", "None", "Duke", "75"] {
        assert_eq!(clean_null(json!(untouched)), json!(untouched));
        assert_eq!(
            clean_value(json!(untouched), FieldRule::Passthrough),
            json!(untouched)
        );
    }
}

#[test]
fn test_alias_resolution_order() {
    let only_b = flatten_value(&json!({"b": 2}), &FlattenOptions::default()).unwrap();
    assert_eq!(
        resolve_or_missing(&only_b, &["a", "b"], "."),
        Resolved::Present(json!(2))
    );

    let both = flatten_value(&json!({"b": 2, "a": 1}), &FlattenOptions::default()).unwrap();
    assert_eq!(
        resolve_or_missing(&both, &["a", "b"], "."),
        Resolved::Present(json!(1))
    );
}

/// A missing field and a "NULL" field are distinguishable but normalize alike
#[test]
fn test_missing_versus_null() {
    let transformer = RecordKind::Game.transformer();
    let options = FlattenOptions::default();
    let absent = json!({"homeTeam": "Duke"});
    let sentinel = json!({"homeTeam": "Duke", "attendance": "NULL"});

    assert_eq!(
        transformer.resolve_field(&absent, "attendance", &options).unwrap(),
        Some(Resolved::Missing)
    );
    assert_eq!(
        transformer.resolve_field(&sentinel, "attendance", &options).unwrap(),
        Some(Resolved::Present(json!(null)))
    );
    assert!(transformer.missing_fields(&absent, &options).unwrap().contains(&"attendance"));
    assert!(!transformer.missing_fields(&sentinel, &options).unwrap().contains(&"attendance"));

    let absent_row = transformer.transform(&absent).unwrap();
    let sentinel_row = transformer.transform(&sentinel).unwrap();
    assert_eq!(absent_row["attendance"], json!(null));
    assert_eq!(sentinel_row["attendance"], json!(null));
}

#[test]
fn test_table_column_union() {
    let table = Table::from_records(vec![record(json!({"x": 1})), record(json!({"y": 2}))]);

    assert_eq!(table.columns(), ["x", "y"]);
    assert_eq!(table.to_json(), json!([{"x": 1, "y": null}, {"x": null, "y": 2}]));
}

#[test]
fn test_boolean_coercion_scenario() {
    let inputs = [json!(true), json!("true"), json!("FALSE"), json!("NULL"), json!("maybe")];
    let coerced: Vec<Value> = inputs
        .into_iter()
        .map(|value| clean_value(value, FieldRule::Boolean))
        .collect();

    assert_eq!(
        coerced,
        [json!(true), json!(true), json!(false), json!(null), json!(null)]
    );
}

#[test]
fn test_game_record_scenario() {
    let raw = json!({
        "homeTeam": "Duke",
        "awayTeam": "UNC",
        "homePoints": "75",
        "awayPoints": "70",
        "conferenceGame": "true"
    });
    let row = RecordKind::Game.transformer().transform(&raw).unwrap();

    let expected = json!({
        "home_team": "Duke",
        "away_team": "UNC",
        "home_points": 75,
        "away_points": 70,
        "conference_game": true
    });
    for (column, value) in expected.as_object().unwrap() {
        assert_eq!(&row[column], value, "column {column}");
    }
}
