//! Visualization-readiness pass over an assembled table.
//!
//! Declared numeric columns get numeric coercion, declared categorical
//! columns are trimmed and case-normalized, declared date columns are
//! normalized to RFC 3339 UTC. The pass is idempotent.

use super::Table;
use crate::error::AppError;
use crate::normalizer::processors::cleaner::{clean_null, coerce_numeric};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Case applied to categorical text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalCase {
    #[default]
    Lower,
    Upper,
    /// Trim only
    Preserve,
}

impl CategoricalCase {
    fn apply(self, text: &str) -> String {
        let trimmed = text.trim();
        match self {
            CategoricalCase::Lower => trimmed.to_lowercase(),
            CategoricalCase::Upper => trimmed.to_uppercase(),
            CategoricalCase::Preserve => trimmed.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationOptions {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub categorical_case: CategoricalCase,
}

impl VisualizationOptions {
    /// True when the pass would change nothing
    pub fn is_empty(&self) -> bool {
        self.numeric_columns.is_empty()
            && self.categorical_columns.is_empty()
            && self.date_columns.is_empty()
    }
}

/// Runs numeric, categorical and date normalization over the declared columns.
///
/// Columns not present in the table are ignored. Only string cells are
/// rewritten by the numeric and categorical steps; non-numeric strings in a
/// numeric column stay strings.
pub fn make_visualization_ready(table: &Table, options: &VisualizationOptions) -> Table {
    let mut unparsed_dates = 0usize;
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            for column in &options.numeric_columns {
                if let Some(cell) = row.get_mut(column) {
                    *cell = coerce_numeric(clean_null(cell.take()));
                }
            }
            for column in &options.categorical_columns {
                if let Some(cell) = row.get_mut(column) {
                    *cell = match clean_null(cell.take()) {
                        Value::String(text) => Value::String(options.categorical_case.apply(&text)),
                        other => other,
                    };
                }
            }
            for column in &options.date_columns {
                if let Some(cell) = row.get_mut(column) {
                    let normalized = normalize_date(cell);
                    if normalized.is_null() && !cell.is_null() {
                        unparsed_dates += 1;
                    }
                    *cell = normalized;
                }
            }
            row
        })
        .collect::<Vec<_>>();

    if unparsed_dates > 0 {
        tracing::debug!("{unparsed_dates} date cell(s) could not be parsed and were set to null");
    }
    Table::from_parts(table.columns().to_vec(), rows)
}

impl Table {
    /// See [`make_visualization_ready`]
    pub fn visualization_ready(&self, options: &VisualizationOptions) -> Table {
        make_visualization_ready(self, options)
    }
}

fn normalize_date(cell: &Value) -> Value {
    match cell {
        Value::String(text) => parse_datetime(text)
            .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Parses the date and time shapes the API emits into UTC.
///
/// Accepts RFC 3339 with any offset, naive `YYYY-MM-DD[T| ]HH:MM:SS[.f]`
/// (taken as UTC) and plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>, AppError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::datetime_parse_error(format!("Unrecognized date '{text}'")))
}
