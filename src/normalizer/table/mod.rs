//! Tabular assembly of normalized records.
//!
//! A [`Table`] is an ordered list of rows sharing one column set. Columns are
//! the union of every record's keys in first-seen order and a row lacking a
//! column holds `null` there. All operations return a new table.

pub mod diagnostics;
pub mod visualization;

pub use diagnostics::{Diagnostics, FailedCell, SkippedRecord};
pub use visualization::{CategoricalCase, VisualizationOptions, make_visualization_ready};

use crate::error::AppError;
use crate::normalizer::models::NormalizedRecord;
use crate::normalizer::processors::cleaner::number_value;
use crate::normalizer::processors::naming::camel_to_snake;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io;

/// Row function of a calculated column
pub type RowFn<'a> = &'a dyn Fn(&NormalizedRecord) -> Result<Value, AppError>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<NormalizedRecord>,
}

impl Table {
    /// Assembles records into a column-homogeneous table.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = NormalizedRecord>,
    {
        let records: Vec<NormalizedRecord> = records.into_iter().collect();
        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        for record in &records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|column| {
                        let value = record.remove(column).unwrap_or(Value::Null);
                        (column.clone(), value)
                    })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    fn from_parts(columns: Vec<String>, rows: Vec<NormalizedRecord>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[NormalizedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Values of one column in row order, `None` for an unknown column
    pub fn column(&self, column: &str) -> Option<Vec<&Value>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(column).unwrap_or(&Value::Null))
                .collect(),
        )
    }

    /// Adds calculated columns, evaluated in order for every row.
    ///
    /// Each function sees the full row including columns added before it. A
    /// function returning an error yields `null` for that cell and a
    /// diagnostic; the rest of the table is unaffected. An existing column
    /// with the same name is replaced.
    pub fn with_calculated_columns(
        &self,
        calculations: &[(&str, RowFn<'_>)],
        diagnostics: &mut Diagnostics,
    ) -> Table {
        let mut columns = self.columns.clone();
        for (name, _) in calculations {
            if !columns.iter().any(|c| c == name) {
                columns.push((*name).to_string());
            }
        }

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut row = row.clone();
                for (name, compute) in calculations {
                    let value = match compute(&row) {
                        Ok(value) => value,
                        Err(e) => {
                            tracing::warn!("Calculated column '{name}' failed on row {index}: {e}");
                            diagnostics.cell_failed(index, *name, e.to_string());
                            Value::Null
                        }
                    };
                    row.insert((*name).to_string(), value);
                }
                reorder(row, &columns)
            })
            .collect();

        Table::from_parts(columns, rows)
    }

    /// Single-column form of [`Table::with_calculated_columns`]
    pub fn with_calculated_column<F>(&self, name: &str, compute: F, diagnostics: &mut Diagnostics) -> Table
    where
        F: Fn(&NormalizedRecord) -> Result<Value, AppError>,
    {
        let compute: RowFn<'_> = &compute;
        self.with_calculated_columns(&[(name, compute)], diagnostics)
    }

    /// Adds `name` holding each row's `column` minus the previous row's.
    ///
    /// The first row, and every row where either value is not a number, is `null`.
    pub fn with_row_difference(&self, column: &str, name: &str) -> Table {
        let mut columns = self.columns.clone();
        if !self.has_column(name) {
            columns.push(name.to_string());
        }

        let mut previous: Option<f64> = None;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let current = row.get(column).and_then(Value::as_f64);
                let difference = match (current, previous) {
                    (Some(current), Some(previous)) => number_value(current - previous),
                    _ => Value::Null,
                };
                previous = current;
                let mut row = row.clone();
                row.insert(name.to_string(), difference);
                reorder(row, &columns)
            })
            .collect();
        Table::from_parts(columns, rows)
    }

    /// Rows for which `predicate` holds; columns are kept even if no row is.
    pub fn filter<P>(&self, mut predicate: P) -> Table
    where
        P: FnMut(&NormalizedRecord) -> bool,
    {
        let rows = self.rows.iter().filter(|row| predicate(row)).cloned().collect();
        Table::from_parts(self.columns.clone(), rows)
    }

    /// Rows whose `column` equals `expected`; numbers compare by value (`2024 == 2024.0`).
    pub fn filter_eq(&self, column: &str, expected: &Value) -> Table {
        self.filter(|row| row.get(column).is_some_and(|value| values_equal(value, expected)))
    }

    /// Rows whose text `column` equals `expected` ignoring case and surrounding whitespace
    pub fn filter_text_eq_ignore_case(&self, column: &str, expected: &str) -> Table {
        let expected = expected.trim().to_lowercase();
        self.filter(|row| {
            row.get(column)
                .and_then(Value::as_str)
                .is_some_and(|text| text.trim().to_lowercase() == expected)
        })
    }

    /// Stable sort with a caller-supplied comparator
    pub fn sort_by<F>(&self, mut compare: F) -> Table
    where
        F: FnMut(&NormalizedRecord, &NormalizedRecord) -> Ordering,
    {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| compare(a, b));
        Table::from_parts(self.columns.clone(), rows)
    }

    /// Stable sort on one column. Nulls sort last in either direction.
    pub fn sort_by_column(&self, column: &str, descending: bool) -> Table {
        self.sort_by(|a, b| {
            let left = a.get(column).unwrap_or(&Value::Null);
            let right = b.get(column).unwrap_or(&Value::Null);
            match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) if descending => compare_values(right, left),
                (false, false) => compare_values(left, right),
            }
        })
    }

    /// Projects onto `columns` in the given order; unknown names are skipped.
    pub fn select(&self, columns: &[&str]) -> Table {
        let columns: Vec<String> = columns
            .iter()
            .filter(|name| self.has_column(name))
            .map(|name| (*name).to_string())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| reorder(row.clone(), &columns))
            .collect();
        Table::from_parts(columns, rows)
    }

    /// Renames every column to snake_case.
    ///
    /// When two columns collapse onto one name the first keeps its position
    /// and a null cell in it is filled from the later column.
    pub fn standardize_column_names(&self) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for column in &self.columns {
            let renamed = camel_to_snake(column);
            if !columns.contains(&renamed) {
                columns.push(renamed);
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = NormalizedRecord::new();
                for (key, value) in row {
                    let renamed = camel_to_snake(key);
                    match out.get_mut(&renamed) {
                        Some(existing) if existing.is_null() => *existing = value.clone(),
                        Some(_) => {}
                        None => {
                            out.insert(renamed, value.clone());
                        }
                    }
                }
                reorder(out, &columns)
            })
            .collect();
        Table::from_parts(columns, rows)
    }

    /// Rows as a JSON array of objects
    pub fn to_json(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }

    /// Writes the table as CSV with a header row.
    ///
    /// Null cells are empty and nested values are written as compact JSON.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), AppError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| csv_cell(row.get(column).unwrap_or(&Value::Null)))
                .collect();
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn reorder(mut row: NormalizedRecord, columns: &[String]) -> NormalizedRecord {
    columns
        .iter()
        .map(|column| {
            let value = row.remove(column).unwrap_or(Value::Null);
            (column.clone(), value)
        })
        .collect()
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over non-null values: booleans, then numbers, then strings.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        (Value::Number(l), Value::Number(r)) => {
            let l = l.as_f64().unwrap_or(f64::NAN);
            let r = r.as_f64().unwrap_or(f64::NAN);
            l.total_cmp(&r)
        }
        (Value::String(l), Value::String(r)) => l.cmp(r),
        _ => type_rank(left)
            .cmp(&type_rank(right))
            .then_with(|| left.to_string().cmp(&right.to_string())),
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
