use crate::error::AppError;
use crate::normalizer::processors::flattener::FlattenOptions;
use crate::normalizer::table::{Diagnostics, Table, VisualizationOptions};
use crate::normalizer::transformers::RecordKind;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Result of one pipeline run: the best-effort table and what went wrong.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub table: Table,
    pub diagnostics: Diagnostics,
}

/// Batch pipeline for one record kind: unpack, transform, assemble and
/// optionally prepare the table for visualization.
#[derive(Debug, Clone)]
pub struct Pipeline {
    kind: RecordKind,
    flatten: FlattenOptions,
    visualization: Option<VisualizationOptions>,
    standardize_names: bool,
}

impl Pipeline {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            flatten: FlattenOptions::default(),
            visualization: None,
            standardize_names: false,
        }
    }

    pub fn with_flatten_options(mut self, options: FlattenOptions) -> Self {
        self.flatten = options;
        self
    }

    /// Enables the visualization pass; an empty option set disables it.
    pub fn with_visualization(mut self, options: VisualizationOptions) -> Self {
        self.visualization = (!options.is_empty()).then_some(options);
        self
    }

    /// Renames columns to snake_case before the visualization pass
    pub fn with_standardized_names(mut self, enabled: bool) -> Self {
        self.standardize_names = enabled;
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Runs the pipeline over a decoded API payload.
    ///
    /// Record-level failures (not a mapping, strict-mode key collisions) skip
    /// that record and are reported in the diagnostics. Any other error aborts.
    pub fn run(&self, payload: &Value) -> Result<PipelineOutput, AppError> {
        let records = self.kind.unpack(payload);
        let transformer = self.kind.transformer();
        let mut diagnostics = Diagnostics::new();
        let mut normalized = Vec::with_capacity(records.len());

        debug!("Transforming {} {} record(s)", records.len(), self.kind);
        for (index, record) in records.iter().enumerate() {
            match transformer.transform_with(record, &self.flatten) {
                Ok(row) => normalized.push(row),
                Err(e) if e.is_record_level() => {
                    warn!("Skipping {} record {index}: {e}", self.kind);
                    diagnostics.record_skipped(index, e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let mut table = self.kind.finish_table(Table::from_records(normalized));
        if self.standardize_names {
            table = table.standardize_column_names();
        }
        if let Some(options) = &self.visualization {
            table = table.visualization_ready(options);
        }

        info!(
            "Assembled {} table: {} row(s), {} column(s), {}",
            self.kind,
            table.len(),
            table.columns().len(),
            diagnostics
        );
        Ok(PipelineOutput { table, diagnostics })
    }
}

/// Transforms and assembles already-unpacked records of one kind.
///
/// Shorthand for a default [`Pipeline`] over a list of records.
pub fn assemble(kind: RecordKind, records: &[Value]) -> Result<PipelineOutput, AppError> {
    Pipeline::new(kind).run(&Value::Array(records.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::processors::flattener::CollisionMode;
    use serde_json::json;

    #[test]
    fn test_malformed_record_is_skipped_not_fatal() {
        let payload = json!([
            {"id": 1, "school": "Duke"},
            "not a record",
            {"id": 3, "school": "UNC"}
        ]);
        let output = Pipeline::new(RecordKind::Team).run(&payload).unwrap();

        assert_eq!(output.table.len(), 2);
        assert_eq!(output.diagnostics.skipped_count(), 1);
        assert_eq!(output.diagnostics.skipped_records[0].index, 1);
    }

    #[test]
    fn test_strict_collisions_skip_record() {
        let payload = json!([
            {"homeTeam": {"name": "Duke"}, "homeTeam.name": "Duke"},
            {"homeTeam": "UNC"}
        ]);
        let options = FlattenOptions::default().with_collision_mode(CollisionMode::Error);
        let output = Pipeline::new(RecordKind::Game)
            .with_flatten_options(options)
            .run(&payload)
            .unwrap();

        assert_eq!(output.table.len(), 1);
        assert_eq!(output.table.rows()[0]["home_team"], json!("UNC"));
        assert!(output.diagnostics.skipped_records[0].reason.contains("homeTeam.name"));
    }

    #[test]
    fn test_visualization_pass_applied() {
        let payload = json!([{"id": 1, "school": "Duke", "conference": " ACC "}]);
        let output = Pipeline::new(RecordKind::Team)
            .with_visualization(VisualizationOptions {
                categorical_columns: vec!["conference".into()],
                ..VisualizationOptions::default()
            })
            .run(&payload)
            .unwrap();
        assert_eq!(output.table.rows()[0]["conference"], json!("acc"));
    }

    #[test]
    fn test_assemble_empty_payload() {
        let output = assemble(RecordKind::Game, &[]).unwrap();
        assert!(output.table.is_empty());
        assert!(output.diagnostics.is_empty());
    }
}
