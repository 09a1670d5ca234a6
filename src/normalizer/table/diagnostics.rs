use serde::Serialize;
use std::fmt;

/// A record the pipeline could not transform and left out of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position of the record in the unpacked payload
    pub index: usize,
    pub reason: String,
}

/// A calculated cell that failed and was set to null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCell {
    pub row: usize,
    pub column: String,
    pub reason: String,
}

/// Collects the record-level and cell-level problems of one batch.
///
/// Nothing here aborts a batch; the caller decides what to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub skipped_records: Vec<SkippedRecord>,
    pub failed_cells: Vec<FailedCell>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skipped(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped_records.push(SkippedRecord {
            index,
            reason: reason.into(),
        });
    }

    pub fn cell_failed(&mut self, row: usize, column: impl Into<String>, reason: impl Into<String>) {
        self.failed_cells.push(FailedCell {
            row,
            column: column.into(),
            reason: reason.into(),
        });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_records.len()
    }

    pub fn failed_cell_count(&self) -> usize {
        self.failed_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped_records.is_empty() && self.failed_cells.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record(s) skipped, {} cell(s) defaulted to null",
            self.skipped_count(),
            self.failed_cell_count()
        )?;
        for skipped in &self.skipped_records {
            write!(f, "\n  record {}: {}", skipped.index, skipped.reason)?;
        }
        for cell in &self.failed_cells {
            write!(f, "\n  row {} column '{}': {}", cell.row, cell.column, cell.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_display() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.record_skipped(3, "Record is not a mapping: got string");
        diagnostics.cell_failed(0, "ratio", "division by zero");

        assert_eq!(diagnostics.skipped_count(), 1);
        assert_eq!(diagnostics.failed_cell_count(), 1);
        let text = diagnostics.to_string();
        assert!(text.starts_with("1 record(s) skipped, 1 cell(s) defaulted to null"));
        assert!(text.contains("record 3: Record is not a mapping"));
        assert!(text.contains("row 0 column 'ratio': division by zero"));
    }
}
