//! College Basketball Data (CBBD) Response Normalizer Library
//!
//! This library turns loosely shaped JSON responses from the college
//! basketball data API into clean, uniformly shaped tables. Records are
//! flattened, sentinel values are cleaned, logical fields are resolved from
//! their known aliases and derived columns are calculated per record kind.
//!
//! # Examples
//!
//! ```rust
//! use cbbd_normalizer::error::AppError;
//! use cbbd_normalizer::normalizer::{Pipeline, RecordKind};
//! use serde_json::json;
//!
//! fn main() -> Result<(), AppError> {
//!     let payload = json!([
//!         {"homeTeam": "Duke", "awayTeam": "UNC", "homePoints": "75", "awayPoints": "70"},
//!         "not a record"
//!     ]);
//!
//!     let output = Pipeline::new(RecordKind::Game).run(&payload)?;
//!
//!     let row = &output.table.rows()[0];
//!     assert_eq!(row["home_points"], json!(75));
//!     assert_eq!(row["point_differential"], json!(5));
//!     assert_eq!(output.diagnostics.skipped_count(), 1);
//!
//!     // Write the table as CSV
//!     let mut csv = Vec::new();
//!     output.table.write_csv(&mut csv)?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod normalizer;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use normalizer::{
    Diagnostics, EndpointTransformer, FlattenOptions, NormalizedRecord, Pipeline, PipelineOutput,
    RecordKind, Table, TableView, VisualizationOptions, assemble,
};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
