//! Response normalization: clean, flatten, resolve, transform, assemble.

pub mod assembler;
pub mod models;
pub mod processors;
pub mod table;
pub mod transformers;
pub mod views;

pub use assembler::{Pipeline, PipelineOutput, assemble};
pub use models::{FieldRule, FlatRecord, LogicalField, NormalizedRecord, RawRecord, Resolved};
pub use processors::{CollisionMode, FlattenOptions};
pub use table::{CategoricalCase, Diagnostics, Table, VisualizationOptions};
pub use transformers::{EndpointTransformer, RecordKind};
pub use views::TableView;
