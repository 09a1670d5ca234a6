pub mod fields;
pub mod records;

pub use fields::{
    CalculatedField, CalculationFn, FieldRule, LogicalField, NestedObject, SequenceExpansion,
};
pub use records::{FlatRecord, NormalizedRecord, RawRecord, Resolved};
