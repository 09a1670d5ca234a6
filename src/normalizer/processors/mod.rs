pub mod cleaner;
pub mod flattener;
pub mod naming;
pub mod resolver;

pub use cleaner::{clean_null, clean_record, clean_value, coerce_bool, coerce_numeric};
pub use flattener::{CollisionMode, FlattenOptions, flatten, flatten_value};
pub use naming::camel_to_snake;
pub use resolver::{
    resolve_or_missing, resolve_or_null, resolve_prefixed_scalar, resolve_raw_or_missing,
    resolve_scalar_or_missing,
};
