use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Record-level errors: isolated to one record, never fatal to a batch
    #[error("Record is not a mapping: {message}")]
    Shape { message: String },

    #[error("Flattened key collision at '{key}'")]
    KeyCollision { key: String },

    #[error("Calculated column '{column}' failed: {message}")]
    Calculation { column: String, message: String },

    #[error("Unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("Failed to parse input JSON: {0}")]
    InputParse(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("{0}")]
    Custom(String),
}

impl AppError {
    /// Create a shape error for input that is not a traversable mapping
    pub fn shape_error(msg: impl Into<String>) -> Self {
        Self::Shape {
            message: msg.into(),
        }
    }

    /// Create a key collision error (strict flattening only)
    pub fn key_collision(key: impl Into<String>) -> Self {
        Self::KeyCollision { key: key.into() }
    }

    /// Create a calculation error for a calculated column
    pub fn calculation_error(column: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Calculation {
            column: column.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown record kind error
    pub fn unknown_record_kind(kind: impl Into<String>) -> Self {
        Self::UnknownRecordKind(kind.into())
    }

    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Check if the error is confined to a single record.
    ///
    /// Batch assembly skips the offending record for these and continues; any
    /// other error aborts the run. Calculation errors never reach this point
    /// since they only null their cell.
    pub fn is_record_level(&self) -> bool {
        matches!(self, AppError::Shape { .. } | AppError::KeyCollision { .. })
    }
}
