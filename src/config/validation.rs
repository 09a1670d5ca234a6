use crate::error::AppError;
use crate::normalizer::processors::flattener::FlattenOptions;
use crate::normalizer::table::VisualizationOptions;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - The flatten separator cannot be empty
/// - If a log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
/// - A column cannot be declared both numeric and date
pub fn validate_config(
    log_file_path: &Option<String>,
    flatten: &FlattenOptions,
    visualization: &VisualizationOptions,
) -> Result<(), AppError> {
    if flatten.separator.is_empty() {
        return Err(AppError::config_error("Flatten separator cannot be empty"));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    if let Some(column) = visualization
        .numeric_columns
        .iter()
        .find(|column| visualization.date_columns.contains(column))
    {
        return Err(AppError::config_error(format!(
            "Column '{column}' cannot be both a numeric and a date column"
        )));
    }

    Ok(())
}
