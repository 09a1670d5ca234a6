use crate::constants::{DEFAULT_LOG_FILE_NAME, env_vars};
use crate::error::AppError;
use crate::normalizer::processors::flattener::FlattenOptions;
use crate::normalizer::table::VisualizationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing normalization settings.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// How nested records are flattened before field resolution
    #[serde(default)]
    pub flatten: FlattenOptions,
    /// Columns prepared by the visualization-readiness pass
    #[serde(default)]
    pub visualization: VisualizationOptions,
}

impl Config {
    /// Loads configuration from `custom_path` or the default location.
    ///
    /// A missing file yields the defaults. Environment variables override
    /// file values, and the result is validated.
    ///
    /// # Environment Variables
    /// - `CBBD_LOG_FILE` - Override log file path
    /// - `CBBD_FLATTEN_SEPARATOR` - Override the flatten separator
    /// - `CBBD_EXPAND_SEQUENCES` - Override sequence expansion (`true`/`false`)
    /// - `CBBD_DEPTH_LIMIT` - Override the flatten depth limit
    pub async fn load_with_path(custom_path: Option<&str>) -> Result<Self, AppError> {
        let config_path = custom_path.map_or_else(get_config_path, str::to_string);

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            if custom_path.is_some() {
                return Err(AppError::config_error(format!(
                    "Config file '{config_path}' does not exist"
                )));
            }
            tracing::debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies the `CBBD_*` environment variable overrides.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Ok(separator) = std::env::var(env_vars::FLATTEN_SEPARATOR) {
            self.flatten.separator = separator;
        }

        if let Ok(value) = std::env::var(env_vars::EXPAND_SEQUENCES) {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => self.flatten.expand_sequences = true,
                "false" | "0" | "no" => self.flatten.expand_sequences = false,
                _ => tracing::warn!("Ignoring invalid {}: {value}", env_vars::EXPAND_SEQUENCES),
            }
        }

        if let Ok(value) = std::env::var(env_vars::DEPTH_LIMIT) {
            match value.trim().parse::<usize>() {
                Ok(limit) => self.flatten.depth_limit = Some(limit),
                Err(_) => tracing::warn!("Ignoring invalid {}: {value}", env_vars::DEPTH_LIMIT),
            }
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(&self.log_file_path, &self.flatten, &self.visualization)
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and current settings
    /// - Values reflect environment overrides
    pub async fn display(custom_path: Option<&str>) -> Result<(), AppError> {
        let config_path = custom_path.map_or_else(get_config_path, str::to_string);
        let log_dir = get_log_dir_path();
        let config = Config::load_with_path(custom_path).await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !Path::new(&config_path).exists() {
            println!("(Not found, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("Flattening:");
        println!("separator: {:?}", config.flatten.separator);
        println!("expand sequences: {}", config.flatten.expand_sequences);
        match config.flatten.depth_limit {
            Some(limit) => println!("depth limit: {limit}"),
            None => println!("depth limit: none"),
        }
        println!("collision mode: {:?}", config.flatten.collision_mode);
        println!("────────────────────────────────────");
        println!("Visualization Columns:");
        println!("numeric: {}", list_or_none(&config.visualization.numeric_columns));
        println!("categorical: {}", list_or_none(&config.visualization.categorical_columns));
        println!("date: {}", list_or_none(&config.visualization.date_columns));
        println!("categorical case: {:?}", config.visualization.categorical_case);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{DEFAULT_LOG_FILE_NAME}");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a file path without environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn list_or_none(columns: &[String]) -> String {
    if columns.is_empty() {
        "none".to_string()
    } else {
        columns.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::processors::flattener::CollisionMode;
    use crate::normalizer::table::CategoricalCase;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        unsafe {
            std::env::remove_var(env_vars::LOG_FILE);
            std::env::remove_var(env_vars::FLATTEN_SEPARATOR);
            std::env::remove_var(env_vars::EXPAND_SEQUENCES);
            std::env::remove_var(env_vars::DEPTH_LIMIT);
        }
    }

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
log_file_path = "/custom/log/path"

[flatten]
separator = "__"
expand_sequences = false
depth_limit = 2
collision_mode = "error"

[visualization]
numeric_columns = ["home_points", "away_points"]
categorical_columns = ["conference"]
categorical_case = "upper"
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.flatten.separator, "__");
        assert!(!config.flatten.expand_sequences);
        assert_eq!(config.flatten.depth_limit, Some(2));
        assert_eq!(config.flatten.collision_mode, CollisionMode::Error);
        assert_eq!(config.visualization.numeric_columns, ["home_points", "away_points"]);
        assert_eq!(config.visualization.categorical_case, CategoricalCase::Upper);
        assert!(config.visualization.date_columns.is_empty());
    }

    #[tokio::test]
    async fn test_config_load_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.flatten.separator, ".");
        assert!(config.flatten.expand_sequences);
    }

    #[tokio::test]
    async fn test_config_load_invalid_toml() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        tokio::fs::write(&config_path, "[flatten\nseparator = ").await.unwrap();

        let result = Config::load_from_path(&config_path_str).await;
        assert!(matches!(result, Err(AppError::TomlDeserialize(_))));
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original_config = Config {
            log_file_path: Some("/custom/log/path".to_string()),
            flatten: FlattenOptions::default()
                .with_separator("_")
                .with_depth_limit(Some(3)),
            visualization: VisualizationOptions {
                date_columns: vec!["start_date".into()],
                ..VisualizationOptions::default()
            },
        };
        original_config.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(
            content.contains("[flatten]") && content.contains("depth_limit = 3"),
            "Content should contain the flatten table. Content: {content}"
        );

        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(original_config, loaded_config);
    }

    #[tokio::test]
    #[serial]
    async fn test_load_with_missing_custom_path_fails() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let missing = missing.to_string_lossy().to_string();
        let result = Config::load_with_path(Some(&missing)).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_environment_variable_override() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy().to_string();
        tokio::fs::write(
            &config_path,
            "[flatten]\nseparator = \".\"\nexpand_sequences = true\n",
        )
        .await
        .unwrap();

        let env_log = temp_dir.path().join("env.log").to_string_lossy().to_string();
        unsafe {
            std::env::set_var(env_vars::LOG_FILE, &env_log);
            std::env::set_var(env_vars::FLATTEN_SEPARATOR, "_");
            std::env::set_var(env_vars::EXPAND_SEQUENCES, "false");
            std::env::set_var(env_vars::DEPTH_LIMIT, "not-a-number");
        }

        let file_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(file_config.flatten.separator, ".");

        let config = Config::load_with_path(Some(&config_path_str)).await.unwrap();
        assert_eq!(config.log_file_path, Some(env_log));
        assert_eq!(config.flatten.separator, "_");
        assert!(!config.flatten.expand_sequences);
        assert_eq!(config.flatten.depth_limit, None);

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_separator_from_env_fails_validation() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy().to_string();
        tokio::fs::write(&config_path, "").await.unwrap();

        unsafe {
            std::env::set_var(env_vars::FLATTEN_SEPARATOR, "");
        }
        let result = Config::load_with_path(Some(&config_path_str)).await;
        assert!(matches!(result, Err(AppError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("cbbd_normalizer"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains("cbbd_normalizer"));
        assert!(log_dir_path.ends_with("logs"));
    }
}
