use crate::cli::{Args, OutputFormat, ViewName};
use cbbd_normalizer::config::Config;
use cbbd_normalizer::error::AppError;
use cbbd_normalizer::normalizer::{
    CollisionMode, FlattenOptions, Pipeline, RecordKind, Table, TableView, VisualizationOptions,
};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Path argument meaning stdin or stdout
const STDIO_PATH: &str = "-";

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.kind.is_none() && !args.list_config && !args.list_kinds {
        return Err(AppError::config_error(
            "A record kind is required (--kind); see --list-kinds",
        ));
    }

    if args.separator.as_deref() == Some("") {
        return Err(AppError::config_error("Separator (--separator) cannot be empty"));
    }

    if let Some(column) = args.numeric.iter().find(|column| args.date.contains(column)) {
        return Err(AppError::config_error(format!(
            "Column '{column}' cannot be passed to both --numeric and --date"
        )));
    }

    if let (Some(view), Some(kind)) = (table_view(args)?, args.kind) {
        view.check_kind(kind)?;
    }

    Ok(())
}

/// The view requested on the command line, built from its filter flags.
pub fn table_view(args: &Args) -> Result<Option<TableView>, AppError> {
    let Some(view) = args.view else {
        return Ok(None);
    };
    let view = match view {
        ViewName::ScoringPlays => TableView::ScoringPlays,
        ViewName::GameFlow => TableView::GameFlow,
        ViewName::PlayTypes => TableView::PlayTypes {
            play_type: args.play_type.clone(),
            team: args.team.clone(),
        },
        ViewName::ProviderLines => TableView::ProviderLines {
            provider: args.provider.clone(),
        },
        ViewName::LineTrends => TableView::LineTrends {
            team: args.team.clone().ok_or_else(|| {
                AppError::config_error("The line-trends view requires --team")
            })?,
        },
        ViewName::SpRatings => TableView::SpRatings,
        ViewName::CompareRatings => TableView::CompareRatings {
            team: args.team.clone(),
        },
    };
    Ok(Some(view))
}

/// Flatten options from the config file with command line flags applied on top.
pub fn effective_flatten_options(args: &Args, config: &Config) -> FlattenOptions {
    let mut options = config.flatten.clone();
    if let Some(separator) = &args.separator {
        options.separator = separator.clone();
    }
    if args.no_expand_sequences {
        options.expand_sequences = false;
    }
    if args.depth_limit.is_some() {
        options.depth_limit = args.depth_limit;
    }
    if args.strict_collisions {
        options.collision_mode = CollisionMode::Error;
    }
    options
}

/// Visualization columns from the config file extended by the command line lists.
pub fn effective_visualization_options(args: &Args, config: &Config) -> VisualizationOptions {
    fn extend(target: &mut Vec<String>, extra: &[String]) {
        for column in extra {
            if !target.contains(column) {
                target.push(column.clone());
            }
        }
    }

    let mut options = config.visualization.clone();
    extend(&mut options.numeric_columns, &args.numeric);
    extend(&mut options.categorical_columns, &args.categorical);
    extend(&mut options.date_columns, &args.date);
    options
}

/// The config file merged with the command line, validated as a whole.
///
/// Catches conflicts neither side has alone, such as a config numeric column
/// also passed with --date.
pub fn effective_config(args: &Args, config: &Config) -> Result<Config, AppError> {
    let merged = Config {
        log_file_path: config.log_file_path.clone(),
        flatten: effective_flatten_options(args, config),
        visualization: effective_visualization_options(args, config),
    };
    merged.validate()?;
    Ok(merged)
}

/// Encodes the table in the requested output format.
pub fn render_table(table: &Table, format: OutputFormat) -> Result<Vec<u8>, AppError> {
    match format {
        OutputFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(&table.to_json())?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        OutputFormat::Csv => {
            let mut bytes = Vec::new();
            table.write_csv(&mut bytes)?;
            Ok(bytes)
        }
    }
}

async fn read_input(path: Option<&str>) -> Result<String, AppError> {
    match path {
        Some(path) if path != STDIO_PATH => Ok(tokio::fs::read_to_string(path).await?),
        _ => {
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await?;
            Ok(content)
        }
    }
}

async fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<(), AppError> {
    match path {
        Some(path) if path != STDIO_PATH => {
            tokio::fs::write(path, bytes).await?;
            tracing::info!("Wrote output to {path}");
        }
        _ => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(bytes).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

/// Handles the transform command.
///
/// Reads the payload, runs the pipeline for the requested kind and writes
/// the table. Skipped records and defaulted cells are summarized on stderr.
pub async fn handle_transform_command(args: &Args, kind: RecordKind) -> Result<(), AppError> {
    let file_config = Config::load_with_path(args.config.as_deref()).await?;
    let config = effective_config(args, &file_config)?;
    let view = table_view(args)?;

    let content = read_input(args.input.as_deref()).await?;
    let payload: Value = serde_json::from_str(&content)?;

    let pipeline = Pipeline::new(kind)
        .with_flatten_options(config.flatten)
        .with_visualization(config.visualization)
        .with_standardized_names(args.snake_case);
    let output = pipeline.run(&payload)?;

    let table = match &view {
        Some(view) => {
            let viewed = view.apply(&output.table);
            tracing::info!("View {}: {} of {} row(s)", view.name(), viewed.len(), output.table.len());
            viewed
        }
        None => output.table,
    };

    let bytes = render_table(&table, args.format)?;
    write_output(args.output.as_deref(), &bytes).await?;

    if !output.diagnostics.is_empty() {
        eprintln!("{}", output.diagnostics);
    }

    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command(args: &Args) -> Result<(), AppError> {
    Config::display(args.config.as_deref()).await
}

/// Handles the --list-kinds command.
///
/// Prints every supported record kind with the columns its transformer emits.
pub fn handle_list_kinds_command() {
    for kind in RecordKind::ALL {
        println!("{kind}");
        println!("  {}", kind.transformer().columns().join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("cbbd_normalizer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_kind_required_for_transform() {
        assert!(validate_args(&parse(&[])).is_err());
        assert!(validate_args(&parse(&["--list-kinds"])).is_ok());
        assert!(validate_args(&parse(&["--kind", "team"])).is_ok());
    }

    #[test]
    fn test_numeric_and_date_conflict() {
        let args = parse(&["--kind", "game", "--numeric", "start_date", "--date", "start_date"]);
        let err = validate_args(&args).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn test_empty_separator_rejected() {
        let args = parse(&["--kind", "game", "--separator", ""]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let config = Config {
            flatten: FlattenOptions::default().with_separator("__"),
            ..Config::default()
        };
        let args = parse(&[
            "--kind",
            "game",
            "--no-expand-sequences",
            "--depth-limit",
            "1",
            "--strict-collisions",
        ]);

        let options = effective_flatten_options(&args, &config);
        assert_eq!(options.separator, "__");
        assert!(!options.expand_sequences);
        assert_eq!(options.depth_limit, Some(1));
        assert_eq!(options.collision_mode, CollisionMode::Error);
    }

    #[test]
    fn test_visualization_columns_extend_config() {
        let config = Config {
            visualization: VisualizationOptions {
                numeric_columns: vec!["home_points".into()],
                ..VisualizationOptions::default()
            },
            ..Config::default()
        };
        let args = parse(&["--kind", "game", "--numeric", "home_points", "--numeric", "away_points"]);

        let options = effective_visualization_options(&args, &config);
        assert_eq!(options.numeric_columns, ["home_points", "away_points"]);
        assert!(options.date_columns.is_empty());
    }

    #[test]
    fn test_config_columns_conflicting_with_cli_rejected() {
        let config = Config {
            visualization: VisualizationOptions {
                numeric_columns: vec!["start_date".into()],
                ..VisualizationOptions::default()
            },
            ..Config::default()
        };
        let args = parse(&["--kind", "game", "--date", "start_date"]);
        assert!(validate_args(&args).is_ok());

        let result = effective_config(&args, &config);
        assert!(matches!(result, Err(AppError::Config(_))));

        let args = parse(&["--kind", "game", "--date", "end_date"]);
        let merged = effective_config(&args, &config).unwrap();
        assert_eq!(merged.visualization.date_columns, ["end_date"]);
    }

    #[test]
    fn test_view_must_match_kind() {
        assert!(validate_args(&parse(&["--kind", "play", "--view", "game-flow"])).is_ok());
        assert!(validate_args(&parse(&["--kind", "rating", "--view", "game-flow"])).is_err());
        assert!(validate_args(&parse(&["--kind", "line", "--view", "line-trends"])).is_err());

        let args = parse(&["--kind", "line", "--view", "provider-lines", "--provider", "Bovada"]);
        assert_eq!(
            table_view(&args).unwrap(),
            Some(TableView::ProviderLines {
                provider: Some("Bovada".to_string())
            })
        );
    }

    #[test]
    fn test_render_table_formats() {
        let table = Table::from_records(vec![
            json!({"id": 1, "school": "Duke"}).as_object().cloned().unwrap(),
        ]);

        let rendered = String::from_utf8(render_table(&table, OutputFormat::Json).unwrap()).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, json!([{"id": 1, "school": "Duke"}]));

        let csv = String::from_utf8(render_table(&table, OutputFormat::Csv).unwrap()).unwrap();
        assert_eq!(csv, "id,school\n1,Duke\n");
    }
}
