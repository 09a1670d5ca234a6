// src/main.rs
mod cli;
mod commands;
mod logging;

use cbbd_normalizer::error::AppError;
use clap::Parser;
use cli::Args;
use commands::{
    handle_list_config_command, handle_list_kinds_command, handle_transform_command,
    validate_args,
};
use logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    validate_args(&args)?;

    if args.list_kinds {
        handle_list_kinds_command();
        return Ok(());
    }

    if args.list_config {
        return handle_list_config_command(&args).await;
    }

    // The guard must outlive every log call
    let (log_file_path, _guard) = setup_logging(&args).await?;
    tracing::debug!("Logs are being written to: {log_file_path}");

    match args.kind {
        Some(kind) => handle_transform_command(&args, kind).await,
        None => Err(AppError::config_error("A record kind is required (--kind)")),
    }
}
