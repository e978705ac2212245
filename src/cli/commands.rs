//! Command implementations

use std::process::ExitCode;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};

use crate::adapters::AppConfig;
use crate::app::{AppContainer, ClipRequest, DefaultAppContainer};
use crate::cli::args::{CheckArgs, ClipArgs, FetchArgs, PurgeArgs};
use crate::cli::Commands;
use crate::domain::errors::{ClipError, ErrorClass, TimeField};
use crate::domain::model::ClipRange;
use crate::domain::rules::ClipRangeValidator;
use crate::domain::time::parse_time_to_seconds;
use crate::utils::format_file_size;

/// Run a parsed command and turn its outcome into a process exit code
pub async fn dispatch(command: Commands, config: &AppConfig) -> ExitCode {
    let json_output = command.json();

    let result = match command {
        Commands::Check(args) => check(args),
        Commands::Clip(args) => match DefaultAppContainer::new(config) {
            Ok(container) => clip(&container, args).await,
            Err(e) => Err(e),
        },
        Commands::Fetch(args) => match DefaultAppContainer::new(config) {
            Ok(container) => fetch(&container, args).await,
            Err(e) => Err(e),
        },
        Commands::Purge(args) => match DefaultAppContainer::new(config) {
            Ok(container) => {
                let default_age = Duration::from_secs(config.retention_secs);
                purge(&container, args, default_age).await
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e, json_output);
            // Exit codes are small positive constants
            ExitCode::from(e.class().exit_code() as u8)
        }
    }
}

/// Execute the clip command
pub async fn clip(container: &dyn AppContainer, args: ClipArgs) -> Result<(), ClipError> {
    info!("Starting clip operation");
    info!("URL: {}", args.url);
    info!("Start: {}", args.start);
    info!("End: {}", args.end);

    let request = ClipRequest::new(args.url, args.start, args.end);
    let response = container.clip_interactor().execute(request).await?;

    let saved_to = match &args.dest {
        Some(dest) => match container
            .artifact_interactor()
            .fetch(response.token.as_str(), dest)
            .await
        {
            Ok(path) => Some(path),
            // The clip itself is fine; keep its name in front of the user
            Err(e) => {
                return Err(ClipError::Storage(format!(
                    "clip {} is stored at {} but could not be copied to {}: {}",
                    response.token,
                    response.artifact.path.display(),
                    dest.display(),
                    e
                )))
            }
        },
        None => None,
    };

    if args.json {
        let value = json!({
            "success": true,
            "file": response.token,
            "thumbnail_url": response.thumbnail_url,
            "title": response.title,
            "range": range_json(&response.range),
            "size_bytes": response.artifact.size_bytes,
            "path": response.artifact.path,
            "saved_to": saved_to,
            "processing_time_ms": response.processing_time_ms,
        });
        print_json(&value);
    } else {
        println!("Clip ready: {}", response.token);
        if let Some(title) = &response.title {
            println!("  Title: {}", title);
        }
        println!("  Range: {}", response.range);
        println!("  Size: {}", format_file_size(response.artifact.size_bytes));
        println!("  Thumbnail: {}", response.thumbnail_url);
        println!("  Stored at: {}", response.artifact.path.display());
        if let Some(path) = saved_to {
            println!("  Saved to: {}", path.display());
        }
    }

    info!("Clip operation completed successfully");
    Ok(())
}

/// Execute the check command.
///
/// Without a source duration this is the pre-submission check; with one it is
/// the full validation the clip command runs after looking the video up.
pub fn check(args: CheckArgs) -> Result<(), ClipError> {
    let range = match &args.source_duration {
        Some(raw) => {
            let source_duration = parse_time_to_seconds(raw)
                .map_err(|issue| ClipError::format(TimeField::SourceDuration, raw, issue))?;
            ClipRangeValidator::validate(&args.start, &args.end, source_duration)?
        }
        None => ClipRangeValidator::precheck(&args.start, &args.end)?,
    };

    if args.json {
        print_json(&json!({
            "success": true,
            "range": range_json(&range),
            "source_checked": args.source_duration.is_some(),
        }));
    } else {
        println!("Valid clip: {}", range);
        if args.source_duration.is_none() {
            println!("  (not checked against the video length)");
        }
    }

    Ok(())
}

/// Execute the fetch command
pub async fn fetch(container: &dyn AppContainer, args: FetchArgs) -> Result<(), ClipError> {
    info!("Fetching clip {}", args.token);

    let artifacts = container.artifact_interactor();
    let artifact = artifacts.describe(&args.token).await?;
    let saved_to = artifacts.fetch(&args.token, &args.dest).await?;

    if args.json {
        print_json(&json!({
            "success": true,
            "file": artifact.token,
            "content_type": artifact.content_type,
            "size_bytes": artifact.size_bytes,
            "created_at": artifact.created_at.to_rfc3339(),
            "saved_to": saved_to,
        }));
    } else {
        println!(
            "Saved {} ({}) to {}",
            artifact.token,
            format_file_size(artifact.size_bytes),
            saved_to.display()
        );
    }

    Ok(())
}

/// Execute the purge command
pub async fn purge(
    container: &dyn AppContainer,
    args: PurgeArgs,
    default_age: Duration,
) -> Result<(), ClipError> {
    let max_age = args
        .older_than_secs
        .map(Duration::from_secs)
        .unwrap_or(default_age);
    info!(max_age_secs = max_age.as_secs(), "Purging stored clips");

    let removed = container.artifact_interactor().purge(max_age).await?;

    if args.json {
        print_json(&json!({ "success": true, "removed": removed }));
    } else {
        println!("Removed {} expired clip(s)", removed);
    }

    Ok(())
}

fn range_json(range: &ClipRange) -> serde_json::Value {
    json!({
        "start_seconds": range.start().seconds,
        "end_seconds": range.end().seconds,
        "duration_seconds": range.duration_seconds(),
        "start": range.start().format_hms(),
        "end": range.end().format_hms(),
    })
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}

/// Show a failed request to the user
fn report_failure(err: &ClipError, json_output: bool) {
    match err.class() {
        ErrorClass::ProcessingFailure => {
            error!(kind = err.kind(), error = %err, "Request failed")
        }
        _ => warn!(kind = err.kind(), error = %err, "Request rejected"),
    }

    if json_output {
        print_json(&json!({
            "success": false,
            "error": {
                "kind": err.kind(),
                "message": err.user_message(),
            },
        }));
    } else {
        eprintln!("Error: {}", err.user_message());
    }
}
