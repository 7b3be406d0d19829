//! Error handling utilities.

use std::panic;
use std::process::ExitCode;

use crate::cli::OutputFormat;
use crate::error::{CliError, ErrorFormatter};

/// Set up panic handler for user-friendly panic messages
pub fn setup_panic_handler() {
    panic::set_hook(Box::new(|panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        eprintln!("\nInternal error: {message}");
        eprintln!("\nThis is a bug in stackseed. Please report it at:");
        eprintln!("  https://github.com/stackseed/stackseed/issues");
        eprintln!("\nLocation: {location}");

        if std::env::var("RUST_BACKTRACE").is_ok() {
            eprintln!("\nBacktrace:");
            eprintln!("{:?}", std::backtrace::Backtrace::capture());
        } else {
            eprintln!("\nSet RUST_BACKTRACE=1 for a backtrace.");
        }
    }));
}

/// Handle a result and exit appropriately
pub fn handle_result<T>(
    result: Result<T, CliError>,
    format: OutputFormat,
    color: bool,
    verbose: bool,
) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(CliError::Cancelled) => {
            eprintln!("Cancelled.");
            CliError::Cancelled.exit_code()
        }
        Err(error) => {
            tracing::debug!(code = error.code(), "command failed: {error:?}");
            match format {
                OutputFormat::Json => eprintln!("{}", ErrorFormatter::new().format_json(&error)),
                OutputFormat::Text => ErrorFormatter::new()
                    .color(color)
                    .verbose(verbose)
                    .print(&error),
            }
            error.exit_code()
        }
    }
}
