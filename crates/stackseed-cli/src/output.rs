//! Output formatting utilities for CLI commands.

pub mod icons;

use std::fmt::Display;

use console::style;
use serde::Serialize;
use stackseed_scaffold::{BuildReporter, Stage};

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

pub use icons::IconContext;

/// Format-aware printer for command results.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            format: ctx.format,
            quiet: ctx.quiet,
        }
    }

    /// Print a value as text or JSON on stdout.
    ///
    /// `--quiet` silences text output only; JSON is always printed.
    pub fn print<T>(&self, value: &T) -> Result<(), CliError>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(value).map_err(|e| {
                    CliError::Other(anyhow::anyhow!("JSON serialization failed: {e}"))
                })?;
                println!("{json}");
            }
            OutputFormat::Text if self.quiet => {}
            OutputFormat::Text => println!("{value}"),
        }
        Ok(())
    }
}

/// Prints each build stage to stderr as it starts.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    enabled: bool,
    icons: IconContext,
}

impl ProgressReporter {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            enabled: ctx.format == OutputFormat::Text && !ctx.quiet,
            icons: IconContext::new(),
        }
    }

    /// Line printed for `stage`.
    pub fn line(&self, stage: Stage) -> String {
        format!("{} {}", style(self.icons.arrow()).cyan(), stage.label())
    }
}

impl BuildReporter for ProgressReporter {
    fn stage_started(&self, stage: Stage) {
        if self.enabled {
            eprintln!("{}", self.line(stage));
        }
    }
}
