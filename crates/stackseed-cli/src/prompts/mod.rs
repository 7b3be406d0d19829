//! Interactive prompts for CLI user input.

use std::io::{self, IsTerminal};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use stackseed_scaffold::{ProjectKind, ScaffoldPlan};

/// Check if we're in interactive mode
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Result type for prompts
pub type PromptResult<T> = Result<T, PromptError>;

/// Errors that can occur during prompts
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Input cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(io::Error),
}

impl From<dialoguer::Error> for PromptError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => Self::Cancelled,
            dialoguer::Error::IO(e) => Self::Io(e),
        }
    }
}

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Ask for the project directory name, re-prompting until it sanitizes to
/// something usable.
pub fn project_name(default: &str) -> PromptResult<String> {
    let name = Input::<String>::with_theme(&theme())
        .with_prompt("Project name")
        .default(default.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            validate_project_name(input)
        })
        .interact_text()?;
    Ok(name)
}

/// Pick the project kind. Esc cancels.
pub fn project_kind(default: ProjectKind) -> PromptResult<ProjectKind> {
    let labels: Vec<String> = ProjectKind::ALL
        .iter()
        .map(|kind| format!("{:<5} {}", kind.as_str(), kind.description()))
        .collect();
    let default_index = ProjectKind::ALL
        .iter()
        .position(|kind| *kind == default)
        .unwrap_or(0);

    Select::with_theme(&theme())
        .with_prompt("What are you building?")
        .items(&labels)
        .default(default_index)
        .interact_opt()?
        .map(|index| ProjectKind::ALL[index])
        .ok_or(PromptError::Cancelled)
}

/// Yes/no question. Esc cancels.
pub fn confirm(prompt: &str, default: bool) -> PromptResult<bool> {
    Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()?
        .ok_or(PromptError::Cancelled)
}

fn validate_project_name(input: &str) -> Result<(), String> {
    ScaffoldPlan::new(input, ProjectKind::Web, false, false)
        .map(|_| ())
        .map_err(|e| e.to_string())
}
