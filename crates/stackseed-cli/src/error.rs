//! CLI error handling and formatting.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use stackseed_common_config::ConfigError;
use stackseed_scaffold::ScaffoldError;
use thiserror::Error;

use crate::prompts::PromptError;

pub mod formatter;
pub mod handler;

pub use formatter::ErrorFormatter;
pub use handler::{handle_result, setup_panic_handler};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// CLI error type with rich context
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxError>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: Option<BoxError>,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Validation {
        message: String,
        path: Option<PathBuf>,
        hint: Option<String>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: String,
        resource_name: String,
        suggestions: Vec<String>,
    },

    #[error("{message}")]
    Command {
        message: String,
        command: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    User {
        message: String,
        hint: Option<String>,
    },

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::Validation { .. } => "E004",
            Self::NotFound { .. } => "E005",
            Self::Command { .. } => "E007",
            Self::User { .. } => "E010",
            Self::Cancelled => "E011",
            Self::Other(_) => "E999",
        }
    }

    /// Numeric process exit status.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::Validation { .. } => 5,
            Self::NotFound { .. } => 6,
            Self::Command { .. } => 8,
            Self::Cancelled => 130,
            Self::User { .. } | Self::Other(_) => 1,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::Validation { hint, .. } | Self::User { hint, .. } => {
                hint.as_deref()
            }
            Self::NotFound { suggestions, .. } if !suggestions.is_empty() => {
                Some("See suggestions below")
            }
            _ => None,
        }
    }

    /// Get suggestions for this error
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::NotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// The file system path this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::Validation { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
            path: None,
        }
    }

    /// Create a not found error with suggestions
    pub fn not_found_with_suggestions(
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_name = resource_name.into();
        Self::NotFound {
            message: format!("{resource_type} not found: {resource_name}"),
            resource_type,
            resource_name,
            suggestions,
        }
    }

    /// Create a user error with hint
    pub fn user_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

// Conversion implementations
impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(Box::new(err)),
            path: None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check .stackseed/config.yaml or the file given with --config".to_string()),
        }
    }
}

impl From<PromptError> for CliError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Cancelled => Self::Cancelled,
            PromptError::Io(e) => Self::io("failed to read from the terminal", e),
        }
    }
}

impl From<ScaffoldError> for CliError {
    fn from(err: ScaffoldError) -> Self {
        let message = err.to_string();
        match err {
            ScaffoldError::DirectoryNotEmpty { path } => Self::Validation {
                message,
                path: Some(path),
                hint: Some("choose another project name or empty the directory first".to_string()),
            },
            ScaffoldError::InvalidProjectName { .. } => Self::Validation {
                message,
                path: None,
                hint: Some("use letters, digits, '-', '_' or '.'".to_string()),
            },
            ScaffoldError::InvalidTemplate { path, .. } | ScaffoldError::TemplateRender { path, .. } => {
                Self::Validation {
                    message,
                    path: Some(path),
                    hint: Some("check the template directory given with --templates or templates.directory".to_string()),
                }
            }
            ScaffoldError::TemplateTreeNotFound { search_root } => Self::NotFound {
                message,
                resource_type: "template tree".to_string(),
                resource_name: search_root.display().to_string(),
                suggestions: vec![
                    "pass --templates DIR".to_string(),
                    "set templates.source to 'builtin'".to_string(),
                ],
            },
            ScaffoldError::GeneratorFailed { command, source, .. } => Self::Command {
                message,
                command,
                source: source.map(|e| Box::new(e) as BoxError),
            },
            ScaffoldError::ManifestReadWrite { path, source, .. } => Self::Io {
                message,
                source,
                path: Some(path),
            },
            ScaffoldError::FileSystem(inner) => Self::Io {
                message,
                path: inner.path().map(|p| p.to_path_buf()),
                source: Some(Box::new(inner)),
            },
        }
    }
}
