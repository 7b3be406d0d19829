//! Scaffold error taxonomy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for scaffold operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Every condition that aborts a scaffold run.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The target root exists and has entries.
    #[error("target directory is not empty: {}", path.display())]
    DirectoryNotEmpty { path: PathBuf },

    /// An external generator or post-create command exited nonzero or failed to spawn.
    #[error("{generator} (`{command}`) {}", describe_exit(*code, source.is_some()))]
    GeneratorFailed {
        generator: String,
        command: String,
        code: Option<i32>,
        #[source]
        source: Option<io::Error>,
    },

    /// A template tree could not be located.
    #[error("template tree not found (searched from {})", search_root.display())]
    TemplateTreeNotFound { search_root: PathBuf },

    /// A template tree exists but is unusable.
    #[error("invalid template {}: {message}", path.display())]
    InvalidTemplate { path: PathBuf, message: String },

    /// A template references a variable that has no value.
    #[error("cannot render {}: {message}", path.display())]
    TemplateRender { path: PathBuf, message: String },

    /// A manifest could not be read, parsed or written.
    #[error("failed to read or write manifest {}: {message}", path.display())]
    ManifestReadWrite {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The project name is empty or not usable as a directory name.
    #[error("invalid project name {name:?}: {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Any other file system failure.
    #[error(transparent)]
    FileSystem(#[from] stackseed_common_core::Error),
}

fn describe_exit(code: Option<i32>, spawn_failed: bool) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None if spawn_failed => "could not be started".to_string(),
        None => "was terminated by a signal".to_string(),
    }
}

impl ScaffoldError {
    /// Create a manifest error with a cause.
    pub fn manifest(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ManifestReadWrite {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The file system path this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DirectoryNotEmpty { path }
            | Self::InvalidTemplate { path, .. }
            | Self::TemplateRender { path, .. }
            | Self::ManifestReadWrite { path, .. } => Some(path),
            Self::TemplateTreeNotFound { search_root } => Some(search_root),
            Self::FileSystem(e) => e.path(),
            Self::GeneratorFailed { .. } | Self::InvalidProjectName { .. } => None,
        }
    }
}
