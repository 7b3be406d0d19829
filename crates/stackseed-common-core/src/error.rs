//! Error types shared by the Stackseed common crates.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Stackseed common operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error with custom message.
    #[error("{0}")]
    Generic(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error tied to a concrete path.
    #[error("{message}")]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new generic error.
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a file system error from an I/O failure on `path`.
    pub fn fs(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.into(),
            source: Some(source),
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileSystem { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The underlying I/O error kind, if any.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::FileSystem { source: Some(e), .. } => Some(e.kind()),
            Self::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type alias using Stackseed's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_fs_error_keeps_path_and_kind() {
        let err = Error::fs(
            "failed to read file: a.txt",
            "a.txt",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.path(), Some(std::path::Path::new("a.txt")));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
        assert_eq!(err.to_string(), "failed to read file: a.txt");
    }

    #[test]
    fn test_generic_error_has_no_path() {
        let err = Error::new("boom");
        assert!(err.path().is_none());
        assert!(err.io_kind().is_none());
        assert_eq!(Error::config("bad").to_string(), "Configuration error: bad");
    }
}
