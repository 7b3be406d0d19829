//! Environment variable handling.

use std::env;
use std::path::Path;

use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    pub const STACKSEED_CONFIG: &str = "STACKSEED_CONFIG";
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Initialize environment from `.env` files in the current directory.
    pub fn init() -> Result<Self, EnvError> {
        Self::init_from(Path::new("."))
    }

    /// Load `.env.local` and then `.env` from `dir`.
    ///
    /// Missing files are ignored. Variables already set in the process are
    /// never replaced, and `.env.local` takes precedence over `.env`.
    pub fn init_from(dir: &Path) -> Result<Self, EnvError> {
        for name in [".env.local", ".env"] {
            match dotenvy::from_filename(dir.join(name)) {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Self { _guard: () })
    }

    /// Whether colored output was disabled through `NO_COLOR`.
    pub fn no_color() -> bool {
        env::var_os(vars::NO_COLOR).is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_environment_init_without_files() {
        let dir = tempdir().unwrap();
        assert!(Environment::init_from(dir.path()).is_ok());
    }

    #[test]
    fn test_exported_variable_wins_over_dotenv() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env"), "STACKSEED_TEST_EXPORTED=trace\n").unwrap();
        env::set_var("STACKSEED_TEST_EXPORTED", "error");

        Environment::init_from(dir.path()).unwrap();

        assert_eq!(env::var("STACKSEED_TEST_EXPORTED").unwrap(), "error");
        env::remove_var("STACKSEED_TEST_EXPORTED");
    }

    #[test]
    fn test_local_file_takes_precedence() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".env"),
            "STACKSEED_TEST_LAYERED=shared\nSTACKSEED_TEST_SHARED_ONLY=yes\n",
        )
        .unwrap();
        fs::write(dir.path().join(".env.local"), "STACKSEED_TEST_LAYERED=local\n").unwrap();

        Environment::init_from(dir.path()).unwrap();

        assert_eq!(env::var("STACKSEED_TEST_LAYERED").unwrap(), "local");
        assert_eq!(env::var("STACKSEED_TEST_SHARED_ONLY").unwrap(), "yes");
    }
}
