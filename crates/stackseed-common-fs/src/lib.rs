//! File system utilities for Stackseed.

pub mod path;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use stackseed_common_core::{Error, Result};

/// Read a file to string.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::fs(format!("file not found: {}", path.display()), path, e),
        _ => Error::fs(format!("failed to read file: {}", path.display()), path, e),
    })
}

/// Write to a file atomically (write to temp, then rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new("."));

    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    if let Some(name) = path.file_name() {
        temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy()));
    } else {
        temp_path.push(".tmp");
    }

    {
        let mut file = File::create(&temp_path).map_err(|e| {
            Error::fs(
                format!("failed to create temporary file: {}", temp_path.display()),
                &temp_path,
                e,
            )
        })?;

        file.write_all(contents).map_err(|e| {
            Error::fs(
                format!("failed to write to temporary file: {}", temp_path.display()),
                &temp_path,
                e,
            )
        })?;

        file.sync_all().map_err(|e| {
            Error::fs(
                format!("failed to sync temporary file: {}", temp_path.display()),
                &temp_path,
                e,
            )
        })?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::fs(
            format!("failed to rename temporary file to target: {}", path.display()),
            path,
            e,
        )
    })
}

/// Write string to file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Ensure a directory exists, creating parents as needed.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| {
            Error::fs(format!("failed to create directory: {}", path.display()), path, e)
        })?;
    }
    Ok(())
}

/// Check whether a directory has no entries.
///
/// Fails if `path` cannot be read as a directory (including when it is a file).
pub fn is_empty_dir(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let mut entries = fs::read_dir(path).map_err(|e| {
        Error::fs(format!("failed to read directory: {}", path.display()), path, e)
    })?;
    Ok(entries.next().is_none())
}

/// Set file permissions.
#[cfg(unix)]
pub fn set_permissions(path: impl AsRef<Path>, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let path = path.as_ref();
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        Error::fs(format!("failed to set permissions for: {}", path.display()), path, e)
    })
}

/// Set file permissions (no-op on Windows).
#[cfg(not(unix))]
pub fn set_permissions(_path: impl AsRef<Path>, _mode: u32) -> Result<()> {
    Ok(())
}

/// Make a file executable.
pub fn make_executable(path: impl AsRef<Path>) -> Result<()> {
    set_permissions(path, 0o755)
}
