//! Target directory guard.

use std::io;
use std::path::Path;

use stackseed_common_core::Error;
use stackseed_common_fs as sfs;
use tracing::debug;

use crate::error::{ScaffoldError, ScaffoldResult};

/// Make sure `path` is a directory with no entries.
///
/// A missing directory is created (with parents), an empty one is left as is.
/// Anything else, including a regular file at `path`, is rejected with
/// [`ScaffoldError::DirectoryNotEmpty`] and nothing is touched.
pub fn ensure_usable_root(path: &Path) -> ScaffoldResult<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "creating target directory");
            sfs::ensure_dir(path)?;
            return Ok(());
        }
        Err(e) => {
            return Err(Error::fs(format!("failed to inspect {}", path.display()), path, e).into())
        }
    };

    if !metadata.is_dir() || !sfs::is_empty_dir(path)? {
        return Err(ScaffoldError::DirectoryNotEmpty {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "target directory exists and is empty");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackseed_test_utils::{read_tree, temp_dir};
    use std::fs;

    #[test]
    fn test_creates_missing_directory_with_parents() {
        let dir = temp_dir();
        let target = dir.path().join("a/b/demo");

        ensure_usable_root(&target).unwrap();
        assert!(target.is_dir());
        assert!(sfs::is_empty_dir(&target).unwrap());
    }

    #[test]
    fn test_empty_directory_is_idempotent() {
        let dir = temp_dir();
        let target = dir.path().join("demo");
        fs::create_dir(&target).unwrap();

        ensure_usable_root(&target).unwrap();
        ensure_usable_root(&target).unwrap();
        assert!(sfs::is_empty_dir(&target).unwrap());
    }

    #[test]
    fn test_non_empty_directory_is_rejected_untouched() {
        let dir = temp_dir();
        let target = dir.path().join("demo");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "mine").unwrap();
        let before = read_tree(&target);

        match ensure_usable_root(&target).unwrap_err() {
            ScaffoldError::DirectoryNotEmpty { path } => assert_eq!(path, target),
            other => panic!("Expected DirectoryNotEmpty, got {other:?}"),
        }
        assert_eq!(read_tree(&target), before);
    }

    #[test]
    fn test_directory_with_only_subdirectory_is_rejected() {
        let dir = temp_dir();
        let target = dir.path().join("demo");
        fs::create_dir_all(target.join("nested")).unwrap();

        assert!(matches!(
            ensure_usable_root(&target),
            Err(ScaffoldError::DirectoryNotEmpty { .. })
        ));
        assert!(target.join("nested").is_dir());
    }

    #[test]
    fn test_regular_file_is_rejected() {
        let dir = temp_dir();
        let target = dir.path().join("demo");
        fs::write(&target, "file").unwrap();

        assert!(matches!(
            ensure_usable_root(&target),
            Err(ScaffoldError::DirectoryNotEmpty { .. })
        ));
        assert_eq!(fs::read_to_string(&target).unwrap(), "file");
    }
}
