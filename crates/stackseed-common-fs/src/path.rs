//! Path manipulation utilities.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` without hitting the filesystem.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => components.push(Component::Prefix(p)),
            Component::RootDir => {
                components.clear();
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::ParentDir) | None => components.push(Component::ParentDir),
                _ => {} // Don't pop prefix or root dir
            },
            Component::Normal(c) => components.push(Component::Normal(c)),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Join paths safely, preventing path traversal.
///
/// Returns `None` when `path` is absolute or contains a `..` component.
pub fn safe_join(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Option<PathBuf> {
    let base = base.as_ref();
    let path = path.as_ref();

    if path.is_absolute() {
        return None;
    }

    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return None;
    }

    Some(base.join(path))
}

/// Search upward from `start` for a directory named `name`.
///
/// Checks `start/name`, then `start/../name`, and so on, visiting at most
/// `max_levels` directories (`start` included).
pub fn find_upward(start: impl AsRef<Path>, name: &str, max_levels: usize) -> Option<PathBuf> {
    let mut current = normalize(start);

    for _ in 0..max_levels {
        let candidate = current.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }

        if !current.pop() || current.as_os_str().is_empty() {
            return None;
        }
    }

    None
}

/// Convert a path to a Unix-style string (forward slashes).
pub fn to_unix_string(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a/b/../c"), PathBuf::from("a/c"));
        assert_eq!(normalize("a/./b"), PathBuf::from("a/b"));
        assert_eq!(normalize("../a/b"), PathBuf::from("../a/b"));
        assert_eq!(normalize("/a/../b"), PathBuf::from("/b"));
    }

    #[test]
    fn test_safe_join() {
        assert_eq!(
            safe_join("/base", "file.txt"),
            Some(PathBuf::from("/base/file.txt"))
        );
        assert_eq!(safe_join("/base", "../escape"), None);
        assert_eq!(safe_join("/base", "/absolute"), None);
    }

    #[test]
    fn test_to_unix_string() {
        assert_eq!(to_unix_string(PathBuf::from("a").join("b").join("c")), "a/b/c");
    }
}
