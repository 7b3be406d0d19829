//! Template trees read from a directory on disk.

use std::path::Path;

use stackseed_common_fs::path::to_unix_string;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::templates::manifest::{TemplateManifest, MANIFEST_FILE};
use crate::templates::{TemplateFile, TemplateTree, TemplateTreeId};

/// Load `<root>/<id>` into a [`TemplateTree`].
///
/// Files are sorted by path so materialization order is stable. Hidden files
/// are part of the tree; only the top-level `template.toml` is skipped.
pub(crate) fn load_tree(root: &Path, id: TemplateTreeId) -> ScaffoldResult<TemplateTree> {
    let tree_dir = root.join(id.as_str());
    if !tree_dir.is_dir() {
        return Err(ScaffoldError::TemplateTreeNotFound {
            search_root: tree_dir,
        });
    }

    let manifest_path = tree_dir.join(MANIFEST_FILE);
    let manifest = if manifest_path.is_file() {
        TemplateManifest::load(&manifest_path)?
    } else {
        TemplateManifest::default()
    };
    let rules = manifest.compile(&manifest_path)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&tree_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ScaffoldError::InvalidTemplate {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| tree_dir.clone()),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(&tree_dir)
            .map_err(|e| ScaffoldError::InvalidTemplate {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?
            .to_path_buf();
        let rel_str = to_unix_string(&rel_path);

        if rel_str == MANIFEST_FILE || rules.is_excluded(&rel_str) {
            continue;
        }

        let bytes = std::fs::read(entry.path()).map_err(|e| {
            stackseed_common_core::Error::fs(
                format!("failed to read template file: {}", entry.path().display()),
                entry.path(),
                e,
            )
        })?;
        let content = String::from_utf8(bytes).map_err(|_| ScaffoldError::InvalidTemplate {
            path: entry.path().to_path_buf(),
            message: "template files must be UTF-8".to_string(),
        })?;

        files.push(TemplateFile {
            process: rules.should_process(&rel_str),
            executable: is_executable(&entry),
            path: rel_path,
            content,
        });
    }

    debug!(tree = %id, files = files.len(), root = %root.display(), "loaded template tree");
    Ok(TemplateTree { id, files })
}

#[cfg(unix)]
fn is_executable(entry: &walkdir::DirEntry) -> bool {
    use std::os::unix::fs::PermissionsExt;
    entry
        .metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_entry: &walkdir::DirEntry) -> bool {
    false
}
