//! Optional `template.toml` carried by an on-disk template tree.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stackseed_common_fs as sfs;

use crate::error::{ScaffoldError, ScaffoldResult};

/// File name of the manifest inside a tree directory.
pub const MANIFEST_FILE: &str = "template.toml";

/// Template manifest (template.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Free-form description of the tree.
    #[serde(default)]
    pub description: Option<String>,

    /// Files to exclude or copy verbatim
    #[serde(default)]
    pub files: FileConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Glob patterns for files left out of the tree
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Glob patterns for files copied without variable substitution
    #[serde(default)]
    pub no_process: Vec<String>,
}

impl TemplateManifest {
    /// Load a manifest file.
    pub fn load(path: &Path) -> ScaffoldResult<Self> {
        let content = sfs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse manifest contents; `path` is used for error reporting.
    pub fn parse(path: &Path, content: &str) -> ScaffoldResult<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| ScaffoldError::InvalidTemplate {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        manifest.compile(path)?;
        Ok(manifest)
    }

    /// Compile the glob lists into matchers.
    pub fn compile(&self, path: &Path) -> ScaffoldResult<FileRules> {
        Ok(FileRules {
            exclude: compile_patterns(path, &self.files.exclude)?,
            no_process: compile_patterns(path, &self.files.no_process)?,
        })
    }
}

/// Compiled [`FileConfig`].
#[derive(Debug, Clone, Default)]
pub struct FileRules {
    exclude: Vec<glob::Pattern>,
    no_process: Vec<glob::Pattern>,
}

impl FileRules {
    /// Whether a `/`-separated relative path is excluded.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(rel_path))
    }

    /// Whether a `/`-separated relative path gets variable substitution.
    pub fn should_process(&self, rel_path: &str) -> bool {
        !self.no_process.iter().any(|p| p.matches(rel_path))
    }
}

fn compile_patterns(path: &Path, patterns: &[String]) -> ScaffoldResult<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|e| ScaffoldError::InvalidTemplate {
                path: path.to_path_buf(),
                message: format!("invalid glob '{pattern}': {e}"),
            })
        })
        .collect()
}
