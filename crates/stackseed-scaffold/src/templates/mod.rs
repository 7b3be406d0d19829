//! Static template trees and their materialization.

mod builtin;
mod loader;
pub mod manifest;
pub mod renderer;

pub use manifest::TemplateManifest;
pub use renderer::TemplateRenderer;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stackseed_common_config::{StackseedConfig, TemplateSourceKind, TemplatesConfig};
use stackseed_common_fs::{self as sfs, path::safe_join};
use tracing::{debug, instrument};

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::plan::ScaffoldPlan;

/// Identifies one of the shipped template trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateTreeId {
    /// Files at the monorepo root.
    Root,
    /// The `api` member.
    Api,
    /// The `web` member.
    Web,
    /// The `app` member.
    App,
}

impl TemplateTreeId {
    /// Every tree id.
    pub const ALL: [TemplateTreeId; 4] = [Self::Root, Self::Api, Self::Web, Self::App];

    /// Directory name of the tree inside a template root.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Api => "api",
            Self::Web => "web",
            Self::App => "app",
        }
    }
}

impl fmt::Display for TemplateTreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file within a template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Relative path within the tree
    pub path: PathBuf,
    /// File content (may contain variables)
    pub content: String,
    /// Whether to substitute variables
    pub process: bool,
    /// Set the executable bit after writing (Unix)
    pub executable: bool,
}

impl TemplateFile {
    /// A processed, non-executable file.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            process: true,
            executable: false,
        }
    }
}

/// An ordered set of files copied as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTree {
    pub id: TemplateTreeId,
    /// Files in materialization order.
    pub files: Vec<TemplateFile>,
}

/// Variables available to `{{ name }}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    /// An empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value of `key`, if defined.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Standard variables for a plan: names, ports and pinned versions.
    pub fn from_plan(plan: &ScaffoldPlan, config: &StackseedConfig) -> Self {
        let mut vars = Self::new();

        vars.set("project_name", plan.project_name());
        vars.set("package_name", plan.package_name());
        vars.set("project_kind", plan.kind().as_str());

        vars.set("api_port", config.api.port.to_string());
        vars.set("web_port", config.web.port.to_string());
        vars.set("app_port", config.app.port.to_string());

        vars.set("biome_version", &config.versions.biome);
        vars.set("pnpm_version", &config.versions.pnpm);
        vars.set("node_version", &config.versions.node);
        vars.set("typescript_version", &config.versions.typescript);

        vars
    }
}

/// Where template trees are read from, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// Trees compiled into the binary.
    #[default]
    Builtin,
    /// A template root with one subdirectory per tree.
    Directory(PathBuf),
}

impl TemplateSource {
    /// Resolve the configured template location.
    ///
    /// `exe_dir` is where the upward search starts for
    /// [`TemplateSourceKind::Search`]. Relative `directory` values are taken
    /// as given; callers anchor them first.
    pub fn resolve(config: &TemplatesConfig, exe_dir: &Path) -> ScaffoldResult<Self> {
        match config.source {
            TemplateSourceKind::Builtin => Ok(Self::Builtin),
            TemplateSourceKind::Directory => match &config.directory {
                Some(dir) if dir.is_dir() => Ok(Self::Directory(dir.clone())),
                Some(dir) => Err(ScaffoldError::TemplateTreeNotFound {
                    search_root: dir.clone(),
                }),
                None => Err(ScaffoldError::InvalidTemplate {
                    path: PathBuf::new(),
                    message: "templates.source is 'directory' but templates.directory is not set"
                        .to_string(),
                }),
            },
            TemplateSourceKind::Search => {
                sfs::path::find_upward(exe_dir, &config.dir_name, config.max_levels)
                    .map(Self::Directory)
                    .ok_or_else(|| ScaffoldError::TemplateTreeNotFound {
                        search_root: exe_dir.to_path_buf(),
                    })
            }
        }
    }

    /// Load one tree.
    pub fn load(&self, id: TemplateTreeId) -> ScaffoldResult<TemplateTree> {
        match self {
            Self::Builtin => Ok(builtin::tree(id)),
            Self::Directory(root) => loader::load_tree(root, id),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("builtin"),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write every file of `tree` under `destination`.
///
/// All files are rendered before anything is written, so an undefined
/// variable leaves the destination untouched. Existing files at the same
/// relative path are replaced. Returns the written paths in tree order.
#[instrument(skip(tree, destination, vars), fields(tree = %tree.id, destination = %destination.display()))]
pub fn materialize(
    tree: &TemplateTree,
    destination: &Path,
    vars: &TemplateVars,
) -> ScaffoldResult<Vec<PathBuf>> {
    let renderer = TemplateRenderer::new();

    let mut rendered = Vec::with_capacity(tree.files.len());
    for file in &tree.files {
        let target = safe_join(destination, &file.path).ok_or_else(|| {
            ScaffoldError::InvalidTemplate {
                path: file.path.clone(),
                message: "path escapes the destination directory".to_string(),
            }
        })?;

        let content = if file.process {
            renderer.render(&file.path, &file.content, vars)?
        } else {
            file.content.clone()
        };

        rendered.push((target, content, file.executable));
    }

    sfs::ensure_dir(destination)?;

    let mut written = Vec::with_capacity(rendered.len());
    for (target, content, executable) in rendered {
        sfs::write_string_atomic(&target, &content)?;
        if executable {
            sfs::make_executable(&target)?;
        }
        debug!(path = %target.display(), "wrote template file");
        written.push(target);
    }

    Ok(written)
}
