//! `pnpm-workspace.yaml` and root `package.json`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use stackseed_common_config::VersionsConfig;
use stackseed_common_fs as sfs;
use tracing::{debug, instrument};

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::plan::{ProjectKind, ScaffoldPlan};

/// Workspace descriptor file name.
pub const WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Root manifest file name.
pub const ROOT_MANIFEST: &str = "package.json";

/// Wildcard for auxiliary shared packages.
pub const AUX_PACKAGES_GLOB: &str = "packages/*";

const BIOME_PACKAGE: &str = "@biomejs/biome";
const CHECK_SCRIPT: &str = "biome check --write .";
const FORMAT_SCRIPT: &str = "biome format --write .";

/// Workspace members for `kind`: `api` first, the front ends, then the wildcard.
pub fn workspace_members(kind: ProjectKind) -> Vec<String> {
    let mut members = vec!["api".to_string()];
    if kind.has_web() {
        members.push("web".to_string());
    }
    if kind.has_app() {
        members.push("app".to_string());
    }
    members.push(AUX_PACKAGES_GLOB.to_string());
    members
}

/// Render the workspace descriptor, one double-quoted entry per member.
pub fn render_workspace_manifest(members: &[String]) -> String {
    let mut out = String::from("packages:\n");
    for member in members {
        out.push_str("  - ");
        out.push_str(&Value::from(member.as_str()).to_string());
        out.push('\n');
    }
    out
}

/// Write `<root>/pnpm-workspace.yaml`, replacing any existing file.
#[instrument(skip(root, members), fields(root = %root.display()))]
pub fn write_workspace_manifest(root: &Path, members: &[String]) -> ScaffoldResult<PathBuf> {
    let path = root.join(WORKSPACE_FILE);
    sfs::write_string_atomic(&path, &render_workspace_manifest(members))?;
    debug!(members = members.len(), "wrote workspace descriptor");
    Ok(path)
}

/// How the root manifest is produced.
#[derive(Debug, Clone, Copy)]
pub enum ManifestMode<'a> {
    /// Patch an existing manifest, adding keys only where absent.
    Merge,
    /// Build the whole manifest for a new project, replacing anything present.
    Fresh(&'a ScaffoldPlan),
}

/// Produce `<root>/package.json` in the given mode.
///
/// Output is pretty-printed with two-space indentation and a trailing
/// newline. Existing key order is kept in merge mode.
#[instrument(skip(root, mode, versions), fields(root = %root.display()))]
pub fn patch_or_write_root_manifest(
    root: &Path,
    mode: ManifestMode<'_>,
    versions: &VersionsConfig,
) -> ScaffoldResult<PathBuf> {
    let path = root.join(ROOT_MANIFEST);

    let manifest = match mode {
        ManifestMode::Fresh(plan) => fresh_manifest(plan, versions),
        ManifestMode::Merge => {
            let mut manifest = read_manifest(&path)?;
            merge_tooling(&path, &mut manifest, versions)?;
            manifest
        }
    };

    let mut rendered = serde_json::to_string_pretty(&manifest)
        .map_err(|e| ScaffoldError::manifest(&path, "failed to serialize manifest", e))?;
    rendered.push('\n');

    sfs::write_string_atomic(&path, &rendered).map_err(|e| ScaffoldError::ManifestReadWrite {
        path: path.clone(),
        message: "failed to write manifest".to_string(),
        source: Some(Box::new(e)),
    })?;

    debug!(path = %path.display(), "wrote root manifest");
    Ok(path)
}

fn fresh_manifest(plan: &ScaffoldPlan, versions: &VersionsConfig) -> Value {
    let kind = plan.kind();
    let mut scripts = Map::new();

    if kind.has_web() {
        scripts.insert(
            "dev".into(),
            "pnpm --parallel --filter ./api --filter ./web dev".into(),
        );
    }
    scripts.insert("dev:api".into(), "pnpm --filter ./api dev".into());
    if kind.has_web() {
        scripts.insert("dev:web".into(), "pnpm --filter ./web dev".into());
    }
    if kind.has_app() {
        scripts.insert("dev:app".into(), "pnpm --filter ./app start".into());
    }
    scripts.insert("check".into(), CHECK_SCRIPT.into());
    scripts.insert("format".into(), FORMAT_SCRIPT.into());

    let mut dev_dependencies = Map::new();
    dev_dependencies.insert(BIOME_PACKAGE.into(), versions.biome.clone().into());

    let mut manifest = Map::new();
    manifest.insert("name".into(), plan.package_name().into());
    manifest.insert("private".into(), true.into());
    manifest.insert("version".into(), "0.0.0".into());
    manifest.insert("scripts".into(), Value::Object(scripts));
    manifest.insert("devDependencies".into(), Value::Object(dev_dependencies));

    Value::Object(manifest)
}

fn read_manifest(path: &Path) -> ScaffoldResult<Value> {
    let content = sfs::read_to_string(path)
        .map_err(|e| ScaffoldError::manifest(path, "failed to read manifest", e))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| ScaffoldError::manifest(path, "manifest is not valid JSON", e))?;

    if !value.is_object() {
        return Err(ScaffoldError::ManifestReadWrite {
            path: path.to_path_buf(),
            message: "manifest root is not an object".to_string(),
            source: None,
        });
    }
    Ok(value)
}

fn merge_tooling(path: &Path, manifest: &mut Value, versions: &VersionsConfig) -> ScaffoldResult<()> {
    let scripts = object_entry(path, manifest, "scripts")?;
    add_if_absent(scripts, "check", CHECK_SCRIPT);
    add_if_absent(scripts, "format", FORMAT_SCRIPT);

    let dev_dependencies = object_entry(path, manifest, "devDependencies")?;
    add_if_absent(dev_dependencies, BIOME_PACKAGE, &versions.biome);

    Ok(())
}

/// The object under `key`, inserted empty when missing.
fn object_entry<'a>(
    path: &Path,
    manifest: &'a mut Value,
    key: &str,
) -> ScaffoldResult<&'a mut Map<String, Value>> {
    let not_object = || ScaffoldError::ManifestReadWrite {
        path: path.to_path_buf(),
        message: format!("`{key}` is not an object"),
        source: None,
    };

    manifest
        .as_object_mut()
        .ok_or_else(not_object)?
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(not_object)
}

fn add_if_absent(map: &mut Map<String, Value>, key: &str, value: &str) {
    if !map.contains_key(key) {
        map.insert(key.to_string(), Value::from(value));
    }
}
