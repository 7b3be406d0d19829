//! Scaffold planning and materialization for Stackseed.
//!
//! Turns a [`ScaffoldPlan`] into a pnpm monorepo on disk:
//!
//! 1. [`guard`] checks that the target directory is absent or empty.
//! 2. [`templates`] writes the statically shipped template trees.
//! 3. [`generator`] runs external generators and post-create commands.
//! 4. [`workspace`] writes `pnpm-workspace.yaml` and the root `package.json`.
//!
//! [`builder::ProjectBuilder`] sequences these steps into a single run.

pub mod builder;
pub mod error;
pub mod generator;
pub mod guard;
pub mod plan;
pub mod templates;
pub mod workspace;

pub use builder::{BuildContext, BuildReporter, NoopReporter, ProjectBuilder, ScaffoldReport, Stage};
pub use error::{ScaffoldError, ScaffoldResult};
pub use generator::{invoke, CommandRunner, Invocation, SystemRunner};
pub use guard::ensure_usable_root;
pub use plan::{sanitize_project_name, ProjectKind, ScaffoldPlan};
pub use templates::{materialize, TemplateSource, TemplateTree, TemplateTreeId, TemplateVars};
pub use workspace::{
    patch_or_write_root_manifest, workspace_members, write_workspace_manifest, ManifestMode,
};
