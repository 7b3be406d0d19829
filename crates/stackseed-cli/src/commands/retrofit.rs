//! `stackseed retrofit`: add Biome tooling to an existing workspace.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use stackseed_scaffold::{patch_or_write_root_manifest, ManifestMode};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{IconContext, Output};

/// Add the `check`/`format` scripts and the pinned Biome dev dependency to an
/// existing `package.json`, leaving every existing key untouched.
#[derive(Debug, Parser)]
pub struct RetrofitCommand {
    /// Directory containing package.json (defaults to the working directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Retrofitted {
    manifest: PathBuf,
    biome: String,
}

impl std::fmt::Display for Retrofitted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Added Biome {} tooling to {}",
            console::style(IconContext::new().check()).green(),
            self.biome,
            self.manifest.display()
        )
    }
}

impl RetrofitCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let root = match &self.dir {
            Some(dir) => ctx.resolve(dir),
            None => ctx.cwd.clone(),
        };

        let manifest = patch_or_write_root_manifest(&root, ManifestMode::Merge, &ctx.config.versions)?;

        Output::new(ctx).print(&Retrofitted {
            manifest,
            biome: ctx.config.versions.biome.clone(),
        })
    }
}
