//! Doctor command implementation.

use std::fmt;
use std::process::Stdio;

use clap::Parser;
use console::style;
use serde::Serialize;
use stackseed_scaffold::TemplateSource;
use tokio::process::Command;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{IconContext, Output};

/// Check that required external tools are installed
#[derive(Debug, Parser)]
pub struct DoctorCommand {}

/// Result of probing one program.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    pub name: String,
    pub program: String,
    pub available: bool,
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    tools: Vec<ToolCheck>,
    templates: String,
    #[serde(skip)]
    icons: IconContext,
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", style("Environment:").bold())?;
        for tool in &self.tools {
            match (&tool.version, tool.available) {
                (Some(version), true) => {
                    writeln!(f, "  {} {} {version}", style(self.icons.check()).green(), tool.name)?
                }
                (None, true) => writeln!(f, "  {} {} installed", style(self.icons.check()).green(), tool.name)?,
                (_, false) => writeln!(
                    f,
                    "  {} {} not found (`{}`)",
                    style(self.icons.cross()).red(),
                    tool.name,
                    tool.program
                )?,
            }
        }
        write!(f, "Templates: {}", self.templates)
    }
}

impl DoctorCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let post = &ctx.config.post_create;
        let probes = [
            ("node", "node"),
            ("package manager", post.install.program.as_str()),
            ("git", post.git.program.as_str()),
        ];

        let mut tools = Vec::with_capacity(probes.len());
        for (name, program) in probes {
            tools.push(probe(name, program).await);
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| ctx.cwd.clone());
        let templates = TemplateSource::resolve(&ctx.config.templates, &exe_dir)?;

        let missing: Vec<String> = tools
            .iter()
            .filter(|t| !t.available)
            .map(|t| t.program.clone())
            .collect();

        Output::new(ctx).print(&DoctorReport {
            tools,
            templates: templates.to_string(),
            icons: IconContext::new(),
        })?;

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CliError::not_found_with_suggestions(
                "program",
                missing.join(", "),
                missing.iter().map(|p| format!("install `{p}` and make sure it is on PATH")).collect(),
            ))
        }
    }
}

/// Run `<program> --version` and capture the first line of its output.
async fn probe(name: &str, program: &str) -> ToolCheck {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await;

    let (available, version) = match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty());
            (true, version)
        }
        _ => (false, None),
    };

    ToolCheck {
        name: name.to_string(),
        program: program.to_string(),
        available,
        version,
    }
}
