//! `stackseed new`: prompt for a plan and scaffold it.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use stackseed_common_config::TemplateSourceKind;
use stackseed_scaffold::{
    BuildContext, ProjectBuilder, ProjectKind, ScaffoldPlan, ScaffoldReport, SystemRunner,
    TemplateSource,
};
use tracing::debug;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;
use crate::output::{IconContext, Output, ProgressReporter};
use crate::prompts;

/// Name used when `--yes` is given without one.
pub const DEFAULT_PROJECT_NAME: &str = "my-app";

/// Create a new monorepo
#[derive(Debug, Parser)]
pub struct NewCommand {
    /// Project directory name (prompted when omitted)
    pub name: Option<String>,

    /// Front ends to include: web, app or full
    #[arg(short, long)]
    pub kind: Option<ProjectKind>,

    /// Run the install command after generation
    #[arg(long, overrides_with = "no_install")]
    pub install: bool,

    /// Skip the install command
    #[arg(long, overrides_with = "install")]
    pub no_install: bool,

    /// Initialize a git repository
    #[arg(long, overrides_with = "no_git")]
    pub git: bool,

    /// Skip git initialization
    #[arg(long, overrides_with = "git")]
    pub no_git: bool,

    /// Accept defaults for everything not given on the command line
    #[arg(short, long)]
    pub yes: bool,

    /// Read template trees from DIR instead of the built-in ones
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub templates: Option<PathBuf>,
}

/// Answers gathered from flags and prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub name: String,
    pub kind: ProjectKind,
    pub install: bool,
    pub git: bool,
}

impl NewCommand {
    pub fn install_choice(&self) -> Option<bool> {
        flag_choice(self.install, self.no_install)
    }

    pub fn git_choice(&self) -> Option<bool> {
        flag_choice(self.git, self.no_git)
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let templates = self.resolve_templates(ctx)?;
        debug!(templates = %templates, "resolved template source");

        let answers = self.collect_answers(prompts::is_interactive())?;
        let plan = ScaffoldPlan::new(&answers.name, answers.kind, answers.install, answers.git)?;

        let build_ctx = BuildContext::new(&ctx.cwd, ctx.config.clone(), templates);
        // JSON goes to stdout, so child output is moved to stderr.
        let runner = SystemRunner::new().stdout_to_stderr(ctx.format == OutputFormat::Json);
        let builder = ProjectBuilder::new(build_ctx, Arc::new(runner))
            .with_reporter(Arc::new(ProgressReporter::new(ctx)));

        let report = builder.build(&plan).await?;

        Output::new(ctx).print(&Created {
            plan: &plan,
            report: &report,
        })
    }

    /// Template source from `--templates` or the configuration.
    fn resolve_templates(&self, ctx: &CommandContext) -> Result<TemplateSource, CliError> {
        let mut config = ctx.config.templates.clone();
        if let Some(dir) = &self.templates {
            config.source = TemplateSourceKind::Directory;
            config.directory = Some(ctx.resolve(dir));
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| ctx.cwd.clone());

        Ok(TemplateSource::resolve(&config, &exe_dir)?)
    }

    /// Fill every answer from flags, prompting only when `interactive`.
    ///
    /// Nothing here touches the file system, so a cancelled prompt exits
    /// before any project file exists.
    pub fn collect_answers(&self, interactive: bool) -> Result<Answers, CliError> {
        let interactive = interactive && !self.yes;

        let name = match &self.name {
            Some(name) => name.clone(),
            None if self.yes => DEFAULT_PROJECT_NAME.to_string(),
            None if interactive => prompts::project_name(DEFAULT_PROJECT_NAME)?,
            None => {
                return Err(CliError::user_with_hint(
                    "a project name is required when not running interactively",
                    "pass a NAME argument or --yes to use the default",
                ))
            }
        };

        let kind = match self.kind {
            Some(kind) => kind,
            None if interactive => prompts::project_kind(ProjectKind::Web)?,
            None => ProjectKind::Web,
        };

        let install = match self.install_choice() {
            Some(install) => install,
            None if interactive => prompts::confirm("Install dependencies now?", true)?,
            None => true,
        };

        let git = match self.git_choice() {
            Some(git) => git,
            None if interactive => prompts::confirm("Initialize a git repository?", true)?,
            None => true,
        };

        Ok(Answers {
            name,
            kind,
            install,
            git,
        })
    }
}

fn flag_choice(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Success output of `stackseed new`.
#[derive(Debug, Serialize)]
struct Created<'a> {
    plan: &'a ScaffoldPlan,
    report: &'a ScaffoldReport,
}

impl std::fmt::Display for Created<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} Created {} ({}) in {}",
            console::style(IconContext::new().check()).green(),
            console::style(self.plan.project_name()).bold(),
            self.plan.kind().description(),
            self.report.root.display()
        )?;
        writeln!(f)?;
        writeln!(f, "Next steps:")?;
        writeln!(f, "  cd {}", self.plan.project_name())?;
        if !self.plan.install() {
            writeln!(f, "  pnpm install")?;
        }
        if self.plan.kind().has_web() {
            write!(f, "  pnpm dev")
        } else {
            write!(f, "  pnpm dev:api")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> NewCommand {
        NewCommand::try_parse_from(std::iter::once("new").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_yes_fills_defaults() {
        let answers = command(&["--yes"]).collect_answers(true).unwrap();
        assert_eq!(
            answers,
            Answers {
                name: DEFAULT_PROJECT_NAME.to_string(),
                kind: ProjectKind::Web,
                install: true,
                git: true,
            }
        );
    }

    #[test]
    fn test_flags_are_used_without_prompting() {
        let answers = command(&["shop", "--kind", "app", "--no-install", "--no-git"])
            .collect_answers(false)
            .unwrap();
        assert_eq!(answers.name, "shop");
        assert_eq!(answers.kind, ProjectKind::App);
        assert!(!answers.install);
        assert!(!answers.git);
    }

    #[test]
    fn test_missing_name_without_terminal_is_usage_error() {
        let err = command(&[]).collect_answers(false).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
        assert!(err.hint().unwrap().contains("--yes"));
    }

    #[test]
    fn test_flag_choice() {
        assert_eq!(flag_choice(false, false), None);
        assert_eq!(flag_choice(true, false), Some(true));
        assert_eq!(flag_choice(false, true), Some(false));
    }
}
