//! Sequencing of one scaffold run.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use stackseed_common_config::{MemberSource, StackseedConfig};
use stackseed_common_fs as sfs;
use stackseed_common_log::spans::{scaffold_span, Timer};
use tracing::{info, Instrument};

use crate::error::ScaffoldResult;
use crate::generator::{invoke, CommandRunner, Invocation};
use crate::guard::ensure_usable_root;
use crate::plan::{ProjectKind, ScaffoldPlan};
use crate::templates::{materialize, TemplateSource, TemplateTreeId, TemplateVars};
use crate::workspace::{
    patch_or_write_root_manifest, workspace_members, write_workspace_manifest, ManifestMode,
    AUX_PACKAGES_GLOB,
};

/// Everything a run needs from its surroundings.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Directory the project folder is created in.
    pub cwd: PathBuf,
    /// Loaded configuration.
    pub config: StackseedConfig,
    /// Where template trees are read from.
    pub templates: TemplateSource,
}

impl BuildContext {
    /// Bundle the run inputs.
    pub fn new(cwd: impl Into<PathBuf>, config: StackseedConfig, templates: TemplateSource) -> Self {
        Self {
            cwd: cwd.into(),
            config,
            templates,
        }
    }
}

/// Steps of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GuardRoot,
    CreateDirs,
    MaterializeTemplates,
    GenerateWeb,
    ProvisionApp,
    WriteWorkspaceManifest,
    WriteRootManifest,
    Install,
    GitInit,
}

impl Stage {
    /// Human-readable progress label.
    pub fn label(self) -> &'static str {
        match self {
            Self::GuardRoot => "Checking target directory",
            Self::CreateDirs => "Creating directories",
            Self::MaterializeTemplates => "Writing root and api templates",
            Self::GenerateWeb => "Creating web front end",
            Self::ProvisionApp => "Creating mobile app",
            Self::WriteWorkspaceManifest => "Writing pnpm-workspace.yaml",
            Self::WriteRootManifest => "Writing package.json",
            Self::Install => "Installing dependencies",
            Self::GitInit => "Initializing git repository",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observer notified as the run progresses.
pub trait BuildReporter: Send + Sync {
    /// Called before `stage` starts.
    fn stage_started(&self, _stage: Stage) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl BuildReporter for NoopReporter {}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    /// The created project directory.
    pub root: PathBuf,
    pub kind: ProjectKind,
    /// Workspace members, as written to `pnpm-workspace.yaml`.
    pub members: Vec<String>,
    /// Stages that ran, in order.
    pub stages: Vec<Stage>,
    /// Number of files written from template trees.
    pub files_written: usize,
}

/// Executes a [`ScaffoldPlan`] against the file system.
pub struct ProjectBuilder {
    ctx: BuildContext,
    runner: Arc<dyn CommandRunner>,
    reporter: Arc<dyn BuildReporter>,
}

impl ProjectBuilder {
    /// Create a builder that spawns commands through `runner`.
    pub fn new(ctx: BuildContext, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            ctx,
            runner,
            reporter: Arc::new(NoopReporter),
        }
    }

    /// Replace the default [`NoopReporter`].
    pub fn with_reporter(mut self, reporter: Arc<dyn BuildReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The context this builder runs with.
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// `<cwd>/<project_name>`.
    pub fn target_dir(&self, plan: &ScaffoldPlan) -> PathBuf {
        self.ctx.cwd.join(plan.project_name())
    }

    /// Run every stage of `plan`, stopping at the first failure.
    ///
    /// Nothing is rolled back: a failed run leaves whatever was written so far.
    pub async fn build(&self, plan: &ScaffoldPlan) -> ScaffoldResult<ScaffoldReport> {
        let span = scaffold_span(plan.project_name(), plan.kind().as_str());
        self.run(plan).instrument(span).await
    }

    async fn run(&self, plan: &ScaffoldPlan) -> ScaffoldResult<ScaffoldReport> {
        let timer = Timer::start("scaffold");
        let config = &self.ctx.config;
        let kind = plan.kind();
        let root = self.target_dir(plan);
        let vars = TemplateVars::from_plan(plan, config);
        let members = workspace_members(kind);

        let mut stages = Vec::new();
        let mut files_written = 0;

        self.begin(Stage::GuardRoot);
        ensure_usable_root(&root)?;
        stages.push(Stage::GuardRoot);

        self.begin(Stage::CreateDirs);
        sfs::ensure_dir(root.join("api"))?;
        sfs::ensure_dir(root.join(AUX_PACKAGES_GLOB.trim_end_matches("/*")))?;
        stages.push(Stage::CreateDirs);

        self.begin(Stage::MaterializeTemplates);
        let root_tree = self.ctx.templates.load(TemplateTreeId::Root)?;
        let api_tree = self.ctx.templates.load(TemplateTreeId::Api)?;
        files_written += materialize(&root_tree, &root, &vars)?.len();
        files_written += materialize(&api_tree, &root.join("api"), &vars)?.len();
        stages.push(Stage::MaterializeTemplates);

        if kind.has_web() {
            self.begin(Stage::GenerateWeb);
            files_written += self
                .provision_member(
                    TemplateTreeId::Web,
                    config.web.source,
                    Invocation::from_spec(&config.web.generator, &root),
                    &vars,
                )
                .await?;
            stages.push(Stage::GenerateWeb);
        }

        if kind.has_app() {
            self.begin(Stage::ProvisionApp);
            files_written += self
                .provision_member(
                    TemplateTreeId::App,
                    config.app.source,
                    Invocation::from_spec(&config.app.generator, &root),
                    &vars,
                )
                .await?;
            stages.push(Stage::ProvisionApp);
        }

        self.begin(Stage::WriteWorkspaceManifest);
        write_workspace_manifest(&root, &members)?;
        stages.push(Stage::WriteWorkspaceManifest);

        self.begin(Stage::WriteRootManifest);
        patch_or_write_root_manifest(&root, ManifestMode::Fresh(plan), &config.versions)?;
        stages.push(Stage::WriteRootManifest);

        if plan.install() {
            self.begin(Stage::Install);
            let invocation = Invocation::from_spec(&config.post_create.install, &root);
            invoke(self.runner.as_ref(), "install", &invocation).await?;
            stages.push(Stage::Install);
        }

        if plan.git() {
            self.begin(Stage::GitInit);
            let invocation = Invocation::from_spec(&config.post_create.git, &root);
            invoke(self.runner.as_ref(), "git init", &invocation).await?;
            stages.push(Stage::GitInit);
        }

        timer.finish();
        info!(root = %root.display(), files = files_written, "project created");

        Ok(ScaffoldReport {
            root,
            kind,
            members,
            stages,
            files_written,
        })
    }

    /// Create `web` or `app` from its template tree or its generator.
    ///
    /// Generators run in the project root and create the member directory
    /// themselves. Returns the number of files written from templates.
    async fn provision_member(
        &self,
        id: TemplateTreeId,
        source: MemberSource,
        generator: Invocation,
        vars: &TemplateVars,
    ) -> ScaffoldResult<usize> {
        match source {
            MemberSource::Template => {
                let tree = self.ctx.templates.load(id)?;
                let destination = generator.cwd.join(id.as_str());
                Ok(materialize(&tree, &destination, vars)?.len())
            }
            MemberSource::Generator => {
                invoke(self.runner.as_ref(), &format!("{id} generator"), &generator).await?;
                Ok(0)
            }
        }
    }

    fn begin(&self, stage: Stage) {
        info!(stage = ?stage, "{}", stage.label());
        self.reporter.stage_started(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaffoldError;
    use crate::generator::CommandRunner;
    use async_trait::async_trait;
    use stackseed_test_utils::temp_dir;
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        stages: Mutex<Vec<Stage>>,
        commands: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl BuildReporter for Recorder {
        fn stage_started(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    #[async_trait]
    impl CommandRunner for Recorder {
        async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
            self.commands.lock().unwrap().push(invocation.to_string());
            Ok(Some(if self.fail_on == Some(invocation.program.as_str()) { 1 } else { 0 }))
        }
    }

    fn builder(cwd: &std::path::Path, recorder: Arc<Recorder>) -> ProjectBuilder {
        let ctx = BuildContext::new(cwd, StackseedConfig::default(), TemplateSource::Builtin);
        ProjectBuilder::new(ctx, recorder.clone()).with_reporter(recorder)
    }

    #[test]
    fn test_target_dir_joins_cwd() {
        let plan = ScaffoldPlan::new("My App", ProjectKind::Web, false, false).unwrap();
        let b = builder(std::path::Path::new("/work"), Arc::new(Recorder::default()));
        assert_eq!(b.target_dir(&plan), PathBuf::from("/work/My-App"));
    }

    #[tokio::test]
    async fn test_reporter_sees_every_stage_in_order() {
        let dir = temp_dir();
        let recorder = Arc::new(Recorder::default());
        let plan = ScaffoldPlan::new("demo", ProjectKind::Full, true, true).unwrap();

        let report = builder(dir.path(), recorder.clone()).build(&plan).await.unwrap();

        let expected = vec![
            Stage::GuardRoot,
            Stage::CreateDirs,
            Stage::MaterializeTemplates,
            Stage::GenerateWeb,
            Stage::ProvisionApp,
            Stage::WriteWorkspaceManifest,
            Stage::WriteRootManifest,
            Stage::Install,
            Stage::GitInit,
        ];
        assert_eq!(*recorder.stages.lock().unwrap(), expected);
        assert_eq!(report.stages, expected);
        assert!(report.files_written > 0);
    }

    #[tokio::test]
    async fn test_generator_source_invokes_runner_in_root() {
        let dir = temp_dir();
        let recorder = Arc::new(Recorder::default());
        let mut config = StackseedConfig::default();
        config.web.source = MemberSource::Generator;

        let ctx = BuildContext::new(dir.path(), config, TemplateSource::Builtin);
        let plan = ScaffoldPlan::new("demo", ProjectKind::Web, false, false).unwrap();
        ProjectBuilder::new(ctx, recorder.clone()).build(&plan).await.unwrap();

        let commands = recorder.commands.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("pnpm create vite"));
        assert!(!dir.path().join("demo/web").exists());
    }

    #[tokio::test]
    async fn test_failed_install_skips_git() {
        let dir = temp_dir();
        let recorder = Arc::new(Recorder {
            fail_on: Some("pnpm"),
            ..Default::default()
        });
        let plan = ScaffoldPlan::new("demo", ProjectKind::Web, true, true).unwrap();

        let err = builder(dir.path(), recorder.clone()).build(&plan).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::GeneratorFailed { code: Some(1), .. }));
        assert_eq!(*recorder.commands.lock().unwrap(), vec!["pnpm install".to_string()]);
        assert!(dir.path().join("demo/package.json").is_file());
    }
}
