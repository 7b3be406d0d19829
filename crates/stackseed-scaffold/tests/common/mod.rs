//! Shared helpers for scaffold integration tests.

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stackseed_common_config::StackseedConfig;
use stackseed_scaffold::{
    BuildContext, BuildReporter, CommandRunner, Invocation, ProjectBuilder, Stage, TemplateSource,
};

/// Records every invocation instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    exit_codes: Mutex<Vec<(String, i32)>>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make invocations of `program` exit with `code`.
    pub fn fail(self: &Arc<Self>, program: &str, code: i32) -> Arc<Self> {
        self.exit_codes.lock().unwrap().push((program.to_string(), code));
        Arc::clone(self)
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        self.calls.lock().unwrap().push(invocation.clone());
        let code = self
            .exit_codes
            .lock()
            .unwrap()
            .iter()
            .find(|(program, _)| *program == invocation.program)
            .map(|(_, code)| *code)
            .unwrap_or(0);
        Ok(Some(code))
    }
}

/// Records the stages a build announces.
#[derive(Default)]
pub struct StageLog {
    stages: Mutex<Vec<Stage>>,
}

impl StageLog {
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().clone()
    }
}

impl BuildReporter for StageLog {
    fn stage_started(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }
}

/// Builder over builtin templates and default config rooted at `cwd`.
pub fn builder(cwd: &Path, runner: Arc<RecordingRunner>) -> ProjectBuilder {
    builder_with(cwd, StackseedConfig::default(), runner)
}

pub fn builder_with(
    cwd: &Path,
    config: StackseedConfig,
    runner: Arc<RecordingRunner>,
) -> ProjectBuilder {
    let ctx = BuildContext::new(cwd, config, TemplateSource::Builtin);
    ProjectBuilder::new(ctx, runner)
}

/// Sorted top-level directory names under `root`.
pub fn top_level_dirs(root: &Path) -> Vec<String> {
    let mut dirs: Vec<String> = std::fs::read_dir(root)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    dirs.sort();
    dirs
}

pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap()
}

pub fn project(cwd: &Path) -> PathBuf {
    cwd.join("demo")
}
