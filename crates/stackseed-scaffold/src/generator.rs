//! External generator and post-create command invocation.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use stackseed_common_config::CommandSpec;
use stackseed_common_log::spans::command_span;
use tokio::process::Command;
use tracing::{info, Instrument};

use crate::error::{ScaffoldError, ScaffoldResult};

/// A program, its literal arguments and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path, looked up on `PATH`.
    pub program: String,
    /// Literal arguments, passed without a shell.
    pub args: Vec<String>,
    /// Working directory of the child.
    pub cwd: PathBuf,
}

impl Invocation {
    /// Create an invocation from its parts.
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
        }
    }

    /// Build an invocation from a configured command.
    pub fn from_spec(spec: &CommandSpec, cwd: &Path) -> Self {
        Self::new(spec.program.clone(), spec.args.iter().cloned(), cwd)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs external programs to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` with the terminal's standard streams attached.
    ///
    /// Returns the exit code, or `None` when the process was terminated by a
    /// signal. Spawn failures are returned as `Err`.
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    stdout_to_stderr: bool,
}

impl SystemRunner {
    /// A runner with every standard stream inherited.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send child stdout to our stderr, keeping our stdout for machine output.
    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }

    fn child_stdout(&self) -> Stdio {
        if self.stdout_to_stderr {
            Stdio::from(io::stderr())
        } else {
            Stdio::inherit()
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(self.child_stdout())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(status.code())
    }
}

/// Run `invocation` and require a zero exit code.
///
/// `name` identifies the step in errors (`web generator`, `install`, ...).
pub async fn invoke(
    runner: &dyn CommandRunner,
    name: &str,
    invocation: &Invocation,
) -> ScaffoldResult<()> {
    let span = command_span(name, &invocation.program);

    async {
        info!(command = %invocation, cwd = %invocation.cwd.display(), "running {name}");

        let failed = |code: Option<i32>, source: Option<io::Error>| ScaffoldError::GeneratorFailed {
            generator: name.to_string(),
            command: invocation.to_string(),
            code,
            source,
        };

        match runner.run(invocation).await {
            Ok(Some(0)) => Ok(()),
            Ok(code) => Err(failed(code, None)),
            Err(e) => Err(failed(None, Some(e))),
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedRunner {
        result: Mutex<Option<io::Result<Option<i32>>>>,
    }

    impl FixedRunner {
        fn new(result: io::Result<Option<i32>>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for FixedRunner {
        async fn run(&self, _invocation: &Invocation) -> io::Result<Option<i32>> {
            self.result
                .lock()
                .unwrap()
                .take()
                .expect("runner called more than once")
        }
    }

    fn invocation() -> Invocation {
        Invocation::new("pnpm", ["install"], "/tmp/demo")
    }

    #[tokio::test]
    async fn test_zero_exit_succeeds() {
        let runner = FixedRunner::new(Ok(Some(0)));
        invoke(&runner, "install", &invocation()).await.unwrap();
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_code() {
        let runner = FixedRunner::new(Ok(Some(2)));
        match invoke(&runner, "install", &invocation()).await.unwrap_err() {
            ScaffoldError::GeneratorFailed {
                generator,
                command,
                code,
                source,
            } => {
                assert_eq!(generator, "install");
                assert_eq!(command, "pnpm install");
                assert_eq!(code, Some(2));
                assert!(source.is_none());
            }
            other => panic!("Expected GeneratorFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_keeps_source() {
        let runner = FixedRunner::new(Err(io::Error::new(io::ErrorKind::NotFound, "missing")));
        match invoke(&runner, "install", &invocation()).await.unwrap_err() {
            ScaffoldError::GeneratorFailed { code, source, .. } => {
                assert_eq!(code, None);
                assert_eq!(source.unwrap().kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected GeneratorFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signal_termination_is_failure() {
        let runner = FixedRunner::new(Ok(None));
        assert!(matches!(
            invoke(&runner, "git init", &invocation()).await,
            Err(ScaffoldError::GeneratorFailed { code: None, source: None, .. })
        ));
    }

    #[test]
    fn test_invocation_from_spec() {
        let spec = CommandSpec::new("git", ["init"]);
        let inv = Invocation::from_spec(&spec, Path::new("/work/demo"));
        assert_eq!(inv.to_string(), "git init");
        assert_eq!(inv.cwd, PathBuf::from("/work/demo"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_reports_exit_codes() {
        let dir = stackseed_test_utils::temp_dir();

        let ok = Invocation::new("sh", ["-c", "exit 0"], dir.path());
        assert_eq!(SystemRunner::new().run(&ok).await.unwrap(), Some(0));

        let failing = Invocation::new("sh", ["-c", "exit 3"], dir.path());
        assert_eq!(SystemRunner::new().run(&failing).await.unwrap(), Some(3));

        let missing = Invocation::new("stackseed-definitely-not-a-program", Vec::<String>::new(), dir.path());
        assert!(SystemRunner::new().run(&missing).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_uses_cwd() {
        let dir = stackseed_test_utils::temp_dir();
        let inv = Invocation::new("sh", ["-c", "touch marker"], dir.path());
        assert_eq!(SystemRunner::new().run(&inv).await.unwrap(), Some(0));
        assert!(dir.path().join("marker").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_redirected_stdout_still_runs() {
        let dir = stackseed_test_utils::temp_dir();
        let runner = SystemRunner::new().stdout_to_stderr(true);

        let inv = Invocation::new("sh", ["-c", "echo hello > out.txt; echo to-terminal"], dir.path());
        assert_eq!(runner.run(&inv).await.unwrap(), Some(0));
        assert_eq!(std::fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hello\n");
    }
}
