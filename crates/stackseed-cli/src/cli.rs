//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, ColorChoice, Parser, Subcommand, ValueHint};
use stackseed_common_config::{vars, ConfigLoader, Environment, StackseedConfig};

use crate::commands::{DoctorCommand, NewCommand, RetrofitCommand};
use crate::error::CliError;

/// Stackseed - pnpm monorepo generator
///
/// Creates an API package plus optional web and mobile front ends.
#[derive(Debug, Parser)]
#[command(
    name = "stackseed",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = vars::STACKSEED_CONFIG,
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Directory to work in instead of the current one
    #[arg(
        short = 'C',
        long = "cwd",
        global = true,
        value_hint = ValueHint::DirPath,
        help = "Run as if started in DIR"
    )]
    pub cwd: Option<PathBuf>,

    /// When to use colors
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "When to use terminal colors"
    )]
    pub color: ColorChoice,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new monorepo
    #[command(visible_alias = "create")]
    New(NewCommand),

    /// Add Biome scripts and dependency to an existing package.json
    Retrofit(RetrofitCommand),

    /// Check that required external tools are installed
    Doctor(DoctorCommand),

    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsCommand),
}

/// Shell completions generation
#[derive(Debug, Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self) -> Result<(), CliError> {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, name, &mut io::stdout());
        Ok(())
    }
}

impl Cli {
    /// Whether colored output is enabled for this run.
    pub fn color_enabled(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => !Environment::no_color() && console::Term::stderr().features().colors_supported(),
        }
    }

    /// The working directory for this run, anchored to the process directory.
    pub fn working_dir(&self) -> Result<PathBuf, CliError> {
        let current = std::env::current_dir()
            .map_err(|e| CliError::io("failed to determine the current directory", e))?;
        Ok(match &self.cwd {
            Some(dir) => current.join(dir),
            None => current,
        })
    }

    /// Load configuration from `--config` or `<cwd>/.stackseed/config.yaml`.
    pub fn load_config(&self, cwd: &Path) -> Result<StackseedConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_file(cwd.join(path))?,
            None => ConfigLoader::new(cwd).load()?,
        };

        if let Some(dir) = config.templates.directory.take() {
            config.templates.directory = Some(cwd.join(dir));
        }

        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self) -> Result<(), CliError> {
        if let Command::Completions(cmd) = &self.command {
            return cmd.execute();
        }

        let cwd = self.working_dir()?;
        let config = self.load_config(&cwd)?;
        let ctx = CommandContext {
            color: self.color_enabled(),
            config,
            cwd,
            format: self.format,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        match self.command {
            Command::New(cmd) => cmd.execute(&ctx).await,
            Command::Retrofit(cmd) => cmd.execute(&ctx).await,
            Command::Doctor(cmd) => cmd.execute(&ctx).await,
            Command::Completions(_) => Ok(()),
        }
    }
}

/// Context passed to all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: StackseedConfig,
    /// Directory new projects are created in and relative paths resolve against.
    pub cwd: PathBuf,
    pub format: OutputFormat,
    pub color: bool,
    pub verbose: u8,
    pub quiet: bool,
}

impl CommandContext {
    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }
}
