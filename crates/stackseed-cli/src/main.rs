//! Stackseed CLI - pnpm monorepo generator
//!
//! Main entry point for the `stackseed` binary.

use std::process::ExitCode;

use clap::Parser;
use stackseed_cli::cli::Cli;
use stackseed_cli::error::{handle_result, setup_panic_handler};
use stackseed_cli::CliError;
use stackseed_common_config::Environment;
use stackseed_common_log::{LogConfig, LogLevel};

fn main() -> ExitCode {
    setup_panic_handler();

    // .env must be loaded before clap reads STACKSEED_CONFIG.
    let env_warning = Environment::init().err();

    let cli = Cli::parse();
    let color = cli.color_enabled();
    console::set_colors_enabled(color);
    console::set_colors_enabled_stderr(color);

    init_logging(&cli, color);
    if let Some(warning) = env_warning {
        tracing::warn!("{warning}");
    }

    let format = cli.format;
    let verbose = cli.verbose > 0;

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            let error = CliError::io("failed to start the async runtime", e);
            return handle_result::<()>(Err(error), format, color, verbose);
        }
    };

    handle_result(runtime.block_on(cli.execute()), format, color, verbose)
}

fn init_logging(cli: &Cli, color: bool) {
    let mut config = LogConfig::from_env().with_ansi(color);
    if cli.verbose > 0 || cli.quiet {
        config = config.with_level(LogLevel::from_verbosity(cli.verbose, cli.quiet));
    }

    if let Err(e) = stackseed_common_log::init(config) {
        eprintln!("warning: {e}");
    }
}
