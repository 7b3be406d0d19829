//! Stackseed CLI Library
//!
//! Argument parsing, prompts, output and error reporting for the `stackseed`
//! binary. Scaffolding itself lives in `stackseed-scaffold`.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod prompts;

pub use error::CliError;
