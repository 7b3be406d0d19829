//! Configuration types for Stackseed.
//!
//! This crate provides the configuration used by the `stackseed` generator,
//! read from `.stackseed/config.yaml` files: pinned tool versions, ports
//! threaded into the templates, external generator and post-create commands,
//! and where template trees come from.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
