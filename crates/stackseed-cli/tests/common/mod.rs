//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use stackseed_test_utils::write_tree;
use tempfile::{tempdir, TempDir};

/// Test context with temporary working directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write `.stackseed/config.yaml`
    pub fn with_config(self, config: &str) -> Self {
        write_tree(self.path(), &[(".stackseed/config.yaml", config)]);
        self
    }

    /// Write arbitrary files relative to the working directory
    pub fn with_files(self, files: &[(&str, &str)]) -> Self {
        write_tree(self.path(), files);
        self
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("stackseed").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("STACKSEED_CONFIG")
            .env_remove("STACKSEED_LOG_LEVEL")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1"); // Disable colors for predictable output
        cmd
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel))
            .unwrap_or_else(|e| panic!("failed to read {rel}: {e}"))
    }

    pub fn json(&self, rel: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(rel)).expect("invalid JSON")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
