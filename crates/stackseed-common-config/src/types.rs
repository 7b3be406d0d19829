//! Configuration types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackseedConfig {
    /// Literal versions pinned into generated manifests.
    pub versions: VersionsConfig,
    /// API package settings.
    pub api: ApiConfig,
    /// Web front end settings.
    pub web: WebConfig,
    /// Mobile app settings.
    pub app: AppConfig,
    /// Commands run after the project has been written.
    pub post_create: PostCreateConfig,
    /// Where template trees are loaded from.
    pub templates: TemplatesConfig,
}

/// Pinned tool versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    /// `@biomejs/biome`, the lint/format tool added to the root manifest.
    pub biome: String,
    /// pnpm release written to the member manifests' `packageManager` field.
    pub pnpm: String,
    /// Node.js release written to `.node-version`.
    pub node: String,
    /// TypeScript release used by every member package.
    pub typescript: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            biome: "1.9.4".to_string(),
            pnpm: "9.12.3".to_string(),
            node: "20.18.0".to_string(),
            typescript: "5.6.3".to_string(),
        }
    }
}

/// API package configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Port the generated API listens on.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// How a front-end member is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSource {
    /// Materialize the built-in (or configured) template tree.
    #[default]
    Template,
    /// Run an external generator which creates the member directory itself.
    Generator,
}

/// Web front end configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub source: MemberSource,
    /// Dev server port written into the web template.
    pub port: u16,
    /// Generator used when `source` is `generator`.
    pub generator: CommandSpec,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            source: MemberSource::Template,
            port: 5173,
            generator: CommandSpec::new(
                "pnpm",
                ["create", "vite@5.5.5", "web", "--template", "react-ts"],
            ),
        }
    }
}

/// Mobile app configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: MemberSource,
    /// Metro bundler port written into the app template.
    pub port: u16,
    /// Generator used when `source` is `generator`.
    pub generator: CommandSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: MemberSource::Template,
            port: 8081,
            generator: CommandSpec::new(
                "pnpm",
                [
                    "create",
                    "expo-app@3.1.1",
                    "app",
                    "--template",
                    "blank-typescript",
                    "--no-install",
                ],
            ),
        }
    }
}

/// An external program with a literal argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Post-create commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostCreateConfig {
    /// Dependency install command.
    pub install: CommandSpec,
    /// Version control initialization command.
    pub git: CommandSpec,
}

impl Default for PostCreateConfig {
    fn default() -> Self {
        Self {
            install: CommandSpec::new("pnpm", ["install"]),
            git: CommandSpec::new("git", ["init"]),
        }
    }
}

/// Where template trees come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSourceKind {
    /// Trees compiled into the binary.
    #[default]
    Builtin,
    /// An explicit directory (`templates.directory`).
    Directory,
    /// Search upward from the executable for `templates.dir_name`.
    Search,
}

/// Template location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub source: TemplateSourceKind,
    /// Template root used with `source: directory`.
    pub directory: Option<PathBuf>,
    /// Directory name looked for with `source: search`.
    pub dir_name: String,
    /// Number of directories visited by the upward search.
    pub max_levels: usize,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            source: TemplateSourceKind::Builtin,
            directory: None,
            dir_name: "templates".to_string(),
            max_levels: 5,
        }
    }
}
