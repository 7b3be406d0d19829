//! The user's scaffold intent.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ScaffoldError, ScaffoldResult};

/// Which front ends accompany the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// API + web.
    Web,
    /// API + mobile app.
    App,
    /// API + web + mobile app.
    Full,
}

impl ProjectKind {
    /// Every kind, in prompt order.
    pub const ALL: [ProjectKind; 3] = [ProjectKind::Web, ProjectKind::App, ProjectKind::Full];

    /// Whether a `web` member is part of this kind.
    pub fn has_web(self) -> bool {
        matches!(self, Self::Web | Self::Full)
    }

    /// Whether an `app` member is part of this kind.
    pub fn has_app(self) -> bool {
        matches!(self, Self::App | Self::Full)
    }

    /// Lowercase name used on the command line and in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::App => "app",
            Self::Full => "full",
        }
    }

    /// One-line description shown in prompts.
    pub fn description(self) -> &'static str {
        match self {
            Self::Web => "API + web front end",
            Self::App => "API + mobile app",
            Self::Full => "API + web front end + mobile app",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "app" | "mobile" => Ok(Self::App),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown project kind '{other}' (expected web, app or full)")),
        }
    }
}

/// Immutable record of the choices driving one scaffold run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldPlan {
    project_name: String,
    kind: ProjectKind,
    install: bool,
    git: bool,
}

impl ScaffoldPlan {
    /// Build a plan, sanitizing `raw_name` into a folder-safe identifier.
    pub fn new(raw_name: &str, kind: ProjectKind, install: bool, git: bool) -> ScaffoldResult<Self> {
        let project_name = sanitize_project_name(raw_name);

        let reason = if project_name.is_empty() {
            Some("name is empty")
        } else if project_name == "." || project_name == ".." {
            Some("name refers to a relative directory")
        } else if project_name.chars().all(|c| c == '-') {
            Some("name has no usable characters")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ScaffoldError::InvalidProjectName {
                name: raw_name.to_string(),
                reason: reason.to_string(),
            });
        }

        Ok(Self {
            project_name,
            kind,
            install,
            git,
        })
    }

    /// Sanitized name, also the target directory name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Front ends to create next to the API.
    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    /// Whether the install command runs after generation.
    pub fn install(&self) -> bool {
        self.install
    }

    /// Whether a git repository is initialized at the end.
    pub fn git(&self) -> bool {
        self.git
    }

    /// npm-compatible package name derived from the project name.
    pub fn package_name(&self) -> String {
        let lowered: String = self
            .project_name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let trimmed = lowered.trim_start_matches(['.', '_']);
        if trimmed.is_empty() {
            "project".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn separator_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[\s<>:"/\\|?*\x00-\x1F]+"#).expect("separator pattern is valid")
    })
}

/// Make a user-supplied name safe to use as a directory name.
///
/// Surrounding whitespace is trimmed. Each run of whitespace and characters
/// that are illegal in file names becomes a single hyphen.
pub fn sanitize_project_name(raw: &str) -> String {
    separator_runs().replace_all(raw.trim(), "-").into_owned()
}
