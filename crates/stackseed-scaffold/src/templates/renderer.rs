//! Template rendering with variable substitution.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::templates::TemplateVars;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Match {{variable_name}} or {{ variable_name }}
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid variable pattern"))
}

/// Template renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Substitute every placeholder in `template`.
    ///
    /// Substitution is single pass: values are never re-scanned. All
    /// undefined names are reported together, attributed to `path`.
    pub fn render(&self, path: &Path, template: &str, vars: &TemplateVars) -> ScaffoldResult<String> {
        let mut result = String::with_capacity(template.len());
        let mut missing: Vec<&str> = Vec::new();
        let mut last = 0;

        for cap in variable_pattern().captures_iter(template) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };

            result.push_str(&template[last..whole.start()]);
            match vars.get(name.as_str()) {
                Some(value) => result.push_str(value),
                None => {
                    if !missing.contains(&name.as_str()) {
                        missing.push(name.as_str());
                    }
                }
            }
            last = whole.end();
        }
        result.push_str(&template[last..]);

        if !missing.is_empty() {
            return Err(ScaffoldError::TemplateRender {
                path: path.to_path_buf(),
                message: format!("undefined variable(s): {}", missing.join(", ")),
            });
        }

        Ok(result)
    }

    /// Names referenced by `template`, in order of first use.
    pub fn variables<'t>(&self, template: &'t str) -> Vec<&'t str> {
        let mut names = Vec::new();
        for cap in variable_pattern().captures_iter(template) {
            if let Some(name) = cap.get(1) {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }
}
