//! Error formatting for CLI output.

use std::fmt::Write as FmtWrite;

use console::Style;

use crate::error::CliError;

/// Error output formatter
pub struct ErrorFormatter {
    color: bool,
    verbose: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self {
            color: console::colors_enabled_stderr(),
            verbose: false,
        }
    }

    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Format and print an error
    pub fn print(&self, error: &CliError) {
        let formatted = self.format(error);
        eprint!("{formatted}");
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Format an error to a string
    pub fn format(&self, error: &CliError) -> String {
        let mut output = String::new();

        let error_prefix = self.paint(&format!("error[{}]:", error.code()), Style::new().red().bold());
        let _ = writeln!(output, "{error_prefix} {error}");

        if let Some(path) = error.path() {
            let path_label = self.paint("path:", Style::new().dim());
            let _ = writeln!(output, "  {path_label} {}", path.display());
        }

        if let CliError::Command { command, .. } = error {
            let command_label = self.paint("command:", Style::new().dim());
            let _ = writeln!(output, "  {command_label} {command}");
        }

        // Causes are always shown; -v adds the full chain.
        self.format_source_chain(&mut output, error);

        if let Some(hint) = error.hint() {
            let hint_label = self.paint("hint:", Style::new().cyan().bold());
            let _ = writeln!(output, "\n{hint_label} {hint}");
        }

        let suggestions = error.suggestions();
        if !suggestions.is_empty() {
            let suggest_label = self.paint("suggestions:", Style::new().yellow().bold());
            let _ = writeln!(output, "\n{suggest_label}");
            for suggestion in suggestions {
                let _ = writeln!(output, "  - {suggestion}");
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(&self, error: &CliError) -> String {
        let json = serde_json::json!({
            "error": {
                "code": error.code(),
                "message": error.to_string(),
                "exit_code": error.exit_status(),
                "path": error.path().map(|p| p.display().to_string()),
                "hint": error.hint(),
                "suggestions": error.suggestions(),
                "causes": causes(error),
            }
        });

        serde_json::to_string_pretty(&json).unwrap_or_else(|_| error.to_string())
    }

    fn format_source_chain(&self, output: &mut String, error: &CliError) {
        let causes = causes(error);
        let Some((first, rest)) = causes.split_first() else {
            return;
        };

        let caused_label = self.paint("caused by:", Style::new().dim());
        let _ = writeln!(output, "  {caused_label} {first}");

        if self.verbose {
            for (depth, cause) in rest.iter().enumerate() {
                let _ = writeln!(output, "    {}: {cause}", depth + 1);
            }
        }
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Messages of the source chain below `error`, outermost first.
fn causes(error: &CliError) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = std::error::Error::source(error);
    while let Some(source) = current {
        causes.push(source.to_string());
        current = source.source();
    }
    causes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    fn plain() -> ErrorFormatter {
        ErrorFormatter::new().color(false)
    }

    #[test]
    fn test_error_formatter() {
        let error = CliError::user_with_hint("Test error", "Try again");
        let output = plain().format(&error);

        assert!(output.starts_with("error[E010]: Test error\n"));
        assert!(output.contains("hint: Try again"));
    }

    #[test]
    fn test_path_and_cause() {
        let error = CliError::Io {
            message: "failed to write manifest".to_string(),
            source: Some(Box::new(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))),
            path: Some(PathBuf::from("/tmp/demo/package.json")),
        };
        let output = plain().format(&error);

        assert!(output.contains("path: /tmp/demo/package.json"));
        assert!(output.contains("caused by: denied"));
    }

    #[test]
    fn test_error_json_format() {
        let error = CliError::not_found_with_suggestions("program", "pnpm", vec!["install pnpm".to_string()]);
        let json: serde_json::Value = serde_json::from_str(&plain().format_json(&error)).unwrap();

        assert_eq!(json["error"]["code"], "E005");
        assert_eq!(json["error"]["exit_code"], 6);
        assert_eq!(json["error"]["suggestions"][0], "install pnpm");
    }

    #[test]
    fn test_error_with_suggestions() {
        let error = CliError::not_found_with_suggestions(
            "template tree",
            "/opt/bin",
            vec!["pass --templates DIR".to_string()],
        );
        let output = plain().format(&error);

        assert!(output.contains("suggestions:"));
        assert!(output.contains("- pass --templates DIR"));
    }
}
