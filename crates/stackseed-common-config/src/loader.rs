//! Configuration file loading and parsing.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{MemberSource, StackseedConfig, TemplateSourceKind};

/// Directory holding project-local configuration.
pub const CONFIG_DIR: &str = ".stackseed";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the configuration file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.stackseed/config.yaml`, or defaults if absent.
    pub fn load(&self) -> Result<StackseedConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(StackseedConfig::default());
        }

        Self::load_file(&config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_file(path: impl AsRef<Path>) -> Result<StackseedConfig, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration text, expanding environment variables first.
    pub fn parse(contents: &str) -> Result<StackseedConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;

        // An empty or comment-only file means "all defaults"
        if expanded.lines().all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#')
        }) {
            return Ok(StackseedConfig::default());
        }

        let config: StackseedConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(&config)?;
        Ok(config)
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid")
    })
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in env_var_pattern().captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Validate configuration values.
fn validate(config: &StackseedConfig) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::ValidationError {
        message: message.to_string(),
    };

    if config.api.port == 0 {
        return Err(invalid("api.port must be greater than 0"));
    }
    if config.web.port == 0 || config.app.port == 0 {
        return Err(invalid("web.port and app.port must be greater than 0"));
    }

    if config.web.source == MemberSource::Generator && config.web.generator.program.is_empty() {
        return Err(invalid("web.generator.program is required when web.source is generator"));
    }
    if config.app.source == MemberSource::Generator && config.app.generator.program.is_empty() {
        return Err(invalid("app.generator.program is required when app.source is generator"));
    }

    if config.post_create.install.program.is_empty() || config.post_create.git.program.is_empty() {
        return Err(invalid("post_create commands must name a program"));
    }

    if !(1..=16).contains(&config.templates.max_levels) {
        return Err(invalid("templates.max_levels must be between 1 and 16"));
    }
    if config.templates.source == TemplateSourceKind::Directory
        && config.templates.directory.is_none()
    {
        return Err(invalid("templates.directory is required when templates.source is directory"));
    }
    if config.templates.dir_name.trim().is_empty() {
        return Err(invalid("templates.dir_name must not be empty"));
    }

    for version in [
        &config.versions.biome,
        &config.versions.pnpm,
        &config.versions.node,
        &config.versions.typescript,
    ] {
        if version.trim().is_empty() {
            return Err(invalid("versions must not be empty"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.api.port, 3000);
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();

        let config_content = r#"
versions:
  biome: 1.8.3
api:
  port: 4000
app:
  source: generator
post_create:
  install:
    program: npm
    args: [install]
templates:
  source: search
  max_levels: 3
"#;
        fs::write(config_dir.join(CONFIG_FILE), config_content).unwrap();

        let config = ConfigLoader::new(dir.path()).load().unwrap();

        assert_eq!(config.versions.biome, "1.8.3");
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.app.source, MemberSource::Generator);
        // The app keeps its own generator default, not the web one
        assert!(config.app.generator.args.iter().any(|a| a.starts_with("expo-app@")));
        assert_eq!(config.post_create.install.program, "npm");
        assert_eq!(config.post_create.git.program, "git");
        assert_eq!(config.templates.source, TemplateSourceKind::Search);
        assert_eq!(config.templates.max_levels, 3);
    }

    #[test]
    fn test_load_file_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        match ConfigLoader::load_file(&path).unwrap_err() {
            ConfigError::NotFound { path: p } => assert_eq!(p, path),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = ConfigLoader::parse("# nothing here\n\n").unwrap();
        assert_eq!(config.web.port, 5173);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("STACKSEED_TEST_VAR", "test_value");
        let result = expand_env_vars("key: ${STACKSEED_TEST_VAR}").unwrap();
        assert_eq!(result, "key: test_value");
        std::env::remove_var("STACKSEED_TEST_VAR");
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("key: ${STACKSEED_NONEXISTENT:-default}").unwrap();
        assert_eq!(result, "key: default");
    }

    #[test]
    fn test_env_var_missing_error() {
        match expand_env_vars("key: ${STACKSEED_MISSING_VAR}").unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "STACKSEED_MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_var_expansion_in_config() {
        std::env::set_var("STACKSEED_TEST_API_PORT", "9090");

        let config = ConfigLoader::parse(
            r#"
api:
  port: ${STACKSEED_TEST_API_PORT}
web:
  port: ${STACKSEED_TEST_WEB_PORT:-5174}
"#,
        )
        .unwrap();

        assert_eq!(config.api.port, 9090);
        assert_eq!(config.web.port, 5174);

        std::env::remove_var("STACKSEED_TEST_API_PORT");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = StackseedConfig::default();
        config.api.port = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("api.port")
        ));

        let mut config = StackseedConfig::default();
        config.templates.max_levels = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("max_levels")
        ));

        let mut config = StackseedConfig::default();
        config.templates.source = TemplateSourceKind::Directory;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("templates.directory")
        ));

        let mut config = StackseedConfig::default();
        config.web.source = MemberSource::Generator;
        config.web.generator.program.clear();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("web.generator")
        ));
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let bad_yaml = r#"
api:
  port: 3000
  invalid_yaml: [unclosed
"#;
        match ConfigLoader::parse(bad_yaml).unwrap_err() {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("Expected ParseError with line number, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_file_outside_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("team.yaml");

        let mut config = StackseedConfig::default();
        config.api.port = 4242;
        config.versions.biome = "1.9.0".to_string();
        fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();

        let loaded = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(loaded.api.port, 4242);
        assert_eq!(loaded.versions.biome, "1.9.0");
        assert!(!ConfigLoader::new(dir.path()).config_path().exists());
    }
}
