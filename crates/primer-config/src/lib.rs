//! Configuration management for primer.
//!
//! Parses `primer.toml` with serde and discovers it in the current
//! directory or its parents. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` expands to the value of VAR, errors if unset
//! - `${VAR:-default}` expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `execution.endpoint`
//! - `execution.language`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use primer_exec::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, Language};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "primer.toml";

/// Upper bound on `execution.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 300;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override sandbox endpoint.
    pub endpoint: Option<String>,
    /// Override remote call timeout.
    pub timeout_secs: Option<u64>,
    /// Override default snippet language.
    pub language: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub execution: ExecutionConfig,
    pub markup: MarkupConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Remote execution settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Piston-compatible execute endpoint.
    pub endpoint: String,
    /// Bound on one remote call, in seconds.
    pub timeout_secs: u64,
    /// Language used when a snippet does not name one.
    pub language: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            language: Language::Python.to_string(),
        }
    }
}

impl ExecutionConfig {
    /// Remote call timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Markup parser settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Language for untagged code fences.
    pub default_language: String,
    /// Fence tag that opens a diagram block.
    pub diagram_keyword: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            default_language: "text".to_owned(),
            diagram_keyword: "diagram".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`execution.endpoint`").
        field: String,
        /// Error message (e.g., "${`PISTON_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `primer.toml` in the current directory and parents, falling back
    /// to defaults. CLI settings take precedence over file values and the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(endpoint) = &settings.endpoint {
            self.execution.endpoint.clone_from(endpoint);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.execution.timeout_secs = timeout_secs;
        }
        if let Some(language) = &settings.language {
            self.execution.language.clone_from(language);
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_execution()?;
        self.validate_markup()?;
        Ok(())
    }

    fn validate_execution(&self) -> Result<(), ConfigError> {
        let execution = &self.execution;
        require_non_empty(&execution.endpoint, "execution.endpoint")?;
        require_http_url(&execution.endpoint, "execution.endpoint")?;
        require_non_empty(&execution.language, "execution.language")?;

        if execution.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "execution.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if execution.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "execution.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(())
    }

    fn validate_markup(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.markup.default_language, "markup.default_language")?;
        require_non_empty(&self.markup.diagram_keyword, "markup.diagram_keyword")?;

        if self.markup.diagram_keyword.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "markup.diagram_keyword cannot contain whitespace".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_env(&mut self.execution.endpoint, "execution.endpoint")?;
        expand::expand_env(&mut self.execution.language, "execution.language")?;
        Ok(())
    }
}
