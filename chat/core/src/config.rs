//! TOML Configuration File Support
//!
//! Widget configuration lives at `~/.config/docs-chat/widget.toml`.
//!
//! # Configuration Priority
//!
//! Highest first:
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! request_timeout_secs = 30
//! health_timeout_secs = 5
//! dev_mode = false
//!
//! [widget]
//! max_input_length = 500
//! excerpt_chars = 150
//! docs_base_url = "http://localhost:3000"
//! scope_to_page = false
//! title = "AI Learning Assistant"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ClientConfig, DEFAULT_API_BASE};
use crate::format::EXCERPT_CHARS;
use crate::input::DEFAULT_MAX_LENGTH;

/// API base URL
pub const ENV_API_URL: &str = "DOCS_CHAT_API_URL";
/// Dev-mode request/response logging
pub const ENV_DEV_MODE: &str = "DOCS_CHAT_DEV_MODE";
/// Input length cap
pub const ENV_MAX_INPUT: &str = "DOCS_CHAT_MAX_INPUT";
/// Docs site base URL for citation links
pub const ENV_DOCS_URL: &str = "DOCS_CHAT_DOCS_URL";

const DEFAULT_DOCS_BASE: &str = "http://localhost:3000";
const DEFAULT_TITLE: &str = "AI Learning Assistant";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Command-line argument
    Cli,
    /// Environment variable
    Env,
    /// TOML configuration file
    File,
    /// Built-in default
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Base URL of the RAG API
    pub base_url: Option<String>,
    /// Timeout for answer/retrieve/feedback, seconds
    pub request_timeout_secs: Option<u64>,
    /// Timeout for the health check, seconds
    pub health_timeout_secs: Option<u64>,
    /// Log request and response bodies
    pub dev_mode: Option<bool>,
}

/// `[widget]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetToml {
    /// Input length cap, characters
    pub max_input_length: Option<usize>,
    /// Citation excerpt budget, characters
    pub excerpt_chars: Option<usize>,
    /// Docs site base URL for citation links
    pub docs_base_url: Option<String>,
    /// Scope questions to the displayed page's module
    pub scope_to_page: Option<bool>,
    /// Panel title
    pub title: Option<String>,
}

/// Top-level TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfigToml {
    /// API section
    pub api: ApiToml,
    /// Widget section
    pub widget: WidgetToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved widget configuration
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    /// Base URL of the RAG API
    pub api_base_url: String,
    /// Timeout for answer/retrieve/feedback
    pub request_timeout: Duration,
    /// Timeout for the health check
    pub health_timeout: Duration,
    /// Log request and response bodies
    pub dev_mode: bool,
    /// Input length cap, characters
    pub max_input_length: usize,
    /// Citation excerpt budget, characters
    pub excerpt_chars: usize,
    /// Docs site base URL for citation links
    pub docs_base_url: String,
    /// Pass the page's module with every question
    pub scope_to_page: bool,
    /// Panel title
    pub title: String,
    /// File the values were loaded from, if any
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            dev_mode: false,
            max_input_length: DEFAULT_MAX_LENGTH,
            excerpt_chars: EXCERPT_CHARS,
            docs_base_url: DEFAULT_DOCS_BASE.to_string(),
            scope_to_page: false,
            title: DEFAULT_TITLE.to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl WidgetConfig {
    /// Highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Connection settings for the API client
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout,
            health_timeout: self.health_timeout,
            dev_mode: self.dev_mode,
        }
    }

    /// Check values that would otherwise fail later and less clearly
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for zero timeouts, a zero
    /// length cap, or a URL that is not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() || self.health_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.max_input_length == 0 {
            return Err(ConfigError::ValidationError(
                "max_input_length must be greater than zero".to_string(),
            ));
        }
        check_http_url("api base_url", &self.api_base_url)?;
        check_http_url("docs_base_url", &self.docs_base_url)?;
        Ok(())
    }
}

fn check_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{name} {value:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{name} must be http or https, got {other}"
        ))),
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// `$XDG_CONFIG_HOME/docs-chat/widget.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("docs-chat").join("widget.toml"))
}

/// Load from the default path plus the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or a resulting value is invalid. A missing file is not an error.
pub fn load_config() -> Result<WidgetConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load from `path` (if it exists) plus the process environment
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<WidgetConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load with an explicit environment lookup
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<WidgetConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = WidgetConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: WidgetConfigToml = toml::from_str(&content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;
    Ok(config)
}

fn apply_toml_config(config: &mut WidgetConfig, toml: &WidgetConfigToml) {
    if let Some(ref url) = toml.api.base_url {
        config.api_base_url = url.clone();
    }
    if let Some(secs) = toml.api.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.api.health_timeout_secs {
        config.health_timeout = Duration::from_secs(secs);
    }
    if let Some(dev) = toml.api.dev_mode {
        config.dev_mode = dev;
    }

    if let Some(len) = toml.widget.max_input_length {
        config.max_input_length = len;
    }
    if let Some(chars) = toml.widget.excerpt_chars {
        config.excerpt_chars = chars;
    }
    if let Some(ref url) = toml.widget.docs_base_url {
        config.docs_base_url = url.clone();
    }
    if let Some(scope) = toml.widget.scope_to_page {
        config.scope_to_page = scope;
    }
    if let Some(ref title) = toml.widget.title {
        config.title = title.clone();
    }
}

fn apply_env_config<F>(config: &mut WidgetConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_URL).filter(|u| !u.is_empty()) {
        config.api_base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(dev) = env(ENV_DEV_MODE) {
        config.dev_mode = dev != "0" && !dev.eq_ignore_ascii_case("false");
        config.source = ConfigSource::Env;
    }
    if let Some(len) = env(ENV_MAX_INPUT) {
        match len.parse::<usize>() {
            Ok(n) => {
                config.max_input_length = n;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %len, "Ignoring non-numeric DOCS_CHAT_MAX_INPUT"),
        }
    }
    if let Some(url) = env(ENV_DOCS_URL).filter(|u| !u.is_empty()) {
        config.docs_base_url = url;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Command-line overrides, applied after [`load_config`]
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// `--api-url`
    pub api_base_url: Option<String>,
    /// `--dev`
    pub dev_mode: Option<bool>,
}

impl ConfigOverrides {
    /// No overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_base_url(mut self, url: String) -> Self {
        self.api_base_url = Some(url);
        self
    }

    /// Override dev mode
    #[must_use]
    pub fn with_dev_mode(mut self, dev: bool) -> Self {
        self.dev_mode = Some(dev);
        self
    }

    /// Apply to a loaded configuration and re-validate
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is invalid.
    pub fn apply(&self, config: &mut WidgetConfig) -> Result<(), ConfigError> {
        if self.api_base_url.is_some() || self.dev_mode.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref url) = self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(dev) = self.dev_mode {
            config.dev_mode = dev;
        }
        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = WidgetConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.health_timeout, Duration::from_secs(5));
        assert_eq!(config.max_input_length, 500);
        assert_eq!(config.excerpt_chars, 150);
        assert!(!config.scope_to_page);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("docs-chat/widget.toml"));
        }
    }

    #[test]
    fn test_client_config_mirrors_values() {
        let config = WidgetConfig {
            dev_mode: true,
            ..WidgetConfig::default()
        };
        let client = config.client_config();
        assert_eq!(client.base_url, config.api_base_url);
        assert_eq!(client.request_timeout, Duration::from_secs(30));
        assert!(client.dev_mode);
    }

    // =========================================================================
    // TOML Parsing
    // =========================================================================

    #[test]
    fn test_parse_full_toml() {
        let file = toml_file(
            r#"
[api]
base_url = "https://rag.example.com/api"
request_timeout_secs = 60
health_timeout_secs = 2
dev_mode = true

[widget]
max_input_length = 1000
excerpt_chars = 80
docs_base_url = "https://docs.example.com"
scope_to_page = true
title = "Course Helper"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.api_base_url, "https://rag.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.health_timeout, Duration::from_secs(2));
        assert!(config.dev_mode);
        assert_eq!(config.max_input_length, 1000);
        assert_eq!(config.excerpt_chars, 80);
        assert_eq!(config.docs_base_url, "https://docs.example.com");
        assert!(config.scope_to_page);
        assert_eq!(config.title, "Course Helper");
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = toml_file("[widget]\nmax_input_length = 200\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.max_input_length, 200);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_missing_file_graceful() {
        let config =
            load_config_with_env(Some(PathBuf::from("/nonexistent/widget.toml")), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.config_file_path, None);
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file("[api\nbase_url = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = toml_file("[api]\nrequest_timeout_secs = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let file = toml_file("[api]\nbase_url = \"ftp://example.com/api\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let file = toml_file("[widget]\nmax_input_length = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    // =========================================================================
    // Priority
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[api]\nbase_url = \"http://file:8000/api\"\n");
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://env:8000/api"),
            (ENV_MAX_INPUT, "300"),
            (ENV_DEV_MODE, "1"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.api_base_url, "http://env:8000/api");
        assert_eq!(config.max_input_length, 300);
        assert!(config.dev_mode);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_env_dev_mode_false_values() {
        for value in ["0", "false", "FALSE"] {
            let config =
                load_config_with_env(None, |k| (k == ENV_DEV_MODE).then(|| value.to_string()))
                    .unwrap();
            assert!(!config.dev_mode, "{value} should disable dev mode");
        }
    }

    #[test]
    fn test_env_bad_number_ignored() {
        let config =
            load_config_with_env(None, |k| (k == ENV_MAX_INPUT).then(|| "lots".to_string()))
                .unwrap();
        assert_eq!(config.max_input_length, DEFAULT_MAX_LENGTH);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config =
            load_config_with_env(None, |k| (k == ENV_API_URL).then(|| "http://env/api".to_string()))
                .unwrap();

        ConfigOverrides::new()
            .with_api_base_url("http://cli/api".to_string())
            .with_dev_mode(true)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.api_base_url, "http://cli/api");
        assert!(config.dev_mode);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_no_change() {
        let mut config = WidgetConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_invalid_cli_override_rejected() {
        let mut config = WidgetConfig::default();
        let result = ConfigOverrides::new()
            .with_api_base_url("not a url".to_string())
            .apply(&mut config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
