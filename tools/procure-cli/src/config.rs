//! CLI configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use procure_data::Endpoints;
use procure_observability::{LogFormat, LogLevel};
use procure_ui::ResetPolicy;
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["procure.toml", ".procure.toml", "procure.json"];

/// Environment variable overriding `log.level`.
pub const LOG_LEVEL_ENV: &str = "PROCURE_LOG";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Remote endpoints.
    #[serde(default)]
    pub endpoints: Endpoints,

    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Item form behaviour.
    #[serde(default)]
    pub form: FormConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text; the format follows the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content).with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply `PROCURE_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.endpoints = self.endpoints.with_overrides(&lookup);
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.log.level = level.trim().to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.client.timeout_ms)
    }

    /// Problems with the config, errors first.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = self.endpoints.validate();
        let mut warnings = Vec::new();

        if self.client.timeout_ms == 0 {
            errors.push("client.timeout_ms must be greater than 0".to_string());
        } else if self.client.timeout_ms > 120_000 {
            warnings.push(format!(
                "client.timeout_ms {} is longer than two minutes",
                self.client.timeout_ms
            ));
        }
        if LogLevel::parse(&self.log.level).is_none() {
            errors.push(format!("log.level '{}' is not a log level", self.log.level));
        }
        if self.log.format().is_none() {
            errors.push(format!(
                "log.format '{}' must be 'human' or 'json'",
                self.log.format
            ));
        }
        if self.form.reset_policy().is_none() {
            errors.push(format!(
                "form.reset '{}' must be 'always' or 'on_success'",
                self.form.reset
            ));
        }

        (errors, warnings)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Per-request deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level (`trace`..`error`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `human` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LogConfig {
    pub fn level(&self) -> Option<LogLevel> {
        LogLevel::parse(&self.level)
    }

    pub fn format(&self) -> Option<LogFormat> {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Some(LogFormat::Human),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Item form behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// When to clear the draft after submitting: `always` or `on_success`.
    #[serde(default = "default_reset")]
    pub reset: String,
}

fn default_reset() -> String {
    "always".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            reset: default_reset(),
        }
    }
}

impl FormConfig {
    pub fn reset_policy(&self) -> Option<ResetPolicy> {
        match self.reset.trim() {
            "always" => Some(ResetPolicy::Always),
            "on_success" | "on-success" => Some(ResetPolicy::OnSuccess),
            _ => None,
        }
    }
}

/// Read a config value by dotted key, rendered as JSON.
pub fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    let quoted = |s: &str| format!("\"{}\"", s);
    match parts.as_slice() {
        ["endpoints", "search"] => Ok(quoted(&config.endpoints.search)),
        ["endpoints", "locations"] => Ok(quoted(&config.endpoints.locations)),
        ["endpoints", "categories"] => Ok(quoted(&config.endpoints.categories)),
        ["endpoints", "submit"] => Ok(quoted(&config.endpoints.submit)),
        ["endpoints", "submissions"] => Ok(quoted(&config.endpoints.submissions)),
        ["client", "timeout_ms"] => Ok(config.client.timeout_ms.to_string()),
        ["log", "level"] => Ok(quoted(&config.log.level)),
        ["log", "format"] => Ok(quoted(&config.log.format)),
        ["form", "reset"] => Ok(quoted(&config.form.reset)),
        _ => bail!("Unknown config key: {}", key),
    }
}

/// Generate a default procure.toml config file.
pub fn generate_default_config() -> String {
    let endpoints = Endpoints::default();
    format!(
        r#"# Procure client configuration
#
# Every endpoint can also be overridden with PROCURE_SEARCH_URL,
# PROCURE_LOCATIONS_URL, PROCURE_CATEGORIES_URL, PROCURE_SUBMIT_URL and
# PROCURE_SUBMISSIONS_URL.

[endpoints]
search = "{search}"
locations = "{locations}"
categories = "{categories}"
submit = "{submit}"
submissions = "{submissions}"

[client]
timeout_ms = {timeout}

[log]
# trace, debug, info, warn, error (PROCURE_LOG overrides)
level = "warn"
format = "human"

[form]
# always | on_success
reset = "always"
"#,
        search = endpoints.search,
        locations = endpoints.locations,
        categories = endpoints.categories,
        submit = endpoints.submit,
        submissions = endpoints.submissions,
        timeout = default_timeout_ms(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_config_round_trips_to_defaults() {
        let config = CliConfig::parse("procure.toml", &generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
        let (errors, warnings) = config.validate();
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_partial_toml() {
        let config = CliConfig::parse(
            "procure.toml",
            r#"
[endpoints]
search = "https://search.example.com/api/v1/search"

[client]
timeout_ms = 2500
"#,
        )
        .unwrap();
        assert_eq!(config.endpoints.search, "https://search.example.com/api/v1/search");
        assert_eq!(config.endpoints.submit, Endpoints::default().submit);
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.form.reset_policy(), Some(ResetPolicy::Always));
    }

    #[test]
    fn test_json_config() {
        let config =
            CliConfig::parse("procure.json", r#"{"form": {"reset": "on_success"}}"#).unwrap();
        assert_eq!(config.form.reset_policy(), Some(ResetPolicy::OnSuccess));
    }

    #[test]
    fn test_env_overrides() {
        let config = CliConfig::default().with_overrides(|key| match key {
            "PROCURE_SEARCH_URL" => Some("http://10.0.0.5:8000/api/v1/search".to_string()),
            "PROCURE_LOG" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.endpoints.search, "http://10.0.0.5:8000/api/v1/search");
        assert_eq!(config.log.level(), Some(LogLevel::Debug));
    }

    #[test]
    fn test_validate_reports_errors() {
        let mut config = CliConfig::default();
        config.client.timeout_ms = 0;
        config.log.level = "loud".to_string();
        config.form.reset = "sometimes".to_string();
        config.endpoints.categories = "categories".to_string();

        let (errors, _) = config.validate();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_get_config_value() {
        let config = CliConfig::default();
        assert_eq!(
            get_config_value(&config, "endpoints.search").unwrap(),
            "\"http://localhost:8000/api/v1/search\""
        );
        assert_eq!(get_config_value(&config, "client.timeout_ms").unwrap(), "10000");
        assert!(get_config_value(&config, "client.retries").is_err());
    }
}
