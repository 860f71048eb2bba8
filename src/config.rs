//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::format::DisplayZone;
use crate::refresh::DEFAULT_REFRESH_INTERVAL_SECS;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The page being driven and its refreshable elements
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_elements")]
    pub elements: Vec<ElementConfig>,
}

/// One element of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementConfig {
    pub id: String,

    /// Path for the element's `hx-get` attribute
    #[serde(default)]
    pub hx_get: Option<String>,

    /// Value of the element's `hx-trigger` attribute
    #[serde(default)]
    pub hx_trigger: Option<String>,

    /// Whether the element carries `data-auto-refresh`
    #[serde(default)]
    pub auto_refresh: bool,

    /// Any further attributes, copied onto the element as-is
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

/// Fragments of the price dashboard that refresh themselves
fn default_elements() -> Vec<ElementConfig> {
    [
        ("current-price", "/api/current-price"),
        ("todays-prices", "/api/todays-prices"),
        ("tomorrows-prices", "/api/tomorrows-prices"),
        ("price-summary", "/api/price-summary"),
    ]
    .into_iter()
    .map(|(id, path)| ElementConfig {
        id: id.to_string(),
        hx_get: Some(path.to_string()),
        hx_trigger: Some("refresh".to_string()),
        auto_refresh: true,
        attributes: BTreeMap::new(),
    })
    .collect()
}

impl PageConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_interval_secs: default_refresh_interval(),
            elements: default_elements(),
        }
    }
}

/// Display formatting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    /// `Europe/Copenhagen`, `UTC`, or an offset such as `+01:00`
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    DisplayZone::Copenhagen.to_string()
}

impl FormatConfig {
    pub fn zone(&self) -> Result<DisplayZone, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown timezone {:?}", self.timezone)))
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// HTTP client configuration for re-issued fetches
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("elpris-page").join("config.toml")),
            Some(PathBuf::from("/etc/elpris-page/config.toml")),
            Some(PathBuf::from("./elpris-page.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "page.refresh_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for element in &self.page.elements {
            if element.id.trim().is_empty() {
                return Err(ConfigError::Invalid("element id must not be empty".to_string()));
            }
            if !seen.insert(element.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate element id {:?}",
                    element.id
                )));
            }
        }

        self.format.zone()?;
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Page overrides
        if let Some(base_url) = var("ELPRIS_BASE_URL") {
            self.page.base_url = base_url;
        }
        if let Some(interval) = var("ELPRIS_REFRESH_INTERVAL") {
            match interval.parse() {
                Ok(secs) => self.page.refresh_interval_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid ELPRIS_REFRESH_INTERVAL {:?}", interval),
            }
        }

        // Format overrides
        if let Some(timezone) = var("ELPRIS_TIMEZONE") {
            self.format.timezone = timezone;
        }

        // Logging overrides
        if let Some(level) = var("ELPRIS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ELPRIS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# elpris-page Configuration
#
# Environment variables override these settings:
# - ELPRIS_BASE_URL
# - ELPRIS_REFRESH_INTERVAL
# - ELPRIS_TIMEZONE
# - ELPRIS_LOG_LEVEL
# - ELPRIS_LOG_FORMAT

[page]
# Dashboard server that answers hx-get requests
base_url = "http://localhost:8080"

# How often auto-refresh elements are re-triggered (seconds)
refresh_interval_secs = 300

# Elements on the page. Only elements with auto_refresh = true AND an
# hx_get path receive the refresh trigger.
[[page.elements]]
id = "current-price"
hx_get = "/api/current-price"
hx_trigger = "refresh"
auto_refresh = true

[[page.elements]]
id = "todays-prices"
hx_get = "/api/todays-prices"
hx_trigger = "refresh"
auto_refresh = true

[[page.elements]]
id = "tomorrows-prices"
hx_get = "/api/tomorrows-prices"
hx_trigger = "refresh"
auto_refresh = true

[[page.elements]]
id = "price-summary"
hx_get = "/api/price-summary"
hx_trigger = "refresh"
auto_refresh = true

[format]
# Zone for formatted date-times: Europe/Copenhagen, UTC, or an offset like +01:00
timezone = "Europe/Copenhagen"

[http]
# Request timeout in seconds
request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
