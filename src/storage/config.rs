//! Application configuration.
//!
//! Loaded from TOML, with a handful of environment overrides for secrets and
//! deployment-specific endpoints. The resolved [`AppConfig`] is passed into
//! the components that need it; nothing reads settings globally.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogLayout, DEFAULT_DOMAIN};
use crate::sync::Pybabel;

/// Environment variable holding the oracle API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the oracle model.
pub const ENV_MODEL: &str = "POLOCALIZE_MODEL";
/// Environment variable overriding the oracle proxy.
pub const ENV_PROXY_URL: &str = "POLOCALIZE_PROXY_URL";
/// Environment variable overriding the oracle endpoint.
pub const ENV_BASE_URL: &str = "POLOCALIZE_BASE_URL";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Translation service settings
    pub oracle: OracleSettings,
    /// Catalog layout settings
    pub catalog: CatalogSettings,
    /// External tool settings
    pub tools: ToolSettings,
    /// Batch translation settings
    pub translate: TranslateSettings,
}

/// Translation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// API key (usually supplied through `OPENAI_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Chat model name
    pub model: String,
    /// API base URL, without the trailing endpoint
    pub base_url: String,
    /// Optional HTTP(S) proxy for every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after a transient failure
    pub max_retries: u32,
    /// Delay before each retry, in milliseconds; the last value repeats
    pub retry_intervals_ms: Vec<u64>,
    /// Replacement for the built-in system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            proxy_url: None,
            timeout_secs: 30,
            max_retries: 2,
            retry_intervals_ms: vec![1000, 4000],
            system_prompt: None,
        }
    }
}

impl OracleSettings {
    /// The API key, or an error naming where to set it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

/// Catalog layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Gettext domain (catalog file stem)
    pub domain: String,
    /// Preferred reference locale; the first discovered locale otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_locale: Option<String>,
    /// Remove obsolete entries after synchronization
    pub purge_obsolete: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            reference_locale: None,
            purge_obsolete: true,
        }
    }
}

impl CatalogSettings {
    /// Layout described by these settings.
    pub fn layout(&self) -> CatalogLayout {
        let layout = CatalogLayout::new(self.domain.clone());
        match &self.reference_locale {
            Some(locale) => layout.with_reference(locale.clone()),
            None => layout,
        }
    }
}

/// External tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// `pybabel` executable
    pub pybabel: String,
    /// Source directories to scan, relative to the project directory
    pub input_dirs: String,
    /// Keyword markers for the second extraction pass
    pub keywords: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        let pybabel = Pybabel::default();
        Self {
            pybabel: pybabel.program,
            input_dirs: pybabel.input_dirs,
            keywords: pybabel.keywords,
        }
    }
}

impl ToolSettings {
    /// Tool wrapper configured from these settings.
    pub fn pybabel(&self) -> Pybabel {
        Pybabel {
            program: self.pybabel.clone(),
            input_dirs: self.input_dirs.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

/// Batch translation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    /// Flag machine translations `fuzzy` so they get reviewed
    pub mark_fuzzy: bool,
    /// Capacity of the progress event channel
    pub event_capacity: usize,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            mark_fuzzy: false,
            event_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.oracle.api_key = Some(key);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.oracle.model = model;
        }
        if let Some(proxy) = get(ENV_PROXY_URL) {
            self.oracle.proxy_url = Some(proxy);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.oracle.base_url = url;
        }
    }
}

/// Get the configuration directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "polocalize", "polocalize")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Read the configuration file at `path` (or the default location) without
/// environment overrides. A missing file yields the defaults.
pub fn read_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content =
        std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from `path` (or the default location), then apply the
/// environment overrides. A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = read_config(path)?;
    config.apply_env();
    Ok(config)
}

/// Save configuration to `path` (or the default location).
pub fn save_config(config: &AppConfig, path: Option<&Path>) -> Result<(), ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("No API key configured (set {ENV_API_KEY} or oracle.api_key)")]
    MissingApiKey,
}
