// ABOUTME: Configuration management for apim-console
// Layered TOML files (system, user, project) plus environment overrides

use crate::api::HttpSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "APIM_CONSOLE_BASE_URL";
pub const TOKEN_ENV: &str = "APIM_CONSOLE_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Admin REST backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// List and message presentation
    #[serde(default)]
    pub ui: UiConfig,

    /// Log file settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Gateway/management node, e.g. https://localhost:9443
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Versioned admin API root under the base URL
    #[serde(default = "default_api_path")]
    pub api_path: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept self-signed certificates (local development servers); off when unset
    #[serde(default)]
    pub accept_invalid_certs: Option<bool>,
}

impl BackendConfig {
    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs.unwrap_or(false)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_path: default_api_path(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_invalid_certs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// JSON message catalog (`{ "message.id": "text" }`)
    #[serde(default)]
    pub locale_catalog: Option<PathBuf>,

    /// Replaces the default "No items yet" text of empty lists
    #[serde(default)]
    pub no_data_message: Option<String>,

    /// Off when unset
    #[serde(default)]
    pub search_case_sensitive: Option<bool>,
}

impl UiConfig {
    pub fn case_sensitive_search(&self) -> bool {
        self.search_case_sensitive.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Defaults to ~/.apim-console/logs
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// `EnvFilter` directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filter: default_log_filter(),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_base_url() -> String {
    "https://localhost:9443".to_string()
}

fn default_api_path() -> String {
    "/api/am/admin/v4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("apim-console/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_filter() -> String {
    "apim_console=info".to_string()
}

impl AppConfig {
    /// Load configuration from default locations, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_paths(&Self::get_config_paths())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge every existing file in `paths`; later files win
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Self::default();

        for path in paths {
            if path.exists() {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;

                let file_config: AppConfig = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config from {}", path.display()))?;

                tracing::debug!("Loaded config from {}", path.display());
                config.merge(file_config);
            }
        }

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = base_url;
        }
    }

    /// Save configuration to user config directory
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::get_user_config_dir()?;
        self.save_to(&config_dir.join("config.toml"))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Configuration file paths, lowest precedence first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/apim-console/config.toml")];

        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".apim-console").join("config.toml"));
        }

        paths
    }

    /// Base directory for user state (~/.apim-console)
    pub fn get_home_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".apim-console"))
    }

    fn get_user_config_dir() -> Result<PathBuf> {
        Ok(Self::get_home_dir()?.join("config"))
    }

    /// Directory log files are written to
    pub fn log_directory(&self) -> Result<PathBuf> {
        match &self.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::get_home_dir()?.join("logs")),
        }
    }

    /// Merge another config into this one; values left at their defaults do not override
    fn merge(&mut self, other: AppConfig) {
        let backend = other.backend;
        if backend.base_url != default_base_url() {
            self.backend.base_url = backend.base_url;
        }
        if backend.api_path != default_api_path() {
            self.backend.api_path = backend.api_path;
        }
        if backend.timeout_secs != default_timeout_secs() {
            self.backend.timeout_secs = backend.timeout_secs;
        }
        if backend.user_agent != default_user_agent() {
            self.backend.user_agent = backend.user_agent;
        }
        if backend.accept_invalid_certs.is_some() {
            self.backend.accept_invalid_certs = backend.accept_invalid_certs;
        }

        if other.ui.locale_catalog.is_some() {
            self.ui.locale_catalog = other.ui.locale_catalog;
        }
        if other.ui.no_data_message.is_some() {
            self.ui.no_data_message = other.ui.no_data_message;
        }
        if other.ui.search_case_sensitive.is_some() {
            self.ui.search_case_sensitive = other.ui.search_case_sensitive;
        }

        if other.logging.directory.is_some() {
            self.logging.directory = other.logging.directory;
        }
        if other.logging.filter != default_log_filter() {
            self.logging.filter = other.logging.filter;
        }
    }

    /// Transport settings for the given bearer token
    pub fn http_settings(&self, token: Option<String>) -> HttpSettings {
        HttpSettings {
            base_url: self.backend.base_url.clone(),
            api_path: self.backend.api_path.clone(),
            timeout: Duration::from_secs(self.backend.timeout_secs),
            user_agent: self.backend.user_agent.clone(),
            accept_invalid_certs: self.backend.accepts_invalid_certs(),
            token,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            backend: BackendConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
