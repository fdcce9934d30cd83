//! # Stand Configuration
//!
//! Settings read once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (--db)                               (highest)        │
//! │  2. Environment Variables                                              │
//! │     DOLCE_DB_PATH, DOLCE_STORE_NAME, DOLCE_DEFAULT_RATE,               │
//! │     GEMINI_API_KEY / API_KEY, DOLCE_GENAI_MODEL,                       │
//! │     DOLCE_GENAI_TIMEOUT_SECS                                           │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/dolce-stand/stand.toml (Linux)                           │
//! │  4. Default Values                                    (lowest)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stand.toml
//! [store]
//! name = "Dolce Fusión"
//! default_rate = "45.50"   # used until a rate is saved
//!
//! [database]
//! path = "/var/lib/dolce/dolce.db"
//!
//! [genai]
//! api_key = "..."
//! model = "gemini-3-flash-preview"
//! timeout_secs = 10
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use dolce_core::ExchangeRate;

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not write config file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config or data directory available on this platform")]
    NoProjectDirs,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Stand identity and money defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Name printed on the closing report.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Rate used until the operator saves one.
    #[serde(default)]
    pub default_rate: ExchangeRate,
}

fn default_store_name() -> String {
    "Dolce Fusión".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            default_rate: ExchangeRate::default(),
        }
    }
}

/// Where the SQLite file lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Explicit path; the platform data directory is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Marketing-copy generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenAiSettings {
    /// No key means generation is disabled and the fallback text is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GenAiSettings {
    fn default() -> Self {
        GenAiSettings {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete stand configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub genai: GenAiSettings,
}

impl AppConfig {
    /// Loads defaults, then the TOML file (if it exists), then the
    /// environment, and validates the result.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading stand config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load stand config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        info!(?path, "Stand config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.genai.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "genai.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.genai.model.trim().is_empty() {
            return Err(ConfigError::Invalid("genai.model must not be empty".into()));
        }

        Ok(())
    }

    /// Applies environment overrides. `lookup` is `std::env::var` outside
    /// tests. Unparseable numeric values are logged and ignored.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("DOLCE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("DOLCE_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(rate) = lookup("DOLCE_DEFAULT_RATE") {
            match rate.parse::<ExchangeRate>() {
                Ok(parsed) => self.store.default_rate = parsed,
                Err(e) => warn!(rate = %rate, error = %e, "Ignoring invalid DOLCE_DEFAULT_RATE"),
            }
        }

        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            if !key.trim().is_empty() {
                self.genai.api_key = Some(key);
            }
        }

        if let Some(model) = lookup("DOLCE_GENAI_MODEL") {
            self.genai.model = model;
        }

        if let Some(timeout) = lookup("DOLCE_GENAI_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.genai.timeout_secs = secs,
                Err(_) => warn!(timeout = %timeout, "Ignoring invalid DOLCE_GENAI_TIMEOUT_SECS"),
            }
        }
    }

    /// `stand.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("stand.toml"))
    }

    /// The database file to open: the configured path, or `dolce.db` in the
    /// platform data directory (created if missing).
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoProjectDirs)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("dolce.db"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "dolce", "stand")
}

// =============================================================================
// Unit Tests
// =============================================================================
