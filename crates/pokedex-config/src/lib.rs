//! Shared configuration for the pokedex CLI.
//!
//! TOML file + `POKEDEX_`-prefixed environment variables merged via
//! figment, platform path resolution via `directories`, and translation
//! to `pokedex_core::DexConfig`.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pokedex_core::DexConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Listing page size.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Override for the data directory holding the local caches.
    pub data_dir: Option<PathBuf>,

    /// Hours before the type-enriched snapshot is considered stale.
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_hours: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
            data_dir: None,
            snapshot_ttl_hours: default_snapshot_ttl(),
        }
    }
}

fn default_api_url() -> String {
    "https://pokeapi.co/api/v2/".into()
}
fn default_page_size() -> u32 {
    25
}
fn default_timeout() -> u64 {
    30
}
fn default_snapshot_ttl() -> u64 {
    168
}

impl Config {
    /// Validate ranges that figment cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Validation {
                field: "page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.api_url.parse::<url::Url>().is_err() {
            return Err(ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("invalid URL: {}", self.api_url),
            });
        }
        Ok(())
    }

    /// Translate into the core's runtime configuration.
    pub fn to_dex_config(&self) -> DexConfig {
        DexConfig {
            api_url: self.api_url.clone(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs),
            snapshot_ttl: chrono::Duration::hours(
                i64::try_from(self.snapshot_ttl_hours).unwrap_or(i64::MAX),
            ),
        }
    }

    /// The directory holding the local key-value caches.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("rs", "pkdx", "pokedex").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default data directory for the local caches.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("rs", "pkdx", "pokedex")
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pokedex");
    p
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit file path + environment.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("POKEDEX_"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist or fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to an explicit path.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
