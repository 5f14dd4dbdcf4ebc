// src/infrastructure/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{APP_DIR, CONFIG_FILE, HOME_ENV, MAX_ATTACHMENT_SIZE, SESSION_FILE};

pub const API_URL_ENV: &str = "SCRATCH_API_URL";
pub const IDENTITY_URL_ENV: &str = "SCRATCH_IDENTITY_URL";
pub const STORAGE_URL_ENV: &str = "SCRATCH_STORAGE_URL";

/// TOML configuration for the Scratch client
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub limits: Limits,
}

/// Base URLs of the hosted services.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Endpoints {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
    #[serde(default = "default_storage_url")]
    pub storage_url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Limits {
    #[serde(default = "default_max_attachment_size")]
    pub max_attachment_size: u64,
}

// Default value functions
fn default_api_url() -> String { "http://localhost:4000".to_string() }
fn default_identity_url() -> String { "http://localhost:4001".to_string() }
fn default_storage_url() -> String { "http://localhost:4002".to_string() }
fn default_max_attachment_size() -> u64 { MAX_ATTACHMENT_SIZE }

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            identity_url: default_identity_url(),
            storage_url: default_storage_url(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_attachment_size: default_max_attachment_size(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise defaults. Environment overrides
    /// are applied in both cases.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_dir()?.join(CONFIG_FILE),
        };
        let mut config = if path.exists() {
            debug!(?path, "Loading config");
            Self::load(&path)?
        } else {
            debug!(?path, "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV) {
            self.endpoints.api_url = url;
        }
        if let Ok(url) = env::var(IDENTITY_URL_ENV) {
            self.endpoints.identity_url = url;
        }
        if let Ok(url) = env::var(STORAGE_URL_ENV) {
            self.endpoints.storage_url = url;
        }
    }
}

/// `$SCRATCH_HOME`, or the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(home) = env::var(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let base = dirs::config_dir().context("Could not find config directory")?;
    Ok(base.join(APP_DIR))
}

/// `$SCRATCH_HOME`, or the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(home) = env::var(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let base = dirs::data_dir().context("Could not find data directory")?;
    Ok(base.join(APP_DIR))
}

pub fn session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(SESSION_FILE))
}
