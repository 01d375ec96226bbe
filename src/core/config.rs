//! Configuration management

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "energy-dashboard";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub data: DataConfig,
    /// Display names for metering points, keyed by EIC
    #[serde(default)]
    pub eic_nicknames: BTreeMap<String, EicNickname>,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        let app_config_dir = config_dir.join(APP_DIR);

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir)?;
        }

        Ok(app_config_dir.join("config.toml"))
    }

    /// Load configuration from disk, writing defaults on first run
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Path of the API response cache
    pub fn cache_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data.cache_file {
            return Ok(path.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| Error::Config("Could not determine cache directory".to_string()))?;
        Ok(cache_dir.join(APP_DIR).join("api_cache.json"))
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language: "auto", "en", "et"
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String { "en".to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Metering data source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// How long a cached API response stays fresh
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Cache file location (defaults to the user cache directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
    /// OAuth token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Metering data endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_cache_ttl() -> u64 { 3600 }
fn default_token_url() -> String {
    "https://kc.elering.ee/realms/elering-sso/protocol/openid-connect/token".to_string()
}
fn default_api_url() -> String {
    "https://estfeed.elering.ee/api/public/v1/metering-data".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            cache_file: None,
            token_url: default_token_url(),
            api_url: default_api_url(),
        }
    }
}

/// Nickname for a metering point, either a bare name or a name with a plot colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EicNickname {
    Plain(String),
    Detailed {
        nick: String,
        #[serde(default)]
        color: Option<String>,
    },
}

impl EicNickname {
    pub fn nick(&self) -> &str {
        match self {
            EicNickname::Plain(nick) => nick,
            EicNickname::Detailed { nick, .. } => nick,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            EicNickname::Plain(_) => None,
            EicNickname::Detailed { color, .. } => color.as_deref(),
        }
    }
}

/// API client credentials, read from the environment
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Read `AUTH_CLIENT_ID` and `AUTH_CLIENT_SECRET`. Both must be set and non-empty.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("AUTH_CLIENT_ID").ok().filter(|v| !v.is_empty())?;
        let client_secret = std::env::var("AUTH_CLIENT_SECRET").ok().filter(|v| !v.is_empty())?;
        Some(Self { client_id, client_secret })
    }
}
