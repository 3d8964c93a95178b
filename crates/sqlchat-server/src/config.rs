//! Server configuration.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Base URL of the natural-language-to-SQL service.
    #[serde(default = "default_translator_url")]
    pub translator_url: String,
    #[serde(default = "default_private_key_path")]
    pub jwt_private_key_path: PathBuf,
    #[serde(default = "default_public_key_path")]
    pub jwt_public_key_path: PathBuf,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_reconnect_timeout")]
    pub reconnect_timeout_secs: u64,
    #[serde(default = "default_schema_timeout")]
    pub schema_timeout_secs: u64,
    #[serde(default = "default_query_timeout")]
    pub default_query_timeout_secs: u64,
    /// Request body limit; profile avatars travel inline.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sqlchat")
        .join("sqlchat.db")
}

fn default_translator_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_private_key_path() -> PathBuf {
    PathBuf::from("keys/private.pem")
}

fn default_public_key_path() -> PathBuf {
    PathBuf::from("keys/public.pem")
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_reconnect_timeout() -> u64 {
    10
}

fn default_schema_timeout() -> u64 {
    30
}

fn default_query_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            translator_url: default_translator_url(),
            jwt_private_key_path: default_private_key_path(),
            jwt_public_key_path: default_public_key_path(),
            token_ttl_secs: default_token_ttl(),
            reconnect_timeout_secs: default_reconnect_timeout(),
            schema_timeout_secs: default_schema_timeout(),
            default_query_timeout_secs: default_query_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from config/default.toml, or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }
        Ok(Config::default())
    }

    pub fn reconnect_timeout(&self) -> Duration {
        Duration::from_secs(self.reconnect_timeout_secs)
    }

    pub fn schema_timeout(&self) -> Duration {
        Duration::from_secs(self.schema_timeout_secs)
    }

    pub fn default_query_timeout(&self) -> Duration {
        Duration::from_secs(self.default_query_timeout_secs)
    }
}
