use alloy::primitives::Address;
use eas_core::Deployment;
use serde::Deserialize;
use std::fs;
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "EAS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_port: u16,
    pub log_level: String,
    pub chain_id: u64,
    pub registry_address: Address,
    pub eas_address: Address,
    pub proxy_address: Address,
    pub proxy_name: String,
    pub indexer_address: Address,
    #[serde(default = "default_subscription_capacity")]
    pub subscription_capacity: usize,
}

fn default_subscription_capacity() -> usize {
    1024
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
    #[error("Failed to parse log level: {0}")]
    LogLevelParseError(String),
    #[error("Subscription capacity must be positive")]
    ZeroSubscriptionCapacity,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(data)?;
        if config.subscription_capacity == 0 {
            return Err(ConfigError::ZeroSubscriptionCapacity);
        }
        Ok(config)
    }

    /// Path from `EAS_CONFIG`, falling back to `config.json`.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevelParseError(self.log_level.clone()))
    }

    pub fn deployment(&self) -> Deployment {
        Deployment {
            chain_id: self.chain_id,
            registry: self.registry_address,
            eas: self.eas_address,
            proxy: self.proxy_address,
            proxy_name: self.proxy_name.clone(),
            indexer: self.indexer_address,
        }
    }
}
