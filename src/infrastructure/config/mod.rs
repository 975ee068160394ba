//! Configuration loading for the game server.
//!
//! JSON file with serde defaults, plus `HOST`/`PORT` environment
//! overrides. The item seed file is a JSON array of catalog entries.

use crate::domain::NewShopItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid starting balance range: min {min}, max {max}")]
    InvalidBalanceRange { min: Decimal, max: Decimal },
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the catalog seed file.
    #[serde(default = "default_items_path")]
    pub items_path: String,

    /// Lower bound of the randomized starting balance (two decimals).
    #[serde(default = "default_min_start_balance")]
    pub min_start_balance: Decimal,

    /// Upper bound of the randomized starting balance (two decimals).
    #[serde(default = "default_max_start_balance")]
    pub max_start_balance: Decimal,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7777
}

fn default_items_path() -> String {
    "shop_items.json".to_string()
}

fn default_min_start_balance() -> Decimal {
    Decimal::new(1000, 2) // 10.00
}

fn default_max_start_balance() -> Decimal {
    Decimal::new(10000, 2) // 100.00
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
            items_path: default_items_path(),
            min_start_balance: default_min_start_balance(),
            max_start_balance: default_max_start_balance(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`/`PORT` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        use rust_decimal::prelude::ToPrimitive;
        // Balances are sampled in i64 cents, so the bounds must fit there too.
        let fits_in_cents =
            |d: Decimal| (d.round_dp(2) * Decimal::ONE_HUNDRED).to_i64().is_some();
        if self.min_start_balance.is_sign_negative()
            || self.max_start_balance < self.min_start_balance
            || !fits_in_cents(self.max_start_balance)
        {
            return Err(ConfigError::InvalidBalanceRange {
                min: self.min_start_balance,
                max: self.max_start_balance,
            });
        }
        Ok(())
    }
}

/// Load the catalog seed file: a JSON array of `{name, price, type}`.
pub fn load_item_list(path: impl AsRef<Path>) -> Result<Vec<NewShopItem>, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        error: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}
