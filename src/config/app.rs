//! Main application configuration
//!
//! This module defines the top-level configuration for the tournament engine
//! binary, including environment variable and TOML file loading and validation.

use crate::config::{Glicko2Config, PairingOptions};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub pairing: PairingOptions,
    pub rating: Glicko2Config,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name reported in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "tournament-engine".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Pairing weights
        if let Ok(value) = env::var("REMATCH_PENALTY") {
            config.pairing.rematch_penalty = parse_var("REMATCH_PENALTY", &value)?;
        }
        if let Ok(value) = env::var("COLOR_REPEAT_PENALTY") {
            config.pairing.color_repeat_penalty = parse_var("COLOR_REPEAT_PENALTY", &value)?;
        }
        if let Ok(value) = env::var("RATING_GAP_WEIGHT") {
            config.pairing.rating_gap_weight = parse_var("RATING_GAP_WEIGHT", &value)?;
        }
        if let Ok(value) = env::var("SCORE_GAP_WEIGHT") {
            config.pairing.score_gap_weight = parse_var("SCORE_GAP_WEIGHT", &value)?;
        }

        // Glicko-2 parameters
        if let Ok(value) = env::var("GLICKO_TAU") {
            config.rating.tau = parse_var("GLICKO_TAU", &value)?;
        }
        if let Ok(value) = env::var("GLICKO_DEFAULT_RATING") {
            config.rating.default_rating = parse_var("GLICKO_DEFAULT_RATING", &value)?;
        }
        if let Ok(value) = env::var("GLICKO_DEFAULT_DEVIATION") {
            config.rating.default_deviation = parse_var("GLICKO_DEFAULT_DEVIATION", &value)?;
        }
        if let Ok(value) = env::var("GLICKO_DEFAULT_VOLATILITY") {
            config.rating.default_volatility = parse_var("GLICKO_DEFAULT_VOLATILITY", &value)?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing sections take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(contents).map_err(|e| anyhow!("Invalid TOML configuration: {}", e))?;
        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.pairing.validate()?;
    config.rating.validate()?;

    Ok(())
}
