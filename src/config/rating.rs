//! Glicko-2 rating system configuration

use crate::error::EngineError;
use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Parameters of the Glicko-2 update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Glicko2Config {
    /// Constrains how far volatility may move in one period
    pub tau: f64,
    pub default_rating: f64,
    pub default_deviation: f64,
    pub default_volatility: f64,
}

impl Default for Glicko2Config {
    fn default() -> Self {
        Self {
            tau: 0.5,
            default_rating: 1500.0,
            default_deviation: 350.0,
            default_volatility: 0.06,
        }
    }
}

impl Glicko2Config {
    /// Rating assigned to a player with no games
    pub fn initial_rating(&self) -> Rating {
        Rating {
            rating: self.default_rating,
            deviation: self.default_deviation,
            volatility: self.default_volatility,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(EngineError::configuration("Tau must be positive").into());
        }

        if !self.default_rating.is_finite() {
            return Err(EngineError::configuration("Default rating must be finite").into());
        }

        if !(self.default_deviation.is_finite() && self.default_deviation > 0.0) {
            return Err(EngineError::configuration("Default deviation must be positive").into());
        }

        if !(self.default_volatility.is_finite() && self.default_volatility > 0.0) {
            return Err(EngineError::configuration("Default volatility must be positive").into());
        }

        Ok(())
    }
}
