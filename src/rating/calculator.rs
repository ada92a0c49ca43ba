//! Rating calculator trait and the Glicko-2 implementation
//!
//! The trait is the seam the tournament workflow depends on; the Glicko-2
//! calculator binds a validated configuration to the free functions in
//! [`crate::rating::glicko2`].

use crate::config::Glicko2Config;
use crate::error::EngineError;
use crate::rating::glicko2;
use crate::types::{OpponentResult, Rating, RatingUpdate};

/// Trait for rating players over a rating period
pub trait RatingCalculator: Send + Sync {
    /// Rate a player against every game of one rating period at once
    ///
    /// # Arguments
    /// * `current` - Rating going into the period
    /// * `opponents` - Opponent snapshots and outcomes for the period
    fn rate_player(
        &self,
        current: &Rating,
        opponents: &[OpponentResult],
    ) -> crate::error::Result<RatingUpdate>;

    /// Inflate the deviation of a player who sat the period out
    fn advance_rating_period(&self, current: &Rating) -> crate::error::Result<Rating>;

    /// Expected score of `player` against `opponent`
    fn expected_score(&self, player: &Rating, opponent: &Rating) -> f64;

    /// Get the initial rating for new players
    fn initial_rating(&self) -> Rating;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}

/// Glicko-2 rating calculator
#[derive(Debug, Clone, Default)]
pub struct Glicko2Calculator {
    config: Glicko2Config,
}

impl Glicko2Calculator {
    /// Create a new Glicko-2 calculator
    pub fn new(config: Glicko2Config) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn glicko2_config(&self) -> &Glicko2Config {
        &self.config
    }
}

impl RatingCalculator for Glicko2Calculator {
    fn rate_player(
        &self,
        current: &Rating,
        opponents: &[OpponentResult],
    ) -> crate::error::Result<RatingUpdate> {
        glicko2::rate_player(current, opponents, &self.config)
    }

    fn advance_rating_period(&self, current: &Rating) -> crate::error::Result<Rating> {
        glicko2::advance_rating_period(current, current.volatility)
    }

    fn expected_score(&self, player: &Rating, opponent: &Rating) -> f64 {
        glicko2::expected_score(player, opponent)
    }

    fn initial_rating(&self) -> Rating {
        self.config.initial_rating()
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let new_config: Glicko2Config =
            serde_json::from_value(config).map_err(|e| EngineError::ConfigurationError {
                message: format!("Invalid Glicko-2 configuration: {}", e),
            })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
