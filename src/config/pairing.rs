//! Swiss pairing penalty weights

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Weights of the individual penalty terms scored for each candidate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PairingOptions {
    /// Cost of re-pairing two players who already met
    #[serde(alias = "avoidRematchPenalty")]
    pub rematch_penalty: f64,
    /// Cost per game of an existing same-color streak of two or more
    pub color_repeat_penalty: f64,
    /// Cost per rating point between the two players
    pub rating_gap_weight: f64,
    /// Cost per score point between the two players
    pub score_gap_weight: f64,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            rematch_penalty: 1000.0,
            color_repeat_penalty: 10.0,
            rating_gap_weight: 0.05,
            score_gap_weight: 5.0,
        }
    }
}

impl PairingOptions {
    /// Validate that every weight is a finite, non-negative number
    pub fn validate(&self) -> crate::error::Result<()> {
        let weights = [
            ("rematch penalty", self.rematch_penalty),
            ("color repeat penalty", self.color_repeat_penalty),
            ("rating gap weight", self.rating_gap_weight),
            ("score gap weight", self.score_gap_weight),
        ];

        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid_roster(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                ))
                .into());
            }
        }

        Ok(())
    }
}
