//! Glicko-2 rating system
//!
//! This module provides the rating calculator interface and the Glicko-2
//! rating period update behind it.

pub mod calculator;
pub mod glicko2;

// Re-export commonly used types
pub use calculator::{Glicko2Calculator, RatingCalculator};
pub use glicko2::{advance_rating_period, expected_score, rate_player};
