//! Tournament Engine - Swiss pairing and Glicko-2 rating for Go tournaments
//!
//! This crate provides the two algorithmic cores of a tournament manager:
//! a Swiss-system round pairing generator and a Glicko-2 rating updater.
//! Both are pure functions of their inputs; the caller threads rosters,
//! pairings, results and ratings between them.

pub mod config;
pub mod error;
pub mod pairing;
pub mod rating;
pub mod tournament;
pub mod types;

// Re-export commonly used types and traits
pub use error::{EngineError, Result};
pub use types::*;

// Re-export key components
pub use pairing::{generate_pairings, PairingGenerator, SwissPairingEngine};
pub use rating::{
    advance_rating_period, expected_score, rate_player, Glicko2Calculator, RatingCalculator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
