//! Swiss-system round pairing
//!
//! This module provides the pairing generator interface, the penalty model
//! used to score candidate pairs, and the exhaustive Swiss search.

pub mod penalty;
pub mod swiss;

use crate::config::PairingOptions;
use crate::error::Result;
use crate::types::{PairingResult, Player};

pub use swiss::generate_pairings;

/// Trait for producing one round of table assignments
pub trait PairingGenerator: Send + Sync {
    /// Pair every eligible player in `roster` for the next round
    fn generate(&self, roster: &[Player]) -> Result<PairingResult>;

    /// Options the generator scores candidates with
    fn options(&self) -> &PairingOptions;
}

/// Swiss pairing generator bound to a validated set of options
#[derive(Debug, Clone, Default)]
pub struct SwissPairingEngine {
    options: PairingOptions,
}

impl SwissPairingEngine {
    /// Create a new engine, rejecting negative weights up front
    pub fn new(options: PairingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }
}

impl PairingGenerator for SwissPairingEngine {
    fn generate(&self, roster: &[Player]) -> Result<PairingResult> {
        generate_pairings(roster, &self.options)
    }

    fn options(&self) -> &PairingOptions {
        &self.options
    }
}
