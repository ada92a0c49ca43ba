//! Configuration management for the tournament engines
//!
//! This module handles configuration loading from environment variables or
//! TOML files, validation, and default values for both engines.

pub mod app;
pub mod pairing;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use pairing::PairingOptions;
pub use rating::Glicko2Config;
