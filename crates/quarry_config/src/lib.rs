//! Parsing and validation of `quarry.toml` placer configuration.
//!
//! The annealing engine takes every tunable (weights, penalty tables, the
//! temperature schedule, the random seed) through an explicit [`PlacerConfig`]
//! rather than module-level constants. This crate deserializes that config
//! from TOML and checks it for consistency.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::{PlacerConfig, QuarryConfig, REGISTER_TYPE};
