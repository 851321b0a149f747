//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - Severity weight table loading

pub mod loader;
pub mod weights;

pub use loader::{ConfigError, ConfigLoader};
pub use weights::WeightTableLoader;
