use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base_threshold: {0}. Must be a number between 0 and 1")]
    InvalidBaseThreshold(f64),

    #[error("Invalid default_max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid {name}: {value}. Must be at least 1 second")]
    InvalidTimeout { name: &'static str, value: u64 },

    #[error("escalation_approvals cannot be empty")]
    EmptyEscalationApprovals,

    #[error("Weight table path cannot be empty")]
    EmptyWeightsPath,

    #[error("Invalid weight table: {0}")]
    InvalidWeightTable(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .refiner/config.yaml (project config)
    /// 3. .refiner/local.yaml (project local overrides, optional)
    /// 4. Environment variables (REFINER_* prefix, `__` for nesting, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("REFINER_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".refiner/config.yaml"))
            .merge(Yaml::file(".refiner/local.yaml"))
            .merge(Env::prefixed("REFINER_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let engine = &config.engine;

        if !engine.base_threshold.is_finite() || !(0.0..=1.0).contains(&engine.base_threshold) {
            return Err(ConfigError::InvalidBaseThreshold(engine.base_threshold));
        }

        if engine.default_max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(
                engine.default_max_iterations,
            ));
        }

        if engine.proposer_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "proposer_timeout_secs",
                value: engine.proposer_timeout_secs,
            });
        }

        if engine.verifier_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "verifier_timeout_secs",
                value: engine.verifier_timeout_secs,
            });
        }

        if engine.escalation_approvals.is_empty() {
            return Err(ConfigError::EmptyEscalationApprovals);
        }
        if engine.escalation_approvals.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "escalation approval names cannot be blank".to_string(),
            ));
        }

        if config.weights.path.trim().is_empty() {
            return Err(ConfigError::EmptyWeightsPath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
