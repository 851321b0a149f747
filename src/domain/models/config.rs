use serde::{Deserialize, Serialize};

use super::problem::DEFAULT_MAX_ITERATIONS;

/// Main configuration structure for the refinement controller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Decision engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Severity weight table location
    #[serde(default)]
    pub weights: WeightsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the scorer picks a severity for a defect type reported more than once
/// with different severities in the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeverityResolution {
    /// The first defect of the type, in verifier order, decides.
    #[default]
    FirstOccurrence,
    /// The most severe defect of the type decides.
    Worst,
}

/// Decision engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Base acceptance threshold before dynamic adjustment
    #[serde(default = "default_base_threshold")]
    pub base_threshold: f64,

    /// Iteration budget applied when the analysis step omits one
    #[serde(default = "default_max_iterations")]
    pub default_max_iterations: u32,

    /// Upper bound on a single proposer call
    #[serde(default = "default_call_timeout_secs")]
    pub proposer_timeout_secs: u64,

    /// Upper bound on a single verifier call
    #[serde(default = "default_call_timeout_secs")]
    pub verifier_timeout_secs: u64,

    /// Approvals attached to every escalation
    #[serde(default = "default_escalation_approvals")]
    pub escalation_approvals: Vec<String>,

    /// Mixed-severity resolution strategy for the scorer
    #[serde(default)]
    pub severity_resolution: SeverityResolution,
}

const fn default_base_threshold() -> f64 {
    0.7
}

const fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

const fn default_call_timeout_secs() -> u64 {
    120
}

fn default_escalation_approvals() -> Vec<String> {
    vec!["senior_approval".to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_threshold: default_base_threshold(),
            default_max_iterations: default_max_iterations(),
            proposer_timeout_secs: default_call_timeout_secs(),
            verifier_timeout_secs: default_call_timeout_secs(),
            escalation_approvals: default_escalation_approvals(),
            severity_resolution: SeverityResolution::default(),
        }
    }
}

/// Severity weight table location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WeightsConfig {
    /// Path to the JSON weight table
    #[serde(default = "default_weights_path")]
    pub path: String,
}

fn default_weights_path() -> String {
    "config/error_weights.json".to_string()
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            path: default_weights_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation policy for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Also log to stdout when file output is enabled
    #[serde(default = "default_true")]
    pub enable_stdout: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
            enable_stdout: true,
        }
    }
}
