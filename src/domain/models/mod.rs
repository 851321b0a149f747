pub mod config;
pub mod defect;
pub mod problem;
pub mod session;
pub mod weights;

pub use config::{Config, EngineConfig, LoggingConfig, SeverityResolution, WeightsConfig};
pub use defect::{Defect, Severity, SYSTEM_ERROR_DEFECT};
pub use problem::{ProblemConfig, DEFAULT_MAX_ITERATIONS};
pub use session::{
    CycleEvaluation, Escalation, EscalationReason, IterationSession, SessionAction,
    DEFAULT_PROBLEM_TYPE,
};
pub use weights::{SeverityWeightTable, DEFAULT_DOMAIN_MULTIPLIER, DEFAULT_WEIGHT};
