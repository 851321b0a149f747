pub mod decision_engine;
pub mod error_scorer;
pub mod session_service;
pub mod threshold;
pub mod trend;

pub use decision_engine::{decide, Decision, DecisionEngine, DecisionInputs};
pub use error_scorer::ErrorScorer;
pub use session_service::SessionService;
pub use threshold::ThresholdCalculator;
pub use trend::trend;
