//! Decision engine service.
//!
//! The `DecisionEngine` runs one refinement cycle at a time:
//!
//! - **PROPOSE** -- pick the next strategy round-robin and ask the proposer
//!   for a candidate solution.
//! - **VERIFY** -- ask the verifier for defects, confidence and a domain.
//! - **SCORE** -- turn the defects into a quality score.
//! - **THRESHOLD** -- compute the dynamic acceptance bar.
//! - **DECIDE** -- continue, escalate, or complete.
//!
//! Cycles are copy-on-write: [`DecisionEngine::step`] never mutates the
//! session it is given and returns the next session value, which callers
//! commit as a whole. Collaborator failures never abort a cycle; they are
//! replaced by a critical `system_error` defect with zero confidence.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CycleEvaluation, Defect, EngineConfig, Escalation, EscalationReason, IterationSession,
    SessionAction, SeverityWeightTable,
};
use crate::domain::ports::{
    ProposerError, SolutionProposer, SolutionVerifier, VerificationReport, VerifierError,
};

use super::error_scorer::ErrorScorer;
use super::threshold::ThresholdCalculator;
use super::trend::trend;

/// Scores below this always escalate once the continue gate is closed.
pub const ESCALATION_SCORE_FLOOR: f64 = 0.3;

/// A trend at or above this means the loop is improving fast enough to stop.
pub const CONTINUE_TREND_CEILING: f64 = 0.1;

/// Outcome of the decision step for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run another cycle.
    Continue,
    /// Stop and hand the session to a human reviewer.
    Escalate(EscalationReason),
    /// Accept the latest solution.
    Complete,
}

/// Inputs to the decision step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionInputs {
    /// Score of the cycle just verified.
    pub score: f64,
    /// Acceptance threshold for this cycle.
    pub threshold: f64,
    /// Trend over the history including this cycle's score.
    pub trend: f64,
    /// Whether any current defect is critical.
    pub has_critical_defect: bool,
    /// Whether another cycle fits in the iteration budget.
    pub has_budget: bool,
}

/// Decide what follows a cycle.
///
/// The continue gate is tested first: while the score lags the threshold,
/// the trend is flat or falling, and budget remains, the loop continues even
/// with critical defects outstanding.
pub fn decide(inputs: DecisionInputs) -> Decision {
    let continue_gate = inputs.score < inputs.threshold
        && inputs.trend < CONTINUE_TREND_CEILING
        && inputs.has_budget;

    if continue_gate {
        Decision::Continue
    } else if inputs.has_critical_defect {
        Decision::Escalate(EscalationReason::CriticalDefect)
    } else if inputs.score < ESCALATION_SCORE_FLOOR {
        Decision::Escalate(EscalationReason::LowScore)
    } else {
        Decision::Complete
    }
}

/// Verification outcome for one cycle, real or fallback.
struct CycleSignal {
    defects: Vec<Defect>,
    confidence: f64,
    /// `None` keeps the session's current problem type.
    domain: Option<String>,
}

impl CycleSignal {
    fn fallback(description: String) -> Self {
        Self {
            defects: vec![Defect::system_error(description)],
            confidence: 0.0,
            domain: None,
        }
    }
}

impl From<VerificationReport> for CycleSignal {
    fn from(report: VerificationReport) -> Self {
        let domain = Some(report.domain).filter(|d| !d.trim().is_empty());
        Self {
            defects: report.defects,
            confidence: report.confidence,
            domain,
        }
    }
}

/// Runs refinement cycles against injected collaborators.
///
/// Holds no per-session state, so one engine can drive any number of
/// sessions concurrently.
pub struct DecisionEngine<P: SolutionProposer, V: SolutionVerifier> {
    proposer: Arc<P>,
    verifier: Arc<V>,
    scorer: ErrorScorer,
    thresholder: ThresholdCalculator,
    config: EngineConfig,
}

impl<P: SolutionProposer, V: SolutionVerifier> DecisionEngine<P, V> {
    /// Create a new engine with the given collaborators and shared weights.
    pub fn new(
        proposer: Arc<P>,
        verifier: Arc<V>,
        weights: Arc<SeverityWeightTable>,
        mut config: EngineConfig,
    ) -> Self {
        if config.escalation_approvals.is_empty() {
            config.escalation_approvals = EngineConfig::default().escalation_approvals;
        }
        let scorer = ErrorScorer::new(weights).with_resolution(config.severity_resolution);
        let thresholder = ThresholdCalculator::new(config.base_threshold);
        Self {
            proposer,
            verifier,
            scorer,
            thresholder,
            config,
        }
    }

    /// The scorer configured for this engine.
    pub const fn scorer(&self) -> &ErrorScorer {
        &self.scorer
    }

    /// The threshold calculator configured for this engine.
    pub const fn thresholder(&self) -> &ThresholdCalculator {
        &self.thresholder
    }

    /// Engine settings, with escalation approvals already defaulted.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one cycle and return the next session value.
    ///
    /// # Errors
    /// Only `SessionTerminal`: every failure inside the cycle is absorbed,
    /// either by the collaborator fallback or by forcing the session into
    /// terminal `escalate`.
    #[instrument(skip(self, session), fields(session_id = %session.id, iteration = session.iteration))]
    pub async fn step(&self, session: &IterationSession) -> DomainResult<IterationSession> {
        if session.is_terminal() {
            return Err(DomainError::SessionTerminal {
                id: session.id,
                action: session.action,
            });
        }

        let outcome = AssertUnwindSafe(self.run_cycle(session))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(DomainError::Internal(format!("cycle panicked: {detail}")))
            });

        match outcome {
            Ok(next) => Ok(next),
            Err(err) => {
                error!(error = %err, "cycle failed, forcing escalation");
                Ok(session.clone().into_escalated(Escalation {
                    reason: EscalationReason::SystemError,
                    required: self.config.escalation_approvals.clone(),
                    message: err.to_string(),
                }))
            }
        }
    }

    /// Step until the session reaches a terminal action.
    ///
    /// Cancellation is observed between cycles and while a cycle is in
    /// flight; an interrupted cycle is discarded whole.
    pub async fn run_to_completion(
        &self,
        mut session: IterationSession,
        cancel: &CancellationToken,
    ) -> DomainResult<IterationSession> {
        while !session.is_terminal() {
            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled(session.id));
            }
            session = tokio::select! {
                () = cancel.cancelled() => return Err(DomainError::Cancelled(session.id)),
                next = self.step(&session) => next?,
            };
        }
        Ok(session)
    }

    async fn run_cycle(&self, session: &IterationSession) -> DomainResult<IterationSession> {
        let mut next = session.clone();

        let strategy = next
            .config
            .strategy_for(next.iteration)
            .ok_or_else(|| DomainError::Internal("no strategy configured".to_string()))?
            .to_string();

        let signal = match self.propose(&next, &strategy).await {
            Ok(solution) => {
                next.solutions.push(solution);
                self.verify(&next).await
            }
            Err(err) => {
                warn!(strategy = %strategy, error = %err, "proposer failed, using fallback signal");
                CycleSignal::fallback(format!("proposer failed: {err}"))
            }
        };

        next.current_defects = signal.defects;
        next.confidence = sanitize_confidence(signal.confidence);
        if let Some(domain) = signal.domain {
            next.problem_type = domain;
        }

        let score = self
            .scorer
            .score(&next.current_defects, &next.problem_type, next.confidence);
        let threshold = self.thresholder.threshold_for(&next);
        let mut projected = next.score_history.clone();
        projected.push(score);
        let trend = trend(&projected);

        if !(score.is_finite() && threshold.is_finite() && trend.is_finite()) {
            return Err(DomainError::Internal(format!(
                "non-finite cycle metrics: score={score}, threshold={threshold}, trend={trend}"
            )));
        }

        let decision = decide(DecisionInputs {
            score,
            threshold,
            trend,
            has_critical_defect: next.has_critical_defect(),
            has_budget: next.has_budget_for_another_cycle(self.config.default_max_iterations),
        });

        info!(
            strategy = %strategy,
            problem_type = %next.problem_type,
            defects = next.current_defects.len(),
            score,
            threshold,
            trend,
            decision = ?decision,
            "cycle decided"
        );

        next.last_evaluation = Some(CycleEvaluation {
            strategy,
            score,
            threshold,
            trend,
        });

        match decision {
            Decision::Continue => {
                next.iteration += 1;
                next.score_history.push(score);
                next.action = SessionAction::Continue;
            }
            Decision::Escalate(reason) => {
                next.action = SessionAction::Escalate;
                next.escalation = Some(Escalation {
                    reason,
                    required: self.config.escalation_approvals.clone(),
                    message: escalation_message(reason, score, threshold),
                });
            }
            Decision::Complete => {
                next.action = SessionAction::Complete;
                next.final_score = Some(score);
            }
        }

        next.touch();
        Ok(next)
    }

    async fn propose(
        &self,
        session: &IterationSession,
        strategy: &str,
    ) -> Result<String, ProposerError> {
        let limit = Duration::from_secs(self.config.proposer_timeout_secs);
        debug!(strategy, "requesting proposal");
        tokio::time::timeout(
            limit,
            self.proposer
                .propose(&session.problem, strategy, &session.config.constraints),
        )
        .await
        .map_err(|_| ProposerError::Timeout(limit))?
    }

    async fn verify(&self, session: &IterationSession) -> CycleSignal {
        let Some(solution) = session.latest_solution() else {
            return CycleSignal::fallback("no solution to verify".to_string());
        };
        let limit = Duration::from_secs(self.config.verifier_timeout_secs);
        let result = tokio::time::timeout(
            limit,
            self.verifier
                .verify(&session.problem, solution, &session.config.constraints),
        )
        .await
        .map_err(|_| VerifierError::Timeout(limit))
        .and_then(|inner| inner);

        match result {
            Ok(report) => report.into(),
            Err(err) => {
                warn!(error = %err, "verifier failed, using fallback signal");
                CycleSignal::fallback(format!("verifier failed: {err}"))
            }
        }
    }
}

fn sanitize_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn escalation_message(reason: EscalationReason, score: f64, threshold: f64) -> String {
    match reason {
        EscalationReason::CriticalDefect => {
            format!("critical defects remain (score {score:.3}, threshold {threshold:.3})")
        }
        EscalationReason::LowScore => {
            format!("score {score:.3} is below the escalation floor {ESCALATION_SCORE_FLOOR}")
        }
        EscalationReason::SystemError => "system error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> DecisionInputs {
        DecisionInputs {
            score: 0.5,
            threshold: 0.7,
            trend: 0.0,
            has_critical_defect: false,
            has_budget: true,
        }
    }

    #[test]
    fn test_continue_when_all_gates_open() {
        assert_eq!(decide(inputs()), Decision::Continue);
    }

    #[test]
    fn test_continue_outranks_critical_defect() {
        let d = decide(DecisionInputs {
            has_critical_defect: true,
            ..inputs()
        });
        assert_eq!(d, Decision::Continue);
    }

    #[test]
    fn test_escalate_on_critical_without_budget() {
        let d = decide(DecisionInputs {
            has_critical_defect: true,
            has_budget: false,
            ..inputs()
        });
        assert_eq!(d, Decision::Escalate(EscalationReason::CriticalDefect));
    }

    #[test]
    fn test_escalate_on_low_score() {
        let d = decide(DecisionInputs {
            score: 0.2,
            has_budget: false,
            ..inputs()
        });
        assert_eq!(d, Decision::Escalate(EscalationReason::LowScore));
    }

    #[test]
    fn test_rising_trend_stops_iteration() {
        let d = decide(DecisionInputs {
            trend: 0.1,
            ..inputs()
        });
        assert_eq!(d, Decision::Complete);
    }

    #[test]
    fn test_complete_when_score_meets_threshold() {
        let d = decide(DecisionInputs {
            score: 0.7,
            ..inputs()
        });
        assert_eq!(d, Decision::Complete);
    }

    #[test]
    fn test_sanitize_confidence() {
        assert!(sanitize_confidence(f64::NAN).abs() < f64::EPSILON);
        assert!((sanitize_confidence(1.7) - 1.0).abs() < f64::EPSILON);
        assert!(sanitize_confidence(-0.2).abs() < f64::EPSILON);
    }
}
