//! Iteration session: the mutable record of one refinement run.
//!
//! Sessions are never mutated in place by the engine. Each cycle takes a
//! snapshot and produces the next value, which the caller commits as a whole.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::defect::Defect;
use super::problem::ProblemConfig;

/// Problem type used until the verifier classifies the problem.
pub const DEFAULT_PROBLEM_TYPE: &str = "general";

/// Where the loop stands after the most recent cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// Created, no cycle run yet.
    #[default]
    Pending,
    /// Another cycle is required.
    Continue,
    /// Terminal: external authority must take over.
    Escalate,
    /// Terminal: the latest solution was accepted.
    Complete,
}

impl SessionAction {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Escalate | Self::Complete)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Continue => "continue",
            Self::Escalate => "escalate",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session was escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    /// At least one critical defect remained when the loop stopped.
    CriticalDefect,
    /// The score fell below the escalation floor.
    LowScore,
    /// An unexpected internal error aborted the session.
    SystemError,
}

/// Payload attached to an escalated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    pub reason: EscalationReason,

    /// Approvals required before work may resume. Never empty.
    pub required: Vec<String>,

    pub message: String,
}

/// Metrics computed by the most recent cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleEvaluation {
    pub strategy: String,
    pub score: f64,
    pub threshold: f64,
    pub trend: f64,
}

/// One end-to-end run of the refinement loop for a single problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSession {
    pub id: Uuid,

    pub problem: String,

    /// Domain classification reported by the verifier.
    pub problem_type: String,

    pub config: ProblemConfig,

    /// Candidate solutions, one per completed propose step. Append-only.
    pub solutions: Vec<String>,

    /// Defects from the latest cycle only.
    pub current_defects: Vec<Defect>,

    /// Verifier confidence for the latest cycle, in `[0, 1]`.
    pub confidence: f64,

    /// Number of completed `continue` cycles.
    pub iteration: u32,

    /// Score of every cycle that ended in `continue`. Append-only.
    pub score_history: Vec<f64>,

    pub action: SessionAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Escalation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluation: Option<CycleEvaluation>,

    /// Incremented on every committed cycle; used for optimistic writes.
    pub revision: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl IterationSession {
    /// Create a pending session with a fresh id.
    pub fn new(problem: impl Into<String>, config: ProblemConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            problem: problem.into(),
            problem_type: DEFAULT_PROBLEM_TYPE.to_string(),
            config,
            solutions: Vec::new(),
            current_defects: Vec::new(),
            confidence: 0.0,
            iteration: 0,
            score_history: Vec::new(),
            action: SessionAction::Pending,
            escalation: None,
            final_score: None,
            last_evaluation: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.action.is_terminal()
    }

    pub fn latest_solution(&self) -> Option<&str> {
        self.solutions.last().map(String::as_str)
    }

    pub fn has_critical_defect(&self) -> bool {
        self.current_defects.iter().any(Defect::is_critical)
    }

    pub fn critical_count(&self) -> usize {
        self.current_defects.iter().filter(|d| d.is_critical()).count()
    }

    /// Whether the iteration budget allows another cycle after the one in
    /// progress. The cycle in progress counts against `max_iterations`;
    /// `default_max_iterations` applies when the config sets no budget.
    pub fn has_budget_for_another_cycle(&self, default_max_iterations: u32) -> bool {
        self.iteration.saturating_add(1) < self.config.budget_or(default_max_iterations)
    }

    /// Force this session into terminal `escalate`, keeping every solution
    /// and defect it already holds.
    #[must_use]
    pub fn into_escalated(mut self, escalation: Escalation) -> Self {
        self.action = SessionAction::Escalate;
        self.escalation = Some(escalation);
        self.touch();
        self
    }

    /// Bump the revision and modification time.
    pub(crate) fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }
}
