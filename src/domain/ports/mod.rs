//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - SolutionProposer: produces a candidate solution for a strategy
//! - SolutionVerifier: reports defects in a candidate solution
//! - ProblemAnalyzer: derives the per-session problem configuration
//! - SessionRepository: storage for iteration sessions
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod analyzer;
pub mod errors;
pub mod proposer;
pub mod session_repository;
pub mod verifier;

pub use analyzer::ProblemAnalyzer;
pub use errors::{AnalyzerError, ProposerError, VerifierError};
pub use proposer::SolutionProposer;
pub use session_repository::SessionRepository;
pub use verifier::{SolutionVerifier, VerificationReport};
