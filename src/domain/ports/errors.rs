use std::time::Duration;

use thiserror::Error;

/// Solution proposer failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProposerError {
    #[error("Proposer unavailable: {0}")]
    Unavailable(String),

    #[error("Proposer timed out after {0:?}")]
    Timeout(Duration),
}

/// Solution verifier failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    #[error("Verifier unavailable: {0}")]
    Unavailable(String),

    #[error("Verifier returned malformed output: {0}")]
    MalformedOutput(String),

    #[error("Verifier timed out after {0:?}")]
    Timeout(Duration),
}

/// Problem analyzer failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("Analyzer unavailable: {0}")]
    Unavailable(String),

    #[error("Analyzer returned malformed output: {0}")]
    MalformedOutput(String),
}
