//! Common test utilities for integration tests
//!
//! Provides scripted collaborators, the shipped weight table, and engine
//! builders shared across integration test files.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use refiner::domain::models::{Defect, EngineConfig, ProblemConfig, SeverityWeightTable};
use refiner::domain::ports::{
    AnalyzerError, ProblemAnalyzer, ProposerError, SolutionProposer, SolutionVerifier,
    VerificationReport, VerifierError,
};
use refiner::infrastructure::config::WeightTableLoader;
use refiner::services::DecisionEngine;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// The weight table shipped in `config/error_weights.json`
pub fn shipped_weights() -> Arc<SeverityWeightTable> {
    let raw = include_str!("../../config/error_weights.json");
    Arc::new(WeightTableLoader::from_json_str(raw).expect("shipped weights should parse"))
}

pub fn problem_config(max_iterations: u32) -> ProblemConfig {
    ProblemConfig::new(
        vec![],
        vec!["ToT".to_string(), "CoT".to_string()],
        max_iterations,
    )
}

pub fn clean_report() -> VerificationReport {
    VerificationReport::new(vec![], 1.0, "scheduling")
}

pub fn report(defects: Vec<Defect>, confidence: f64, domain: &str) -> VerificationReport {
    VerificationReport::new(defects, confidence, domain)
}

/// Proposer that echoes the strategy and records every call
#[derive(Default)]
pub struct RecordingProposer {
    strategies: Mutex<Vec<String>>,
}

impl RecordingProposer {
    pub fn strategies(&self) -> Vec<String> {
        self.strategies.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolutionProposer for RecordingProposer {
    async fn propose(
        &self,
        problem: &str,
        strategy: &str,
        _constraints: &[String],
    ) -> Result<String, ProposerError> {
        let mut strategies = self.strategies.lock().unwrap();
        strategies.push(strategy.to_string());
        Ok(format!("{strategy} solution #{} for {problem}", strategies.len()))
    }
}

/// Proposer that always fails
pub struct FailingProposer;

#[async_trait]
impl SolutionProposer for FailingProposer {
    async fn propose(
        &self,
        _problem: &str,
        _strategy: &str,
        _constraints: &[String],
    ) -> Result<String, ProposerError> {
        Err(ProposerError::Unavailable("model offline".to_string()))
    }
}

/// Proposer that never answers within any reasonable timeout
pub struct SlowProposer(pub Duration);

#[async_trait]
impl SolutionProposer for SlowProposer {
    async fn propose(
        &self,
        _problem: &str,
        _strategy: &str,
        _constraints: &[String],
    ) -> Result<String, ProposerError> {
        tokio::time::sleep(self.0).await;
        Ok("late".to_string())
    }
}

/// Verifier that replays a script of results
///
/// Once the script runs out the last entry repeats.
pub struct ScriptedVerifier {
    script: Mutex<VecDeque<Result<VerificationReport, VerifierError>>>,
    last: Mutex<Option<Result<VerificationReport, VerifierError>>>,
}

impl ScriptedVerifier {
    pub fn new(script: Vec<Result<VerificationReport, VerifierError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
        }
    }

    pub fn always(result: Result<VerificationReport, VerifierError>) -> Self {
        Self::new(vec![result])
    }
}

#[async_trait]
impl SolutionVerifier for ScriptedVerifier {
    async fn verify(
        &self,
        _problem: &str,
        _solution: &str,
        _constraints: &[String],
    ) -> Result<VerificationReport, VerifierError> {
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(result) = next {
            *last = Some(result);
        }
        last.clone()
            .unwrap_or_else(|| Err(VerifierError::Unavailable("empty script".to_string())))
    }
}

/// Verifier that panics mid-cycle
pub struct PanickingVerifier;

#[async_trait]
impl SolutionVerifier for PanickingVerifier {
    async fn verify(
        &self,
        _problem: &str,
        _solution: &str,
        _constraints: &[String],
    ) -> Result<VerificationReport, VerifierError> {
        panic!("verifier exploded");
    }
}

/// Analyzer returning a fixed result
pub struct FixedAnalyzer(pub Result<ProblemConfig, AnalyzerError>);

#[async_trait]
impl ProblemAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _problem: &str) -> Result<ProblemConfig, AnalyzerError> {
        self.0.clone()
    }
}

pub fn engine<P: SolutionProposer, V: SolutionVerifier>(
    proposer: P,
    verifier: V,
) -> DecisionEngine<P, V> {
    engine_with(proposer, verifier, EngineConfig::default())
}

pub fn engine_with<P: SolutionProposer, V: SolutionVerifier>(
    proposer: P,
    verifier: V,
    config: EngineConfig,
) -> DecisionEngine<P, V> {
    DecisionEngine::new(
        Arc::new(proposer),
        Arc::new(verifier),
        shipped_weights(),
        config,
    )
}
