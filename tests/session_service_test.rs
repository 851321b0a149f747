//! Session service integration tests with the in-memory repository.

mod common;

use std::sync::Arc;

use common::*;
use refiner::adapters::InMemorySessionRepository;
use refiner::domain::models::{Defect, EngineConfig, ProblemConfig, SessionAction, Severity};
use refiner::domain::ports::{AnalyzerError, SessionRepository, VerifierError};
use refiner::domain::DomainError;
use refiner::infrastructure::validators::parse_problem_config;
use refiner::services::SessionService;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

type Service = SessionService<RecordingProposer, ScriptedVerifier>;

fn service_with(verifier: ScriptedVerifier) -> (Service, Arc<InMemorySessionRepository>) {
    let repo = Arc::new(InMemorySessionRepository::new());
    let service = SessionService::new(
        repo.clone(),
        Arc::new(engine(RecordingProposer::default(), verifier)),
    );
    (service, repo)
}

#[tokio::test]
async fn test_create_and_get() {
    let (service, repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));

    let session = service
        .create("Plan the warehouse route", problem_config(4))
        .await
        .unwrap();

    assert_eq!(session.action, SessionAction::Pending);
    assert_eq!(session.iteration, 0);
    assert!(session.solutions.is_empty());
    assert_eq!(repo.len().await, 1);

    let fetched = service.get(session.id).await.unwrap();
    assert_eq!(fetched.id, session.id);
    assert_eq!(fetched.problem, "Plan the warehouse route");
}

#[tokio::test]
async fn test_step_commits_cycle() {
    let (service, _repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    let session = service.create("p", problem_config(4)).await.unwrap();

    let stepped = service.step(session.id).await.unwrap();
    assert_eq!(stepped.action, SessionAction::Complete);

    let stored = service.get(session.id).await.unwrap();
    assert_eq!(stored.action, SessionAction::Complete);
    assert_eq!(stored.revision, stepped.revision);
    assert_eq!(stored.solutions.len(), 1);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (service, _repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    let id = Uuid::new_v4();

    assert!(matches!(
        service.get(id).await,
        Err(DomainError::SessionNotFound(missing)) if missing == id
    ));
    assert!(matches!(
        service.step(id).await,
        Err(DomainError::SessionNotFound(_))
    ));
    assert!(matches!(
        service.run(id, &CancellationToken::new()).await,
        Err(DomainError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn test_stepping_terminal_session_fails_without_mutation() {
    let (service, _repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    let session = service.create("p", problem_config(4)).await.unwrap();
    let done = service.step(session.id).await.unwrap();

    let err = service.step(session.id).await.unwrap_err();
    assert!(matches!(err, DomainError::SessionTerminal { .. }));

    let stored = service.get(session.id).await.unwrap();
    assert_eq!(stored.revision, done.revision);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let (service, repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));

    let empty_strategies = ProblemConfig::new(vec![], vec![], 3);
    assert!(matches!(
        service.create("p", empty_strategies).await,
        Err(DomainError::InvalidProblemConfig(_))
    ));

    let zero_budget = ProblemConfig::new(vec![], vec!["ToT".to_string()], 0);
    assert!(matches!(
        service.create("p", zero_budget).await,
        Err(DomainError::InvalidProblemConfig(_))
    ));

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_create_analyzed() {
    let (service, _repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    let analyzed = ProblemConfig::new(
        vec!["no overlaps".to_string()],
        vec!["GoT".to_string()],
        2,
    );
    let service = service.with_analyzer(Arc::new(FixedAnalyzer(Ok(analyzed.clone()))));

    let session = service.create_analyzed("Schedule").await.unwrap();
    assert_eq!(session.config, analyzed);
}

#[tokio::test]
async fn test_create_analyzed_errors() {
    let (service, repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    assert!(matches!(
        service.create_analyzed("p").await,
        Err(DomainError::Analysis(AnalyzerError::Unavailable(_)))
    ));

    let service = service.with_analyzer(Arc::new(FixedAnalyzer(Err(
        AnalyzerError::MalformedOutput("bad".to_string()),
    ))));
    assert!(matches!(
        service.create_analyzed("p").await,
        Err(DomainError::Analysis(AnalyzerError::MalformedOutput(_)))
    ));
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_run_reaches_terminal_state() {
    let critical = report(
        vec![Defect::new("safety_violation", Severity::Critical, "")],
        0.8,
        "engineering",
    );
    let (service, _repo) = service_with(ScriptedVerifier::always(Ok(critical)));
    let session = service.create("p", problem_config(3)).await.unwrap();

    let done = service
        .run(session.id, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(done.action, SessionAction::Escalate);
    assert_eq!(done.solutions.len(), 3);
    assert_eq!(done.iteration, 2);
    assert_eq!(service.get(session.id).await.unwrap().revision, done.revision);

    let escalated = service.list(Some(SessionAction::Escalate)).await.unwrap();
    assert_eq!(escalated.len(), 1);
    assert!(service
        .list(Some(SessionAction::Complete))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_run_many_isolates_sessions() {
    let (service, _repo) = service_with(ScriptedVerifier::always(Err(
        VerifierError::Unavailable("down".to_string()),
    )));
    let a = service.create("a", problem_config(2)).await.unwrap();
    let b = service.create("b", problem_config(4)).await.unwrap();
    let missing = Uuid::new_v4();

    let results = service
        .run_many(&[a.id, missing, b.id], &CancellationToken::new())
        .await;

    assert_eq!(results.len(), 3);
    let a_done = results[0].as_ref().unwrap();
    assert_eq!(a_done.id, a.id);
    assert_eq!(a_done.solutions.len(), 2);
    assert!(matches!(results[1], Err(DomainError::SessionNotFound(_))));
    let b_done = results[2].as_ref().unwrap();
    assert_eq!(b_done.id, b.id);
    assert_eq!(b_done.solutions.len(), 4);
}

#[tokio::test]
async fn test_stale_revision_is_rejected() {
    let (service, repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    let session = service.create("p", problem_config(4)).await.unwrap();
    let stale = session.clone();

    service.step(session.id).await.unwrap();

    let err = repo.update(&stale, stale.revision).await.unwrap_err();
    assert!(matches!(err, DomainError::ConcurrencyConflict { .. }));
}

#[tokio::test]
async fn test_analysis_without_budget_uses_engine_default() {
    let config = EngineConfig {
        default_max_iterations: 2,
        ..EngineConfig::default()
    };
    let repo = Arc::new(InMemorySessionRepository::new());
    let analyzed = parse_problem_config(r#"{"algorithms": ["ToT"]}"#).unwrap();
    assert_eq!(analyzed.max_iterations, None);
    let service = SessionService::new(
        repo,
        Arc::new(engine_with(
            RecordingProposer::default(),
            ScriptedVerifier::always(Err(VerifierError::Unavailable("down".to_string()))),
            config,
        )),
    )
    .with_analyzer(Arc::new(FixedAnalyzer(Ok(analyzed))));

    let session = service.create_analyzed("Route the trucks").await.unwrap();
    assert_eq!(session.config.max_iterations, Some(2));

    let done = service
        .run(session.id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(done.action, SessionAction::Escalate);
    assert_eq!(done.solutions.len(), 2);
    assert_eq!(done.iteration, 1);
}

#[tokio::test]
async fn test_explicit_budget_overrides_engine_default() {
    let config = EngineConfig {
        default_max_iterations: 2,
        ..EngineConfig::default()
    };
    let service = SessionService::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(engine_with(
            RecordingProposer::default(),
            ScriptedVerifier::always(Err(VerifierError::Unavailable("down".to_string()))),
            config,
        )),
    );

    let session = service.create("p", problem_config(4)).await.unwrap();
    let done = service
        .run(session.id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(done.solutions.len(), 4);
}

#[tokio::test]
async fn test_delete_removes_session() {
    let (service, repo) = service_with(ScriptedVerifier::always(Ok(clean_report())));
    let session = service.create("p", problem_config(4)).await.unwrap();

    service.delete(session.id).await.unwrap();
    assert!(repo.is_empty().await);
    assert!(matches!(
        service.get(session.id).await,
        Err(DomainError::SessionNotFound(_))
    ));
    assert!(matches!(
        service.delete(session.id).await,
        Err(DomainError::SessionNotFound(id)) if id == session.id
    ));
}
