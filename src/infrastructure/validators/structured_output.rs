//! Turns raw JSON replies from model-backed collaborators into domain values.
//!
//! Collaborators frequently wrap JSON in markdown fences; every parser here
//! strips them first.

use serde::Deserialize;

use crate::domain::models::{Defect, ProblemConfig};
use crate::domain::ports::{AnalyzerError, VerificationReport, VerifierError};

#[derive(Debug, Deserialize)]
struct VerifierReply {
    #[serde(default)]
    errors: Vec<Defect>,
    confidence: f64,
    #[serde(default)]
    domain_classification: String,
}

/// Remove a surrounding markdown code fence, if present
pub fn strip_markdown_code_blocks(output: &str) -> String {
    let trimmed = output.trim();

    if trimmed.len() >= 6 && trimmed.starts_with("```") && trimmed.ends_with("```") {
        let inner = if let Some(newline) = trimmed.find('\n') {
            // Skip the opening fence and its language tag
            let end = trimmed.rfind("\n```").unwrap_or(trimmed.len() - 3);
            trimmed.get(newline + 1..end)
        } else {
            trimmed.get(3..trimmed.len() - 3).map(strip_language_tag)
        };
        if let Some(inner) = inner {
            tracing::debug!(input_length = trimmed.len(), "stripped markdown fence");
            return inner.trim().to_string();
        }
    }

    trimmed.to_string()
}

/// Drop a leading language identifier from a single-line fence body.
fn strip_language_tag(body: &str) -> &str {
    match body.split_once(char::is_whitespace) {
        Some((tag, rest))
            if !tag.is_empty()
                && tag
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') =>
        {
            rest
        }
        _ => body,
    }
}

/// Parse a verifier reply of the form
/// `{"errors": [...], "confidence": f, "domain_classification": s}`
///
/// # Errors
/// Returns `MalformedOutput` if the reply is not valid JSON of that shape or
/// the confidence is not a finite number
pub fn parse_verification_report(raw: &str) -> Result<VerificationReport, VerifierError> {
    let cleaned = strip_markdown_code_blocks(raw);
    let reply: VerifierReply = serde_json::from_str(&cleaned)
        .map_err(|e| VerifierError::MalformedOutput(e.to_string()))?;

    if !reply.confidence.is_finite() {
        return Err(VerifierError::MalformedOutput(format!(
            "confidence is not finite: {}",
            reply.confidence
        )));
    }

    Ok(VerificationReport::new(
        reply.errors,
        reply.confidence,
        reply.domain_classification,
    ))
}

/// Parse an analyzer reply of the form
/// `{"constraints": [...], "algorithms": [...], "max_iterations": n}`
///
/// An absent `max_iterations` stays unset; the session service fills it
/// from the engine's `default_max_iterations` when the session is created.
///
/// # Errors
/// Returns `MalformedOutput` if the reply does not parse or describes a
/// configuration the loop cannot run with
pub fn parse_problem_config(raw: &str) -> Result<ProblemConfig, AnalyzerError> {
    let cleaned = strip_markdown_code_blocks(raw);
    let config: ProblemConfig = serde_json::from_str(&cleaned)
        .map_err(|e| AnalyzerError::MalformedOutput(e.to_string()))?;
    config
        .validate()
        .map_err(|e| AnalyzerError::MalformedOutput(e.to_string()))?;
    Ok(config)
}
