//! Score momentum over a session's history.

/// Endpoint slope of `history`, normalised by sample count.
///
/// Only the oldest and newest scores matter; intermediate fluctuation is
/// ignored. Fewer than two samples carry no trend signal and yield `0.0`.
/// Threshold tuning depends on this exact formula, so it is not a fitted
/// regression.
pub fn trend(history: &[f64]) -> f64 {
    match (history.first(), history.last()) {
        (Some(first), Some(last)) if history.len() >= 2 => (last - first) / history.len() as f64,
        _ => 0.0,
    }
}
