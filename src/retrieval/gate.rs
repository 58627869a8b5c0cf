use tracing::debug;

use crate::vectordb::ScoredCandidate;

/// Keeps candidates scoring at least `threshold`, preserving order.
///
/// `None` disables the gate. A missing score compares as `0.0`.
pub fn threshold_gate(
    candidates: Vec<ScoredCandidate>,
    threshold: Option<f32>,
) -> Vec<ScoredCandidate> {
    let Some(threshold) = threshold else {
        return candidates;
    };

    let before = candidates.len();
    let kept: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|c| c.score_or_zero() >= threshold)
        .collect();

    debug!(threshold, before, kept = kept.len(), "Applied score threshold");
    kept
}
