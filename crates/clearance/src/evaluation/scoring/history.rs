use super::{clamp_score, NEUTRAL_SCORE};
use crate::evaluation::domain::PastOutcome;

const RECENCY_DECAY: f64 = 0.9;

/// Recency-weighted approval ratio over the most recent `window`
/// outcomes, newest first. A requester with no history scores neutral.
pub fn score_history(outcomes: &[PastOutcome], window: usize) -> f64 {
    let considered = outcomes.iter().take(window);

    let mut weighted_approvals = 0.0;
    let mut total_weight = 0.0;
    for (index, outcome) in considered.enumerate() {
        let weight = RECENCY_DECAY.powi(index as i32);
        total_weight += weight;
        if outcome.approval() {
            weighted_approvals += weight;
        }
    }

    if total_weight == 0.0 {
        return NEUTRAL_SCORE;
    }
    clamp_score(weighted_approvals / total_weight * 100.0)
}
