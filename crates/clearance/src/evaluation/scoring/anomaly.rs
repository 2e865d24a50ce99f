const SPREAD_LIMIT: f64 = 35.0;
const SPREAD_PENALTY: f64 = 20.0;
const RATE_BUDGET_LIMIT: f64 = 0.8;
const RATE_PENALTY: f64 = 30.0;

/// Flag evaluations whose component scores disagree sharply or whose
/// requester is close to exhausting their rate budget.
///
/// Runs after the other scorers because it consumes their effective
/// values, substitutions included.
pub fn score_anomaly(intent: f64, history: f64, context: f64, rate_utilization: f64) -> f64 {
    let mut score = 100.0;
    if spread(&[intent, history, context]) > SPREAD_LIMIT {
        score -= SPREAD_PENALTY;
    }
    if rate_utilization > RATE_BUDGET_LIMIT {
        score -= RATE_PENALTY;
    }
    score.max(0.0)
}

/// Population standard deviation.
fn spread(values: &[f64]) -> f64 {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / count;
    variance.sqrt()
}
