//! Confidence scoring.
//!
//! Each dimension produces a score in `[0, 100]`; the weighted blend of
//! all five is the aggregate confidence the decision state machine acts
//! on. Weights are fixed and sum to exactly 1.0.

pub(crate) mod anomaly;
pub(crate) mod context;
pub(crate) mod history;
pub(crate) mod intent;

use serde::{Deserialize, Serialize};

pub use intent::IntentLexicon;

pub const ROLE_MATCH_WEIGHT: f64 = 0.30;
pub const INTENT_CLARITY_WEIGHT: f64 = 0.25;
pub const HISTORICAL_PATTERN_WEIGHT: f64 = 0.20;
pub const CONTEXT_VALIDITY_WEIGHT: f64 = 0.15;
pub const ANOMALY_SCORE_WEIGHT: f64 = 0.10;

/// Substituted for any dimension whose scorer could not produce a value.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// One of the five scored dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFactor {
    RoleMatch,
    IntentClarity,
    HistoricalPattern,
    ContextValidity,
    AnomalyScore,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::RoleMatch => "role-match",
            ScoreFactor::IntentClarity => "intent-clarity",
            ScoreFactor::HistoricalPattern => "historical-pattern",
            ScoreFactor::ContextValidity => "context-validity",
            ScoreFactor::AnomalyScore => "anomaly-score",
        }
    }

    pub const fn weight(self) -> f64 {
        match self {
            ScoreFactor::RoleMatch => ROLE_MATCH_WEIGHT,
            ScoreFactor::IntentClarity => INTENT_CLARITY_WEIGHT,
            ScoreFactor::HistoricalPattern => HISTORICAL_PATTERN_WEIGHT,
            ScoreFactor::ContextValidity => CONTEXT_VALIDITY_WEIGHT,
            ScoreFactor::AnomalyScore => ANOMALY_SCORE_WEIGHT,
        }
    }
}

/// The five per-dimension scores feeding one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub role_match: f64,
    pub intent_clarity: f64,
    pub historical_pattern: f64,
    pub context_validity: f64,
    pub anomaly_score: f64,
}

impl ConfidenceBreakdown {
    /// Weighted blend of all five dimensions, clamped to `[0, 100]`.
    pub fn aggregate(&self) -> f64 {
        let blended = self.role_match * ROLE_MATCH_WEIGHT
            + self.intent_clarity * INTENT_CLARITY_WEIGHT
            + self.historical_pattern * HISTORICAL_PATTERN_WEIGHT
            + self.context_validity * CONTEXT_VALIDITY_WEIGHT
            + self.anomaly_score * ANOMALY_SCORE_WEIGHT;
        blended.clamp(0.0, 100.0)
    }

    pub fn component(&self, factor: ScoreFactor) -> f64 {
        match factor {
            ScoreFactor::RoleMatch => self.role_match,
            ScoreFactor::IntentClarity => self.intent_clarity,
            ScoreFactor::HistoricalPattern => self.historical_pattern,
            ScoreFactor::ContextValidity => self.context_validity,
            ScoreFactor::AnomalyScore => self.anomaly_score,
        }
    }

    pub fn components(&self) -> [(ScoreFactor, f64); 5] {
        [
            (ScoreFactor::RoleMatch, self.role_match),
            (ScoreFactor::IntentClarity, self.intent_clarity),
            (ScoreFactor::HistoricalPattern, self.historical_pattern),
            (ScoreFactor::ContextValidity, self.context_validity),
            (ScoreFactor::AnomalyScore, self.anomaly_score),
        ]
    }
}

pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
