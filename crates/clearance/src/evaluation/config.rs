use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::scoring::IntentLexicon;
use super::validation::{MIN_RATIONALE_CHARS, MIN_RATIONALE_WORDS};

pub const DEFAULT_HISTORY_WINDOW: usize = 20;
pub const DEFAULT_SCORER_BUDGET_MS: u64 = 400;
pub const DEFAULT_AUDIT_BUDGET_MS: u64 = 750;

/// Tunables for one evaluator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub lexicon: IntentLexicon,
    pub history_window: usize,
    pub scorer_budget_ms: u64,
    pub audit_budget_ms: u64,
    pub min_rationale_chars: usize,
    pub min_rationale_words: usize,
}

impl EvaluationConfig {
    pub fn scorer_budget(&self) -> Duration {
        Duration::from_millis(self.scorer_budget_ms)
    }

    pub fn audit_budget(&self) -> Duration {
        Duration::from_millis(self.audit_budget_ms)
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            lexicon: IntentLexicon::default(),
            history_window: DEFAULT_HISTORY_WINDOW,
            scorer_budget_ms: DEFAULT_SCORER_BUDGET_MS,
            audit_budget_ms: DEFAULT_AUDIT_BUDGET_MS,
            min_rationale_chars: MIN_RATIONALE_CHARS,
            min_rationale_words: MIN_RATIONALE_WORDS,
        }
    }
}
