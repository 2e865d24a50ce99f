//! Rationale scoring.
//!
//! Starts from a neutral base and adjusts for keyword evidence plus two
//! structural signals. Each keyword category contributes at most once no
//! matter how many of its words appear.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::clamp_score;

const BASE_SCORE: f64 = 50.0;
const ACADEMIC_BONUS: f64 = 20.0;
const PURPOSE_BONUS: f64 = 15.0;
const SUSPICIOUS_PENALTY: f64 = 15.0;
const COHERENCE_BONUS: f64 = 10.0;
const CONTRADICTION_PENALTY: f64 = 25.0;

const COHERENCE_MIN_WORDS: usize = 12;
const REPEAT_NGRAM: usize = 3;
const REPEAT_COVERAGE_LIMIT: f64 = 0.4;

/// Keyword categories consulted while scoring a rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentLexicon {
    pub academic: BTreeSet<String>,
    pub legitimate: BTreeSet<String>,
    pub suspicious: BTreeSet<String>,
    pub administrative: BTreeSet<String>,
}

impl Default for IntentLexicon {
    fn default() -> Self {
        Self {
            academic: word_set(&[
                "research",
                "thesis",
                "dissertation",
                "study",
                "coursework",
                "assignment",
                "course",
                "lecture",
                "lab",
                "exam",
                "paper",
                "professor",
                "semester",
                "curriculum",
            ]),
            legitimate: word_set(&[
                "work",
                "project",
                "meeting",
                "presentation",
                "report",
                "scheduled",
                "approved",
                "authorized",
                "deadline",
                "collaboration",
                "onboarding",
            ]),
            suspicious: word_set(&[
                "just",
                "quick",
                "quickly",
                "test",
                "testing",
                "curious",
                "whatever",
                "random",
                "fun",
                "hack",
                "bypass",
                "borrow",
                "snoop",
                "urgent",
                "asap",
                "immediately",
            ]),
            administrative: word_set(&[
                "maintenance",
                "configuration",
                "provisioning",
                "migration",
                "backup",
                "audit",
                "compliance",
                "rotation",
                "decommission",
            ]),
        }
    }
}

fn word_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|word| word.to_string()).collect()
}

/// Which adjustments fired for a rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentSignals {
    pub word_count: usize,
    pub academic: bool,
    pub purposeful: bool,
    pub suspicious: bool,
    pub coherent: bool,
    pub contradiction: bool,
}

/// Score a rationale against the lexicon.
///
/// Matching is case-insensitive on alphanumeric-normalized tokens, so
/// punctuation around a keyword never hides it.
pub fn score_rationale(rationale: &str, lexicon: &IntentLexicon) -> (f64, IntentSignals) {
    let tokens = tokenize(rationale);
    let word_count = tokens.len();

    let academic = tokens.iter().any(|token| lexicon.academic.contains(token));
    let purposeful = tokens.iter().any(|token| {
        lexicon.legitimate.contains(token) || lexicon.administrative.contains(token)
    });
    let suspicious = tokens.iter().any(|token| lexicon.suspicious.contains(token));

    let coherent = word_count >= COHERENCE_MIN_WORDS
        && repeated_ngram_coverage(&tokens) <= REPEAT_COVERAGE_LIMIT;
    let contradiction = suspicious && word_count < COHERENCE_MIN_WORDS;

    let mut score = BASE_SCORE;
    if academic {
        score += ACADEMIC_BONUS;
    }
    if purposeful {
        score += PURPOSE_BONUS;
    }
    if suspicious {
        score -= SUSPICIOUS_PENALTY;
    }
    if coherent {
        score += COHERENCE_BONUS;
    }
    if contradiction {
        score -= CONTRADICTION_PENALTY;
    }

    let signals = IntentSignals {
        word_count,
        academic,
        purposeful,
        suspicious,
        coherent,
        contradiction,
    };
    (clamp_score(score), signals)
}

fn tokenize(rationale: &str) -> Vec<String> {
    rationale
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Fraction of tokens covered by any 3-gram that appears more than once.
fn repeated_ngram_coverage(tokens: &[String]) -> f64 {
    if tokens.len() < REPEAT_NGRAM {
        return 0.0;
    }

    let mut counts: HashMap<&[String], usize> = HashMap::new();
    for window in tokens.windows(REPEAT_NGRAM) {
        *counts.entry(window).or_insert(0) += 1;
    }

    let repeats = counts.values().filter(|&&count| count >= 2).max();
    match repeats {
        Some(&count) => (count * REPEAT_NGRAM) as f64 / tokens.len() as f64,
        None => 0.0,
    }
}
