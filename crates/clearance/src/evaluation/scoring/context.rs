use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::evaluation::domain::RequestContext;
use crate::evaluation::policy::{AccessCheck, Policy, Weekday};

const VIOLATION_PENALTY: f64 = 30.0;

/// A contextual restriction the request failed to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextViolation {
    OutsideAllowedHours,
    OutsideAllowedDays,
    CheckNotSatisfiable(AccessCheck),
}

impl ContextViolation {
    pub fn describe(self) -> String {
        match self {
            ContextViolation::OutsideAllowedHours => {
                "submitted outside the policy's allowed hours".to_string()
            }
            ContextViolation::OutsideAllowedDays => {
                "submitted outside the policy's allowed days".to_string()
            }
            ContextViolation::CheckNotSatisfiable(check) => {
                format!("required check not satisfied: {}", check.label())
            }
        }
    }
}

/// Score the request context against the primary policy's restrictions.
///
/// Starts at 100 and deducts a flat penalty per violated restriction,
/// floored at zero. Hours and weekday are taken from the submission
/// timestamp in UTC.
pub fn score_context(
    policy: &Policy,
    submitted_at: DateTime<Utc>,
    context: &RequestContext,
) -> (f64, Vec<ContextViolation>) {
    let mut violations = Vec::new();

    if let Some(window) = &policy.allowed_hours {
        let hour = submitted_at.hour() as u8;
        if !window.contains(hour) {
            violations.push(ContextViolation::OutsideAllowedHours);
        }
    }

    if let Some(days) = &policy.allowed_days {
        let day = Weekday::from(submitted_at.weekday());
        if !days.contains(&day) {
            violations.push(ContextViolation::OutsideAllowedDays);
        }
    }

    for check in &policy.required_checks {
        if !check.satisfied_by(context) {
            violations.push(ContextViolation::CheckNotSatisfiable(*check));
        }
    }

    let score = (100.0 - VIOLATION_PENALTY * violations.len() as f64).max(0.0);
    (score, violations)
}
