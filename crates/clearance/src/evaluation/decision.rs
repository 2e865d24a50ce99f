//! Decision state machine.
//!
//! Every evaluation walks a fixed progression: it starts `Unevaluated`,
//! may short to `RoleRejected` during role screening, absorbs the
//! aggregate confidence as `Scored`, and lands in `Decided`. Transitions
//! not listed here leave the state untouched, so replays cannot reopen a
//! finished evaluation.

use serde::{Deserialize, Serialize};

use super::policy::{Policy, PolicyId};
use super::scoring::ConfidenceBreakdown;

/// Aggregates at or above this level auto-approve unless the policy
/// demands verification anyway.
pub const AUTO_APPROVE_FLOOR: f64 = 90.0;
/// Aggregates below this level are denied outright.
pub const VERIFICATION_FLOOR: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Granted,
    GrantedWithVerification,
    Denied,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Granted => "granted",
            Verdict::GrantedWithVerification => "granted-with-verification",
            Verdict::Denied => "denied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    NoApplicablePolicy,
    RoleNotPermitted,
    ConfidenceTooLow,
}

impl DenialReason {
    pub const fn code(self) -> &'static str {
        match self {
            DenialReason::NoApplicablePolicy => "no_applicable_policy",
            DenialReason::RoleNotPermitted => "role_not_permitted",
            DenialReason::ConfidenceTooLow => "confidence_too_low",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            DenialReason::NoApplicablePolicy => "no active policy governs this resource",
            DenialReason::RoleNotPermitted => "requester role is not eligible under any policy",
            DenialReason::ConfidenceTooLow => "aggregate confidence fell below the decision floor",
        }
    }
}

/// The outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub breakdown: ConfidenceBreakdown,
    pub aggregate: f64,
    pub evaluated_policies: Vec<PolicyId>,
    pub denial_reason: Option<DenialReason>,
}

impl Decision {
    pub fn summary(&self) -> String {
        match self.denial_reason {
            Some(reason) => format!(
                "{} ({:.1}): {}",
                self.verdict.label(),
                self.aggregate,
                reason.summary()
            ),
            None => format!("{} ({:.1})", self.verdict.label(), self.aggregate),
        }
    }
}

/// Progress of a single evaluation through the decision pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionState {
    Unevaluated,
    RoleRejected,
    Scored { aggregate: f64 },
    Decided { verdict: Verdict, reason: Option<DenialReason> },
}

impl DecisionState {
    /// Role screening. A requester ineligible under every candidate
    /// policy is rejected before scoring influences anything.
    pub fn screen_roles(self, eligible_under_any: bool) -> Self {
        match self {
            DecisionState::Unevaluated if !eligible_under_any => DecisionState::RoleRejected,
            other => other,
        }
    }

    /// Record the aggregate confidence. Only an unevaluated request can
    /// absorb a score; a role-rejected one stays rejected.
    pub fn absorb_score(self, aggregate: f64) -> Self {
        match self {
            DecisionState::Unevaluated => DecisionState::Scored { aggregate },
            other => other,
        }
    }

    /// Apply the primary policy's thresholds and settle the verdict.
    pub fn finalize(self, policy: &Policy) -> Self {
        match self {
            DecisionState::RoleRejected => DecisionState::Decided {
                verdict: Verdict::Denied,
                reason: Some(DenialReason::RoleNotPermitted),
            },
            DecisionState::Scored { aggregate } => {
                let threshold = effective_approval_threshold(policy);
                let (verdict, reason) = if aggregate >= threshold && !policy.mfa_required {
                    (Verdict::Granted, None)
                } else if aggregate >= VERIFICATION_FLOOR {
                    (Verdict::GrantedWithVerification, None)
                } else {
                    (Verdict::Denied, Some(DenialReason::ConfidenceTooLow))
                };
                DecisionState::Decided { verdict, reason }
            }
            other => other,
        }
    }
}

/// The approval threshold a policy actually enforces. A policy may
/// raise the bar above the built-in floor but never lower it.
pub fn effective_approval_threshold(policy: &Policy) -> f64 {
    match policy.min_confidence {
        Some(min) if min >= AUTO_APPROVE_FLOOR => min,
        _ => AUTO_APPROVE_FLOOR,
    }
}
