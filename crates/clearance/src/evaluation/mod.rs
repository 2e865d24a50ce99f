//! Access evaluation.
//!
//! Decides whether a requester may access a resource by blending five
//! weighted confidence dimensions under the primary policy's thresholds.
//! An evaluation resolves to granted, granted pending verification, or
//! denied; only a structurally invalid request surfaces an error.

pub mod audit;
pub mod config;
pub mod decision;
pub mod domain;
pub mod engine;
pub mod policy;
pub mod scoring;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use audit::{AuditEmitter, AuditEvent, AuditKind, AuditSeverity, DegradedSignals};
pub use config::{
    EvaluationConfig, DEFAULT_AUDIT_BUDGET_MS, DEFAULT_HISTORY_WINDOW, DEFAULT_SCORER_BUDGET_MS,
};
pub use decision::{
    effective_approval_threshold, Decision, DecisionState, DenialReason, Verdict,
    AUTO_APPROVE_FLOOR, VERIFICATION_FLOOR,
};
pub use domain::{
    AccessRequest, DeviceDescriptor, NetworkZone, PastOutcome, RequestContext, RequesterId,
    ResourceKind, Role, UrgencyTag,
};
pub use engine::AccessEvaluator;
pub use policy::{match_policies, AccessCheck, HourWindow, Policy, PolicyId, Weekday};
pub use scoring::{ConfidenceBreakdown, IntentLexicon, ScoreFactor, NEUTRAL_SCORE};
pub use store::{AuditSink, AuditSinkError, HistoryStore, PolicyStore, RateLimiter, StoreError};
pub use validation::{RequestValidator, ValidationError, MIN_RATIONALE_CHARS, MIN_RATIONALE_WORDS};
