//! Audit trail.
//!
//! Every completed evaluation emits exactly one event. A failed write is
//! retried once; a second failure is surfaced on the dedicated
//! `clearance::audit_gap` tracing target for ops alerting, and the
//! decision is returned regardless.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use super::decision::{Decision, DenialReason, Verdict};
use super::domain::{AccessRequest, RequesterId, ResourceKind};
use super::policy::PolicyId;
use super::scoring::{ConfidenceBreakdown, ScoreFactor};
use super::store::{AuditSink, AuditSinkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditKind {
    AccessEvaluated,
    PolicyGap,
}

impl AuditKind {
    pub const fn label(self) -> &'static str {
        match self {
            AuditKind::AccessEvaluated => "access-evaluated",
            AuditKind::PolicyGap => "policy-gap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditSeverity {
    Info,
    Notice,
    Warning,
}

impl AuditSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            AuditSeverity::Info => "info",
            AuditSeverity::Notice => "notice",
            AuditSeverity::Warning => "warning",
        }
    }

    pub const fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Granted => AuditSeverity::Info,
            Verdict::GrantedWithVerification => AuditSeverity::Notice,
            Verdict::Denied => AuditSeverity::Warning,
        }
    }
}

/// Which inputs were substituted during the evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedSignals {
    /// The policy snapshot could not be fetched.
    pub policy_snapshot: bool,
    /// Dimensions whose scorer missed its budget or failed.
    pub factors: Vec<ScoreFactor>,
}

impl DegradedSignals {
    pub fn any(&self) -> bool {
        self.policy_snapshot || !self.factors.is_empty()
    }
}

/// Immutable record of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub kind: AuditKind,
    pub severity: AuditSeverity,
    pub requester: RequesterId,
    pub resource: ResourceKind,
    pub verdict: Verdict,
    pub aggregate: f64,
    pub breakdown: ConfidenceBreakdown,
    pub applied_policies: Vec<PolicyId>,
    pub degraded: DegradedSignals,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn for_evaluation(
        request: &AccessRequest,
        decision: &Decision,
        degraded: DegradedSignals,
    ) -> Self {
        let kind = if decision.denial_reason == Some(DenialReason::NoApplicablePolicy) {
            AuditKind::PolicyGap
        } else {
            AuditKind::AccessEvaluated
        };

        Self {
            id: Uuid::new_v4(),
            kind,
            severity: AuditSeverity::for_verdict(decision.verdict),
            requester: request.requester.clone(),
            resource: request.resource.clone(),
            verdict: decision.verdict,
            aggregate: decision.aggregate,
            breakdown: decision.breakdown,
            applied_policies: decision.evaluated_policies.clone(),
            degraded,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.any()
    }
}

/// Writes events to a sink with one retry and a hard time budget per
/// attempt.
pub struct AuditEmitter<S> {
    sink: Arc<S>,
    budget: Duration,
}

impl<S> AuditEmitter<S>
where
    S: AuditSink,
{
    pub fn new(sink: Arc<S>, budget: Duration) -> Self {
        Self { sink, budget }
    }

    /// Record an event. Failure never propagates to the caller; a
    /// double failure leaves a gap in the trail and says so loudly.
    pub async fn emit(&self, event: AuditEvent) {
        if let Err(err) = self.attempt(&event).await {
            warn!(
                event = event.kind.label(),
                error = %err,
                "audit write failed, retrying once"
            );
            if let Err(err) = self.attempt(&event).await {
                error!(
                    target: "clearance::audit_gap",
                    event = event.kind.label(),
                    requester = %event.requester,
                    resource = %event.resource,
                    error = %err,
                    "audit trail gap: event could not be recorded"
                );
            }
        }
    }

    async fn attempt(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        match tokio::time::timeout(self.budget, self.sink.record(event.clone())).await {
            Ok(result) => result,
            Err(_) => Err(AuditSinkError::Unavailable(format!(
                "write exceeded {}ms budget",
                self.budget.as_millis()
            ))),
        }
    }
}
