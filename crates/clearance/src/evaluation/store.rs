//! Collaborator traits the engine evaluates against.
//!
//! Backends are injected as `Arc<impl Trait>` so deployments can swap
//! storage without touching the engine. All reads happen under the
//! engine's per-scorer time budget.

use async_trait::async_trait;

use super::audit::AuditEvent;
use super::domain::{PastOutcome, RequesterId, ResourceKind};
use super::policy::Policy;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuditSinkError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Source of the policy snapshot consulted per evaluation.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn active_policies(&self, resource: &ResourceKind) -> Result<Vec<Policy>, StoreError>;
}

/// Source of prior outcomes for a requester and resource, newest first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn recent_outcomes(
        &self,
        requester: &RequesterId,
        resource: &ResourceKind,
        limit: usize,
    ) -> Result<Vec<PastOutcome>, StoreError>;
}

/// Reports how much of their rate budget a requester has consumed, as a
/// ratio in `[0, 1]`.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn utilization_ratio(&self, requester: &RequesterId) -> Result<f64, StoreError>;
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditSinkError>;
}
