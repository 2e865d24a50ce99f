//! Shared fixtures and in-memory collaborators for the evaluation tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::evaluation::audit::AuditEvent;
use crate::evaluation::decision::Verdict;
use crate::evaluation::domain::{
    AccessRequest, DeviceDescriptor, NetworkZone, PastOutcome, RequestContext, RequesterId,
    ResourceKind, Role, UrgencyTag,
};
use crate::evaluation::engine::AccessEvaluator;
use crate::evaluation::policy::{Policy, PolicyId};
use crate::evaluation::store::{
    AuditSink, AuditSinkError, HistoryStore, PolicyStore, RateLimiter, StoreError,
};
use crate::evaluation::EvaluationConfig;

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn role_set(roles: &[&str]) -> BTreeSet<Role> {
    roles.iter().map(|role| Role(role.to_string())).collect()
}

/// Active, unrestricted policy with the default confidence floor.
pub(super) fn policy(id: &str, resource: &str, roles: &[&str]) -> Policy {
    Policy {
        id: PolicyId(id.to_string()),
        resource: ResourceKind(resource.to_string()),
        eligible_roles: role_set(roles),
        min_confidence: Some(60.0),
        mfa_required: false,
        allowed_hours: None,
        allowed_days: None,
        required_checks: Vec::new(),
        priority: 10,
        active: true,
        created_at: at(2025, 1, 1, 0),
    }
}

/// Request submitted Wednesday 2025-06-04 at 14:00 UTC from a managed
/// campus device.
pub(super) fn request(role: &str, resource: &str, rationale: &str) -> AccessRequest {
    AccessRequest {
        requester: RequesterId("user-7041".to_string()),
        role: Role(role.to_string()),
        resource: ResourceKind(resource.to_string()),
        rationale: rationale.to_string(),
        requested_minutes: 120,
        urgency: UrgencyTag::Routine,
        submitted_at: at(2025, 6, 4, 14),
        context: RequestContext {
            network: NetworkZone::CampusWifi,
            device: DeviceDescriptor {
                identifier: "laptop-4415".to_string(),
                platform: "linux".to_string(),
                managed: true,
            },
        },
    }
}

pub(super) fn approval(decided_at: DateTime<Utc>) -> PastOutcome {
    PastOutcome {
        verdict: Verdict::Granted,
        decided_at,
    }
}

pub(super) fn rejection(decided_at: DateTime<Utc>) -> PastOutcome {
    PastOutcome {
        verdict: Verdict::Denied,
        decided_at,
    }
}

#[derive(Default)]
pub(super) struct MemoryPolicyStore {
    policies: Vec<Policy>,
}

impl MemoryPolicyStore {
    pub(super) fn with(policies: Vec<Policy>) -> Self {
        Self { policies }
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn active_policies(&self, resource: &ResourceKind) -> Result<Vec<Policy>, StoreError> {
        Ok(self
            .policies
            .iter()
            .filter(|policy| &policy.resource == resource)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryHistoryStore {
    outcomes: Vec<PastOutcome>,
}

impl MemoryHistoryStore {
    pub(super) fn with(outcomes: Vec<PastOutcome>) -> Self {
        Self { outcomes }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn recent_outcomes(
        &self,
        _requester: &RequesterId,
        _resource: &ResourceKind,
        limit: usize,
    ) -> Result<Vec<PastOutcome>, StoreError> {
        Ok(self.outcomes.iter().take(limit).copied().collect())
    }
}

pub(super) struct StaticRateLimiter(pub(super) f64);

#[async_trait]
impl RateLimiter for StaticRateLimiter {
    async fn utilization_ratio(&self, _requester: &RequesterId) -> Result<f64, StoreError> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub(super) struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("events mutex poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditSinkError> {
        self.events.lock().expect("events mutex poisoned").push(event);
        Ok(())
    }
}

/// Sink that fails its first `fail_first` writes, then recovers.
#[derive(Default)]
pub(super) struct FlakyAuditSink {
    fail_first: usize,
    attempts: Mutex<usize>,
    events: Mutex<Vec<AuditEvent>>,
}

impl FlakyAuditSink {
    pub(super) fn failing_first(fail_first: usize) -> Self {
        Self {
            fail_first,
            ..Self::default()
        }
    }

    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("attempts mutex poisoned")
    }

    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("events mutex poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for FlakyAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditSinkError> {
        {
            let mut attempts = self.attempts.lock().expect("attempts mutex poisoned");
            *attempts += 1;
            if *attempts <= self.fail_first {
                return Err(AuditSinkError::Unavailable("intermittent outage".to_string()));
            }
        }
        self.events.lock().expect("events mutex poisoned").push(event);
        Ok(())
    }
}

/// Sink whose writes never finish inside any sane budget.
pub(super) struct SlowAuditSink {
    delay: Duration,
    attempts: Mutex<usize>,
}

impl SlowAuditSink {
    pub(super) fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            attempts: Mutex::new(0),
        }
    }

    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("attempts mutex poisoned")
    }
}

#[async_trait]
impl AuditSink for SlowAuditSink {
    async fn record(&self, _event: AuditEvent) -> Result<(), AuditSinkError> {
        {
            let mut attempts = self.attempts.lock().expect("attempts mutex poisoned");
            *attempts += 1;
        }
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// History backend that would report perfect history, if it ever
/// answered inside the budget.
pub(super) struct SlowHistoryStore {
    pub(super) delay: Duration,
}

#[async_trait]
impl HistoryStore for SlowHistoryStore {
    async fn recent_outcomes(
        &self,
        _requester: &RequesterId,
        _resource: &ResourceKind,
        _limit: usize,
    ) -> Result<Vec<PastOutcome>, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![approval(at(2025, 5, 1, 9)); 5])
    }
}

pub(super) struct SlowRateLimiter {
    pub(super) delay: Duration,
}

#[async_trait]
impl RateLimiter for SlowRateLimiter {
    async fn utilization_ratio(&self, _requester: &RequesterId) -> Result<f64, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(0.0)
    }
}

pub(super) struct UnavailablePolicyStore;

#[async_trait]
impl PolicyStore for UnavailablePolicyStore {
    async fn active_policies(&self, _resource: &ResourceKind) -> Result<Vec<Policy>, StoreError> {
        Err(StoreError::Unavailable("policy backend offline".to_string()))
    }
}

pub(super) struct UnavailableHistoryStore;

#[async_trait]
impl HistoryStore for UnavailableHistoryStore {
    async fn recent_outcomes(
        &self,
        _requester: &RequesterId,
        _resource: &ResourceKind,
        _limit: usize,
    ) -> Result<Vec<PastOutcome>, StoreError> {
        Err(StoreError::Unavailable("history backend offline".to_string()))
    }
}

pub(super) type TestEvaluator =
    AccessEvaluator<MemoryPolicyStore, MemoryHistoryStore, StaticRateLimiter, MemoryAuditSink>;

/// Engine over in-memory collaborators plus a handle to its audit sink.
pub(super) fn evaluator(
    policies: Vec<Policy>,
    outcomes: Vec<PastOutcome>,
    utilization: f64,
) -> (TestEvaluator, Arc<MemoryAuditSink>) {
    let sink = Arc::new(MemoryAuditSink::default());
    let engine = AccessEvaluator::new(
        Arc::new(MemoryPolicyStore::with(policies)),
        Arc::new(MemoryHistoryStore::with(outcomes)),
        Arc::new(StaticRateLimiter(utilization)),
        Arc::clone(&sink),
        EvaluationConfig::default(),
    );
    (engine, sink)
}
