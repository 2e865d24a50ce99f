use async_trait::async_trait;
use chrono::{Duration, Utc};
use clearance::evaluation::{
    AccessCheck, AuditEvent, AuditSink, AuditSinkError, HistoryStore, HourWindow, NetworkZone,
    PastOutcome, Policy, PolicyId, PolicyStore, RateLimiter, RequesterId, ResourceKind, Role,
    StoreError, UrgencyTag, Verdict, Weekday,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct InMemoryPolicyStore {
    policies: Vec<Policy>,
}

impl InMemoryPolicyStore {
    pub(crate) fn with(policies: Vec<Policy>) -> Self {
        Self { policies }
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
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
pub(crate) struct InMemoryHistoryStore {
    outcomes: HashMap<RequesterId, Vec<PastOutcome>>,
}

impl InMemoryHistoryStore {
    pub(crate) fn with(outcomes: HashMap<RequesterId, Vec<PastOutcome>>) -> Self {
        Self { outcomes }
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn recent_outcomes(
        &self,
        requester: &RequesterId,
        _resource: &ResourceKind,
        limit: usize,
    ) -> Result<Vec<PastOutcome>, StoreError> {
        Ok(self
            .outcomes
            .get(requester)
            .map(|entries| entries.iter().take(limit).copied().collect())
            .unwrap_or_default())
    }
}

pub(crate) struct StaticRateLimiter {
    utilization: f64,
}

impl StaticRateLimiter {
    pub(crate) fn new(utilization: f64) -> Self {
        Self { utilization }
    }
}

#[async_trait]
impl RateLimiter for StaticRateLimiter {
    async fn utilization_ratio(&self, _requester: &RequesterId) -> Result<f64, StoreError> {
        Ok(self.utilization)
    }
}

#[derive(Default)]
pub(crate) struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub(crate) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditSinkError> {
        self.events.lock().expect("audit mutex poisoned").push(event);
        Ok(())
    }
}

/// Policies covering the demo's three resource classes.
pub(crate) fn seeded_policies() -> Vec<Policy> {
    let created = Utc::now() - Duration::days(180);
    vec![
        Policy {
            id: PolicyId("pol-library-standard".to_string()),
            resource: ResourceKind("library_database".to_string()),
            eligible_roles: roles(&["student", "faculty", "librarian", "contractor"]),
            min_confidence: Some(60.0),
            mfa_required: false,
            allowed_hours: None,
            allowed_days: None,
            required_checks: Vec::new(),
            priority: 10,
            active: true,
            created_at: created,
        },
        Policy {
            id: PolicyId("pol-archive-faculty".to_string()),
            resource: ResourceKind("research_archive".to_string()),
            eligible_roles: roles(&["faculty", "librarian"]),
            min_confidence: Some(75.0),
            mfa_required: false,
            allowed_hours: Some(HourWindow { start: 7, end: 22 }),
            allowed_days: None,
            required_checks: vec![AccessCheck::ManagedDevice],
            priority: 20,
            active: true,
            created_at: created,
        },
        Policy {
            id: PolicyId("pol-admin-restricted".to_string()),
            resource: ResourceKind("admin_panel".to_string()),
            eligible_roles: roles(&["admin"]),
            min_confidence: Some(95.0),
            mfa_required: true,
            allowed_hours: Some(HourWindow { start: 6, end: 20 }),
            allowed_days: Some(weekdays()),
            required_checks: vec![AccessCheck::ManagedDevice, AccessCheck::CampusNetwork],
            priority: 30,
            active: true,
            created_at: created,
        },
    ]
}

/// Per-requester outcome history for the demo identities.
pub(crate) fn seeded_history() -> HashMap<RequesterId, Vec<PastOutcome>> {
    let now = Utc::now();
    let mut outcomes = HashMap::new();
    outcomes.insert(
        RequesterId("fac-0917".to_string()),
        (1..=8)
            .map(|weeks| PastOutcome {
                verdict: Verdict::Granted,
                decided_at: now - Duration::weeks(weeks),
            })
            .collect(),
    );
    outcomes.insert(
        RequesterId("ext-5530".to_string()),
        vec![
            PastOutcome {
                verdict: Verdict::Denied,
                decided_at: now - Duration::days(3),
            },
            PastOutcome {
                verdict: Verdict::Denied,
                decided_at: now - Duration::days(9),
            },
            PastOutcome {
                verdict: Verdict::GrantedWithVerification,
                decided_at: now - Duration::days(30),
            },
        ],
    );
    outcomes
}

fn roles(names: &[&str]) -> BTreeSet<Role> {
    names.iter().map(|name| Role(name.to_string())).collect()
}

fn weekdays() -> BTreeSet<Weekday> {
    [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ]
    .into_iter()
    .collect()
}

pub(crate) fn parse_urgency(raw: &str) -> Result<UrgencyTag, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "routine" => Ok(UrgencyTag::Routine),
        "elevated" => Ok(UrgencyTag::Elevated),
        "critical" => Ok(UrgencyTag::Critical),
        other => Err(format!(
            "unknown urgency '{other}', expected routine, elevated, or critical"
        )),
    }
}

pub(crate) fn parse_network(raw: &str) -> Result<NetworkZone, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "campus-wired" => Ok(NetworkZone::CampusWired),
        "campus-wifi" => Ok(NetworkZone::CampusWifi),
        "vpn" => Ok(NetworkZone::Vpn),
        "external" => Ok(NetworkZone::External),
        other => Err(format!(
            "unknown network zone '{other}', expected campus-wired, campus-wifi, vpn, or external"
        )),
    }
}
