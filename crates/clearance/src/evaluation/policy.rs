//! Policy model and matching.
//!
//! A policy snapshot is filtered down to the candidates that govern a
//! request's resource, then ordered so the first entry is the primary
//! policy: highest priority wins, ties broken by earliest creation.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{RequestContext, ResourceKind, Role};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub String);

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day-of-week restriction element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Inclusive-start, exclusive-end hour range in UTC.
///
/// A window where `start > end` wraps past midnight, so `22..6` admits
/// hours 22, 23, 0 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u8,
    pub end: u8,
}

impl HourWindow {
    pub fn contains(&self, hour: u8) -> bool {
        if self.start <= self.end {
            self.start <= hour && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

/// A named check a policy can demand from the request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessCheck {
    ManagedDevice,
    CampusNetwork,
    MultiPartyApproval,
}

impl AccessCheck {
    pub const fn label(self) -> &'static str {
        match self {
            AccessCheck::ManagedDevice => "managed-device",
            AccessCheck::CampusNetwork => "campus-network",
            AccessCheck::MultiPartyApproval => "multi-party-approval",
        }
    }

    /// Whether the request context satisfies this check. Multi-party
    /// approval needs an out-of-band sign-off that a request context can
    /// never carry, so it always fails here.
    pub fn satisfied_by(self, context: &RequestContext) -> bool {
        match self {
            AccessCheck::ManagedDevice => context.device.managed,
            AccessCheck::CampusNetwork => context.network.on_campus(),
            AccessCheck::MultiPartyApproval => false,
        }
    }
}

/// An access policy governing one resource class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub resource: ResourceKind,
    pub eligible_roles: BTreeSet<Role>,
    pub min_confidence: Option<f64>,
    pub mfa_required: bool,
    pub allowed_hours: Option<HourWindow>,
    pub allowed_days: Option<BTreeSet<Weekday>>,
    pub required_checks: Vec<AccessCheck>,
    pub priority: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Policy {
    pub fn permits_role(&self, role: &Role) -> bool {
        self.eligible_roles.contains(role)
    }

    /// True when the policy imposes no contextual restrictions at all.
    pub fn unrestricted(&self) -> bool {
        self.allowed_hours.is_none()
            && self.allowed_days.is_none()
            && self.required_checks.is_empty()
    }
}

/// Select the candidate policies for a resource from a snapshot.
///
/// Inactive policies and policies for other resources are dropped. The
/// survivors are ordered by descending priority, then ascending creation
/// time, then id, so `first()` is always the primary policy.
pub fn match_policies(snapshot: &[Policy], resource: &ResourceKind) -> Vec<Policy> {
    let mut candidates: Vec<Policy> = snapshot
        .iter()
        .filter(|policy| policy.active && &policy.resource == resource)
        .cloned()
        .collect();
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates
}
