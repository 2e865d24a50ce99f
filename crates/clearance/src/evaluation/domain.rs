use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::Verdict;

/// Principal asking for access, e.g. a directory identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequesterId(pub String);

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role the requester holds at submission time, e.g. `student` or `faculty`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role(pub String);

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resource class being requested, e.g. `library_database`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKind(pub String);

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requester-declared urgency. Carried through for audit and display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyTag {
    Routine,
    Elevated,
    Critical,
}

impl UrgencyTag {
    pub const fn label(self) -> &'static str {
        match self {
            UrgencyTag::Routine => "routine",
            UrgencyTag::Elevated => "elevated",
            UrgencyTag::Critical => "critical",
        }
    }
}

/// Where the request originated on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkZone {
    CampusWired,
    CampusWifi,
    Vpn,
    External,
}

impl NetworkZone {
    pub const fn label(self) -> &'static str {
        match self {
            NetworkZone::CampusWired => "campus-wired",
            NetworkZone::CampusWifi => "campus-wifi",
            NetworkZone::Vpn => "vpn",
            NetworkZone::External => "external",
        }
    }

    pub const fn on_campus(self) -> bool {
        matches!(self, NetworkZone::CampusWired | NetworkZone::CampusWifi)
    }
}

/// Device the request was submitted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub identifier: String,
    pub platform: String,
    pub managed: bool,
}

/// Ambient facts about the request used by policy checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub network: NetworkZone,
    pub device: DeviceDescriptor,
}

/// A single access request submitted for evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequest {
    pub requester: RequesterId,
    pub role: Role,
    pub resource: ResourceKind,
    pub rationale: String,
    pub requested_minutes: u32,
    pub urgency: UrgencyTag,
    pub submitted_at: DateTime<Utc>,
    pub context: RequestContext,
}

/// A prior evaluation outcome for the same requester and resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PastOutcome {
    pub verdict: Verdict,
    pub decided_at: DateTime<Utc>,
}

impl PastOutcome {
    /// Both grant variants count as approvals for history purposes.
    pub fn approval(&self) -> bool {
        matches!(
            self.verdict,
            Verdict::Granted | Verdict::GrantedWithVerification
        )
    }
}
