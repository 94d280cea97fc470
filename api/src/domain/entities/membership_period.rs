//! Membership period domain entity
//!
//! One billable interval of a membership's validity window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::membership::MembershipId;

/// Storage-assigned identifier for a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MembershipPeriodId(pub i64);

impl std::fmt::Display for MembershipPeriodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing state of a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipPeriodState {
    Planned,
    Issued,
}

impl std::fmt::Display for MembershipPeriodState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipPeriodState::Planned => write!(f, "planned"),
            MembershipPeriodState::Issued => write!(f, "issued"),
        }
    }
}

impl std::str::FromStr for MembershipPeriodState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(MembershipPeriodState::Planned),
            "issued" => Ok(MembershipPeriodState::Issued),
            _ => Err(format!("Unknown membership period state: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MembershipPeriod {
    pub id: MembershipPeriodId,
    pub uuid: Uuid,
    pub membership_id: MembershipId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub state: MembershipPeriodState,
}

/// A generated period before the repository assigns ids
#[derive(Debug, Clone, PartialEq)]
pub struct NewMembershipPeriod {
    pub uuid: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub state: MembershipPeriodState,
}

impl NewMembershipPeriod {
    /// Attach storage identity to this period
    pub fn persisted(&self, id: MembershipPeriodId, membership_id: MembershipId) -> MembershipPeriod {
        MembershipPeriod {
            id,
            uuid: self.uuid,
            membership_id,
            start: self.start,
            end: self.end,
            state: self.state,
        }
    }
}
