//! Membership domain entity
//!
//! Aggregate root for a subscription-like record with a billing schedule.
//! A membership owns its generated periods; both are created together and
//! never mutated afterwards.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::membership_period::{MembershipPeriod, NewMembershipPeriod};

/// Storage-assigned identifier for a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MembershipId(pub i64);

impl From<i64> for MembershipId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state, derived from "now" against the validity window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    Pending,
    Active,
    Expired,
}

impl MembershipState {
    /// Classify `now` against `[valid_from, valid_until]`.
    ///
    /// Boundaries are days, compared as midnight UTC against the full timestamp.
    pub fn derive(now: DateTime<Utc>, valid_from: NaiveDate, valid_until: NaiveDate) -> Self {
        let from = valid_from.and_time(chrono::NaiveTime::MIN).and_utc();
        let until = valid_until.and_time(chrono::NaiveTime::MIN).and_utc();

        if now < from {
            MembershipState::Pending
        } else if now > until {
            MembershipState::Expired
        } else {
            MembershipState::Active
        }
    }
}

impl std::fmt::Display for MembershipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipState::Pending => write!(f, "pending"),
            MembershipState::Active => write!(f, "active"),
            MembershipState::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for MembershipState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MembershipState::Pending),
            "active" => Ok(MembershipState::Active),
            "expired" => Ok(MembershipState::Expired),
            _ => Err(format!("Unknown membership state: {}", s)),
        }
    }
}

/// How the member pays for each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "credit card")]
    CreditCard,
    #[serde(rename = "cash")]
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "credit card"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit card" => Ok(PaymentMethod::CreditCard),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

/// Cadence unit of the billing schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Weekly,
    Monthly,
    Yearly,
}

impl BillingInterval {
    /// Advance `from` by `count` units of this interval.
    ///
    /// Month arithmetic clamps to the last day of the target month, so
    /// Jan 31 + 1 month is Feb 28 (or 29). Returns `None` when the result
    /// falls outside the representable date range.
    pub fn advance(self, from: NaiveDate, count: u32) -> Option<NaiveDate> {
        match self {
            BillingInterval::Weekly => from.checked_add_days(Days::new(7 * u64::from(count))),
            BillingInterval::Monthly => from.checked_add_months(Months::new(count)),
            BillingInterval::Yearly => from.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }
}

impl std::fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingInterval::Weekly => write!(f, "weekly"),
            BillingInterval::Monthly => write!(f, "monthly"),
            BillingInterval::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for BillingInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BillingInterval::Weekly),
            "monthly" => Ok(BillingInterval::Monthly),
            "yearly" => Ok(BillingInterval::Yearly),
            _ => Err(format!("Unknown billing interval: {}", s)),
        }
    }
}

/// A persisted membership with its periods attached
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub id: MembershipId,
    pub uuid: Uuid,
    pub name: String,
    /// Owning user, taken from the caller context
    pub user_id: i64,
    /// Price charged for every period
    pub recurring_price: f64,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub state: MembershipState,
    pub payment_method: Option<PaymentMethod>,
    pub billing_interval: BillingInterval,
    /// Number of billing cycles covered, equal to `periods.len()`
    pub billing_periods: u32,
    /// Administrator who created the record
    pub assigned_by: String,
    pub periods: Vec<MembershipPeriod>,
}

impl Membership {
    /// Lifecycle state as of `now`
    pub fn state_at(&self, now: DateTime<Utc>) -> MembershipState {
        MembershipState::derive(now, self.valid_from, self.valid_until)
    }
}

/// Data needed to persist a new membership (no storage ids yet)
#[derive(Debug, Clone, PartialEq)]
pub struct NewMembership {
    pub uuid: Uuid,
    pub name: String,
    pub user_id: i64,
    pub recurring_price: f64,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub state: MembershipState,
    pub payment_method: Option<PaymentMethod>,
    pub billing_interval: BillingInterval,
    pub billing_periods: u32,
    pub assigned_by: String,
    pub periods: Vec<NewMembershipPeriod>,
}
