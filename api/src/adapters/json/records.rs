//! Persisted record shapes for the JSON store
//!
//! Dates are stored as `YYYY-MM-DD` strings and enumerations as their wire
//! names. Conversion to the domain happens here, in both directions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::dates::{format_date, parse_date};
use crate::domain::entities::{
    Membership, MembershipId, MembershipPeriod, MembershipPeriodId, NewMembership,
    NewMembershipPeriod,
};
use crate::error::DomainError;

/// A row of `memberships.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMembership {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub user_id: i64,
    pub recurring_price: f64,
    pub valid_from: String,
    pub valid_until: String,
    pub state: String,
    pub payment_method: Option<String>,
    pub billing_interval: String,
    pub billing_periods: u32,
    pub assigned_by: String,
}

/// A row of `membership-periods.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMembershipPeriod {
    pub id: i64,
    pub uuid: String,
    /// Older data files call this field `membership`
    #[serde(alias = "membership")]
    pub membership_id: i64,
    pub start: String,
    pub end: String,
    pub state: String,
}

impl JsonMembership {
    pub fn from_new(id: MembershipId, membership: &NewMembership) -> Self {
        Self {
            id: id.0,
            uuid: membership.uuid.to_string(),
            name: membership.name.clone(),
            user_id: membership.user_id,
            recurring_price: membership.recurring_price,
            valid_from: format_date(membership.valid_from),
            valid_until: format_date(membership.valid_until),
            state: membership.state.to_string(),
            payment_method: membership.payment_method.map(|p| p.to_string()),
            billing_interval: membership.billing_interval.to_string(),
            billing_periods: membership.billing_periods,
            assigned_by: membership.assigned_by.clone(),
        }
    }

    /// Convert to a domain membership with the given (already joined) periods
    pub fn into_domain(self, periods: Vec<MembershipPeriod>) -> Result<Membership, DomainError> {
        let record = format!("membership {}", self.id);

        Ok(Membership {
            id: MembershipId(self.id),
            uuid: parse_uuid(&self.uuid, &record)?,
            name: self.name,
            user_id: self.user_id,
            recurring_price: self.recurring_price,
            valid_from: parse_field_date(&self.valid_from, "validFrom", &record)?,
            valid_until: parse_field_date(&self.valid_until, "validUntil", &record)?,
            state: self.state.parse().map_err(|e| malformed(&record, e))?,
            payment_method: self
                .payment_method
                .map(|p| p.parse())
                .transpose()
                .map_err(|e| malformed(&record, e))?,
            billing_interval: self
                .billing_interval
                .parse()
                .map_err(|e| malformed(&record, e))?,
            billing_periods: self.billing_periods,
            assigned_by: self.assigned_by,
            periods,
        })
    }
}

impl JsonMembershipPeriod {
    pub fn from_new(
        id: MembershipPeriodId,
        membership_id: MembershipId,
        period: &NewMembershipPeriod,
    ) -> Self {
        Self {
            id: id.0,
            uuid: period.uuid.to_string(),
            membership_id: membership_id.0,
            start: format_date(period.start),
            end: format_date(period.end),
            state: period.state.to_string(),
        }
    }
}

impl TryFrom<&JsonMembershipPeriod> for MembershipPeriod {
    type Error = DomainError;

    fn try_from(period: &JsonMembershipPeriod) -> Result<Self, Self::Error> {
        let record = format!("membership period {}", period.id);

        Ok(MembershipPeriod {
            id: MembershipPeriodId(period.id),
            uuid: parse_uuid(&period.uuid, &record)?,
            membership_id: MembershipId(period.membership_id),
            start: parse_field_date(&period.start, "start", &record)?,
            end: parse_field_date(&period.end, "end", &record)?,
            state: period.state.parse().map_err(|e| malformed(&record, e))?,
        })
    }
}

fn parse_uuid(value: &str, record: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| malformed(record, format!("invalid uuid: {}", e)))
}

fn parse_field_date(
    value: &str,
    field: &str,
    record: &str,
) -> Result<chrono::NaiveDate, DomainError> {
    parse_date(value).map_err(|e| malformed(record, format!("invalid {} '{}': {}", field, value, e)))
}

fn malformed(record: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("Malformed {}: {}", record, detail))
}
