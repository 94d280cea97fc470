//! Wire shapes for memberships
//!
//! Pure mappings from domain records to response bodies. Dates are rendered
//! as `YYYY-MM-DD`, and periods are lifted out of the membership object.

use serde::Serialize;

use crate::domain::dates::format_date;
use crate::domain::entities::{
    BillingInterval, Membership, MembershipPeriod, MembershipPeriodState, MembershipState,
    PaymentMethod,
};

/// Membership scalars without its periods
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub user_id: i64,
    pub recurring_price: f64,
    pub valid_from: String,
    pub valid_until: String,
    pub state: MembershipState,
    pub payment_method: Option<PaymentMethod>,
    pub billing_interval: BillingInterval,
    pub billing_periods: u32,
    pub assigned_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPeriodView {
    pub id: i64,
    pub uuid: String,
    pub membership_id: i64,
    pub start: String,
    pub end: String,
    pub state: MembershipPeriodState,
}

/// One entry of `GET /memberships`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipListEntry {
    pub membership: MembershipView,
    pub periods: Vec<MembershipPeriodView>,
}

/// Body of a successful `POST /memberships`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipResponse {
    pub membership: MembershipView,
    pub membership_periods: Vec<MembershipPeriodView>,
}

pub fn membership_view(membership: &Membership) -> MembershipView {
    MembershipView {
        id: membership.id.0,
        uuid: membership.uuid.to_string(),
        name: membership.name.clone(),
        user_id: membership.user_id,
        recurring_price: membership.recurring_price,
        valid_from: format_date(membership.valid_from),
        valid_until: format_date(membership.valid_until),
        state: membership.state,
        payment_method: membership.payment_method,
        billing_interval: membership.billing_interval,
        billing_periods: membership.billing_periods,
        assigned_by: membership.assigned_by.clone(),
    }
}

pub fn period_view(period: &MembershipPeriod) -> MembershipPeriodView {
    MembershipPeriodView {
        id: period.id.0,
        uuid: period.uuid.to_string(),
        membership_id: period.membership_id.0,
        start: format_date(period.start),
        end: format_date(period.end),
        state: period.state,
    }
}

pub fn membership_list_entry(membership: &Membership) -> MembershipListEntry {
    MembershipListEntry {
        membership: membership_view(membership),
        periods: membership.periods.iter().map(period_view).collect(),
    }
}

pub fn create_membership_response(membership: &Membership) -> CreateMembershipResponse {
    let MembershipListEntry {
        membership,
        periods,
    } = membership_list_entry(membership);

    CreateMembershipResponse {
        membership,
        membership_periods: periods,
    }
}
