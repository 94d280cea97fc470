//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid value that can be customized.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::app::CreateMembershipInput;
use crate::domain::entities::{
    BillingInterval, Membership, MembershipId, MembershipPeriodId, MembershipPeriodState,
    MembershipState, NewMembership, NewMembershipPeriod, PaymentMethod,
};

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Create input that passes every creation rule
///
/// Monthly, 12 periods, starting 2023-01-01.
pub fn valid_input() -> CreateMembershipInput {
    CreateMembershipInput {
        name: Some("Platinum Plan".to_string()),
        recurring_price: Some(150.0),
        payment_method: Some(PaymentMethod::CreditCard),
        billing_interval: Some("monthly".to_string()),
        billing_periods: 12,
        assigned_by: "admin".to_string(),
        user_id: 2000,
        valid_from: Some(date(2023, 1, 1)),
    }
}

/// Create a monthly membership record with `periods` contiguous periods from 2023-01-01
pub fn test_new_membership(periods: u32) -> NewMembership {
    let valid_from = date(2023, 1, 1);
    let boundary = |step: u32| {
        BillingInterval::Monthly
            .advance(valid_from, step)
            .expect("in range")
    };

    NewMembership {
        uuid: Uuid::new_v4(),
        name: "Gold Plan".to_string(),
        user_id: 2000,
        recurring_price: 49.5,
        valid_from,
        valid_until: boundary(periods),
        state: MembershipState::Active,
        payment_method: Some(PaymentMethod::Cash),
        billing_interval: BillingInterval::Monthly,
        billing_periods: periods,
        assigned_by: "admin".to_string(),
        periods: (0..periods)
            .map(|step| NewMembershipPeriod {
                uuid: Uuid::new_v4(),
                start: boundary(step),
                end: boundary(step + 1),
                state: MembershipPeriodState::Planned,
            })
            .collect(),
    }
}

/// Create a persisted membership: id 1, monthly, 3 periods from 2023-01-01
pub fn test_membership() -> Membership {
    let id = MembershipId(1);
    let new_membership = NewMembership {
        name: "Platinum Plan".to_string(),
        recurring_price: 150.0,
        payment_method: Some(PaymentMethod::CreditCard),
        ..test_new_membership(3)
    };

    Membership {
        id,
        uuid: new_membership.uuid,
        name: new_membership.name,
        user_id: new_membership.user_id,
        recurring_price: new_membership.recurring_price,
        valid_from: new_membership.valid_from,
        valid_until: new_membership.valid_until,
        state: new_membership.state,
        payment_method: new_membership.payment_method,
        billing_interval: new_membership.billing_interval,
        billing_periods: new_membership.billing_periods,
        assigned_by: new_membership.assigned_by,
        periods: new_membership
            .periods
            .iter()
            .zip(1..)
            .map(|(period, period_id)| period.persisted(MembershipPeriodId(period_id), id))
            .collect(),
    }
}
