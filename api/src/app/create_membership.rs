//! CreateMembership use case
//!
//! Validates the requested membership, derives its validity window, lifecycle
//! state and billing periods, then hands the assembled record to the repository.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::{
    BillingInterval, Membership, MembershipPeriodState, MembershipState, NewMembership,
    NewMembershipPeriod, PaymentMethod,
};
use crate::domain::ports::{Clock, MembershipRepository};
use crate::error::{AppError, ValidationError};

/// Highest recurring price that may be paid in cash
const MAX_CASH_PRICE: f64 = 100.0;

/// Input for creating a membership
///
/// `user_id` and `assigned_by` come from the caller context, the rest from the
/// request. Fields stay loose here so that validation decides how to reject them.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMembershipInput {
    pub name: Option<String>,
    pub recurring_price: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    /// Raw interval name; unknown values are rejected as `invalidBillingPeriods`
    pub billing_interval: Option<String>,
    pub billing_periods: i64,
    pub assigned_by: String,
    pub user_id: i64,
    pub valid_from: Option<NaiveDate>,
}

/// Billing schedule that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
struct BillingSchedule {
    interval: BillingInterval,
    periods: u32,
}

/// Use case for creating a membership with its billing periods
pub struct CreateMembership<MR, C>
where
    MR: MembershipRepository,
    C: Clock,
{
    memberships: Arc<MR>,
    clock: Arc<C>,
}

impl<MR, C> CreateMembership<MR, C>
where
    MR: MembershipRepository,
    C: Clock,
{
    pub fn new(memberships: Arc<MR>, clock: Arc<C>) -> Self {
        Self { memberships, clock }
    }

    /// Create a membership
    ///
    /// Nothing is persisted when validation fails. On success the repository's
    /// record (with storage ids) is returned as-is.
    pub async fn execute(&self, input: CreateMembershipInput) -> Result<Membership, AppError> {
        let (name, recurring_price, schedule) = validate(&input).map_err(|e| {
            tracing::debug!(reason = %e, user_id = input.user_id, "Rejected membership");
            e
        })?;

        let now = self.clock.now();
        let valid_from = input.valid_from.unwrap_or_else(|| now.date_naive());
        let boundaries = period_boundaries(valid_from, schedule)?;
        let valid_until = *boundaries
            .last()
            .ok_or(ValidationError::InvalidBillingPeriods)?;

        let periods = boundaries
            .windows(2)
            .map(|window| NewMembershipPeriod {
                uuid: Uuid::new_v4(),
                start: window[0],
                end: window[1],
                state: MembershipPeriodState::Planned,
            })
            .collect();

        let new_membership = NewMembership {
            uuid: Uuid::new_v4(),
            name,
            user_id: input.user_id,
            recurring_price,
            valid_from,
            valid_until,
            state: MembershipState::derive(now, valid_from, valid_until),
            payment_method: input.payment_method,
            billing_interval: schedule.interval,
            billing_periods: schedule.periods,
            assigned_by: input.assigned_by,
            periods,
        };

        let membership = self.memberships.create_membership(&new_membership).await?;

        tracing::info!(
            membership_id = %membership.id,
            uuid = %membership.uuid,
            state = %membership.state,
            valid_from = %membership.valid_from,
            valid_until = %membership.valid_until,
            periods = membership.periods.len(),
            "Created membership"
        );

        Ok(membership)
    }
}

/// Apply the creation rules in order; the first failing rule wins
fn validate(
    input: &CreateMembershipInput,
) -> Result<(String, f64, BillingSchedule), ValidationError> {
    let name = input.name.as_deref().filter(|name| !name.is_empty());
    // A zero price counts as missing
    let recurring_price = input
        .recurring_price
        .filter(|price| *price != 0.0 && !price.is_nan());

    let (Some(name), Some(recurring_price)) = (name, recurring_price) else {
        return Err(ValidationError::MissingMandatoryFields);
    };

    if recurring_price < 0.0 {
        return Err(ValidationError::NegativeRecurringPrice);
    }

    if recurring_price > MAX_CASH_PRICE && input.payment_method == Some(PaymentMethod::Cash) {
        return Err(ValidationError::CashPriceBelow100);
    }

    let interval = input
        .billing_interval
        .as_deref()
        .and_then(|interval| interval.parse::<BillingInterval>().ok())
        .ok_or(ValidationError::InvalidBillingPeriods)?;
    let count = input.billing_periods;

    match interval {
        BillingInterval::Monthly if count > 12 => {
            return Err(ValidationError::BillingPeriodsMoreThan12Months)
        }
        BillingInterval::Monthly if count < 6 => {
            return Err(ValidationError::BillingPeriodsLessThan6Months)
        }
        BillingInterval::Yearly if count > 10 => {
            return Err(ValidationError::BillingPeriodsMoreThan10Years)
        }
        BillingInterval::Yearly if count < 3 => {
            return Err(ValidationError::BillingPeriodsLessThan3Years)
        }
        _ => {}
    }

    let periods = u32::try_from(count)
        .ok()
        .filter(|periods| *periods >= 1)
        .ok_or(ValidationError::InvalidBillingPeriods)?;

    Ok((
        name.to_string(),
        recurring_price,
        BillingSchedule { interval, periods },
    ))
}

/// `periods + 1` dates from `valid_from` to `valid_until`
///
/// Every boundary is computed from `valid_from` rather than from the previous
/// boundary, so end-of-month clamping never accumulates and the last boundary
/// is exactly the membership's `valid_until`.
fn period_boundaries(
    valid_from: NaiveDate,
    schedule: BillingSchedule,
) -> Result<Vec<NaiveDate>, ValidationError> {
    // Boundaries grow monotonically, so the last one is the only one that can overflow
    schedule
        .interval
        .advance(valid_from, schedule.periods)
        .ok_or(ValidationError::InvalidBillingPeriods)?;

    (0..=schedule.periods)
        .map(|step| {
            schedule
                .interval
                .advance(valid_from, step)
                .ok_or(ValidationError::InvalidBillingPeriods)
        })
        .collect()
}
