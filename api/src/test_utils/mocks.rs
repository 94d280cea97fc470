//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{Membership, MembershipId, MembershipPeriodId, NewMembership};
use crate::domain::ports::{Clock, MembershipRepository};
use crate::error::DomainError;

// ============================================================================
// Fixed Clock
// ============================================================================

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on the given day
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .expect("valid test instant"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ============================================================================
// Echo Membership Repository
// ============================================================================

/// Assigns sequential ids and returns the record it was given
///
/// Every record passed to `create_membership` is kept for inspection.
#[derive(Default)]
pub struct EchoMembershipRepository {
    created: Arc<RwLock<Vec<NewMembership>>>,
}

impl EchoMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in call order
    pub fn created(&self) -> Vec<NewMembership> {
        self.created.read().unwrap().clone()
    }
}

#[async_trait]
impl MembershipRepository for EchoMembershipRepository {
    async fn create_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, DomainError> {
        let mut created = self.created.write().unwrap();
        created.push(membership.clone());

        let id = MembershipId(created.len() as i64);
        let periods = membership
            .periods
            .iter()
            .enumerate()
            .map(|(i, period)| period.persisted(MembershipPeriodId(i as i64 + 1), id))
            .collect();

        Ok(Membership {
            id,
            uuid: membership.uuid,
            name: membership.name.clone(),
            user_id: membership.user_id,
            recurring_price: membership.recurring_price,
            valid_from: membership.valid_from,
            valid_until: membership.valid_until,
            state: membership.state,
            payment_method: membership.payment_method,
            billing_interval: membership.billing_interval,
            billing_periods: membership.billing_periods,
            assigned_by: membership.assigned_by.clone(),
            periods,
        })
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// Failing Membership Repository
// ============================================================================

/// Every call fails like a broken disk
pub struct FailingMembershipRepository;

#[async_trait]
impl MembershipRepository for FailingMembershipRepository {
    async fn create_membership(
        &self,
        _membership: &NewMembership,
    ) -> Result<Membership, DomainError> {
        Err(DomainError::Storage("simulated storage failure".to_string()))
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError> {
        Err(DomainError::Storage("simulated storage failure".to_string()))
    }
}
