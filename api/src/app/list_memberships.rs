//! ListMemberships use case

use std::sync::Arc;

use crate::domain::entities::Membership;
use crate::domain::ports::{Clock, MembershipRepository};
use crate::error::AppError;

/// Use case for listing every membership with its periods
pub struct ListMemberships<MR, C>
where
    MR: MembershipRepository,
    C: Clock,
{
    memberships: Arc<MR>,
    clock: Arc<C>,
}

impl<MR, C> ListMemberships<MR, C>
where
    MR: MembershipRepository,
    C: Clock,
{
    pub fn new(memberships: Arc<MR>, clock: Arc<C>) -> Self {
        Self { memberships, clock }
    }

    /// Return the repository's memberships in storage order
    ///
    /// `state` is derived against the current time, whatever was stored.
    pub async fn execute(&self) -> Result<Vec<Membership>, AppError> {
        let now = self.clock.now();
        let memberships: Vec<Membership> = self
            .memberships
            .list_memberships()
            .await?
            .into_iter()
            .map(|mut membership| {
                membership.state = membership.state_at(now);
                membership
            })
            .collect();

        tracing::debug!(count = memberships.len(), "Listed memberships");
        Ok(memberships)
    }
}
