//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., the JSON flat-file store).

use async_trait::async_trait;

use crate::domain::entities::{Membership, NewMembership};
use crate::error::DomainError;

/// Repository for Membership aggregates and their periods
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Persist a membership together with its periods
    ///
    /// Assigns the membership id and one sequential id per period, and links
    /// every period back to the new membership.
    async fn create_membership(&self, membership: &NewMembership)
        -> Result<Membership, DomainError>;

    /// List all memberships in storage order, each with its periods attached
    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError>;
}
