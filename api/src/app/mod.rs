//! Application layer
//!
//! Contains use cases and service orchestration.
//! Use cases coordinate between domain entities, ports, and external systems.

pub mod create_membership;
pub mod list_memberships;

pub use create_membership::{CreateMembership, CreateMembershipInput};
pub use list_memberships::ListMemberships;
