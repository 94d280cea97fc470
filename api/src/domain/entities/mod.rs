//! Domain entities
//!
//! Pure domain models for memberships and their billing periods.
//! These are separate from the persisted records in the `adapters::json` module.

pub mod membership;
pub mod membership_period;

pub use membership::{
    BillingInterval, Membership, MembershipId, MembershipState, NewMembership, PaymentMethod,
};
pub use membership_period::{
    MembershipPeriod, MembershipPeriodId, MembershipPeriodState, NewMembershipPeriod,
};
