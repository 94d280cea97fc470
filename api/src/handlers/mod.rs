//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod memberships;
pub mod views;

pub use memberships::{create_membership, list_memberships};
