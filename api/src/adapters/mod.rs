//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod json;

pub use json::JsonMembershipRepository;
