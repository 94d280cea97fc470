//! JSON flat-file adapters
//!
//! Implementations of repository traits backed by JSON arrays on disk.

pub mod membership_repo;
pub mod records;

pub use membership_repo::JsonMembershipRepository;
