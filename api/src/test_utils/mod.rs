//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The JSON repository already runs fully in memory, so mocks here only cover
//! what it cannot: a pinned clock, recording the exact record handed to the
//! repository, and storage failures.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
