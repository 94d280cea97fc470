//! Caller identity
//!
//! Authentication itself happens upstream; this layer only resolves who is
//! calling so handlers can stamp `userId` and `assignedBy`.

pub mod caller;

pub use caller::{caller_context_middleware, Caller};
