//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `ports`: Trait definitions for external dependencies
//! - `dates`: Calendar-date parsing and formatting shared by the boundaries

pub mod dates;
pub mod entities;
pub mod ports;
