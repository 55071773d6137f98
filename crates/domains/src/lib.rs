//! crates/domains/src/lib.rs
//!
//! Entities, authorization rules, ordering rules and the port traits of the
//! task board core. Nothing in here performs I/O.

pub mod access;
pub mod audit;
pub mod errors;
pub mod models;
pub mod ordering;
pub mod ports;
pub mod validation;

// Re-exporting for easier access in other crates
pub use errors::{DomainError, ErrorKind, PortError, Resource, Result};
pub use models::*;
