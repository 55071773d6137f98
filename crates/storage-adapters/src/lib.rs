//! crates/storage-adapters/src/lib.rs
//!
//! Adapters implementing the `domains` ports: an in-memory persistence
//! engine and the system id generator and clock.

pub mod memory;
pub mod system;

pub use memory::MemoryStore;
pub use system::{SystemClock, UuidV4Generator};
