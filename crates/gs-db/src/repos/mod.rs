//! Repository modules for the membership store.
//!
//! Each module adds methods to `GsTx` via `impl GsTx` blocks, so every read
//! and write shares the caller's transaction.

pub mod group;
pub mod membership;
pub mod organization;
pub mod settings;
