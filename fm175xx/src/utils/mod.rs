//! Utilities for fm175xx: small, reusable helpers used across the crate.
//!
//! Hex formatting for logs and `Display` output, and the deadline helper
//! used by the command executor's poll loop.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
