// fm175xx/src/lib.rs

//! fm175xx
//!
//! Pure Rust driver for FM175xx contactless reader chips: register access,
//! the command executor, ISO14443-A activation and MIFARE Classic /
//! Ultralight memory access.
#![warn(missing_docs)]

pub mod card;
pub mod constants;
pub mod device;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod reader;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
