// fm175xx/src/transport/mod.rs

//! Bus and reset-line seams plus their implementations.

#[cfg(feature = "hal")]
pub mod hal;
pub mod mock;
pub mod traits;

#[cfg(feature = "hal")]
pub use hal::{HalPin, HalSpi};
pub use mock::MockChip;
pub use traits::{NoResetPin, ResetPin, SpiBus};
