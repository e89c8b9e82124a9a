// fm175xx/src/card/mod.rs

//! Card-level access on top of the activation protocol.

mod info;
pub use info::ScanResult;

pub mod classic;
pub mod ultralight;
