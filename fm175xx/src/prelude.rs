// fm175xx/src/prelude.rs

//! Convenience re-exports for applications driving a reader.

pub use crate::card::ScanResult;
pub use crate::device::{Fm175xx, ReaderBuilder, ReaderConfig};
pub use crate::reader::{ClassicReadable, RfidReader, UltralightReadable};
pub use crate::transport::{ResetPin, SpiBus};
pub use crate::{
    AuthMode, CarrierWave, CascadeLevel, ChipType, Error, MifareKey, Result, TagAuthentication,
    TagType, Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_colon, ms, parse_hex};
