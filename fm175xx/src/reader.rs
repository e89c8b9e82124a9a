// fm175xx/src/reader.rs

//! Capability traits consumed by tag decoders and the scan loop.
//!
//! A reader always supports sessions and scanning. Reading MIFARE Classic
//! or Ultralight memory is an optional capability queried through
//! [`RfidReader::as_classic`] and [`RfidReader::as_ultralight`]; `None`
//! means the reader cannot do it, which is not an error.

use log::error;

use crate::Result;
use crate::card::ScanResult;
use crate::device::Fm175xx;
use crate::types::{AuthMode, TagAuthentication};

/// Session and scan capability every reader has.
pub trait RfidReader {
    /// Switch the RF field on and prepare the front end.
    fn start_session(&mut self) -> Result<()>;

    /// Halt the card and switch the RF field off.
    fn end_session(&mut self) -> Result<()>;

    /// Activate the card in the field, if any.
    fn scan(&mut self) -> Option<ScanResult>;

    /// MIFARE Classic access, if the reader supports it.
    fn as_classic(&mut self) -> Option<&mut dyn ClassicReadable> {
        None
    }

    /// Ultralight/NTAG access, if the reader supports it.
    fn as_ultralight(&mut self) -> Option<&mut dyn UltralightReadable> {
        None
    }
}

/// Reader able to dump MIFARE Classic 1K memory.
pub trait ClassicReadable {
    /// Full 1024-byte dump of a MIFARE Classic 1K card.
    fn read_mifare_classic(
        &mut self,
        scan: &ScanResult,
        keys: &TagAuthentication,
    ) -> Option<Vec<u8>>;
}

/// Reader able to dump Ultralight/NTAG memory.
pub trait UltralightReadable {
    /// User memory of a MIFARE Ultralight / NTAG card, at most 540 bytes.
    fn read_mifare_ultralight(&mut self, scan: &ScanResult) -> Option<Vec<u8>>;
}

impl RfidReader for Fm175xx {
    fn start_session(&mut self) -> Result<()> {
        Fm175xx::start_session(self)
    }

    fn end_session(&mut self) -> Result<()> {
        Fm175xx::end_session(self)
    }

    fn scan(&mut self) -> Option<ScanResult> {
        match self.activate() {
            Ok(result) => Some(result),
            Err(e) => {
                error!("{}: scan error: {} ({})", self.config().name, e, e.code());
                None
            }
        }
    }

    fn as_classic(&mut self) -> Option<&mut dyn ClassicReadable> {
        Some(self)
    }

    fn as_ultralight(&mut self) -> Option<&mut dyn UltralightReadable> {
        Some(self)
    }
}

impl ClassicReadable for Fm175xx {
    fn read_mifare_classic(
        &mut self,
        scan: &ScanResult,
        keys: &TagAuthentication,
    ) -> Option<Vec<u8>> {
        match self.read_classic_card(&scan.uid, AuthMode::KeyA, keys) {
            Ok(image) => Some(image),
            Err(e) => {
                error!("{}: MIFARE Classic read error: {}", self.config().name, e);
                None
            }
        }
    }
}

impl UltralightReadable for Fm175xx {
    fn read_mifare_ultralight(&mut self, _scan: &ScanResult) -> Option<Vec<u8>> {
        match self.read_ultralight_card() {
            Ok(image) => Some(image),
            Err(e) => {
                error!("{}: MIFARE Ultralight read error: {}", self.config().name, e);
                None
            }
        }
    }
}
