//! Identity of an activated card.

use std::fmt;

use crate::types::{TagType, Uid};
use crate::utils::bytes_to_hex_colon;

/// Identity of an activated card.
///
/// BCC and SAK hold one entry per cascade level walked during activation;
/// the UID has its cascade tags removed and is the key used downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScanResult {
    /// Card family inferred from the SAK bytes
    pub tag_type: TagType,
    /// UID without cascade tags
    pub uid: Uid,
    /// Answer to WUPA
    pub atqa: [u8; 2],
    /// BCC of each cascade level
    pub bcc: Vec<u8>,
    /// SAK of each cascade level
    pub sak: Vec<u8>,
}

impl ScanResult {
    /// UID of the card.
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Inferred card family.
    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tag detected:\n- TagType: {}\n- UID: {}\n- ATQA: {}\n- BCC: {}\n- SAK: {}",
            self.tag_type.readable_name(),
            bytes_to_hex_colon(self.uid.as_bytes()),
            bytes_to_hex_colon(&self.atqa),
            bytes_to_hex_colon(&self.bcc),
            bytes_to_hex_colon(&self.sak),
        )
    }
}
