// fm175xx/src/types.rs

//! Value types shared by the protocol and card layers.

use crate::Error;
use crate::constants::{
    CHIP_VERSION_FM17580, M1_ACCESS_BITS, M1_BYTES_PER_BLOCK, M1_SECTORS, MF_CMD_AUTH_KEY_A,
    MF_CMD_AUTH_KEY_B,
};
use std::convert::TryFrom;

/// UID - Newtype Pattern (4, 7 または 10 バイト)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Uid(Vec<u8>);

impl Uid {
    /// Raw UID bytes, cascade tags removed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// UID length: 4, 7 or 10.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed UID.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact lower-case hex, used as the tag key.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }

    /// UID part of the last cascade level, as fed to the Crypto1
    /// authentication. This is the whole UID for single-size cards and
    /// the last four bytes for double- and triple-size cards.
    pub fn auth_bytes(&self) -> [u8; 4] {
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&self.0[self.0.len() - 4..]);
        arr
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        match bytes.len() {
            4 | 7 | 10 => Ok(Self(bytes.to_vec())),
            n => Err(Error::Length {
                expected: if n < 7 { 4 } else if n < 10 { 7 } else { 10 },
                actual: n,
            }),
        }
    }
}

/// 6-byte MIFARE Classic sector key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MifareKey([u8; 6]);

impl MifareKey {
    /// Transport key of blank cards
    pub const DEFAULT: Self = Self([0xFF; 6]);

    /// Key from its six bytes.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 6 {
            return Err(Error::Length {
                expected: 6,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 6];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// Sector keys supplied by the caller for a MIFARE Classic 1K read.
///
/// The reader never derives keys; decoders compute them (usually from the
/// UID) and hand them over through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAuthentication {
    key_a: [MifareKey; M1_SECTORS],
    key_b: [MifareKey; M1_SECTORS],
}

impl TagAuthentication {
    /// Build from full key-A and key-B tables.
    pub fn new(key_a: [MifareKey; M1_SECTORS], key_b: [MifareKey; M1_SECTORS]) -> Self {
        Self { key_a, key_b }
    }

    /// Same key pair for every sector
    pub fn uniform(key_a: MifareKey, key_b: MifareKey) -> Self {
        Self {
            key_a: [key_a; M1_SECTORS],
            key_b: [key_b; M1_SECTORS],
        }
    }

    /// Build from per-sector key tables; both tables need exactly 16 keys.
    pub fn from_slices(key_a: &[[u8; 6]], key_b: &[[u8; 6]]) -> crate::Result<Self> {
        for table in [key_a, key_b] {
            if table.len() != M1_SECTORS {
                return Err(Error::Length {
                    expected: M1_SECTORS,
                    actual: table.len(),
                });
            }
        }
        let mut a = [MifareKey::DEFAULT; M1_SECTORS];
        let mut b = [MifareKey::DEFAULT; M1_SECTORS];
        for sector in 0..M1_SECTORS {
            a[sector] = MifareKey::from_bytes(key_a[sector]);
            b[sector] = MifareKey::from_bytes(key_b[sector]);
        }
        Ok(Self::new(a, b))
    }

    /// Key A of `sector`.
    pub fn key_a(&self, sector: usize) -> Option<&MifareKey> {
        self.key_a.get(sector)
    }

    /// Key B of `sector`.
    pub fn key_b(&self, sector: usize) -> Option<&MifareKey> {
        self.key_b.get(sector)
    }

    /// Key of `sector` used by `mode`.
    pub fn key(&self, mode: AuthMode, sector: usize) -> Option<&MifareKey> {
        match mode {
            AuthMode::KeyA => self.key_a(sector),
            AuthMode::KeyB => self.key_b(sector),
        }
    }

    /// Sector trailer rebuilt from the keys: key A, access bits, key B.
    pub fn trailer(&self, sector: usize) -> Option<[u8; M1_BYTES_PER_BLOCK]> {
        let a = self.key_a(sector)?;
        let b = self.key_b(sector)?;
        let mut block = [0u8; M1_BYTES_PER_BLOCK];
        block[..6].copy_from_slice(a.as_bytes());
        block[6..10].copy_from_slice(&M1_ACCESS_BITS);
        block[10..].copy_from_slice(b.as_bytes());
        Some(block)
    }
}

/// Which sector key an authentication uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Authenticate with key A
    #[default]
    KeyA,
    /// Authenticate with key B
    KeyB,
}

impl AuthMode {
    /// MIFARE authentication command byte
    pub fn command(self) -> u8 {
        match self {
            AuthMode::KeyA => MF_CMD_AUTH_KEY_A,
            AuthMode::KeyB => MF_CMD_AUTH_KEY_B,
        }
    }
}

/// TagType inferred from the SAK bytes collected during activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TagType {
    /// Anything else; not read by the driver
    Unknown,
    /// SAK 0x08
    MifareClassic1k,
    /// SAK 0x04 then 0x00
    MifareUltralight,
}

impl TagType {
    /// Infer the card family from the SAK of every cascade level.
    pub fn from_sak(sak: &[u8]) -> Self {
        match sak {
            [0x08] => TagType::MifareClassic1k,
            [0x04, 0x00] => TagType::MifareUltralight,
            _ => TagType::Unknown,
        }
    }

    /// Human-readable name for display.
    pub fn readable_name(&self) -> &'static str {
        match self {
            TagType::MifareClassic1k => "Mifare Classic 1K",
            TagType::MifareUltralight => "Mifare Ultralight / NTAG",
            TagType::Unknown => "Unknown",
        }
    }
}

/// Antenna driver outputs carrying the 13.56 MHz carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarrierWave {
    /// Carrier off
    #[default]
    Off,
    /// TX1 driver only
    Tx1,
    /// TX2 driver only
    Tx2,
    /// Both drivers
    Both,
}

/// ISO14443-A cascade level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CascadeLevel {
    /// Single-size UID (4 bytes)
    One,
    /// Double-size UID (7 bytes)
    Two,
    /// Triple-size UID (10 bytes)
    Three,
}

impl CascadeLevel {
    /// Every level, outermost first
    pub const ALL: [CascadeLevel; 3] = [CascadeLevel::One, CascadeLevel::Two, CascadeLevel::Three];

    /// Deepest cascade level announced by the UID-size bits of ATQA byte 0.
    /// The RFU encoding (`11`) yields `None`.
    pub fn from_atqa(atqa: [u8; 2]) -> Option<Self> {
        match atqa[0] & 0xC0 {
            0x00 => Some(CascadeLevel::One),
            0x40 => Some(CascadeLevel::Two),
            0x80 => Some(CascadeLevel::Three),
            _ => None,
        }
    }

    /// SEL byte shared by the anticollision and select frames
    pub fn command(self) -> u8 {
        match self {
            CascadeLevel::One => 0x93,
            CascadeLevel::Two => 0x95,
            CascadeLevel::Three => 0x97,
        }
    }

    /// Level number, 1 to 3.
    pub fn number(self) -> u8 {
        match self {
            CascadeLevel::One => 1,
            CascadeLevel::Two => 2,
            CascadeLevel::Three => 3,
        }
    }

    /// Levels walked to reach `self`, outermost first
    pub fn path(self) -> &'static [CascadeLevel] {
        &Self::ALL[..self.number() as usize]
    }
}

/// ChipType reported by the version register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipType {
    /// FM17580, version 0xA1
    Fm17580,
    /// Any other version register value
    Unknown(u8),
}

impl ChipType {
    /// Classify a version register value.
    pub fn from_version(version: u8) -> Self {
        match version {
            CHIP_VERSION_FM17580 => ChipType::Fm17580,
            other => ChipType::Unknown(other),
        }
    }
}
