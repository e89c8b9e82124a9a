// fixtures.rs — provides commonly used card identities and keys

use fm175xx::utils::parse_hex;
use fm175xx::{MifareKey, TagAuthentication};

pub fn classic_uid() -> [u8; 4] {
    [0x5A, 0x3C, 0x91, 0x0E]
}

pub fn ntag_uid() -> [u8; 7] {
    [0x04, 0x8A, 0x31, 0x62, 0xB2, 0x5D, 0x80]
}

pub fn triple_uid() -> Vec<u8> {
    parse_hex("04:11:22:33:44:55:66:77:88:99").unwrap()
}

/// Per-sector keys, as a decoder would derive them from the UID.
pub fn sector_keys() -> TagAuthentication {
    let mut key_a = [[0u8; 6]; 16];
    let mut key_b = [[0u8; 6]; 16];
    for sector in 0..16u8 {
        key_a[sector as usize] = [0xA0, sector, 0x11, 0x22, 0x33, 0x44];
        key_b[sector as usize] = [0xB0, sector, 0x55, 0x66, 0x77, 0x88];
    }
    TagAuthentication::from_slices(&key_a, &key_b).unwrap()
}

pub fn default_keys() -> TagAuthentication {
    TagAuthentication::uniform(MifareKey::DEFAULT, MifareKey::DEFAULT)
}
