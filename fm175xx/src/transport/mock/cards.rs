// fm175xx/src/transport/mock/cards.rs

//! Simulated cards for [`MockChip`](super::MockChip).

use std::collections::{HashMap, VecDeque};

use super::{CardReply, SimulatedCard};
use crate::constants::{
    M1_BLOCKS_PER_SECTOR, M1_BYTES_PER_BLOCK, M1_SECTORS, MF_ACK, MF_CMD_READ, MF_CMD_WRITE,
    PAGES_PER_READ, RF_ANTICOLL_NVB, RF_CASCADE_TAG, RF_CMD_HALT, RF_CMD_REQA, RF_CMD_WUPA,
    RF_SELECT_NVB,
};
use crate::types::TagAuthentication;

const MF_NAK: u8 = 0x04;
/// SAK of a non-final cascade level: UID not complete
const SAK_CASCADE: u8 = 0x04;

fn cascade_index(sel: u8) -> Option<usize> {
    match sel {
        0x93 => Some(0),
        0x95 => Some(1),
        0x97 => Some(2),
        _ => None,
    }
}

/// Consume one injected failure for `key`, if any remain.
fn take_failure<K: std::hash::Hash + Eq>(failures: &mut HashMap<K, usize>, key: K) -> bool {
    match failures.get_mut(&key) {
        Some(left) if *left > 0 => {
            *left -= 1;
            true
        }
        _ => false,
    }
}

/// ISO14443-A activation behaviour shared by the simulated cards:
/// WUPA/REQA, anticollision, select and HLTA for 4, 7 and 10-byte UIDs.
#[derive(Debug, Clone)]
pub struct Iso14443Identity {
    uid: Vec<u8>,
    atqa: [u8; 2],
    sak: u8,
    halted: bool,
    corrupt_bcc: bool,
}

impl Iso14443Identity {
    /// Identity of a card with `uid` answering `sak` at the last cascade level.
    pub fn new(uid: &[u8], sak: u8) -> Self {
        let size_bits = match uid.len() {
            4 => 0x00,
            7 => 0x40,
            _ => 0x80,
        };
        Self {
            uid: uid.to_vec(),
            atqa: [size_bits | 0x04, 0x00],
            sak,
            halted: false,
            corrupt_bcc: false,
        }
    }

    /// Override the ATQA, e.g. to announce the RFU UID size.
    pub fn with_atqa(mut self, atqa: [u8; 2]) -> Self {
        self.atqa = atqa;
        self
    }

    /// Answer anticollision with a BCC that does not match the UID part.
    pub fn with_corrupt_bcc(mut self) -> Self {
        self.corrupt_bcc = true;
        self
    }

    /// UID without cascade tags.
    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    /// Whether HLTA was accepted since the last WUPA.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn parts(&self) -> Vec<[u8; 4]> {
        let u = &self.uid;
        match u.len() {
            4 => vec![[u[0], u[1], u[2], u[3]]],
            7 => vec![
                [RF_CASCADE_TAG, u[0], u[1], u[2]],
                [u[3], u[4], u[5], u[6]],
            ],
            _ => vec![
                [RF_CASCADE_TAG, u[0], u[1], u[2]],
                [RF_CASCADE_TAG, u[3], u[4], u[5]],
                [u[6], u[7], u[8], u[9]],
            ],
        }
    }

    fn bcc(part: &[u8; 4]) -> u8 {
        part.iter().fold(0, |acc, b| acc ^ b)
    }

    /// Handle an activation frame; `None` leaves the frame to the card.
    pub fn respond(&mut self, frame: &[u8], last_bits: u8) -> Option<CardReply> {
        match frame {
            [RF_CMD_WUPA] if last_bits == 7 => {
                self.halted = false;
                Some(CardReply::Bytes(self.atqa.to_vec()))
            }
            [RF_CMD_REQA] if last_bits == 7 => Some(if self.halted {
                CardReply::Silent
            } else {
                CardReply::Bytes(self.atqa.to_vec())
            }),
            _ if self.halted => Some(CardReply::Silent),
            [a, b] if [*a, *b] == RF_CMD_HALT => {
                self.halted = true;
                Some(CardReply::Silent)
            }
            [sel, RF_ANTICOLL_NVB] => {
                let parts = self.parts();
                let part = parts.get(cascade_index(*sel)?)?;
                let mut bcc = Self::bcc(part);
                if self.corrupt_bcc {
                    bcc ^= 0xFF;
                }
                let mut reply = part.to_vec();
                reply.push(bcc);
                Some(CardReply::Bytes(reply))
            }
            [sel, RF_SELECT_NVB, rest @ ..] if rest.len() == 5 => {
                let index = cascade_index(*sel)?;
                let parts = self.parts();
                let part = parts.get(index)?;
                if rest[..4] != part[..] || rest[4] != Self::bcc(part) {
                    return Some(CardReply::Silent);
                }
                let sak = if index + 1 < parts.len() {
                    SAK_CASCADE
                } else {
                    self.sak
                };
                Some(CardReply::Bytes(vec![sak]))
            }
            _ => None,
        }
    }
}

/// MIFARE Classic 1K with per-sector keys and injectable failures.
#[derive(Debug, Clone)]
pub struct ClassicCard {
    identity: Iso14443Identity,
    keys: TagAuthentication,
    blocks: Vec<[u8; M1_BYTES_PER_BLOCK]>,
    authenticated: Option<usize>,
    pending_write: Option<u8>,
    auth_failures: HashMap<usize, usize>,
    read_failures: HashMap<u8, usize>,
}

impl ClassicCard {
    /// Data blocks are filled with their own block number; trailers hold
    /// the keys and the default access bits.
    pub fn new(uid: [u8; 4], keys: TagAuthentication) -> Self {
        let mut blocks = Vec::with_capacity(M1_SECTORS * M1_BLOCKS_PER_SECTOR);
        for block in 0..M1_SECTORS * M1_BLOCKS_PER_SECTOR {
            let sector = block / M1_BLOCKS_PER_SECTOR;
            if block % M1_BLOCKS_PER_SECTOR == M1_BLOCKS_PER_SECTOR - 1 {
                blocks.push(keys.trailer(sector).unwrap_or([0; M1_BYTES_PER_BLOCK]));
            } else {
                blocks.push([block as u8; M1_BYTES_PER_BLOCK]);
            }
        }
        Self {
            identity: Iso14443Identity::new(&uid, 0x08),
            keys,
            blocks,
            authenticated: None,
            pending_write: None,
            auth_failures: HashMap::new(),
            read_failures: HashMap::new(),
        }
    }

    /// Replace the ISO14443-A identity, e.g. for a 7-byte UID.
    pub fn with_identity(mut self, identity: Iso14443Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Preload one block.
    pub fn with_block(mut self, block: usize, data: [u8; M1_BYTES_PER_BLOCK]) -> Self {
        self.blocks[block] = data;
        self
    }

    /// Reject the next `times` authentications of `sector`.
    pub fn fail_auth(mut self, sector: usize, times: usize) -> Self {
        self.auth_failures.insert(sector, times);
        self
    }

    /// Stay silent on the next `times` reads of `block`.
    pub fn fail_reads(mut self, block: u8, times: usize) -> Self {
        self.read_failures.insert(block, times);
        self
    }

    fn sector_unlocked(&self, block: u8) -> bool {
        self.authenticated == Some(usize::from(block) / M1_BLOCKS_PER_SECTOR)
    }
}

impl SimulatedCard for ClassicCard {
    fn transceive(&mut self, frame: &[u8], last_bits: u8) -> CardReply {
        if let Some(reply) = self.identity.respond(frame, last_bits) {
            if frame.first() == Some(&RF_CMD_WUPA) {
                self.authenticated = None;
            }
            return reply;
        }

        if let Some(block) = self.pending_write.take() {
            return match <[u8; M1_BYTES_PER_BLOCK]>::try_from(frame) {
                Ok(data) => {
                    self.blocks[usize::from(block)] = data;
                    CardReply::Nibble(MF_ACK)
                }
                Err(_) => CardReply::Nibble(MF_NAK),
            };
        }

        match frame {
            [MF_CMD_READ, block] if usize::from(*block) < self.blocks.len() => {
                if take_failure(&mut self.read_failures, *block) {
                    CardReply::Silent
                } else if self.sector_unlocked(*block) {
                    CardReply::Bytes(self.blocks[usize::from(*block)].to_vec())
                } else {
                    CardReply::Nibble(MF_NAK)
                }
            }
            [MF_CMD_WRITE, block] if usize::from(*block) < self.blocks.len() => {
                if self.sector_unlocked(*block) {
                    self.pending_write = Some(*block);
                    CardReply::Nibble(MF_ACK)
                } else {
                    CardReply::Nibble(MF_NAK)
                }
            }
            _ => CardReply::Silent,
        }
    }

    fn authenticate(&mut self, request: &[u8]) -> bool {
        self.authenticated = None;
        let [cmd, block, key @ .., u0, u1, u2, u3] = request else {
            return false;
        };
        let sector = usize::from(*block) / M1_BLOCKS_PER_SECTOR;
        if take_failure(&mut self.auth_failures, sector) {
            return false;
        }
        let expected = match *cmd {
            0x60 => self.keys.key_a(sector),
            0x61 => self.keys.key_b(sector),
            _ => None,
        };
        let key_ok = expected.is_some_and(|k| &k.as_bytes()[..] == key);
        let uid = self.identity.uid();
        let uid_ok = uid.get(uid.len().saturating_sub(4)..) == Some(&[*u0, *u1, *u2, *u3][..]);
        if key_ok && uid_ok {
            self.authenticated = Some(sector);
        }
        self.authenticated.is_some()
    }
}

/// MIFARE Ultralight / NTAG with a configurable page count.
#[derive(Debug, Clone)]
pub struct UltralightCard {
    identity: Iso14443Identity,
    pages: Vec<[u8; 4]>,
    read_failures: HashMap<u8, usize>,
}

impl UltralightCard {
    /// Pages are filled with their own page number.
    pub fn new(uid: [u8; 7], page_count: usize) -> Self {
        Self {
            identity: Iso14443Identity::new(&uid, 0x00),
            pages: (0..page_count).map(|p| [p as u8; 4]).collect(),
            read_failures: HashMap::new(),
        }
    }

    /// 135-page NTAG215.
    pub fn ntag215(uid: [u8; 7]) -> Self {
        Self::new(uid, crate::constants::NTAG215_TOTAL_PAGES)
    }

    /// Preload one page.
    pub fn with_page(mut self, page: usize, data: [u8; 4]) -> Self {
        self.pages[page] = data;
        self
    }

    /// Stay silent on the next `times` reads starting at `page`.
    pub fn fail_reads(mut self, page: u8, times: usize) -> Self {
        self.read_failures.insert(page, times);
        self
    }
}

impl SimulatedCard for UltralightCard {
    fn transceive(&mut self, frame: &[u8], last_bits: u8) -> CardReply {
        if let Some(reply) = self.identity.respond(frame, last_bits) {
            return reply;
        }
        match frame {
            [MF_CMD_READ, page] => {
                let start = usize::from(*page);
                if start >= self.pages.len() {
                    return CardReply::Nibble(0x00);
                }
                if take_failure(&mut self.read_failures, *page) {
                    return CardReply::Silent;
                }
                // The read window rolls over to page 0 past the last page
                let data = (0..PAGES_PER_READ)
                    .flat_map(|i| self.pages[(start + i) % self.pages.len()])
                    .collect();
                CardReply::Bytes(data)
            }
            _ => CardReply::Silent,
        }
    }
}

/// Card answering from a queue of canned replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCard {
    replies: VecDeque<CardReply>,
    auth_results: VecDeque<bool>,
}

impl ScriptedCard {
    /// Answer frames with `replies` in order, then stay silent.
    pub fn new(replies: Vec<CardReply>) -> Self {
        Self {
            replies: replies.into(),
            auth_results: VecDeque::new(),
        }
    }

    /// Answer authentication requests with `results` in order.
    pub fn with_auth_results(mut self, results: Vec<bool>) -> Self {
        self.auth_results = results.into();
        self
    }
}

impl SimulatedCard for ScriptedCard {
    fn transceive(&mut self, _frame: &[u8], _last_bits: u8) -> CardReply {
        self.replies.pop_front().unwrap_or(CardReply::Silent)
    }

    fn authenticate(&mut self, _request: &[u8]) -> bool {
        self.auth_results.pop_front().unwrap_or(false)
    }
}
