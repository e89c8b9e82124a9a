// fm175xx/src/transport/mock/mod.rs

//! Register-level FM175xx simulator for unit and integration tests.
//!
//! `MockChip` decodes the SPI frames produced by the register layer and
//! models the parts of the chip the driver depends on: the IRQ flag register
//! with its Set1 semantics, the 64-byte FIFO and its water level, the
//! Transceive/MFAuthent commands, RxLastBits, the Crypto1 status bit and the
//! error/collision registers. Frames transmitted to the field are handed to
//! a [`SimulatedCard`].
//!
//! Replies are staged the way the chip reports them: StartSend raises the
//! TX-done flag first and the card's answer is only delivered on a later
//! poll of the IRQ register, once TX-done has been acknowledged.

mod cards;

pub use cards::{ClassicCard, Iso14443Identity, ScriptedCard, UltralightCard};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::constants::{CHIP_VERSION_FM17580, FIFO_SIZE};
use crate::device::command::ChipCommand;
use crate::device::register::{Register, bits};
use crate::transport::traits::{ResetPin, SpiBus};
use crate::{Error, Result};

/// What a simulated card answers to one transmitted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardReply {
    /// No answer; the chip timer expires.
    Silent,
    /// Whole bytes.
    Bytes(Vec<u8>),
    /// A 4-bit answer such as the MIFARE ACK/NAK.
    Nibble(u8),
    /// Several cards answered; the chip flags a collision at `position`.
    Collision {
        /// Bit position reported in the collision register
        position: u8,
    },
    /// Framing/parity/CRC trouble reported through the error register.
    ProtocolError(u8),
}

/// A card sitting in the simulated RF field.
pub trait SimulatedCard {
    /// React to a frame whose last byte carries `last_bits` valid bits
    /// (0 means all eight).
    fn transceive(&mut self, frame: &[u8], last_bits: u8) -> CardReply;

    /// React to an MFAuthent request `[cmd, block, key(6), uid(4)]`.
    fn authenticate(&mut self, _request: &[u8]) -> bool {
        false
    }
}

const COMMAND: u8 = Register::Command as u8;
const COM_IRQ: u8 = Register::ComIrq as u8;
const ERROR: u8 = Register::Error as u8;
const STATUS2: u8 = Register::Status2 as u8;
const FIFO_DATA: u8 = Register::FifoData as u8;
const FIFO_LEVEL: u8 = Register::FifoLevel as u8;
const WATER_LEVEL: u8 = Register::WaterLevel as u8;
const CONTROL: u8 = Register::Control as u8;
const BIT_FRAMING: u8 = Register::BitFraming as u8;
const COLL: u8 = Register::Coll as u8;
const VERSION: u8 = Register::Version as u8;

const CMD_TRANSCEIVE: u8 = ChipCommand::Transceive as u8;
const CMD_MF_AUTHENT: u8 = ChipCommand::MfAuthent as u8;

struct ChipState {
    regs: [u8; 64],
    irq: u8,
    fifo: VecDeque<u8>,
    card: Option<Box<dyn SimulatedCard>>,
    pending: Option<CardReply>,
    frames: Vec<Vec<u8>>,
    transfers: Vec<Vec<u8>>,
    unresponsive: bool,
    bus_failure: bool,
    extra_irq: u8,
}

impl ChipState {
    fn new() -> Self {
        let mut regs = [0u8; 64];
        regs[VERSION as usize] = CHIP_VERSION_FM17580;
        Self {
            regs,
            irq: 0,
            fifo: VecDeque::with_capacity(FIFO_SIZE),
            card: None,
            pending: None,
            frames: Vec::new(),
            transfers: Vec::new(),
            unresponsive: false,
            bus_failure: false,
            extra_irq: 0,
        }
    }

    fn read_register(&mut self, addr: u8) -> u8 {
        match addr {
            COM_IRQ => {
                self.deliver_pending();
                self.irq
            }
            FIFO_DATA => self.fifo.pop_front().unwrap_or(0),
            FIFO_LEVEL => (self.fifo.len() as u8) & bits::FIFO_LEVEL_MASK,
            _ => self.regs[addr as usize],
        }
    }

    fn write_register(&mut self, addr: u8, value: u8) {
        match addr {
            COMMAND => {
                self.regs[COMMAND as usize] = value;
                self.start_command(value);
            }
            COM_IRQ => {
                if value & bits::IRQ_SET1 != 0 {
                    self.irq |= value & bits::IRQ_ALL;
                } else {
                    self.irq &= !value;
                }
            }
            FIFO_DATA => {
                if self.fifo.len() < FIFO_SIZE {
                    self.fifo.push_back(value);
                }
            }
            FIFO_LEVEL => {
                if value & bits::FIFO_FLUSH != 0 {
                    self.fifo.clear();
                    self.pending = None;
                }
            }
            BIT_FRAMING => {
                self.regs[BIT_FRAMING as usize] = value;
                if value & bits::BIT_FRAMING_START_SEND != 0 {
                    self.transmit(value & 0x07);
                }
            }
            _ => self.regs[addr as usize] = value,
        }
    }

    fn start_command(&mut self, command: u8) {
        if self.unresponsive {
            return;
        }
        match command {
            // An empty FIFO sits below the water level
            CMD_TRANSCEIVE => self.irq |= bits::IRQ_LO_ALERT,
            CMD_MF_AUTHENT => {
                let request: Vec<u8> = self.fifo.drain(..).collect();
                self.frames.push(request.clone());
                let accepted = self
                    .card
                    .as_mut()
                    .is_some_and(|card| card.authenticate(&request));
                if accepted {
                    self.regs[STATUS2 as usize] |= bits::STATUS2_CRYPTO1_ON;
                    self.irq |= bits::IRQ_IDLE;
                } else {
                    self.regs[STATUS2 as usize] &= !bits::STATUS2_CRYPTO1_ON;
                    self.irq |= bits::IRQ_TIMER;
                }
            }
            _ => {}
        }
    }

    fn transmit(&mut self, last_bits: u8) {
        if self.unresponsive
            || self.regs[COMMAND as usize] != CMD_TRANSCEIVE
            || self.fifo.is_empty()
        {
            return;
        }
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        self.frames.push(frame.clone());
        let reply = match self.card.as_mut() {
            Some(card) => card.transceive(&frame, last_bits),
            None => CardReply::Silent,
        };
        self.irq |= bits::IRQ_TX;
        self.pending = Some(reply);
    }

    fn deliver_pending(&mut self) {
        if self.unresponsive || self.irq & bits::IRQ_TX != 0 {
            return;
        }
        let Some(reply) = self.pending.take() else {
            return;
        };
        self.irq |= std::mem::take(&mut self.extra_irq);
        match reply {
            CardReply::Silent => self.irq |= bits::IRQ_TIMER,
            CardReply::Bytes(data) => {
                self.fifo.extend(data);
                self.set_rx_last_bits(0);
                self.irq |= bits::IRQ_RX;
                let water_level = usize::from(self.regs[WATER_LEVEL as usize]);
                if self.fifo.len() >= FIFO_SIZE.saturating_sub(water_level) {
                    self.irq |= bits::IRQ_HI_ALERT;
                }
            }
            CardReply::Nibble(value) => {
                self.fifo.push_back(value & 0x0F);
                self.set_rx_last_bits(4);
                self.irq |= bits::IRQ_RX;
            }
            CardReply::Collision { position } => {
                self.regs[ERROR as usize] = bits::ERR_COLL;
                let coll = self.regs[COLL as usize];
                self.regs[COLL as usize] =
                    (coll & !bits::COLL_POS_MASK) | (position & bits::COLL_POS_MASK);
                self.irq |= bits::IRQ_ERR;
            }
            CardReply::ProtocolError(flags) => {
                self.regs[ERROR as usize] = flags;
                self.irq |= bits::IRQ_ERR;
            }
        }
    }

    fn set_rx_last_bits(&mut self, last_bits: u8) {
        let control = self.regs[CONTROL as usize];
        self.regs[CONTROL as usize] =
            (control & !bits::CONTROL_RX_LAST_BITS) | (last_bits & bits::CONTROL_RX_LAST_BITS);
    }
}

/// Simulated FM175xx reachable through [`SpiBus`].
///
/// Clones share the same chip, so a test can keep one handle while the
/// reader owns another.
#[derive(Clone)]
pub struct MockChip {
    state: Rc<RefCell<ChipState>>,
}

impl MockChip {
    /// Idle FM17580 with an empty field.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    /// Chip with `card` already in the field.
    pub fn with_card(card: impl SimulatedCard + 'static) -> Self {
        let chip = Self::new();
        chip.insert_card(card);
        chip
    }

    /// Put `card` into the field, replacing any other.
    pub fn insert_card(&self, card: impl SimulatedCard + 'static) {
        self.state.borrow_mut().card = Some(Box::new(card));
    }

    /// Empty the field.
    pub fn remove_card(&self) {
        self.state.borrow_mut().card = None;
    }

    /// A stuck chip never raises an IRQ flag.
    pub fn set_unresponsive(&self, unresponsive: bool) {
        self.state.borrow_mut().unresponsive = unresponsive;
    }

    /// Make every subsequent transfer fail.
    pub fn set_bus_failure(&self, failing: bool) {
        self.state.borrow_mut().bus_failure = failing;
    }

    /// Raise `flags` in the same IRQ read that delivers the next reply.
    pub fn raise_with_next_reply(&self, flags: u8) {
        self.state.borrow_mut().extra_irq = flags & bits::IRQ_ALL;
    }

    /// Override the version register.
    pub fn set_version(&self, version: u8) {
        self.state.borrow_mut().regs[VERSION as usize] = version;
    }

    /// Current register content without side effects.
    pub fn register(&self, reg: Register) -> u8 {
        let state = self.state.borrow();
        match reg {
            Register::ComIrq => state.irq,
            Register::FifoLevel => state.fifo.len() as u8,
            other => state.regs[other.addr() as usize],
        }
    }

    /// Frames sent to the card, in order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.state.borrow().frames.clone()
    }

    /// Raw SPI transfers, in order.
    pub fn transfers(&self) -> Vec<Vec<u8>> {
        self.state.borrow().transfers.clone()
    }

    /// Forget recorded frames and transfers.
    pub fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.frames.clear();
        state.transfers.clear();
    }
}

impl Default for MockChip {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockChip")
            .field("irq", &state.irq)
            .field("fifo_len", &state.fifo.len())
            .field("card", &state.card.is_some())
            .finish()
    }
}

impl SpiBus for MockChip {
    fn transfer(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        if state.bus_failure {
            return Err(Error::ChipComm("mock bus failure".into()));
        }
        state.transfers.push(data.to_vec());

        let mut reply = vec![0u8; data.len()];
        let Some(&first) = data.first() else {
            return Ok(reply);
        };
        if first & 0x80 != 0 {
            // Each address byte is answered during the following byte slot
            for i in 0..data.len() - 1 {
                reply[i + 1] = state.read_register((data[i] >> 1) & 0x3F);
            }
        } else {
            let addr = (first >> 1) & 0x3F;
            for &value in &data[1..] {
                state.write_register(addr, value);
            }
        }
        Ok(reply)
    }
}

/// Reset line that records every level it is driven to.
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl MockPin {
    /// Pin with no recorded levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels driven so far, oldest first.
    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }
}

impl ResetPin for MockPin {
    fn set_high(&mut self) -> Result<()> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }
}
