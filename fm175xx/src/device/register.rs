// fm175xx/src/device/register.rs

//! Register access layer.
//!
//! The chip is addressed through two-byte style SPI frames: a read sends
//! `(addr << 1) | 0x80` followed by a dummy byte and keeps the second reply
//! byte, a write sends `(addr << 1) & 0x7E` followed by the value. FIFO
//! transfers repeat (read) or prefix (write) the FIFO data address.

use log::trace;

use crate::transport::SpiBus;
use crate::{Error, Result};

/// FM175xx register map, named after the datasheet
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Command = 0x01,
    ComIEn = 0x02,
    DivIEn = 0x03,
    ComIrq = 0x04,
    DivIrq = 0x05,
    Error = 0x06,
    Status1 = 0x07,
    Status2 = 0x08,
    FifoData = 0x09,
    FifoLevel = 0x0A,
    WaterLevel = 0x0B,
    Control = 0x0C,
    BitFraming = 0x0D,
    Coll = 0x0E,
    Mode = 0x11,
    TxMode = 0x12,
    RxMode = 0x13,
    TxControl = 0x14,
    TxAuto = 0x15,
    TxSel = 0x16,
    RxSel = 0x17,
    RxThreshold = 0x18,
    Demod = 0x19,
    MfTx = 0x1C,
    MfRx = 0x1D,
    TypeB = 0x1E,
    SerialSpeed = 0x1F,
    CrcMsb = 0x21,
    CrcLsb = 0x22,
    GsNOff = 0x23,
    ModWidth = 0x24,
    RfCfg = 0x26,
    GsNOn = 0x27,
    CwGsP = 0x28,
    ModGsP = 0x29,
    TMode = 0x2A,
    TPrescaler = 0x2B,
    TReloadMsb = 0x2C,
    TReloadLsb = 0x2D,
    TCounterMsb = 0x2E,
    TCounterLsb = 0x2F,
    TestSel1 = 0x31,
    TestSel2 = 0x32,
    TestPinEn = 0x33,
    TestPinValue = 0x34,
    TestBus = 0x35,
    TestCtrl = 0x36,
    Version = 0x37,
    TestDac1 = 0x39,
    TestDac2 = 0x3A,
    TestAdc = 0x3B,
}

impl Register {
    /// Six-bit register address
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Bit masks of the registers the driver touches
#[allow(missing_docs)]
pub mod bits {
    pub const IRQ_TIMER: u8 = 0x01;
    pub const IRQ_ERR: u8 = 0x02;
    pub const IRQ_LO_ALERT: u8 = 0x04;
    pub const IRQ_HI_ALERT: u8 = 0x08;
    pub const IRQ_IDLE: u8 = 0x10;
    pub const IRQ_RX: u8 = 0x20;
    pub const IRQ_TX: u8 = 0x40;
    pub const IRQ_ALL: u8 = 0x7F;
    /// Set1 bit of the IRQ registers: 1 sets the marked flags, 0 clears them
    pub const IRQ_SET1: u8 = 0x80;

    pub const COM_IEN_IRQ_INV: u8 = 0x80;

    pub const ERR_COLL: u8 = 0x08;
    pub const COLL_POS_MASK: u8 = 0x1F;
    pub const COLL_VALUES_AFTER_COLL: u8 = 0x80;

    pub const FIFO_FLUSH: u8 = 0x80;
    pub const FIFO_LEVEL_MASK: u8 = 0x7F;

    pub const BIT_FRAMING_START_SEND: u8 = 0x80;
    pub const CONTROL_RX_LAST_BITS: u8 = 0x07;

    pub const CRC_EN: u8 = 0x80;
    pub const STATUS2_CRYPTO1_ON: u8 = 0x08;

    pub const TX_CONTROL_TX1_RF_EN: u8 = 0x01;
    pub const TX_CONTROL_TX2_RF_EN: u8 = 0x02;
    pub const TX_AUTO_FORCE_100_ASK: u8 = 0x40;

    pub const T_MODE_AUTO: u8 = 0x80;
}

/// Address byte of a register read frame
pub fn read_address(reg: Register) -> u8 {
    (reg.addr() << 1) | 0x80
}

/// Address byte of a register write frame
pub fn write_address(reg: Register) -> u8 {
    (reg.addr() << 1) & 0x7E
}

/// Register-level view of the chip on top of a [`SpiBus`].
pub struct RegisterBus {
    bus: Box<dyn SpiBus>,
}

impl RegisterBus {
    /// Wrap a bus; no traffic until the first access.
    pub fn new(bus: Box<dyn SpiBus>) -> Self {
        Self { bus }
    }

    fn exchange(&mut self, out: &[u8]) -> Result<Vec<u8>> {
        let reply = self.bus.transfer(out)?;
        if reply.len() != out.len() {
            return Err(Error::ChipComm(format!(
                "short transfer: sent {} bytes, received {}",
                out.len(),
                reply.len()
            )));
        }
        Ok(reply)
    }

    /// Read one register.
    pub fn read(&mut self, reg: Register) -> Result<u8> {
        let reply = self.exchange(&[read_address(reg), 0x00])?;
        trace!("read {:?} -> {:#04x}", reg, reply[1]);
        Ok(reply[1])
    }

    /// Write one register.
    pub fn write(&mut self, reg: Register, value: u8) -> Result<()> {
        trace!("write {:?} <- {:#04x}", reg, value);
        self.exchange(&[write_address(reg), value])?;
        Ok(())
    }

    /// Read-modify-write: set or clear the bits of `mask`.
    pub fn modify(&mut self, reg: Register, mask: u8, set: bool) -> Result<()> {
        let value = self.read(reg)?;
        let value = if set { value | mask } else { value & !mask };
        self.write(reg, value)
    }

    /// Drain `len` bytes from the FIFO in a single transaction.
    pub fn fifo_read(&mut self, len: usize) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let mut frame = vec![read_address(Register::FifoData); len];
        frame.push(0x00);
        let reply = self.exchange(&frame)?;
        let data = reply[1..=len].to_vec();
        trace!("fifo read {}", crate::utils::bytes_to_hex(&data));
        Ok(data)
    }

    /// Push `data` into the FIFO in a single transaction.
    pub fn fifo_write(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        trace!("fifo write {}", crate::utils::bytes_to_hex(data));
        let mut frame = Vec::with_capacity(data.len() + 1);
        frame.push(write_address(Register::FifoData));
        frame.extend_from_slice(data);
        self.exchange(&frame)?;
        Ok(())
    }

    /// Enable/disable CRC generation on transmitted frames.
    pub fn set_send_crc(&mut self, enabled: bool) -> Result<()> {
        self.modify(Register::TxMode, bits::CRC_EN, enabled)
    }

    /// Enable/disable CRC checking on received frames.
    pub fn set_recv_crc(&mut self, enabled: bool) -> Result<()> {
        self.modify(Register::RxMode, bits::CRC_EN, enabled)
    }
}
