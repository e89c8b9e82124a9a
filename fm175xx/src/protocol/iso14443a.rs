// fm175xx/src/protocol/iso14443a.rs

//! ISO14443-A activation: wake-up, anticollision, select and halt.
//!
//! Each stage is one executor run. Card-side failures are reported with
//! the stage's own error; bus failures pass through untouched.

use log::debug;

use crate::card::ScanResult;
use crate::constants::{
    RF_ANTICOLL_NVB, RF_CASCADE_TAG, RF_CMD_HALT, RF_CMD_WUPA, RF_SELECT_NVB,
};
use crate::device::Fm175xx;
use crate::device::command::CommandDescriptor;
use crate::device::register::{Register, bits};
use crate::protocol::stage_error;
use crate::types::{CascadeLevel, TagType, Uid};
use crate::{Error, Result};

impl Fm175xx {
    /// Program the ISO14443-A front end: framing, modulation and receiver
    /// defaults. Runs once per session.
    pub fn init_reader_a(&mut self) -> Result<()> {
        let regs = self.registers();
        regs.write(Register::TxMode, 0x00)?;
        regs.write(Register::RxMode, 0x08)?;
        regs.modify(Register::TxAuto, bits::TX_AUTO_FORCE_100_ASK, true)?;
        regs.write(Register::ModWidth, 0x26)?;
        regs.write(Register::Control, 0x10)?;
        regs.write(Register::GsNOn, 0xF0)?;
        regs.write(Register::CwGsP, 0x3F)?;
        regs.write(Register::RfCfg, 0x60)?;
        regs.write(Register::RxThreshold, 0x84)?;
        regs.modify(Register::Status2, bits::STATUS2_CRYPTO1_ON, false)?;
        Ok(())
    }

    pub(crate) fn exchange(&mut self, cmd: CommandDescriptor) -> Result<Vec<u8>> {
        let mut cmd = cmd.with_timeout(self.config().command_timeout_us);
        self.execute(&mut cmd)
    }

    /// Send WUPA (7 bits) and return the ATQA.
    pub fn wakeup(&mut self) -> Result<[u8; 2]> {
        let cmd = CommandDescriptor::transceive(&[RF_CMD_WUPA], 2).with_last_bits(7);
        let atqa = self.exchange(cmd).map_err(stage_error(Error::Wakeup))?;
        Ok([atqa[0], atqa[1]])
    }

    /// Run one anticollision round; returns the 4-byte UID part and its BCC.
    pub fn anticollision(&mut self, level: CascadeLevel) -> Result<([u8; 4], u8)> {
        let cmd = CommandDescriptor::transceive(&[level.command(), RF_ANTICOLL_NVB], 5);
        let reply = self.exchange(cmd);
        self.registers()
            .modify(Register::Coll, bits::COLL_VALUES_AFTER_COLL, true)?;
        let reply = reply.map_err(|e| match e {
            Error::Collision { .. } => e,
            other => stage_error(Error::Collision { position: 0 })(other),
        })?;

        // UID part and BCC XOR to zero on an undisturbed reply
        if reply.iter().fold(0u8, |acc, b| acc ^ b) != 0 {
            debug!("anticollision level {}: bad BCC in {:02X?}", level.number(), reply);
            return Err(Error::Collision { position: 0 });
        }
        Ok(([reply[0], reply[1], reply[2], reply[3]], reply[4]))
    }

    /// Select the UID part at `level`; returns the SAK.
    pub fn select(&mut self, level: CascadeLevel, part: [u8; 4], bcc: u8) -> Result<u8> {
        let mut frame = vec![level.command(), RF_SELECT_NVB];
        frame.extend_from_slice(&part);
        frame.push(bcc);
        let cmd = CommandDescriptor::transceive(&frame, 1).with_crc(true, true);
        let sak = self.exchange(cmd).map_err(stage_error(Error::Select {
            level: level.number(),
        }))?;
        Ok(sak[0])
    }

    /// Send HLTA. A card that went silent times the exchange out, which
    /// is the success case; any reply means the card did not halt.
    pub fn halt(&mut self) -> Result<()> {
        let cmd = CommandDescriptor::transceive(&RF_CMD_HALT, 0).with_crc(true, true);
        match self.exchange(cmd) {
            Err(Error::Timer) => Ok(()),
            Err(e) if e.is_bus_failure() => Err(e),
            _ => Err(Error::Halt),
        }
    }

    /// Full activation: wake-up, then anticollision and select for every
    /// cascade level announced by the ATQA.
    pub fn activate(&mut self) -> Result<ScanResult> {
        self.warn_outside_session("scan");
        let atqa = self.wakeup()?;
        let deepest = CascadeLevel::from_atqa(atqa).ok_or_else(|| {
            Error::Activate(format!(
                "reserved UID size in ATQA {:02X}{:02X}",
                atqa[0], atqa[1]
            ))
        })?;

        let mut uid = Vec::with_capacity(10);
        let mut bcc = Vec::with_capacity(3);
        let mut sak = Vec::with_capacity(3);
        for &level in deepest.path() {
            let (part, check) = self.anticollision(level)?;
            let level_sak = self.select(level, part, check)?;

            if level != deepest && part[0] == RF_CASCADE_TAG {
                uid.extend_from_slice(&part[1..]);
            } else {
                uid.extend_from_slice(&part);
            }
            bcc.push(check);
            sak.push(level_sak);
        }

        let uid = Uid::try_from(uid.as_slice())
            .map_err(|_| Error::Activate(format!("unexpected UID length {}", uid.len())))?;
        let result = ScanResult {
            tag_type: TagType::from_sak(&sak),
            uid,
            atqa,
            bcc,
            sak,
        };
        debug!("activated {} ({})", result.uid.to_hex(), result.tag_type.readable_name());
        Ok(result)
    }
}
