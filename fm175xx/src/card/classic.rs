// fm175xx/src/card/classic.rs

//! MIFARE Classic 1K: Crypto1 authentication, block read/write and the
//! full-card dump.

use log::debug;

use crate::constants::{
    M1_BLOCKS_PER_SECTOR, M1_BYTES_PER_BLOCK, M1_EEPROM_SIZE, M1_SECTORS, MF_ACK, MF_CMD_READ,
    MF_CMD_WRITE,
};
use crate::device::Fm175xx;
use crate::device::command::CommandDescriptor;
use crate::device::register::{Register, bits};
use crate::protocol::stage_error;
use crate::types::{AuthMode, MifareKey, TagAuthentication, Uid};
use crate::{Error, Result};

/// Data blocks per sector; the last block is the trailer
const DATA_BLOCKS_PER_SECTOR: usize = M1_BLOCKS_PER_SECTOR - 1;

impl Fm175xx {
    /// Authenticate `sector` with `key`.
    ///
    /// Success is taken from the Crypto1 status bit, not from the command
    /// outcome alone.
    pub fn authenticate(
        &mut self,
        mode: AuthMode,
        sector: u8,
        key: &MifareKey,
        uid: &Uid,
    ) -> Result<()> {
        if usize::from(sector) >= M1_SECTORS {
            return Err(Error::InvalidParameter(format!("no sector {}", sector)));
        }
        let mut request = Vec::with_capacity(12);
        request.push(mode.command());
        request.push(sector * M1_BLOCKS_PER_SECTOR as u8);
        request.extend_from_slice(key.as_bytes());
        request.extend_from_slice(&uid.auth_bytes());

        self.exchange(CommandDescriptor::authenticate(&request))
            .map_err(stage_error(Error::Auth { sector }))?;
        let status = self.registers().read(Register::Status2)?;
        if status & bits::STATUS2_CRYPTO1_ON == 0 {
            return Err(Error::Auth { sector });
        }
        Ok(())
    }

    /// Read one 16-byte block of an authenticated sector.
    pub fn read_block(&mut self, block: u8) -> Result<[u8; M1_BYTES_PER_BLOCK]> {
        self.read_window(block)
    }

    /// 16 bytes starting at `addr`; shared by Classic blocks and
    /// Ultralight page windows.
    pub(crate) fn read_window(&mut self, addr: u8) -> Result<[u8; M1_BYTES_PER_BLOCK]> {
        let cmd = CommandDescriptor::transceive(&[MF_CMD_READ, addr], M1_BYTES_PER_BLOCK)
            .with_crc(true, true);
        let data = self.exchange(cmd).map_err(stage_error(Error::Read(addr)))?;
        let mut block = [0u8; M1_BYTES_PER_BLOCK];
        block.copy_from_slice(&data);
        Ok(block)
    }

    /// Write one 16-byte block: command, ACK, payload, ACK.
    pub fn write_block(&mut self, block: u8, data: &[u8; M1_BYTES_PER_BLOCK]) -> Result<()> {
        self.expect_ack(&[MF_CMD_WRITE, block], block)?;
        self.expect_ack(data, block)
    }

    fn expect_ack(&mut self, frame: &[u8], block: u8) -> Result<()> {
        let mut cmd = CommandDescriptor::transceive(frame, 1)
            .with_crc(true, false)
            .with_timeout(self.config().command_timeout_us);
        let reply = self
            .execute(&mut cmd)
            .map_err(stage_error(Error::Write(block)))?;
        if cmd.bits_received != 4 || reply[0] & 0x0F != MF_ACK {
            debug!("block {}: NAK {:#04x}", block, reply[0]);
            return Err(Error::Write(block));
        }
        Ok(())
    }

    /// Dump all 16 sectors into a 1024-byte image.
    ///
    /// Trailers are rebuilt from `keys` (key A, access bits, key B) rather
    /// than read back. Any step exhausting its retries aborts the dump.
    pub fn read_classic_card(
        &mut self,
        uid: &Uid,
        mode: AuthMode,
        keys: &TagAuthentication,
    ) -> Result<Vec<u8>> {
        self.warn_outside_session("read_mifare_classic");
        let mut image = Vec::with_capacity(M1_EEPROM_SIZE);
        for sector in 0..M1_SECTORS {
            let key = keys
                .key(mode, sector)
                .ok_or_else(|| Error::InvalidParameter(format!("no key for sector {}", sector)))?;
            let sector = sector as u8;
            self.with_retries("authenticate", |r| r.authenticate(mode, sector, key, uid))?;

            for offset in 0..DATA_BLOCKS_PER_SECTOR {
                let block = sector * M1_BLOCKS_PER_SECTOR as u8 + offset as u8;
                let data = self.with_retries("read block", |r| r.read_block(block))?;
                image.extend_from_slice(&data);
            }

            let trailer = keys
                .trailer(usize::from(sector))
                .ok_or_else(|| Error::InvalidParameter(format!("no trailer for sector {}", sector)))?;
            image.extend_from_slice(&trailer);
        }
        debug!("read {} bytes of MIFARE Classic data", image.len());
        Ok(image)
    }
}
