// fm175xx/src/device/command.rs

//! Command descriptors handed to the executor.

use crate::constants::FIFO_SIZE;
use crate::utils::DEFAULT_COMMAND_TIMEOUT_US;

/// Values of the chip's command register
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipCommand {
    /// Cancel the running command
    Idle = 0x00,
    /// Generate a random ID into the internal buffer
    GenRandomId = 0x02,
    /// Run the CRC coprocessor over the FIFO
    CalcCrc = 0x03,
    /// Send the FIFO content
    Transmit = 0x04,
    /// Change register bits without touching the running command
    NoCmdChange = 0x07,
    /// Activate the receiver
    Receive = 0x08,
    /// Send the FIFO, then receive the reply
    Transceive = 0x0C,
    /// MIFARE Classic three-pass authentication
    MfAuthent = 0x0E,
    /// Reset the chip
    SoftReset = 0x0F,
}

impl ChipCommand {
    /// Value written to the command register
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// One command execution: what to send, what to expect, and what came back.
///
/// Built fresh for every exchange. The executor fills in the counters,
/// the collision position and the error flags; the received bytes are
/// returned separately.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    /// Chip command to run
    pub command: ChipCommand,
    /// Append a CRC to the transmitted frame
    pub send_crc: bool,
    /// Check and strip the CRC of the received frame
    pub recv_crc: bool,
    /// Valid bits of the last transmitted byte (0 means all 8)
    pub bits_to_send: u8,
    /// First received bit position, for bit-oriented anticollision
    pub bits_to_recv: u8,
    /// Expected reply length; 0 accepts any length
    pub bytes_to_recv: usize,
    /// Value programmed into the chip timer
    pub timeout_us: u32,

    /// Valid bits of the last received byte (0 means all 8)
    pub bits_received: u8,
    /// Bytes drained from the FIFO so far
    pub bytes_received: usize,
    /// First colliding bit reported by the chip
    pub collision_position: u8,
    /// Error register content after a protocol error
    pub error_flags: u8,

    pub(crate) send: Vec<u8>,
    pub(crate) recv: Vec<u8>,
}

impl CommandDescriptor {
    fn new(command: ChipCommand, send: &[u8], bytes_to_recv: usize) -> Self {
        let capacity = if bytes_to_recv == 0 {
            FIFO_SIZE
        } else {
            bytes_to_recv
        };
        Self {
            command,
            send_crc: false,
            recv_crc: false,
            bits_to_send: 0,
            bits_to_recv: 0,
            bytes_to_recv,
            timeout_us: DEFAULT_COMMAND_TIMEOUT_US,
            bits_received: 0,
            bytes_received: 0,
            collision_position: 0,
            error_flags: 0,
            send: send.to_vec(),
            recv: vec![0; capacity],
        }
    }

    /// Transceive `send`, expecting `bytes_to_recv` bytes back (0: any).
    pub fn transceive(send: &[u8], bytes_to_recv: usize) -> Self {
        Self::new(ChipCommand::Transceive, send, bytes_to_recv)
    }

    /// MFAuthent with the whole request loaded up front.
    pub fn authenticate(send: &[u8]) -> Self {
        Self::new(ChipCommand::MfAuthent, send, 0)
    }

    /// Enable CRC generation on send and checking on receive.
    pub fn with_crc(mut self, send_crc: bool, recv_crc: bool) -> Self {
        self.send_crc = send_crc;
        self.recv_crc = recv_crc;
        self
    }

    /// Transmit only `bits` bits of the last byte (short frames).
    pub fn with_last_bits(mut self, bits: u8) -> Self {
        self.bits_to_send = bits & 0x07;
        self
    }

    /// Override the chip timer value for this exchange.
    pub fn with_timeout(mut self, timeout_us: u32) -> Self {
        self.timeout_us = timeout_us;
        self
    }

    /// Bytes still waiting to be pushed into the FIFO.
    pub fn pending_send(&self) -> &[u8] {
        &self.send
    }

    /// Receive buffer capacity.
    pub fn capacity(&self) -> usize {
        self.recv.len()
    }
}
