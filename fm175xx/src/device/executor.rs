// fm175xx/src/device/executor.rs

//! Command executor.
//!
//! Primes the chip for one [`CommandDescriptor`], then polls the
//! communication IRQ register until a handler finishes the exchange or the
//! soft deadline passes. Handlers run in a fixed precedence order; the
//! order matters when several flags are raised at once.

use std::time::Instant;

use log::trace;

use crate::constants::FIFO_WATER_LEVEL;
use crate::device::command::{ChipCommand, CommandDescriptor};
use crate::device::register::{Register, RegisterBus, bits};
use crate::utils::command_deadline;
use crate::{Error, Result};

/// Outcome of one IRQ handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Done,
}

/// State carried across poll iterations
struct Exchange<'a> {
    cmd: &'a mut CommandDescriptor,
    send_finished: bool,
}

impl Exchange<'_> {
    fn is_auth(&self) -> bool {
        self.cmd.command == ChipCommand::MfAuthent
    }

    /// Append drained FIFO bytes to the receive buffer.
    fn store(&mut self, data: &[u8]) -> Result<()> {
        let start = self.cmd.bytes_received;
        let end = start + data.len();
        if end > self.cmd.recv.len() {
            return Err(Error::Length {
                expected: self.cmd.recv.len(),
                actual: end,
            });
        }
        self.cmd.recv[start..end].copy_from_slice(data);
        self.cmd.bytes_received = end;
        Ok(())
    }
}

type IrqHandler = fn(&mut RegisterBus, &mut Exchange<'_>) -> Result<Step>;

const HANDLERS: [(u8, IrqHandler); 7] = [
    (bits::IRQ_TIMER, on_timer),
    (bits::IRQ_ERR, on_protocol_error),
    (bits::IRQ_LO_ALERT, on_low_alert),
    (bits::IRQ_HI_ALERT, on_high_alert),
    (bits::IRQ_IDLE, on_idle),
    (bits::IRQ_RX, on_rx_done),
    (bits::IRQ_TX, on_tx_done),
];

fn on_timer(_regs: &mut RegisterBus, _ex: &mut Exchange<'_>) -> Result<Step> {
    Err(Error::Timer)
}

fn on_protocol_error(regs: &mut RegisterBus, ex: &mut Exchange<'_>) -> Result<Step> {
    let error_flags = regs.read(Register::Error)?;
    ex.cmd.error_flags = error_flags;
    if error_flags & bits::ERR_COLL != 0 {
        let position = regs.read(Register::Coll)? & bits::COLL_POS_MASK;
        ex.cmd.collision_position = position;
        return Err(Error::Collision { position });
    }
    Err(Error::Comm { error_flags })
}

fn on_low_alert(regs: &mut RegisterBus, ex: &mut Exchange<'_>) -> Result<Step> {
    if ex.cmd.send.is_empty() {
        return Ok(Step::Continue);
    }
    let chunk = ex.cmd.send.len().min(FIFO_WATER_LEVEL);
    let data: Vec<u8> = ex.cmd.send.drain(..chunk).collect();
    regs.fifo_write(&data)?;
    regs.modify(Register::BitFraming, bits::BIT_FRAMING_START_SEND, true)?;
    Ok(Step::Continue)
}

fn on_high_alert(regs: &mut RegisterBus, ex: &mut Exchange<'_>) -> Result<Step> {
    if !ex.send_finished {
        return Ok(Step::Continue);
    }
    let data = regs.fifo_read(FIFO_WATER_LEVEL)?;
    ex.store(&data)?;
    Ok(Step::Continue)
}

fn on_idle(_regs: &mut RegisterBus, ex: &mut Exchange<'_>) -> Result<Step> {
    if ex.is_auth() {
        return Ok(Step::Done);
    }
    Ok(Step::Continue)
}

fn on_rx_done(regs: &mut RegisterBus, ex: &mut Exchange<'_>) -> Result<Step> {
    if ex.is_auth() {
        return Ok(Step::Continue);
    }
    let last_bits = regs.read(Register::Control)? & bits::CONTROL_RX_LAST_BITS;
    let level = usize::from(regs.read(Register::FifoLevel)? & bits::FIFO_LEVEL_MASK);
    let data = regs.fifo_read(level)?;
    ex.store(&data)?;
    ex.cmd.bits_received = last_bits;

    let expected = ex.cmd.bytes_to_recv;
    if expected != 0 && ex.cmd.bytes_received != expected {
        return Err(Error::Length {
            expected,
            actual: ex.cmd.bytes_received,
        });
    }
    Ok(Step::Done)
}

fn on_tx_done(_regs: &mut RegisterBus, ex: &mut Exchange<'_>) -> Result<Step> {
    ex.send_finished = true;
    Ok(Step::Continue)
}

fn prime(regs: &mut RegisterBus, cmd: &mut CommandDescriptor) -> Result<()> {
    regs.write(Register::Command, ChipCommand::Idle.code())?;
    regs.write(Register::FifoLevel, bits::FIFO_FLUSH)?;
    regs.write(Register::ComIrq, bits::IRQ_ALL)?;
    regs.write(Register::DivIrq, bits::IRQ_ALL)?;
    regs.write(Register::ComIEn, bits::COM_IEN_IRQ_INV)?;
    regs.write(Register::DivIEn, 0x00)?;
    regs.write(Register::WaterLevel, FIFO_WATER_LEVEL as u8)?;
    regs.set_send_crc(cmd.send_crc)?;
    regs.set_recv_crc(cmd.recv_crc)?;
    regs.set_timeout(cmd.timeout_us)?;

    match cmd.command {
        ChipCommand::MfAuthent => {
            let request = std::mem::take(&mut cmd.send);
            regs.fifo_write(&request)?;
            regs.write(Register::Command, cmd.command.code())?;
            regs.write(
                Register::BitFraming,
                bits::BIT_FRAMING_START_SEND | cmd.bits_to_send,
            )?;
        }
        _ => {
            regs.write(Register::Command, cmd.command.code())?;
            regs.write(
                Register::BitFraming,
                (cmd.bits_to_recv << 4) | cmd.bits_to_send,
            )?;
        }
    }
    Ok(())
}

fn poll(regs: &mut RegisterBus, ex: &mut Exchange<'_>, margin_ms: u64) -> Result<()> {
    let deadline = command_deadline(ex.cmd.timeout_us, margin_ms);
    let start = Instant::now();
    loop {
        if start.elapsed() > deadline {
            return Err(Error::Timer);
        }
        let irq = regs.read(Register::ComIrq)?;
        for (flag, handler) in HANDLERS {
            if irq & flag == 0 {
                continue;
            }
            let step = handler(regs, ex);
            regs.write(Register::ComIrq, flag)?;
            if step? == Step::Done {
                return Ok(());
            }
        }
    }
}

/// Run one command on the chip and return the received bytes.
///
/// The descriptor's counters, collision position and error flags are
/// updated in place. The chip is returned to idle on every path.
pub(crate) fn execute(
    regs: &mut RegisterBus,
    cmd: &mut CommandDescriptor,
    margin_ms: u64,
) -> Result<Vec<u8>> {
    if !matches!(
        cmd.command,
        ChipCommand::Transceive | ChipCommand::MfAuthent
    ) {
        return Err(Error::InvalidParameter(format!(
            "unsupported chip command {:?}",
            cmd.command
        )));
    }

    let outcome = match prime(regs, cmd) {
        Ok(()) => {
            let mut ex = Exchange {
                cmd: &mut *cmd,
                send_finished: false,
            };
            poll(regs, &mut ex, margin_ms)
        }
        Err(e) => Err(e),
    };

    let cleanup = regs
        .modify(Register::BitFraming, bits::BIT_FRAMING_START_SEND, false)
        .and_then(|()| regs.write(Register::Command, ChipCommand::Idle.code()));

    trace!(
        "{:?} finished: {:?}, {} bytes / {} bits",
        cmd.command, outcome, cmd.bytes_received, cmd.bits_received
    );
    outcome?;
    cleanup?;

    assert!(
        cmd.bytes_received <= cmd.recv.len(),
        "receive bookkeeping overran the buffer"
    );
    Ok(cmd.recv[..cmd.bytes_received].to_vec())
}
