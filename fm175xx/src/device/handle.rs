// fm175xx/src/device/handle.rs

//! The reader handle.

use std::thread;

use log::{debug, warn};

use crate::device::command::CommandDescriptor;
use crate::device::config::ReaderConfig;
use crate::device::executor;
use crate::device::register::{Register, RegisterBus, bits};
use crate::transport::{ResetPin, SpiBus};
use crate::types::{CarrierWave, ChipType};
use crate::utils::ms;
use crate::{Error, Result};

/// Reader handle bound to one bus and one reset line.
///
/// Owns the chip exclusively. Card access happens between
/// [`start_session`](Self::start_session) and
/// [`end_session`](Self::end_session), which switch the RF field on and off.
pub struct Fm175xx {
    regs: RegisterBus,
    reset_pin: Box<dyn ResetPin>,
    config: ReaderConfig,
    carrier: CarrierWave,
    in_session: bool,
}

impl Fm175xx {
    /// Hard-reset the chip and, if configured, check its version register.
    pub fn new(
        bus: Box<dyn SpiBus>,
        reset_pin: Box<dyn ResetPin>,
        config: ReaderConfig,
    ) -> Result<Self> {
        let mut reader = Self {
            regs: RegisterBus::new(bus),
            reset_pin,
            config,
            carrier: CarrierWave::Off,
            in_session: false,
        };
        reader.hard_reset()?;

        if reader.config.verify_chip {
            if let ChipType::Unknown(version) = reader.chip_type()? {
                return Err(Error::ChipType(version));
            }
        }
        debug!("{}: reader ready", reader.config.name);
        Ok(reader)
    }

    /// Pulse the reset line: low, wait, high, wait.
    pub fn hard_reset(&mut self) -> Result<()> {
        let pulse = ms(self.config.reset_pulse_ms);
        self.reset_pin.set_low()?;
        thread::sleep(pulse);
        self.reset_pin.set_high()?;
        thread::sleep(pulse);
        self.carrier = CarrierWave::Off;
        self.in_session = false;
        Ok(())
    }

    /// Identify the chip from its version register.
    pub fn chip_type(&mut self) -> Result<ChipType> {
        let version = self.regs.read(Register::Version)?;
        Ok(ChipType::from_version(version))
    }

    /// Configuration the reader was built with.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Antenna drivers currently switched on.
    pub fn carrier_wave(&self) -> CarrierWave {
        self.carrier
    }

    /// Whether a session is open.
    pub fn in_session(&self) -> bool {
        self.in_session
    }

    /// Direct register access, for diagnostics.
    pub fn registers(&mut self) -> &mut RegisterBus {
        &mut self.regs
    }

    /// Switch the carrier on the selected antenna drivers.
    pub fn set_carrier_wave(&mut self, mode: CarrierWave) -> Result<()> {
        let (tx1, tx2) = match mode {
            CarrierWave::Off => (false, false),
            CarrierWave::Tx1 => (true, false),
            CarrierWave::Tx2 => (false, true),
            CarrierWave::Both => (true, true),
        };
        self.regs
            .modify(Register::TxControl, bits::TX_CONTROL_TX1_RF_EN, tx1)?;
        self.regs
            .modify(Register::TxControl, bits::TX_CONTROL_TX2_RF_EN, tx2)?;
        self.carrier = mode;
        Ok(())
    }

    /// Initialise the ISO14443-A front end and switch the field on.
    pub fn start_session(&mut self) -> Result<()> {
        self.init_reader_a()?;
        self.set_carrier_wave(CarrierWave::Both)?;
        self.in_session = true;
        debug!("{}: session started", self.config.name);
        Ok(())
    }

    /// Halt the selected card, if any, and switch the field off.
    pub fn end_session(&mut self) -> Result<()> {
        if let Err(e) = self.halt() {
            debug!("{}: halt at session end: {}", self.config.name, e);
        }
        self.set_carrier_wave(CarrierWave::Off)?;
        self.in_session = false;
        debug!("{}: session ended", self.config.name);
        Ok(())
    }

    /// Run a raw command through the executor.
    pub fn execute(&mut self, cmd: &mut CommandDescriptor) -> Result<Vec<u8>> {
        executor::execute(&mut self.regs, cmd, self.config.deadline_margin_ms)
    }

    /// Run `op` up to `retry_times` times; bus failures stop at once.
    pub(crate) fn with_retries<T>(
        &mut self,
        what: &str,
        mut op: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let attempts = self.config.retry_times.max(1);
        let mut last = Error::Generic;
        for attempt in 1..=attempts {
            match op(self) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_bus_failure() => return Err(e),
                Err(e) => {
                    warn!(
                        "{}: {} failed (attempt {}/{}): {}",
                        self.config.name, what, attempt, attempts, e
                    );
                    last = e;
                }
            }
        }
        Err(last)
    }

    pub(crate) fn warn_outside_session(&self, operation: &str) {
        if !self.in_session {
            warn!(
                "{}: {} called outside a session; the RF field may be off",
                self.config.name, operation
            );
        }
    }
}
