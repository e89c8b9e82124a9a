// fm175xx/src/device/builder.rs

//! Builder for [`Fm175xx`] readers.

use crate::device::config::ReaderConfig;
use crate::device::handle::Fm175xx;
use crate::transport::{NoResetPin, ResetPin, SpiBus};
use crate::{Error, Result};

/// Helper to construct a reader from already-resolved bus and pin handles.
pub struct ReaderBuilder {
    bus: Option<Box<dyn SpiBus>>,
    reset_pin: Option<Box<dyn ResetPin>>,
    config: ReaderConfig,
}

impl ReaderBuilder {
    /// Builder with the default configuration and no bus.
    pub fn new() -> Self {
        Self {
            bus: None,
            reset_pin: None,
            config: ReaderConfig::default(),
        }
    }

    /// SPI bus the chip sits on.
    pub fn with_bus(mut self, bus: Box<dyn SpiBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Without a reset pin the hard reset only waits out the pulse.
    pub fn with_reset_pin(mut self, pin: Box<dyn ResetPin>) -> Self {
        self.reset_pin = Some(pin);
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder and bring the reader up.
    /// Requires a bus; otherwise returns InvalidParameter.
    pub fn build(self) -> Result<Fm175xx> {
        let bus = self
            .bus
            .ok_or_else(|| Error::InvalidParameter("reader needs an SPI bus".into()))?;
        let pin = self.reset_pin.unwrap_or_else(|| Box::new(NoResetPin));
        Fm175xx::new(bus, pin, self.config)
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
