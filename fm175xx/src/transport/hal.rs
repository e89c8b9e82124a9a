// fm175xx/src/transport/hal.rs

//! embedded-hal 1.0 adapters for boards driving the chip directly.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::transport::traits::{ResetPin, SpiBus};
use crate::{Error, Result};

/// [`SpiBus`] over any embedded-hal `SpiDevice`; chip select is handled by
/// the device.
pub struct HalSpi<S> {
    spi: S,
}

impl<S: SpiDevice<u8>> HalSpi<S> {
    /// Take ownership of the SPI device.
    pub fn new(spi: S) -> Self {
        Self { spi }
    }

    /// Give the SPI device back.
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiDevice<u8>> SpiBus for HalSpi<S> {
    fn transfer(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let mut buf = data.to_vec();
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|e| Error::ChipComm(format!("{:?}", e)))?;
        Ok(buf)
    }
}

/// [`ResetPin`] over an embedded-hal `OutputPin`.
pub struct HalPin<P> {
    pin: P,
}

impl<P: OutputPin> HalPin<P> {
    /// Take ownership of the reset pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> ResetPin for HalPin<P> {
    fn set_high(&mut self) -> Result<()> {
        self.pin
            .set_high()
            .map_err(|e| Error::ChipComm(format!("reset pin: {:?}", e)))
    }

    fn set_low(&mut self) -> Result<()> {
        self.pin
            .set_low()
            .map_err(|e| Error::ChipComm(format!("reset pin: {:?}", e)))
    }
}
