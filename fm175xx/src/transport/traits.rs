// fm175xx/src/transport/traits.rs

//! Hardware seams the driver is written against.

use crate::Result;

/// SpiBus abstracts the full-duplex byte exchange with the reader chip
/// away from register and protocol logic.
pub trait SpiBus {
    /// Clock `data` out while clocking the same number of bytes in.
    fn transfer(&mut self, data: &[u8]) -> Result<Vec<u8>>;
}

/// ResetPin drives the chip's hard-reset line.
pub trait ResetPin {
    /// Release the chip from reset.
    fn set_high(&mut self) -> Result<()>;

    /// Hold the chip in reset.
    fn set_low(&mut self) -> Result<()>;
}

/// Reset line for boards that tie the chip's reset input high.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResetPin;

impl ResetPin for NoResetPin {
    fn set_high(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        Ok(())
    }
}
