// fm175xx/src/test_support.rs

//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize the MockChip setup so tests across the crate
//! and the tests/ directory build readers the same way.
#![allow(dead_code)]

use crate::device::{Fm175xx, ReaderConfig};
use crate::transport::mock::{MockChip, MockPin, SimulatedCard};
use crate::Result;

/// Default configuration without the reset pulse delay.
#[doc(hidden)]
pub fn quick_config() -> ReaderConfig {
    ReaderConfig::default().with_reset_pulse_ms(0)
}

/// Reader over `chip` with a started session. The caller keeps its own
/// clone of the chip to inspect registers and frames.
#[doc(hidden)]
pub fn reader_over(chip: MockChip) -> Result<Fm175xx> {
    let mut reader = Fm175xx::new(Box::new(chip), Box::new(MockPin::new()), quick_config())?;
    reader.start_session()?;
    Ok(reader)
}

/// Convenience: a MockChip holding `card` and a reader in session over it.
#[doc(hidden)]
pub fn mock_reader(card: impl SimulatedCard + 'static) -> Result<(MockChip, Fm175xx)> {
    let chip = MockChip::with_card(card);
    let reader = reader_over(chip.clone())?;
    Ok((chip, reader))
}
