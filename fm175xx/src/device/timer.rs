// fm175xx/src/device/timer.rs

//! Timer programming: microseconds to prescaler/reload.

use crate::Result;
use crate::device::register::{Register, RegisterBus, bits};

/// Chip clock in kHz; one timer tick lasts `(2 * prescaler + 1)` clock periods.
const CLOCK_KHZ: u64 = 13_560;
const PRESCALER_MAX: u16 = 0x0FFF;
const RELOAD_LIMIT: u64 = 0xFFFF;

/// Prescaler/reload pair for the chip timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSetting {
    /// 12-bit prescaler: the timer ticks every `2 * prescaler + 1` clocks
    pub prescaler: u16,
    /// 16-bit reload value counted down to zero
    pub reload: u16,
}

impl TimerSetting {
    /// Smallest prescaler whose reload fits in 16 bits.
    ///
    /// The search stops at 0xFFF; beyond roughly 39.5 ms the reload no
    /// longer fits and is truncated to its low 16 bits.
    pub fn from_micros(micros: u32) -> Self {
        let ticks = u64::from(micros.max(1)) * CLOCK_KHZ - 1;
        let mut prescaler: u16 = 0;
        let mut reload: u64 = 0;
        while prescaler < PRESCALER_MAX {
            reload = ticks / (2 * u64::from(prescaler) + 1);
            if reload < RELOAD_LIMIT {
                break;
            }
            prescaler += 1;
        }
        Self {
            prescaler,
            reload: (reload & RELOAD_LIMIT) as u16,
        }
    }

    /// TMode value: auto-start bit plus the prescaler's high nibble
    pub fn mode(&self) -> u8 {
        bits::T_MODE_AUTO | ((self.prescaler >> 8) as u8 & 0x0F)
    }

    /// Clock periods covered by the programmed timeout.
    pub fn clock_periods(&self) -> u64 {
        (u64::from(self.reload) + 1) * (2 * u64::from(self.prescaler) + 1)
    }
}

impl RegisterBus {
    /// Program the chip timer for a timeout of `micros` microseconds.
    pub fn set_timeout(&mut self, micros: u32) -> Result<()> {
        let setting = TimerSetting::from_micros(micros);
        self.write(Register::TMode, setting.mode())?;
        self.write(Register::TPrescaler, (setting.prescaler & 0xFF) as u8)?;
        self.write(Register::TReloadMsb, (setting.reload >> 8) as u8)?;
        self.write(Register::TReloadLsb, (setting.reload & 0xFF) as u8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockChip;
    use proptest::prelude::*;

    #[test]
    fn known_settings() {
        // 10us: 135599 ticks do not fit, prescaler 1 gives 135599 / 3
        assert_eq!(
            TimerSetting::from_micros(10),
            TimerSetting {
                prescaler: 1,
                reload: 45_199
            }
        );
        assert_eq!(
            TimerSetting::from_micros(1),
            TimerSetting {
                prescaler: 0,
                reload: 13_559
            }
        );
        assert_eq!(TimerSetting::from_micros(0), TimerSetting::from_micros(1));
    }

    #[test]
    fn oversized_timeouts_saturate_within_register_limits() {
        let setting = TimerSetting::from_micros(65_535);
        assert_eq!(setting.prescaler, 0x0FFF);
        assert_eq!(setting.mode(), 0x8F);
    }

    #[test]
    fn set_timeout_writes_timer_registers() {
        let chip = MockChip::new();
        let mut regs = RegisterBus::new(Box::new(chip.clone()));
        regs.set_timeout(5_000).unwrap();

        let setting = TimerSetting::from_micros(5_000);
        assert_eq!(chip.register(Register::TMode), setting.mode());
        assert_eq!(
            chip.register(Register::TPrescaler),
            (setting.prescaler & 0xFF) as u8
        );
        let reload = u16::from(chip.register(Register::TReloadMsb)) << 8
            | u16::from(chip.register(Register::TReloadLsb));
        assert_eq!(reload, setting.reload);
        assert_eq!(chip.register(Register::TMode) & 0x80, 0x80);
    }

    proptest! {
        #[test]
        fn timeout_roundtrips_within_one_tick(micros in 1u32..=39_000) {
            let setting = TimerSetting::from_micros(micros);
            let requested = u64::from(micros) * CLOCK_KHZ;
            let tick = 2 * u64::from(setting.prescaler) + 1;
            prop_assert!(setting.prescaler <= 0x0FFF);
            prop_assert!(setting.clock_periods() >= requested);
            prop_assert!(setting.clock_periods() - requested < tick);
        }
    }
}
