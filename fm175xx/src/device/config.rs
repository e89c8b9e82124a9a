// fm175xx/src/device/config.rs

//! Per-reader configuration.

use crate::utils::{DEFAULT_COMMAND_TIMEOUT_US, DEFAULT_DEADLINE_MARGIN_MS};

/// Log label of a reader without a configured name
pub const DEFAULT_READER_NAME: &str = "fm175xx";
/// Reset pulse length of the reader board
pub const DEFAULT_RESET_PULSE_MS: u64 = 300;
/// Attempts per step of a full-card read
pub const DEFAULT_RETRY_TIMES: usize = 3;

/// Tunables of one reader instance
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderConfig {
    /// Label used in log lines
    pub name: String,
    /// Low time and settle time of the hard-reset pulse
    pub reset_pulse_ms: u64,
    /// Attempts per authenticate, block and page step of a full-card read
    pub retry_times: usize,
    /// Timeout programmed into the chip timer for each exchange
    pub command_timeout_us: u32,
    /// Slack of the executor poll loop on top of the command timeout
    pub deadline_margin_ms: u64,
    /// Reject chips whose version register is not a known FM175xx
    pub verify_chip: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_READER_NAME.to_string(),
            reset_pulse_ms: DEFAULT_RESET_PULSE_MS,
            retry_times: DEFAULT_RETRY_TIMES,
            command_timeout_us: DEFAULT_COMMAND_TIMEOUT_US,
            deadline_margin_ms: DEFAULT_DEADLINE_MARGIN_MS,
            verify_chip: false,
        }
    }
}

impl ReaderConfig {
    /// Set the log label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the reset pulse length; 0 skips the wait, e.g. in tests.
    pub fn with_reset_pulse_ms(mut self, ms: u64) -> Self {
        self.reset_pulse_ms = ms;
        self
    }

    /// Set the attempts per read step.
    pub fn with_retry_times(mut self, retry_times: usize) -> Self {
        self.retry_times = retry_times;
        self
    }

    /// Check the version register at construction.
    pub fn with_verify_chip(mut self, verify: bool) -> Self {
        self.verify_chip = verify;
        self
    }
}
