//! Timeout helpers used across the crate.

use std::time::Duration;

/// Timeout programmed into the chip timer for every protocol exchange.
pub const DEFAULT_COMMAND_TIMEOUT_US: u32 = 10;

/// Slack added on top of the command timeout before the poll loop gives up.
pub const DEFAULT_DEADLINE_MARGIN_MS: u64 = 50;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Soft deadline of one command execution.
///
/// The loop is bounded by `margin + timeout` in milliseconds, whatever the
/// chip reports, so a silent chip still yields a timer error.
pub fn command_deadline(timeout_us: u32, margin_ms: u64) -> Duration {
    ms(margin_ms + u64::from(timeout_us))
}
