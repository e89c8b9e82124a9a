// fm175xx/src/error.rs

//! Error type shared by every layer of the driver.

use thiserror::Error;

/// 共通エラー型
///
/// Every variant is recoverable: callers retry the exchange or give up on
/// the card. [`Error::code`] maps each variant onto the numeric codes used
/// by the reader firmware so exporters can keep reporting numbers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Failure with no more specific category
    #[error("generic reader error")]
    Generic,

    /// Argument outside the range an operation accepts
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Version register holds an unsupported value
    #[error("unexpected chip version: {0:#04x}")]
    ChipType(u8),

    /// SPI transfer or reset line failed
    #[error("bus transfer failed: {0}")]
    ChipComm(String),

    /// Chip timer expired before the card answered
    #[error("card timer expired")]
    Timer,

    /// Reply or buffer length differs from what was expected
    #[error("invalid reply length: expected {expected}, got {actual}")]
    Length {
        /// Length the operation needed
        expected: usize,
        /// Length it got
        actual: usize,
    },

    /// Chip reported framing, parity or CRC trouble
    #[error("card communication error: error register={error_flags:#04x}")]
    Comm {
        /// Error register content
        error_flags: u8,
    },

    /// MIFARE Classic authentication rejected
    #[error("authentication failed for sector {sector}")]
    Auth {
        /// Sector whose key was rejected
        sector: u8,
    },

    /// No card answered WUPA
    #[error("wake-up failed: no card answered")]
    Wakeup,

    /// Anticollision failed; `position` is the first colliding bit or 0
    #[error("collision detected at bit {position}")]
    Collision {
        /// First colliding bit, 0 when unknown
        position: u8,
    },

    /// Select at cascade level `level` failed
    #[error("select failed at cascade level {level}")]
    Select {
        /// Cascade level number, 1 to 3
        level: u8,
    },

    /// Activation aborted, e.g. on a reserved UID size
    #[error("activation failed: {0}")]
    Activate(String),

    /// Card still answers after HLTA
    #[error("halt failed: card still responding")]
    Halt,

    /// Block or page read failed
    #[error("read failed at block/page {0}")]
    Read(u8),

    /// Block write was not acknowledged
    #[error("write failed at block {0}")]
    Write(u8),
}

impl Error {
    /// Numeric code of the error (0 is reserved for success).
    pub fn code(&self) -> i32 {
        match self {
            Error::Generic => -1,
            Error::InvalidParameter(_) => -2,
            Error::ChipType(_) => -10,
            Error::ChipComm(_) => -11,
            Error::Timer => -20,
            Error::Length { .. } => -21,
            Error::Comm { .. } => -22,
            Error::Auth { .. } => -23,
            Error::Wakeup => -24,
            Error::Collision { .. } => -25,
            Error::Select { .. } => -26,
            Error::Activate(_) => -27,
            Error::Halt => -28,
            Error::Read(_) => -29,
            Error::Write(_) => -30,
        }
    }

    /// True for failures of the bus itself rather than of the card exchange.
    pub fn is_bus_failure(&self) -> bool {
        matches!(self, Error::ChipComm(_))
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
