// fm175xx/src/device/mod.rs

//! Chip-level driver: registers, timer, command executor and the reader
//! handle.

pub mod builder;
pub mod command;
pub mod config;
pub(crate) mod executor;
pub mod handle;
pub mod register;
pub mod timer;

pub use builder::ReaderBuilder;
pub use command::{ChipCommand, CommandDescriptor};
pub use config::ReaderConfig;
pub use handle::Fm175xx;
pub use register::{Register, RegisterBus};
pub use timer::TimerSetting;
