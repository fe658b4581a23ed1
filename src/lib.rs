#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod control;
pub mod device;
pub mod interface;
pub mod registers;
pub mod select;
pub mod sram;

// Re-export main types
pub use bus::{BusConfig, ClockMode, SpiTransport, Transport};
pub use control::SharedControl;
pub use device::{Ad910x, Ad910xDual, DeviceBus, DeviceHandle, PatternStatus, Readback};
pub use interface::RegisterPort;
pub use registers::{REGISTER_COUNT, REGISTER_MAP, SRAM_BASE, SRAM_DEPTH};
pub use select::{DeviceId, DeviceSelector, DualSelector, SingleSelector};
pub use sram::{SramEntry, SramReader, StreamMode};

/// Minimum wait after a bus session before the bus may be reused, in microseconds
pub const SETTLE_DELAY_US: u32 = 1;

/// Minimum low time of the reset strobe, in microseconds
pub const RESET_PULSE_US: u32 = 10;

/// Address bit that turns a register access into a read
pub const READ_FLAG: u16 = 0x8000;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error on the serial bus
    Bus(E),
    /// A control or enable line could not be driven
    Pin,
    /// Argument outside the range the chip accepts (address, block length, table length)
    InvalidArgument,
    /// A device was selected while another session was still open
    InvariantViolation,
    /// Unsupported bus configuration
    InvalidConfig,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
