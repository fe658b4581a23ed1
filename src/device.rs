//! High-level driver API for the AD9102/AD9106
//!
//! This module provides the register and pattern-memory protocol on top of a
//! bus session, for both board topologies:
//!
//! - [`Ad910x`]: one chip with its own enable, reset and trigger lines
//! - [`Ad910xDual`]: two chips sharing the bus, the reset line and the trigger
//!   line, each with its own enable line. Transfers go through a
//!   [`DeviceHandle`] obtained from [`Ad910xDual::device`].
//!
//! Both implement [`DeviceBus`], which carries every protocol operation.
//!
//! # Example
//!
//! ```ignore
//! use ad910x::{Ad910x, BusConfig, DeviceBus, SpiTransport};
//!
//! let mut dac = Ad910x::new(SpiTransport::new(spi), csb, resetb, triggerb, delay)?;
//! dac.init(&BusConfig::default())?;
//!
//! dac.write_block(&pattern)?;
//! for readback in dac.write_register_table(&register_values)? {
//!     println!("{readback}");
//! }
//! dac.start_pattern()?;
//! ```

use crate::bus::{BusConfig, Transport};
use crate::control::SharedControl;
use crate::interface::{RegisterPort, run_session};
use crate::registers::{self, Ad910xRegisters, REGISTER_COUNT, REGISTER_MAP};
use crate::select::{DeviceId, DeviceSelector, DualSelector, SingleSelector};
use crate::sram::{self, SramReader};
use crate::{Error, READ_FLAG};
use core::fmt;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Register read back right after it was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readback {
    /// Register address
    pub address: u16,
    /// Value that was written
    pub written: u16,
    /// Value the chip returned
    pub read: u16,
}

impl Readback {
    /// Did the chip return what was written?
    ///
    /// Self-clearing and status bits (e.g. `RAMUPDATE`) legitimately differ.
    pub const fn matches(&self) -> bool {
        self.written == self.read
    }
}

impl fmt::Display for Readback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}, 0x{:04X}", self.address, self.read)
    }
}

/// Decoded `PAT_STATUS` register
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct PatternStatus {
    /// Pattern generation enabled
    pub run: bool,
    /// Pattern currently being played
    pub pattern_active: bool,
    /// SRAM is mapped onto the SPI port
    pub mem_access: bool,
    /// SRAM reads are enabled
    pub buf_read: bool,
}

/// One chip reachable over the shared bus
///
/// The only required method runs a single bus session; every register and
/// SRAM operation is built on it. [`Ad910x`] implements this directly, and in
/// the dual topology a [`DeviceHandle`] implements it for the chip it names.
pub trait DeviceBus {
    /// Error reported by the underlying transport
    type Error;

    /// Run one bus session with already-encoded words
    ///
    /// Clocks out `address_word` then `payload` and returns the word clocked in
    /// with the payload. No address validation is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or an enable line fails, or if another
    /// session is still open.
    fn transfer(&mut self, address_word: u16, payload: u16) -> Result<u16, Error<Self::Error>>;

    /// Write a 16-bit value to a register or SRAM address
    ///
    /// No read-back is performed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `address` is neither in
    /// [`REGISTER_MAP`] nor in pattern SRAM, or a bus error.
    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Error<Self::Error>> {
        if !registers::is_valid(address) {
            return Err(Error::InvalidArgument);
        }
        self.transfer(address, value)?;
        Ok(())
    }

    /// Read a 16-bit value from a register or SRAM address
    ///
    /// The address word is sent with bit 15 set; the payload word is `0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `address` is neither in
    /// [`REGISTER_MAP`] nor in pattern SRAM, or a bus error.
    fn read_register(&mut self, address: u16) -> Result<u16, Error<Self::Error>> {
        if !registers::is_valid(address) {
            return Err(Error::InvalidArgument);
        }
        self.transfer(address | READ_FLAG, 0)
    }

    /// Load pattern SRAM from `samples`, starting at `0x6000`
    ///
    /// The transfer is bracketed by `PAT_STATUS = 0x0004` and
    /// `PAT_STATUS = 0x0000`. Each sample is sent as `sample << 2`. The closing
    /// write is issued even if a sample write fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `samples` is empty or longer than
    /// [`SRAM_DEPTH`](crate::SRAM_DEPTH), or a bus error.
    fn write_block(&mut self, samples: &[i16]) -> Result<(), Error<Self::Error>>
    where
        Self: Sized,
    {
        sram::write_block(self, samples)
    }

    /// Read `count` words of pattern SRAM, starting at `0x6000`
    ///
    /// Enters read streaming (`PAT_STATUS = 0x000C`) immediately; the returned
    /// reader performs one bus read per item and restores register mode when it
    /// is exhausted, finished or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` exceeds
    /// [`SRAM_DEPTH`](crate::SRAM_DEPTH), or a bus error from entering
    /// streaming mode.
    fn read_block(&mut self, count: u16) -> Result<SramReader<'_, Self>, Error<Self::Error>>
    where
        Self: Sized,
    {
        SramReader::new(self, count)
    }

    /// Write every register in [`REGISTER_MAP`] order, reading each one back
    ///
    /// `values[i]` is written to `REGISTER_MAP[i]`, and the register is read
    /// back before moving on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `values` does not hold exactly
    /// [`REGISTER_COUNT`] entries, or a bus error.
    fn write_register_table(
        &mut self,
        values: &[u16],
    ) -> Result<heapless::Vec<Readback, REGISTER_COUNT>, Error<Self::Error>> {
        if values.len() != REGISTER_COUNT {
            return Err(Error::InvalidArgument);
        }

        let mut readbacks = heapless::Vec::new();
        for (&address, &written) in REGISTER_MAP.iter().zip(values) {
            self.write_register(address, written)?;
            let read = self.read_register(address)?;

            let readback = Readback {
                address,
                written,
                read,
            };

            #[cfg(feature = "defmt")]
            {
                if !readback.matches() {
                    defmt::trace!(
                        "Register 0x{:04X}: wrote 0x{:04X}, read 0x{:04X}",
                        address,
                        written,
                        read
                    );
                }
            }

            readbacks
                .push(readback)
                .map_err(|_| Error::InvalidArgument)?;
        }

        Ok(readbacks)
    }

    /// Read and decode `PAT_STATUS`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn pattern_status(&mut self) -> Result<PatternStatus, Error<Self::Error>>
    where
        Self: Sized,
    {
        let mut regs = Ad910xRegisters::new(RegisterPort::new(self));
        let status = regs.pat_status().read()?;

        Ok(PatternStatus {
            run: status.run(),
            pattern_active: status.pattern(),
            mem_access: status.mem_access(),
            buf_read: status.buf_read(),
        })
    }

    /// Commit shadow registers to the active set (`RAMUPDATE`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn update_registers(&mut self) -> Result<(), Error<Self::Error>>
    where
        Self: Sized,
    {
        let mut regs = Ad910xRegisters::new(RegisterPort::new(self));
        regs.ram_update().write(|w| {
            w.set_update(true);
        })?;
        Ok(())
    }

    /// Restore power-on register defaults through `SPICONFIG`
    ///
    /// Unlike the reset line, this only affects the selected chip.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn soft_reset(&mut self) -> Result<(), Error<Self::Error>>
    where
        Self: Sized,
    {
        let mut regs = Ad910xRegisters::new(RegisterPort::new(self));
        regs.spi_config().write(|w| {
            w.set_reset(true);
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SPICONFIG soft reset issued");

        Ok(())
    }
}

/// Driver for a single AD910x
pub struct Ad910x<T, CS, RST, TRG, D> {
    transport: T,
    selector: SingleSelector<CS>,
    control: SharedControl<RST, TRG>,
    delay: D,
}

impl<T, CS, RST, TRG, D> Ad910x<T, CS, RST, TRG, D>
where
    T: Transport,
    CS: OutputPin,
    RST: OutputPin,
    TRG: OutputPin,
    D: DelayNs,
{
    /// Create a driver bound to its bus and lines
    ///
    /// The enable line is driven inactive, reset is released and the trigger is
    /// driven high (pattern stopped). The bus is not configured yet; call
    /// [`init`](Self::init) or [`configure`](Self::configure).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn new(
        transport: T,
        cs: CS,
        reset: RST,
        trigger: TRG,
        delay: D,
    ) -> Result<Self, Error<T::Error>> {
        let mut selector = SingleSelector::new(cs);
        selector.deselect_all::<T::Error>()?;

        Ok(Self {
            transport,
            selector,
            control: SharedControl::new::<T::Error>(reset, trigger)?,
            delay,
        })
    }

    /// Configure the bus and deselect the chip
    ///
    /// Also clears a session left open by a failed enable-line release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unsupported configuration, or a
    /// bus or line error.
    pub fn configure(&mut self, config: &BusConfig) -> Result<(), Error<T::Error>> {
        config.validate::<T::Error>()?;
        self.transport.configure(config)?;
        self.selector.deselect_all()
    }

    /// Configure the bus and pulse reset
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a line cannot be driven.
    pub fn init(&mut self, config: &BusConfig) -> Result<(), Error<T::Error>> {
        self.configure(config)?;
        self.reset()
    }

    /// Pulse the reset line, restoring power-on register defaults
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.control.reset(&mut self.delay)
    }

    /// Start pattern generation (trigger low)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn start_pattern(&mut self) -> Result<(), Error<T::Error>> {
        self.control.start_pattern()
    }

    /// Stop pattern generation (trigger high)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn stop_pattern(&mut self) -> Result<(), Error<T::Error>> {
        self.control.stop_pattern()
    }

    /// Consume the driver and return the transport, lines and delay
    pub fn release(self) -> (T, CS, RST, TRG, D) {
        let (reset, trigger) = self.control.release();
        (
            self.transport,
            self.selector.release(),
            reset,
            trigger,
            self.delay,
        )
    }
}

impl<T, CS, RST, TRG, D> DeviceBus for Ad910x<T, CS, RST, TRG, D>
where
    T: Transport,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = T::Error;

    fn transfer(&mut self, address_word: u16, payload: u16) -> Result<u16, Error<T::Error>> {
        run_session(
            &mut self.transport,
            &mut self.selector,
            &mut self.delay,
            (),
            address_word,
            payload,
        )
    }
}

/// Driver for two AD910x chips sharing one bus
///
/// The reset and trigger lines are shared: [`reset`](Self::reset),
/// [`start_pattern`](Self::start_pattern) and
/// [`stop_pattern`](Self::stop_pattern) act on both chips at once. Register and
/// SRAM access goes through [`device`](Self::device), which borrows the pair
/// mutably so two sessions can never overlap.
pub struct Ad910xDual<T, CS1, CS2, RST, TRG, D> {
    transport: T,
    selector: DualSelector<CS1, CS2>,
    control: SharedControl<RST, TRG>,
    delay: D,
}

impl<T, CS1, CS2, RST, TRG, D> Ad910xDual<T, CS1, CS2, RST, TRG, D>
where
    T: Transport,
    CS1: OutputPin,
    CS2: OutputPin,
    RST: OutputPin,
    TRG: OutputPin,
    D: DelayNs,
{
    /// Create a driver bound to the shared bus and lines
    ///
    /// Both enable lines are driven inactive before anything else, so no chip
    /// believes it is selected at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn new(
        transport: T,
        cs1: CS1,
        cs2: CS2,
        reset: RST,
        trigger: TRG,
        delay: D,
    ) -> Result<Self, Error<T::Error>> {
        let mut selector = DualSelector::new(cs1, cs2);
        selector.deselect_all::<T::Error>()?;

        Ok(Self {
            transport,
            selector,
            control: SharedControl::new::<T::Error>(reset, trigger)?,
            delay,
        })
    }

    /// Configure the bus and deselect both chips
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unsupported configuration, or a
    /// bus or line error.
    pub fn configure(&mut self, config: &BusConfig) -> Result<(), Error<T::Error>> {
        config.validate::<T::Error>()?;
        self.transport.configure(config)?;
        self.selector.deselect_all()
    }

    /// Configure the bus and pulse the shared reset line
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a line cannot be driven.
    pub fn init(&mut self, config: &BusConfig) -> Result<(), Error<T::Error>> {
        self.configure(config)?;
        self.reset()
    }

    /// Borrow one chip for register and SRAM access
    pub fn device(&mut self, id: DeviceId) -> DeviceHandle<'_, T, CS1, CS2, RST, TRG, D> {
        DeviceHandle { pair: self, id }
    }

    /// Chip whose enable line is currently asserted, if any
    ///
    /// Always `None` between operations.
    pub fn selected(&self) -> Option<DeviceId> {
        self.selector.selected()
    }

    /// Pulse the shared reset line (both chips)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.control.reset(&mut self.delay)
    }

    /// Start pattern generation on both chips (trigger low)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn start_pattern(&mut self) -> Result<(), Error<T::Error>> {
        self.control.start_pattern()
    }

    /// Stop pattern generation on both chips (trigger high)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn stop_pattern(&mut self) -> Result<(), Error<T::Error>> {
        self.control.stop_pattern()
    }

    /// Consume the driver and return the transport, lines and delay
    pub fn release(self) -> (T, CS1, CS2, RST, TRG, D) {
        let (cs1, cs2) = self.selector.release();
        let (reset, trigger) = self.control.release();
        (self.transport, cs1, cs2, reset, trigger, self.delay)
    }
}

/// One chip of an [`Ad910xDual`] pair
///
/// Every session asserts this chip's enable line only, and both lines are
/// inactive again before the next one starts.
pub struct DeviceHandle<'a, T, CS1, CS2, RST, TRG, D> {
    pair: &'a mut Ad910xDual<T, CS1, CS2, RST, TRG, D>,
    id: DeviceId,
}

impl<T, CS1, CS2, RST, TRG, D> DeviceHandle<'_, T, CS1, CS2, RST, TRG, D> {
    /// Which chip this handle addresses
    pub const fn id(&self) -> DeviceId {
        self.id
    }
}

impl<T, CS1, CS2, RST, TRG, D> DeviceBus for DeviceHandle<'_, T, CS1, CS2, RST, TRG, D>
where
    T: Transport,
    CS1: OutputPin,
    CS2: OutputPin,
    D: DelayNs,
{
    type Error = T::Error;

    fn transfer(&mut self, address_word: u16, payload: u16) -> Result<u16, Error<T::Error>> {
        let pair = &mut *self.pair;
        run_session(
            &mut pair.transport,
            &mut pair.selector,
            &mut pair.delay,
            self.id,
            address_word,
            payload,
        )
    }
}
