//! Reset and pattern-trigger lines
//!
//! Both lines sit outside the serial protocol. In the dual topology they are
//! wired to both chips, so one reset pulse or one trigger edge acts on both
//! devices at once; only the enable lines are per-device.

use crate::{Error, RESET_PULSE_US};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Reset (`RESETB`) and trigger (`TRIGGERB`) lines, both active-low
pub struct SharedControl<RST, TRG> {
    reset: RST,
    trigger: TRG,
}

impl<RST: OutputPin, TRG: OutputPin> SharedControl<RST, TRG> {
    /// Take ownership of the reset and trigger lines
    ///
    /// Reset is released (high) and the trigger is driven high so pattern
    /// generation stays stopped until [`start_pattern`](Self::start_pattern).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if either line cannot be driven.
    pub fn new<E>(mut reset: RST, mut trigger: TRG) -> Result<Self, Error<E>> {
        reset.set_high().map_err(|_| Error::Pin)?;
        trigger.set_high().map_err(|_| Error::Pin)?;
        Ok(Self { reset, trigger })
    }

    /// Pulse reset low for [`RESET_PULSE_US`] to restore power-on register defaults
    ///
    /// Blocks for the pulse width. There is no feedback from the chip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn reset<D: DelayNs, E>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.reset.set_low().map_err(|_| Error::Pin)?;
        delay.delay_us(RESET_PULSE_US);
        self.reset.set_high().map_err(|_| Error::Pin)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("AD910x reset pulse ({} us)", RESET_PULSE_US);

        Ok(())
    }

    /// Drive the trigger low: start pattern generation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn start_pattern<E>(&mut self) -> Result<(), Error<E>> {
        self.trigger.set_low().map_err(|_| Error::Pin)
    }

    /// Drive the trigger high: stop pattern generation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the line cannot be driven.
    pub fn stop_pattern<E>(&mut self) -> Result<(), Error<E>> {
        self.trigger.set_high().map_err(|_| Error::Pin)
    }

    /// Consume the control block and return the reset and trigger lines
    pub fn release(self) -> (RST, TRG) {
        (self.reset, self.trigger)
    }
}
