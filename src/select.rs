//! Chip-select arbitration
//!
//! Every bus session is bracketed by asserting one enable (chip-select) line and
//! deasserting it again. Enable lines on the AD910x are active-low.
//!
//! - [`SingleSelector`]: one device, one line, no arbitration needed
//! - [`DualSelector`]: two devices sharing one bus; exactly one line may be
//!   active at any instant
//!
//! With two chips the reset and trigger lines are shared, so enable-line
//! arbitration is the only way to aim a transfer at a specific chip.

use crate::Error;
use embedded_hal::digital::OutputPin;

/// Identifies one of the two chips in the dual topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceId {
    /// Device 1 (first enable line)
    First,
    /// Device 2 (second enable line)
    Second,
}

impl From<bool> for DeviceId {
    /// `false` selects device 1, `true` selects device 2
    fn from(second: bool) -> Self {
        if second { Self::Second } else { Self::First }
    }
}

/// Asserts and releases enable lines around a bus session
pub trait DeviceSelector {
    /// What a session is aimed at: `()` for one device, [`DeviceId`] for two
    type Target: Copy;

    /// Assert the enable line of `target`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] if a session is already open, or
    /// [`Error::Pin`] if the line cannot be driven.
    fn select<E>(&mut self, target: Self::Target) -> Result<(), Error<E>>;

    /// Drive every enable line inactive
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    fn deselect_all<E>(&mut self) -> Result<(), Error<E>>;

    /// Currently selected target, if a session is open
    fn selected(&self) -> Option<Self::Target>;
}

/// Enable-line control for a single device
pub struct SingleSelector<CS> {
    cs: CS,
    active: bool,
}

impl<CS: OutputPin> SingleSelector<CS> {
    /// Take ownership of the enable line
    pub const fn new(cs: CS) -> Self {
        Self { cs, active: false }
    }

    /// Consume the selector and return the enable line
    pub fn release(self) -> CS {
        self.cs
    }
}

impl<CS: OutputPin> DeviceSelector for SingleSelector<CS> {
    type Target = ();

    fn select<E>(&mut self, (): ()) -> Result<(), Error<E>> {
        if self.active {
            return Err(Error::InvariantViolation);
        }
        self.cs.set_low().map_err(|_| Error::Pin)?;
        self.active = true;
        Ok(())
    }

    fn deselect_all<E>(&mut self) -> Result<(), Error<E>> {
        self.cs.set_high().map_err(|_| Error::Pin)?;
        self.active = false;
        Ok(())
    }

    fn selected(&self) -> Option<()> {
        self.active.then_some(())
    }
}

/// Enable-line arbitration for two devices on one bus
///
/// Between sessions both lines are inactive. [`select`](DeviceSelector::select)
/// only ever drives the requested line, and refuses to do so while the other
/// device is still believed selected.
pub struct DualSelector<CS1, CS2> {
    cs1: CS1,
    cs2: CS2,
    active: Option<DeviceId>,
}

impl<CS1: OutputPin, CS2: OutputPin> DualSelector<CS1, CS2> {
    /// Take ownership of both enable lines
    ///
    /// The lines are not touched here; call
    /// [`deselect_all`](DeviceSelector::deselect_all) (done by
    /// [`Ad910xDual::configure`](crate::Ad910xDual::configure)) before the first
    /// session.
    pub const fn new(cs1: CS1, cs2: CS2) -> Self {
        Self {
            cs1,
            cs2,
            active: None,
        }
    }

    /// Consume the selector and return both enable lines
    pub fn release(self) -> (CS1, CS2) {
        (self.cs1, self.cs2)
    }
}

impl<CS1: OutputPin, CS2: OutputPin> DeviceSelector for DualSelector<CS1, CS2> {
    type Target = DeviceId;

    fn select<E>(&mut self, target: DeviceId) -> Result<(), Error<E>> {
        if self.active.is_some() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "select({}) refused: {} still selected",
                target,
                self.active
            );
            return Err(Error::InvariantViolation);
        }

        match target {
            DeviceId::First => self.cs1.set_low().map_err(|_| Error::Pin)?,
            DeviceId::Second => self.cs2.set_low().map_err(|_| Error::Pin)?,
        }

        self.active = Some(target);
        Ok(())
    }

    fn deselect_all<E>(&mut self) -> Result<(), Error<E>> {
        // Drive both even if the first fails
        let first = self.cs1.set_high();
        let second = self.cs2.set_high();
        first.map_err(|_| Error::Pin)?;
        second.map_err(|_| Error::Pin)?;

        self.active = None;
        Ok(())
    }

    fn selected(&self) -> Option<DeviceId> {
        self.active
    }
}
