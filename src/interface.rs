//! Bus session sequencing and the `device-driver` register interface
//!
//! A session is the unit of bus ownership: assert one enable line, clock the
//! address word and the payload word, release the line, then wait out the
//! settle delay before anything else may use the bus.

use crate::bus::Transport;
use crate::device::DeviceBus;
use crate::select::DeviceSelector;
use crate::{Error, SETTLE_DELAY_US};
use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

/// Run one select → exchange → deselect → settle session and return the word
/// clocked in with the payload
///
/// The release and the settle delay happen even when an exchange fails, so a
/// bus error never leaves a device selected.
pub(crate) fn run_session<T, S, D>(
    transport: &mut T,
    selector: &mut S,
    delay: &mut D,
    target: S::Target,
    address_word: u16,
    payload: u16,
) -> Result<u16, Error<T::Error>>
where
    T: Transport,
    S: DeviceSelector,
    D: DelayNs,
{
    selector.select::<T::Error>(target)?;

    let exchanged = exchange_pair(transport, address_word, payload);
    let released = selector.deselect_all::<T::Error>();
    delay.delay_us(SETTLE_DELAY_US);

    let word = exchanged?;
    released?;
    Ok(word)
}

fn exchange_pair<T: Transport>(
    transport: &mut T,
    address_word: u16,
    payload: u16,
) -> Result<u16, Error<T::Error>> {
    // The word returned with the address is don't-care
    transport.exchange(address_word)?;
    Ok(transport.exchange(payload)?)
}

/// Adapter exposing a [`DeviceBus`] as a `device-driver` register interface
///
/// Used to drive the typed registers in [`crate::registers`]. Every register is
/// one 16-bit word, sent big-endian.
pub struct RegisterPort<'a, B> {
    bus: &'a mut B,
}

impl<'a, B: DeviceBus> RegisterPort<'a, B> {
    /// Borrow a device bus for typed register access
    pub fn new(bus: &'a mut B) -> Self {
        Self { bus }
    }
}

impl<B: DeviceBus> RegisterInterface for RegisterPort<'_, B> {
    type Error = Error<B::Error>;
    type AddressType = u16;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        let [high, low] = read_data else {
            return Err(Error::InvalidArgument);
        };

        let [h, l] = self.bus.read_register(address)?.to_be_bytes();
        *high = h;
        *low = l;
        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len()
        let &[high, low] = write_data else {
            return Err(Error::InvalidArgument);
        };

        self.bus
            .write_register(address, u16::from_be_bytes([high, low]))
    }
}
