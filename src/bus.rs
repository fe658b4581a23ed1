//! Serial bus transport shared by all devices
//!
//! The AD910x speaks 16-bit words in full duplex: every word clocked out is
//! paired with a word clocked in. [`Transport`] captures exactly that
//! primitive plus one-time configuration, and [`SpiTransport`] implements it on
//! top of any `embedded_hal::spi::SpiBus<u16>`.
//!
//! # Note on Chip Select
//!
//! This transport deliberately wraps the raw `SpiBus`, not an `SpiDevice`.
//! Chip select is owned by the [`DeviceSelector`](crate::select::DeviceSelector)
//! because with two chips on one bus it is the only way to address a specific
//! device.

use crate::Error;

/// SPI clock polarity and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    /// CPOL = 0, CPHA = 0 (AD910x default)
    #[default]
    Mode0 = 0,
    /// CPOL = 0, CPHA = 1
    Mode1 = 1,
    /// CPOL = 1, CPHA = 0
    Mode2 = 2,
    /// CPOL = 1, CPHA = 1
    Mode3 = 3,
}

impl From<ClockMode> for embedded_hal::spi::Mode {
    fn from(mode: ClockMode) -> Self {
        match mode {
            ClockMode::Mode0 => embedded_hal::spi::MODE_0,
            ClockMode::Mode1 => embedded_hal::spi::MODE_1,
            ClockMode::Mode2 => embedded_hal::spi::MODE_2,
            ClockMode::Mode3 => embedded_hal::spi::MODE_3,
        }
    }
}

/// Bus configuration
///
/// Frame width is fixed by the chip protocol: one 16-bit address word followed
/// by one 16-bit data word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Bits per transferred word
    pub frame_width: u8,
    /// Clock polarity/phase
    pub mode: ClockMode,
    /// Clock frequency in Hz
    pub frequency_hz: u32,
}

impl BusConfig {
    /// Frame width used by the AD910x register protocol
    pub const FRAME_WIDTH: u8 = 16;

    /// Create a 16-bit configuration with the given mode and frequency
    pub const fn new(mode: ClockMode, frequency_hz: u32) -> Self {
        Self {
            frame_width: Self::FRAME_WIDTH,
            mode,
            frequency_hz,
        }
    }

    /// Check that the configuration can carry the register protocol
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the frame width is not 16 bits or the
    /// clock frequency is zero.
    pub fn validate<E>(&self) -> Result<(), Error<E>> {
        if self.frame_width != Self::FRAME_WIDTH || self.frequency_hz == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new(ClockMode::Mode0, 1_000_000)
    }
}

/// Synchronous word exchange on the shared bus
pub trait Transport {
    /// Error reported by the underlying bus
    type Error;

    /// Apply frame width, clock mode and clock rate
    ///
    /// Calling this again replaces all three parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus cannot be (re)configured.
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    /// Clock `word` out and return the word clocked in at the same time
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying bus reports a failure. A device that
    /// does not answer is not an error; the returned word is then meaningless.
    fn exchange(&mut self, word: u16) -> Result<u16, Self::Error>;
}

/// [`Transport`] over an `embedded-hal` SPI bus with 16-bit words
///
/// `embedded-hal` has no runtime reconfiguration API, so the HAL that produced
/// the bus is responsible for programming mode and frequency. `configure`
/// records the requested configuration and flushes any pending transfer.
pub struct SpiTransport<SPI> {
    spi: SPI,
    config: Option<BusConfig>,
}

impl<SPI> SpiTransport<SPI> {
    /// Wrap an SPI bus
    pub const fn new(spi: SPI) -> Self {
        Self { spi, config: None }
    }

    /// Configuration applied by the last `configure` call, if any
    pub const fn config(&self) -> Option<&BusConfig> {
        self.config.as_ref()
    }

    /// Consume the transport and return the SPI bus
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Transport for SpiTransport<SPI>
where
    SPI: embedded_hal::spi::SpiBus<u16, Error = E>,
{
    type Error = E;

    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error> {
        self.spi.flush()?;
        self.config = Some(*config);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SPI configured: {}-bit frames, {}, {} Hz",
            config.frame_width,
            config.mode,
            config.frequency_hz
        );

        Ok(())
    }

    fn exchange(&mut self, word: u16) -> Result<u16, Self::Error> {
        let mut frame = [word];
        self.spi.transfer_in_place(&mut frame)?;
        Ok(frame[0])
    }
}
