//! Pattern SRAM streaming
//!
//! SRAM is only reachable while `PAT_STATUS` has the memory access bit set:
//!
//! | `PAT_STATUS` | Mode |
//! |---|---|
//! | `0x0004` | SPI writes go to SRAM |
//! | `0x000C` | SPI reads come from SRAM |
//! | `0x0000` | back to register mode |
//!
//! Samples are stored left-justified: a sample `s` is sent as `s << 2` and a
//! stored word `w` reads back as `w >> 2` (arithmetic shift). Addresses must be
//! visited in increasing order because the chip auto-increments its internal
//! pointer.
//!
//! A device must never be left in streaming mode, so every bracket is a
//! [`StreamSession`] guard that writes `0x0000` back when dropped.

use crate::Error;
use crate::device::DeviceBus;
use crate::registers::{PAT_STATUS, SRAM_BASE, SRAM_DEPTH};
use core::fmt;

/// `PAT_STATUS` value that returns the chip to register mode
pub const REGISTER_MODE: u16 = 0x0000;

/// Direction of an SRAM streaming bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamMode {
    /// Write pattern data (`MEM_ACCESS`)
    Write,
    /// Read pattern data back (`MEM_ACCESS | BUF_READ`)
    Read,
}

impl StreamMode {
    /// `PAT_STATUS` value that enters this mode
    pub const fn control_word(self) -> u16 {
        match self {
            Self::Write => 0x0004,
            Self::Read => 0x000C,
        }
    }
}

/// One SRAM word read back from the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SramEntry {
    /// SRAM address (`0x6000..=0x6FFF`)
    pub address: u16,
    /// Sample value with the fixed-point shift undone
    pub value: i16,
}

impl fmt::Display for SramEntry {
    #[allow(clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}, 0x{:04X}", self.address, self.value as u16)
    }
}

/// Encode a sample into the word stored in SRAM
#[allow(clippy::cast_sign_loss)]
pub const fn encode_sample(sample: i16) -> u16 {
    (sample << 2) as u16
}

/// Decode a word read from SRAM into a sample
#[allow(clippy::cast_possible_wrap)]
pub const fn decode_sample(raw: u16) -> i16 {
    (raw as i16) >> 2
}

/// Scoped streaming bracket
///
/// Entering writes the mode's control word; closing or dropping writes
/// [`REGISTER_MODE`]. Only [`close`](Self::close) reports an error from the
/// closing write.
pub(crate) struct StreamSession<'a, B: DeviceBus> {
    bus: &'a mut B,
    open: bool,
}

impl<'a, B: DeviceBus> StreamSession<'a, B> {
    pub(crate) fn enter(bus: &'a mut B, mode: StreamMode) -> Result<Self, Error<B::Error>> {
        // Constructed first so a failed entry write is still undone on drop
        let mut session = Self { bus, open: true };
        session.bus.write_register(PAT_STATUS, mode.control_word())?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SRAM streaming entered: {}", mode);

        Ok(session)
    }

    pub(crate) fn bus(&mut self) -> &mut B {
        self.bus
    }

    pub(crate) fn close(mut self) -> Result<(), Error<B::Error>> {
        self.open = false;
        self.bus.write_register(PAT_STATUS, REGISTER_MODE)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SRAM streaming closed");

        Ok(())
    }
}

impl<B: DeviceBus> Drop for StreamSession<'_, B> {
    fn drop(&mut self) {
        if self.open {
            #[cfg(feature = "defmt")]
            defmt::warn!("SRAM streaming aborted, restoring register mode");

            let _ = self.bus.write_register(PAT_STATUS, REGISTER_MODE);
        }
    }
}

/// Stream `samples` into SRAM starting at [`SRAM_BASE`]
pub(crate) fn write_block<B: DeviceBus>(
    bus: &mut B,
    samples: &[i16],
) -> Result<(), Error<B::Error>> {
    if samples.is_empty() || samples.len() > usize::from(SRAM_DEPTH) {
        return Err(Error::InvalidArgument);
    }

    let mut session = StreamSession::enter(bus, StreamMode::Write)?;
    for (address, &sample) in (SRAM_BASE..).zip(samples) {
        session.bus().write_register(address, encode_sample(sample))?;
    }
    session.close()
}

/// Lazy reader over pattern SRAM
///
/// Created by [`DeviceBus::read_block`]. Each call to `next` performs one bus
/// read; the sequence cannot be restarted because the chip's internal pointer
/// advances with every read. Register mode is restored when the last entry has
/// been yielded, when [`finish`](Self::finish) is called, or when the reader is
/// dropped early.
pub struct SramReader<'a, B: DeviceBus> {
    session: Option<StreamSession<'a, B>>,
    next: u16,
    count: u16,
}

impl<'a, B: DeviceBus> SramReader<'a, B> {
    pub(crate) fn new(bus: &'a mut B, count: u16) -> Result<Self, Error<B::Error>> {
        if count > SRAM_DEPTH {
            return Err(Error::InvalidArgument);
        }

        Ok(Self {
            session: Some(StreamSession::enter(bus, StreamMode::Read)?),
            next: 0,
            count,
        })
    }

    /// Entries not yet read
    pub const fn remaining(&self) -> u16 {
        self.count - self.next
    }

    /// Stop reading and restore register mode
    ///
    /// # Errors
    ///
    /// Returns an error if the closing `PAT_STATUS` write fails.
    pub fn finish(mut self) -> Result<(), Error<B::Error>> {
        match self.session.take() {
            Some(session) => session.close(),
            None => Ok(()),
        }
    }
}

impl<B: DeviceBus> Iterator for SramReader<'_, B> {
    type Item = Result<SramEntry, Error<B::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            // Close once; a failing close is surfaced as the final item
            return self.session.take()?.close().err().map(Err);
        }

        let session = self.session.as_mut()?;
        let address = SRAM_BASE + self.next;
        self.next += 1;

        Some(
            session
                .bus()
                .read_register(address)
                .map(|raw| SramEntry {
                    address,
                    value: decode_sample(raw),
                }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.remaining());
        (remaining, Some(remaining + 1))
    }
}
