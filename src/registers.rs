//! Register definitions for the AD9102/AD9106
//!
//! The chip exposes a sparse map of 16-bit registers at addresses below
//! `0x0060`, and 4096 words of pattern SRAM at `0x6000..=0x6FFF`. Bit 15 of the
//! address word selects a read, so no address may use it.
//!
//! Only the control registers the driver itself touches are modelled as typed
//! registers. Everything else is a pass-through value written through
//! [`DeviceBus::write_register`](crate::DeviceBus::write_register).

device_driver::create_device!(
    device_name: Ad910xRegisters,
    dsl: {
        config {
            type RegisterAddressType = u16;
            type DefaultByteOrder = BE;
        }

        /// SPICONFIG - SPI control (0x0000)
        register SpiConfig {
            const ADDRESS = 0x0000;
            const SIZE_BITS = 16;

            /// Data output enable
            dout_enable: bool = 10,
            /// Stronger SDO drive
            spi_drive: bool = 11,
            /// Double SPI data line
            double_spi: bool = 12,
            /// Register-level reset, restores power-on defaults
            reset: bool = 13,
            /// 3-wire SPI
            three_wire: bool = 14,
            /// LSB-first shifting
            lsb_first: bool = 15,
        },

        /// RAMUPDATE - shadow register update (0x001D)
        register RamUpdate {
            const ADDRESS = 0x001D;
            const SIZE_BITS = 16;

            /// Transfer shadow registers to the active set (self-clearing)
            update: bool = 0,
        },

        /// PAT_STATUS - pattern and memory access status (0x001E)
        register PatStatus {
            const ADDRESS = 0x001E;
            const SIZE_BITS = 16;

            /// Pattern generation enabled
            run: bool = 0,
            /// Pattern generation in progress
            pattern: bool = 1,
            /// SRAM access by the SPI port
            mem_access: bool = 2,
            /// Read SRAM back through the SPI port
            buf_read: bool = 3,
        }
    }
);

/// Number of addressable registers
pub const REGISTER_COUNT: usize = 66;

/// Register map in programming order
///
/// `PAT_STATUS` (0x001E) and `RAMUPDATE` (0x001D) come last so that a full
/// table write ends by arming the pattern and committing the shadow registers.
pub const REGISTER_MAP: [u16; REGISTER_COUNT] = [
    0x0000, 0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0006, 0x0007, 0x0008, 0x0009, 0x000a,
    0x000b, 0x000c, 0x000d, 0x000e, 0x001f, 0x0020, 0x0022, 0x0023, 0x0024, 0x0025, 0x0026,
    0x0027, 0x0028, 0x0029, 0x002a, 0x002b, 0x002c, 0x002d, 0x002e, 0x002f, 0x0030, 0x0031,
    0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037, 0x003e, 0x003f, 0x0040, 0x0041, 0x0042,
    0x0043, 0x0044, 0x0045, 0x0047, 0x0050, 0x0051, 0x0052, 0x0053, 0x0054, 0x0055, 0x0056,
    0x0057, 0x0058, 0x0059, 0x005a, 0x005b, 0x005c, 0x005d, 0x005e, 0x005f, 0x001e, 0x001d,
];

/// Memory access control register (`PAT_STATUS`)
pub const PAT_STATUS: u16 = 0x001E;

/// First pattern SRAM address
pub const SRAM_BASE: u16 = 0x6000;

/// Pattern SRAM size in 16-bit words
pub const SRAM_DEPTH: u16 = 4096;

/// Is `address` one of the discrete registers?
pub fn is_register(address: u16) -> bool {
    REGISTER_MAP.contains(&address)
}

/// Is `address` inside pattern SRAM?
pub const fn is_sram(address: u16) -> bool {
    address >= SRAM_BASE && address - SRAM_BASE < SRAM_DEPTH
}

/// Is `address` accessible at all?
pub fn is_valid(address: u16) -> bool {
    is_register(address) || is_sram(address)
}
