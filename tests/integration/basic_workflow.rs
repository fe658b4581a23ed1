//! Integration tests for basic workflow scenarios

use crate::common::{Line, MockHardware, create_single, init_single, settle_delays};
use ad910x::{
    Ad910x, BusConfig, ClockMode, DeviceBus, REGISTER_COUNT, REGISTER_MAP, SpiTransport,
};

/// One period of a coarse 14-bit triangle wave
fn triangle(len: usize) -> Vec<i16> {
    let half = len / 2;
    (0..len)
        .map(|i| {
            let step = if i < half { i } else { len - i };
            (step * 16_000 / half) as i16 - 8_000
        })
        .collect()
}

#[test]
fn test_complete_pattern_workflow() {
    let (mut driver, hw) = create_single();

    // Bring up the bus and reset the chip
    driver
        .init(&BusConfig::new(ClockMode::Mode0, 8_000_000))
        .unwrap();

    // Load the pattern
    let pattern = triangle(256);
    driver.write_block(&pattern).unwrap();

    // Verify it
    let read: Vec<i16> = driver
        .read_block(pattern.len() as u16)
        .unwrap()
        .map(|entry| entry.unwrap().value)
        .collect();
    assert_eq!(read, pattern);

    // Program every register and check the readback
    let values: Vec<u16> = (0..REGISTER_COUNT as u16).map(|i| i * 3).collect();
    let readbacks = driver.write_register_table(&values).unwrap();
    assert!(readbacks.iter().all(|r| r.matches()));
    assert_eq!(readbacks.last().unwrap().address, 0x001D);

    // Play it
    driver.start_pattern().unwrap();
    assert!(!hw.is_high(Line::Trigger));
    driver.stop_pattern().unwrap();
    assert!(hw.is_high(Line::Trigger));

    assert!(hw.is_high(Line::Cs1));
    assert_eq!(hw.chip_register(0, 0x001E), values[REGISTER_COUNT - 2]);
}

#[test]
fn test_write_read_first_register() {
    let (mut driver, _hw) = init_single();

    driver.write_register(0x0000, 0x1234).unwrap();

    assert_eq!(driver.read_register(0x0000).unwrap(), 0x1234);
}

#[test]
fn test_readback_listing() {
    let (mut driver, _hw) = init_single();
    let values = vec![0x0001u16; REGISTER_COUNT];

    let listing: Vec<String> = driver
        .write_register_table(&values)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(listing.len(), REGISTER_COUNT);
    assert_eq!(listing[0], "0x0000, 0x0001");
    assert_eq!(listing[REGISTER_COUNT - 1], "0x001D, 0x0001");
}

#[test]
fn test_sram_listing() {
    let (mut driver, _hw) = init_single();
    driver.write_block(&[-1, 2]).unwrap();

    let listing: Vec<String> = driver
        .read_block(2)
        .unwrap()
        .map(|entry| entry.unwrap().to_string())
        .collect();

    assert_eq!(listing, vec!["0x6000, 0xFFFF", "0x6001, 0x0002"]);
}

#[test]
fn test_every_session_settles() {
    let (mut driver, hw) = init_single();

    driver.write_block(&triangle(32)).unwrap();
    driver.read_block(32).unwrap().for_each(drop);
    driver.write_register_table(&REGISTER_MAP).unwrap();

    let settles = settle_delays(&hw);
    assert_eq!(settles.len(), (32 + 2) * 2 + 2 * REGISTER_COUNT);
    assert!(settles.iter().all(|&ns| ns >= 1_000));
}

#[test]
fn test_error_recovery() {
    let (mut driver, hw) = init_single();

    hw.fail_exchange_after(10);
    assert!(driver.write_block(&triangle(16)).is_err());
    assert!(!driver.pattern_status().unwrap().mem_access);

    // The next block goes through untouched
    driver.write_block(&[5, 6]).unwrap();
    let read: Vec<i16> = driver
        .read_block(2)
        .unwrap()
        .map(|entry| entry.unwrap().value)
        .collect();
    assert_eq!(read, vec![5, 6]);
}

#[test]
fn test_release_returns_hardware() {
    let hw = MockHardware::new();
    let driver = Ad910x::new(
        SpiTransport::new(hw.spi()),
        hw.pin(Line::Cs1),
        hw.pin(Line::Reset),
        hw.pin(Line::Trigger),
        hw.delay(),
    )
    .unwrap();

    let (transport, _cs, _reset, _trigger, _delay) = driver.release();
    let _spi = transport.release();
}
