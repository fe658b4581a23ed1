//! Unit tests for bus configuration validation

use crate::common::{Event, Line, create_dual, create_single};
use ad910x::{BusConfig, ClockMode, Error};
use embedded_hal::spi::{MODE_0, MODE_3, Mode};

#[test]
fn test_default_bus_config() {
    let config = BusConfig::default();

    assert_eq!(config.frame_width, 16);
    assert_eq!(config.mode, ClockMode::Mode0);
    assert_eq!(config.frequency_hz, 1_000_000);
}

#[test]
fn test_configure_rejects_non_16_bit_frames() {
    let (mut driver, hw) = create_single();
    hw.clear_events();

    let config = BusConfig {
        frame_width: 8,
        ..BusConfig::default()
    };

    assert_eq!(driver.configure(&config), Err(Error::InvalidConfig));
    assert!(hw.events().is_empty());
}

#[test]
fn test_configure_rejects_zero_frequency() {
    let (mut driver, _hw) = create_dual();

    let config = BusConfig::new(ClockMode::Mode1, 0);

    assert_eq!(driver.configure(&config), Err(Error::InvalidConfig));
    assert_eq!(driver.init(&config), Err(Error::InvalidConfig));
}

#[test]
fn test_configure_records_last_config() {
    let (mut driver, _hw) = create_single();

    driver.configure(&BusConfig::default()).unwrap();
    driver
        .configure(&BusConfig::new(ClockMode::Mode3, 10_000_000))
        .unwrap();

    let (transport, ..) = driver.release();
    let config = transport.config().copied().unwrap();
    assert_eq!(config.mode, ClockMode::Mode3);
    assert_eq!(config.frequency_hz, 10_000_000);
}

#[test]
fn test_unconfigured_transport_has_no_config() {
    let (driver, _hw) = create_single();

    let (transport, ..) = driver.release();
    assert!(transport.config().is_none());
}

#[test]
fn test_dual_configure_deselects_both() {
    let (mut driver, hw) = create_dual();
    hw.clear_events();

    driver.configure(&BusConfig::default()).unwrap();

    assert_eq!(
        hw.events(),
        vec![
            Event::Pin {
                line: Line::Cs1,
                high: true
            },
            Event::Pin {
                line: Line::Cs2,
                high: true
            },
        ]
    );
}

#[test]
fn test_clock_mode_maps_to_hal_mode() {
    assert_eq!(Mode::from(ClockMode::Mode0), MODE_0);
    assert_eq!(Mode::from(ClockMode::Mode3), MODE_3);
}
