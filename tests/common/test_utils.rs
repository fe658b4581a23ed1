//! Test utilities and helper functions

use super::mock_interface::{Event, Line, MockDelay, MockHardware, MockPin, MockSpi};
use ad910x::{Ad910x, Ad910xDual, BusConfig, SpiTransport};

/// Single-device driver over mock hardware
pub type SingleDriver = Ad910x<SpiTransport<MockSpi>, MockPin, MockPin, MockPin, MockDelay>;

/// Dual-device driver over mock hardware
pub type DualDriver =
    Ad910xDual<SpiTransport<MockSpi>, MockPin, MockPin, MockPin, MockPin, MockDelay>;

/// Create a single-device driver; the bus is not configured yet
pub fn create_single() -> (SingleDriver, MockHardware) {
    let hw = MockHardware::new();
    let driver = Ad910x::new(
        SpiTransport::new(hw.spi()),
        hw.pin(Line::Cs1),
        hw.pin(Line::Reset),
        hw.pin(Line::Trigger),
        hw.delay(),
    )
    .expect("Failed to create driver");
    (driver, hw)
}

/// Create a dual-device driver; the bus is not configured yet
pub fn create_dual() -> (DualDriver, MockHardware) {
    let hw = MockHardware::new();
    let driver = Ad910xDual::new(
        SpiTransport::new(hw.spi()),
        hw.pin(Line::Cs1),
        hw.pin(Line::Cs2),
        hw.pin(Line::Reset),
        hw.pin(Line::Trigger),
        hw.delay(),
    )
    .expect("Failed to create driver");
    (driver, hw)
}

/// Create and initialize a single-device driver, with an empty event log
pub fn init_single() -> (SingleDriver, MockHardware) {
    let (mut driver, hw) = create_single();
    driver
        .init(&BusConfig::default())
        .expect("Failed to initialize driver");
    hw.clear_events();
    (driver, hw)
}

/// Create and initialize a dual-device driver, with an empty event log
pub fn init_dual() -> (DualDriver, MockHardware) {
    let (mut driver, hw) = create_dual();
    driver
        .init(&BusConfig::default())
        .expect("Failed to initialize driver");
    hw.clear_events();
    (driver, hw)
}

/// Delay recorded right after each enable-line release that closed a session
///
/// One entry per session, in nanoseconds; consecutive delay events are summed.
pub fn settle_delays(hw: &MockHardware) -> Vec<u64> {
    let events = hw.events();
    let mut settles = Vec::new();
    let mut in_session = false;

    for (i, event) in events.iter().enumerate() {
        match *event {
            Event::Pin {
                line: Line::Cs1 | Line::Cs2,
                high: false,
            } => in_session = true,
            Event::Pin {
                line: Line::Cs1 | Line::Cs2,
                high: true,
            } if in_session => {
                in_session = false;
                let settle = events[i + 1..]
                    .iter()
                    .skip_while(|e| matches!(e, Event::Pin { high: true, .. }))
                    .map_while(|e| match e {
                        Event::Delay { ns } => Some(*ns),
                        _ => None,
                    })
                    .sum();
                settles.push(settle);
            }
            _ => {}
        }
    }
    settles
}
