//! Buffer swap tests
//!
//! Single-buffered surfaces must never reach the driver's retrace wait;
//! double-buffered surfaces must publish the drawn frame and, when asked,
//! carry it into the next back buffer.

use std::time::{Duration, Instant};

use dvhstx::core::{Pinout, Resolution};
use dvhstx::driver::{DriverCall, MockDriver, SimDriver};
use dvhstx::surface::color565;
use dvhstx::{Canvas, Canvas16, Canvas8, DisplayConfig};

#[test]
fn test_single_buffered_swap_never_waits() {
    let mut canvas = Canvas16::new(
        MockDriver::new(),
        Pinout::default(),
        Resolution::R320x180,
        false,
    );
    canvas.start().unwrap();
    canvas.set_pixel(1, 1, 0x1111);

    canvas.swap(false);
    canvas.swap(true);

    assert_eq!(canvas.driver().retrace_waits(), 0);
    assert!(!canvas
        .driver()
        .calls()
        .iter()
        .any(|c| matches!(c, DriverCall::Swap { .. })));
    assert_eq!(canvas.pixel(1, 1), Some(0x1111));
}

#[test]
fn test_single_buffered_swap_returns_immediately_on_sim() {
    let mut canvas = Canvas16::new(
        SimDriver::new().with_frame_period(Duration::from_secs(5)),
        Pinout::default(),
        Resolution::R320x180,
        false,
    );
    canvas.start().unwrap();
    let started = Instant::now();
    canvas.swap(true);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(canvas.driver().frames(), 0);
}

#[test]
fn test_copy_forward_keeps_drawn_frame() {
    let mut canvas = Canvas16::new(
        SimDriver::new().with_frame_period(Duration::from_millis(2)),
        Pinout::default(),
        Resolution::R320x180,
        true,
    );
    canvas.start().unwrap();
    let red = color565(255, 0, 0);
    canvas.set_pixel(10, 10, red);

    canvas.swap(true);

    // Published frame and new back buffer both hold the drawing
    let front = canvas.driver().front_buffer::<u16>().unwrap();
    assert_eq!(front[10 * 320 + 10], red);
    assert_eq!(canvas.pixel(10, 10), Some(red));
}

#[test]
fn test_swap_without_copy_publishes_frame() {
    let mut canvas = Canvas8::new(
        MockDriver::new(),
        Pinout::default(),
        Resolution::R320x180,
        true,
    );
    canvas.start().unwrap();
    canvas.fill(7);
    canvas.swap(false);

    assert_eq!(canvas.driver().retrace_waits(), 1);
    let front = canvas.driver().front_buffer::<u8>().unwrap();
    assert!(front.iter().all(|&p| p == 7));
    // Back buffer is the other, never-drawn buffer
    assert_eq!(canvas.pixel(0, 0), Some(0));
}

#[test]
fn test_double_buffered_swap_blocks_until_retrace() {
    let period = Duration::from_millis(20);
    let mut canvas = Canvas16::new(
        SimDriver::new().with_frame_period(period),
        Pinout::default(),
        Resolution::R320x180,
        true,
    );
    canvas.start().unwrap();

    let frames = canvas.driver().frames();
    canvas.swap(false);
    canvas.swap(false);
    assert!(canvas.driver().frames() >= frames + 2);
}

#[test]
fn test_swap_on_stopped_surface_is_noop() {
    let mut canvas = Canvas16::new(
        MockDriver::new(),
        Pinout::default(),
        Resolution::R320x180,
        true,
    );
    canvas.swap(true);
    assert!(canvas.driver().calls().is_empty());
}

#[test]
fn test_oversized_double_buffer_fails_start() {
    let config = DisplayConfig {
        pinout: Pinout::default(),
        resolution: Resolution::R640x360,
        double_buffered: true,
    };
    let mut canvas = Canvas16::from_config(SimDriver::new(), &config);
    assert!(canvas.start().is_err());
    assert!(canvas.buffer().is_none());
    canvas.set_pixel(0, 0, 1);
    canvas.swap(true);
    assert_eq!(canvas.pixel(0, 0), None);

    // The 8-bit variant of the same mode fits
    let mut canvas = Canvas8::from_config(SimDriver::new(), &config);
    assert!(canvas.start().is_ok());
}
