//! Simulated HSTX driver
//!
//! Keeps frame buffers in memory and runs a background thread that stands
//! in for the scan-out hardware. The thread ticks once per frame period and
//! `swap` blocks on the next tick, the way hardware waits for retrace.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bytemuck::Pod;

use super::{Driver, DriverError, FrameStore, InitParams, Mode};
use crate::core::{OutputTiming, Resolution};

/// GPIOs wired to the HSTX peripheral
const HSTX_PINS: std::ops::RangeInclusive<u8> = 12..=19;

/// On-chip SRAM available for frame buffers
pub const DEFAULT_MEMORY_LIMIT: usize = 520 * 1024;

#[derive(Debug)]
struct RetraceState {
    frame: u64,
    running: bool,
}

#[derive(Debug)]
struct RetraceShared {
    state: Mutex<RetraceState>,
    tick: Condvar,
}

/// Background clock that marks the start of each frame
#[derive(Debug)]
struct Retrace {
    shared: Arc<RetraceShared>,
    handle: Option<JoinHandle<()>>,
}

impl Retrace {
    fn spawn(period: Duration) -> std::io::Result<Self> {
        let shared = Arc::new(RetraceShared {
            state: Mutex::new(RetraceState {
                frame: 0,
                running: true,
            }),
            tick: Condvar::new(),
        });

        let clock = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("dvhstx-retrace".to_string())
            .spawn(move || {
                let mut next = Instant::now() + period;
                let mut state = clock.state.lock().unwrap_or_else(PoisonError::into_inner);
                while state.running {
                    let now = Instant::now();
                    if now >= next {
                        state.frame += 1;
                        clock.tick.notify_all();
                        next += period;
                        continue;
                    }
                    state = clock
                        .tick
                        .wait_timeout(state, next - now)
                        .map(|(guard, _)| guard)
                        .unwrap_or_else(|e| e.into_inner().0);
                }
            })?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    fn frames(&self) -> u64 {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
    }

    /// Block until the frame counter advances or the clock stops
    fn wait_next(&self) {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let start = state.frame;
        while state.running && state.frame == start {
            state = self
                .shared
                .tick
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn stop(&mut self) {
        {
            let mut state = self
                .shared
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            state.running = false;
            self.shared.tick.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Retrace thread panicked");
            }
        }
    }
}

impl Drop for Retrace {
    fn drop(&mut self) {
        self.stop();
    }
}

/// In-memory driver with a simulated retrace
#[derive(Debug)]
pub struct SimDriver {
    frames: Option<FrameStore>,
    retrace: Option<Retrace>,
    cursor: Option<(u16, u16)>,
    memory_limit: usize,
    frame_period: Option<Duration>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    pub fn new() -> Self {
        Self {
            frames: None,
            retrace: None,
            cursor: None,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            frame_period: None,
        }
    }

    /// Override the frame buffer memory budget
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Override the retrace period instead of deriving it from the mode
    pub fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = Some(period);
        self
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_some()
    }

    pub fn params(&self) -> Option<&InitParams> {
        self.frames.as_ref().map(FrameStore::params)
    }

    /// The buffer currently being streamed out
    pub fn front_buffer<T: Pod>(&self) -> Option<&[T]> {
        self.frames.as_ref()?.front()
    }

    /// Retrace ticks since `init`
    pub fn frames(&self) -> u64 {
        self.retrace.as_ref().map_or(0, Retrace::frames)
    }

    /// Hardware cursor position, if shown
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    fn period_for(&self, params: &InitParams) -> Duration {
        if let Some(period) = self.frame_period {
            return period;
        }
        let timing = match params.mode {
            Mode::TextRgb111 => OutputTiming::TEXT,
            Mode::Rgb565 | Mode::Palette => Resolution::ALL
                .into_iter()
                .find(|r| r.dimensions() == (params.width, params.height))
                .map_or(OutputTiming::TEXT, Resolution::timing),
        };
        timing.frame_period()
    }

    fn validate(&self, params: &InitParams) -> Result<(), DriverError> {
        let pins = params.pinout.pins();
        let distinct = pins
            .iter()
            .enumerate()
            .all(|(i, p)| !pins[..i].contains(p));
        if !distinct || !pins.iter().all(|p| HSTX_PINS.contains(p)) {
            return Err(DriverError::InvalidPinout(params.pinout));
        }

        let text_double = params.mode == Mode::TextRgb111 && params.double_buffered;
        if params.width == 0 || params.height == 0 || text_double {
            return Err(DriverError::Unsupported {
                mode: params.mode,
                width: params.width,
                height: params.height,
            });
        }

        let bytes = params.buffer_bytes();
        if bytes > self.memory_limit {
            return Err(DriverError::Allocation {
                bytes,
                limit: self.memory_limit,
            });
        }
        Ok(())
    }
}

impl Driver for SimDriver {
    fn init(&mut self, params: &InitParams) -> Result<(), DriverError> {
        if self.is_running() {
            return Err(DriverError::AlreadyRunning);
        }
        self.validate(params)?;

        let period = self.period_for(params);
        self.retrace = Some(Retrace::spawn(period)?);
        self.frames = Some(FrameStore::new(params));
        tracing::debug!(
            "Simulated output up: {}x{} {:?}, double_buffered={}, frame period {:?}",
            params.width,
            params.height,
            params.mode,
            params.double_buffered,
            period
        );
        Ok(())
    }

    fn back_buffer<T: Pod>(&self) -> Option<&[T]> {
        self.frames.as_ref()?.back()
    }

    fn back_buffer_mut<T: Pod>(&mut self) -> Option<&mut [T]> {
        self.frames.as_mut()?.back_mut()
    }

    fn palette_mut(&mut self) -> Option<&mut [u32; 256]> {
        self.frames.as_mut()?.palette_mut()
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        if self.is_running() {
            self.cursor = Some((x, y));
        }
    }

    fn cursor_off(&mut self) {
        self.cursor = None;
    }

    fn reset(&mut self) {
        if let Some(mut retrace) = self.retrace.take() {
            retrace.stop();
        }
        if self.frames.take().is_some() {
            tracing::debug!("Simulated output down");
        }
        self.cursor = None;
    }

    fn swap(&mut self, copy_framebuffer: bool) {
        let double_buffered = self
            .frames
            .as_ref()
            .is_some_and(|f| f.params().double_buffered);
        if !double_buffered {
            return;
        }
        if let Some(retrace) = &self.retrace {
            retrace.wait_next();
        }
        if let Some(frames) = self.frames.as_mut() {
            frames.flip(copy_framebuffer);
        }
    }
}

impl Drop for SimDriver {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pinout;

    fn params(mode: Mode, double_buffered: bool) -> InitParams {
        InitParams {
            width: 320,
            height: 180,
            mode,
            double_buffered,
            pinout: Pinout::default(),
        }
    }

    #[test]
    fn test_init_and_reset() {
        let mut driver = SimDriver::new();
        assert!(driver.back_buffer::<u16>().is_none());

        driver.init(&params(Mode::Rgb565, false)).unwrap();
        assert!(driver.is_running());
        assert_eq!(driver.back_buffer::<u16>().map(|b| b.len()), Some(320 * 180));

        driver.reset();
        assert!(!driver.is_running());
        assert!(driver.back_buffer::<u16>().is_none());

        // Idempotent
        driver.reset();
    }

    #[test]
    fn test_double_init_rejected() {
        let mut driver = SimDriver::new();
        driver.init(&params(Mode::Rgb565, false)).unwrap();
        assert!(matches!(
            driver.init(&params(Mode::Rgb565, false)),
            Err(DriverError::AlreadyRunning)
        ));
    }

    #[test]
    fn test_invalid_pinout() {
        let mut driver = SimDriver::new();
        let mut p = params(Mode::Rgb565, false);
        p.pinout = Pinout::new(12, 12, 16, 18);
        assert!(matches!(driver.init(&p), Err(DriverError::InvalidPinout(_))));

        p.pinout = Pinout::new(2, 14, 16, 18);
        assert!(matches!(driver.init(&p), Err(DriverError::InvalidPinout(_))));
        assert!(!driver.is_running());
    }

    #[test]
    fn test_memory_limit() {
        let mut driver = SimDriver::new();
        let big = InitParams {
            width: 640,
            height: 360,
            mode: Mode::Rgb565,
            double_buffered: true,
            pinout: Pinout::default(),
        };
        assert!(matches!(
            driver.init(&big),
            Err(DriverError::Allocation { bytes: 921_600, .. })
        ));
    }

    #[test]
    fn test_text_mode_is_single_buffered() {
        let mut driver = SimDriver::new();
        let p = InitParams {
            width: 91,
            height: 30,
            mode: Mode::TextRgb111,
            double_buffered: true,
            pinout: Pinout::default(),
        };
        assert!(matches!(driver.init(&p), Err(DriverError::Unsupported { .. })));
    }

    #[test]
    fn test_swap_waits_for_retrace() {
        let mut driver = SimDriver::new().with_frame_period(Duration::from_millis(2));
        driver.init(&params(Mode::Rgb565, true)).unwrap();

        driver.back_buffer_mut::<u16>().unwrap()[0] = 0x1234;
        let before = driver.frames();
        driver.swap(false);
        assert!(driver.frames() > before);
        assert_eq!(driver.front_buffer::<u16>().unwrap()[0], 0x1234);
    }

    #[test]
    fn test_palette_only_in_palette_mode() {
        let mut driver = SimDriver::new();
        driver.init(&params(Mode::Rgb565, false)).unwrap();
        assert!(driver.palette_mut().is_none());
        driver.reset();

        driver.init(&params(Mode::Palette, false)).unwrap();
        assert!(driver.palette_mut().is_some());
    }
}
