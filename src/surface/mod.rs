//! Surface base
//!
//! A surface owns its driver and the fixed parameters it was built with.
//! The frame buffer itself belongs to the driver; the surface only reaches
//! it between a successful `start()` and the next `stop()`.
//!
//! Lifecycle:
//! - Stopped: no buffer, drawing is a no-op
//! - Running: buffer reachable, drawing lands in the back buffer
//!
//! Dropping a surface always stops it.

mod graphics;
mod pixel;

use bytemuck::Pod;

use crate::driver::{Driver, InitParams};
use crate::error::Result;

pub use graphics::PaletteIndex;
pub use pixel::{color565, default_palette, Canvas16, Canvas8};

/// Minimal drawing capability shared by every surface
///
/// Anything richer (lines, shapes, glyphs) is layered on top, either through
/// this trait or through `embedded_graphics::DrawTarget` on pixel surfaces.
pub trait Canvas {
    /// One addressable element of the surface
    type Pixel: Copy;

    /// (width, height) in elements
    fn dimensions(&self) -> (u16, u16);

    /// Read back an element; `None` when out of bounds or not running
    fn pixel(&self, x: i32, y: i32) -> Option<Self::Pixel>;

    /// Write an element; out of bounds or not running is a silent no-op
    fn set_pixel(&mut self, x: i32, y: i32, value: Self::Pixel);

    /// Set every element; not running is a silent no-op
    fn fill(&mut self, value: Self::Pixel);
}

/// Driver plus lifecycle state
#[derive(Debug)]
pub struct Surface<D: Driver> {
    driver: D,
    params: InitParams,
    running: bool,
}

impl<D: Driver> Surface<D> {
    pub fn new(driver: D, params: InitParams) -> Self {
        Self {
            driver,
            params,
            running: false,
        }
    }

    pub fn params(&self) -> &InitParams {
        &self.params
    }

    pub fn width(&self) -> u16 {
        self.params.width
    }

    pub fn height(&self) -> u16 {
        self.params.height
    }

    pub fn is_double_buffered(&self) -> bool {
        self.params.double_buffered
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Bring up the driver. Restarts if already running.
    ///
    /// On failure the driver is reset and the surface stays stopped.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            self.stop();
        }
        if let Err(e) = self.driver.init(&self.params) {
            tracing::warn!("Display start failed: {}", e);
            self.driver.reset();
            return Err(e.into());
        }
        self.running = true;
        tracing::debug!(
            "Display started: {}x{} {:?}",
            self.params.width,
            self.params.height,
            self.params.mode
        );
        Ok(())
    }

    /// Release the driver. Safe to call when stopped.
    pub fn stop(&mut self) {
        self.driver.reset();
        if self.running {
            tracing::debug!("Display stopped");
        }
        self.running = false;
    }

    /// Publish the back buffer.
    ///
    /// Single buffered: returns immediately without touching the driver.
    /// Double buffered: blocks until retrace, exchanges buffers and, with
    /// `copy_framebuffer`, copies the frame just published into the new back
    /// buffer. Without it the new back buffer holds stale content.
    pub fn swap(&mut self, copy_framebuffer: bool) {
        if !self.params.double_buffered || !self.running {
            return;
        }
        self.driver.swap(copy_framebuffer);
        tracing::trace!("Swapped buffers (copy={})", copy_framebuffer);
    }

    /// The back buffer, while running
    pub fn buffer<T: Pod>(&self) -> Option<&[T]> {
        let buf = self.driver.back_buffer::<T>();
        debug_assert!(
            self.running || buf.is_none(),
            "driver buffer reachable while surface is stopped"
        );
        if self.running {
            buf
        } else {
            None
        }
    }

    /// The back buffer, mutably, while running
    pub fn buffer_mut<T: Pod>(&mut self) -> Option<&mut [T]> {
        let running = self.running;
        let buf = self.driver.back_buffer_mut::<T>();
        debug_assert!(
            running || buf.is_none(),
            "driver buffer reachable while surface is stopped"
        );
        if running {
            buf
        } else {
            None
        }
    }

    /// Linear index of (x, y), if in bounds
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let (w, h) = (usize::from(self.params.width), usize::from(self.params.height));
        (x < w && y < h).then_some(y * w + x)
    }

    pub(crate) fn element<T: Pod>(&self, x: i32, y: i32) -> Option<T> {
        let idx = self.index_of(x, y)?;
        self.buffer::<T>()?.get(idx).copied()
    }

    pub(crate) fn set_element<T: Pod>(&mut self, x: i32, y: i32, value: T) {
        if let Some(idx) = self.index_of(x, y) {
            if let Some(slot) = self.buffer_mut::<T>().and_then(|b| b.get_mut(idx)) {
                *slot = value;
            }
        }
    }

    pub(crate) fn fill_elements<T: Pod>(&mut self, value: T) {
        if let Some(buf) = self.buffer_mut::<T>() {
            buf.fill(value);
        }
    }
}

impl<D: Driver> Drop for Surface<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pinout;
    use crate::driver::{DriverCall, Mode, MockDriver};
    use crate::error::Error;

    fn params(double_buffered: bool) -> InitParams {
        InitParams {
            width: 4,
            height: 2,
            mode: Mode::Rgb565,
            double_buffered,
            pinout: Pinout::default(),
        }
    }

    #[test]
    fn test_start_stop() {
        let mut surface = Surface::new(MockDriver::new(), params(false));
        assert!(!surface.is_running());
        assert!(surface.buffer::<u16>().is_none());

        surface.start().unwrap();
        assert!(surface.is_running());
        assert_eq!(surface.buffer::<u16>().map(|b| b.len()), Some(8));

        surface.stop();
        surface.stop();
        assert!(!surface.is_running());
        assert!(surface.buffer::<u16>().is_none());
    }

    #[test]
    fn test_start_failure_leaves_no_buffer() {
        let mut surface = Surface::new(MockDriver::failing(), params(false));
        assert!(matches!(surface.start(), Err(Error::Start(_))));
        assert!(!surface.is_running());
        assert!(surface.buffer::<u16>().is_none());
        surface.set_element::<u16>(0, 0, 7);
        assert_eq!(surface.element::<u16>(0, 0), None);
    }

    #[test]
    fn test_index_bounds() {
        let surface = Surface::new(MockDriver::new(), params(false));
        assert_eq!(surface.index_of(0, 0), Some(0));
        assert_eq!(surface.index_of(3, 1), Some(7));
        assert_eq!(surface.index_of(4, 0), None);
        assert_eq!(surface.index_of(0, 2), None);
        assert_eq!(surface.index_of(-1, 0), None);
    }

    #[test]
    fn test_single_buffered_swap_skips_driver() {
        let mut surface = Surface::new(MockDriver::new(), params(false));
        surface.start().unwrap();
        surface.swap(true);
        assert!(!surface
            .driver()
            .calls()
            .iter()
            .any(|c| matches!(c, DriverCall::Swap { .. })));
    }

    #[test]
    fn test_restart_resets_driver_first() {
        let mut surface = Surface::new(MockDriver::new(), params(false));
        surface.start().unwrap();
        surface.start().unwrap();
        let calls = surface.driver().calls();
        assert!(matches!(calls[0], DriverCall::Init(_)));
        assert_eq!(calls[1], DriverCall::Reset);
        assert!(matches!(calls[2], DriverCall::Init(_)));
    }
}
