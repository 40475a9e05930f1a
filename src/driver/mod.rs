//! Video driver interface
//!
//! The driver owns the frame buffers, the palette and the hardware cursor.
//! Surfaces only ever borrow the current back buffer for the duration of a
//! single call, so no reference can outlive `reset()`.
//!
//! Two implementations ship with the crate:
//! - `SimDriver`: in-memory buffers plus a background retrace clock
//! - `MockDriver`: records every call for tests

mod frames;
pub mod mock;
pub mod sim;

use std::io;

use bytemuck::Pod;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Pinout;

pub use mock::{DriverCall, MockDriver};
pub use sim::SimDriver;

pub(crate) use frames::FrameStore;

/// Frame buffer layout requested from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// 16 bits per pixel, RGB565
    Rgb565,
    /// 8 bits per pixel, index into a 256-entry RGB888 palette
    Palette,
    /// 16 bits per cell, character plus RGB111 attribute
    TextRgb111,
}

impl Mode {
    /// Size in bytes of one buffer element
    pub const fn bytes_per_element(self) -> usize {
        match self {
            Mode::Rgb565 | Mode::TextRgb111 => 2,
            Mode::Palette => 1,
        }
    }
}

/// Everything the driver needs to bring up the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    /// Width in pixels, or columns in text mode
    pub width: u16,
    /// Height in pixels, or rows in text mode
    pub height: u16,
    pub mode: Mode,
    pub double_buffered: bool,
    pub pinout: Pinout,
}

impl InitParams {
    /// Number of elements in one buffer
    pub fn element_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Bytes needed for all buffers
    pub fn buffer_bytes(&self) -> usize {
        let buffers = if self.double_buffered { 2 } else { 1 };
        self.element_count() * self.mode.bytes_per_element() * buffers
    }
}

/// Driver error type
#[derive(Error, Debug)]
pub enum DriverError {
    /// Mode and dimensions cannot be driven
    #[error("Unsupported mode {mode:?} at {width}x{height}")]
    Unsupported { mode: Mode, width: u16, height: u16 },

    /// Pins are not usable for HSTX
    #[error("Invalid pinout: {0}")]
    InvalidPinout(Pinout),

    /// `init` called without an intervening `reset`
    #[error("Driver already running")]
    AlreadyRunning,

    /// Frame buffers do not fit in memory
    #[error("Cannot allocate {bytes} bytes of frame buffer (limit {limit})")]
    Allocation { bytes: usize, limit: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Driver refused to start
    #[error("Driver rejected start: {0}")]
    Rejected(String),
}

/// The contract a video driver offers to surfaces
///
/// Buffer accessors return `None` until `init` succeeds and again after
/// `reset`. `T` must match the element size of the active mode.
pub trait Driver {
    /// Bring up the output and allocate buffers
    fn init(&mut self, params: &InitParams) -> Result<(), DriverError>;

    /// The buffer being drawn into
    fn back_buffer<T: Pod>(&self) -> Option<&[T]>;

    /// The buffer being drawn into, mutably
    fn back_buffer_mut<T: Pod>(&mut self) -> Option<&mut [T]>;

    /// Palette entries as `0x00RRGGBB`. Only present in `Mode::Palette`.
    fn palette_mut(&mut self) -> Option<&mut [u32; 256]>;

    /// Show the block cursor at a cell position
    fn set_cursor(&mut self, x: u16, y: u16);

    /// Hide the block cursor
    fn cursor_off(&mut self);

    /// Tear down the output. Safe to call when not running.
    fn reset(&mut self);

    /// Wait for retrace and exchange front and back buffers.
    ///
    /// With `copy_framebuffer` the new front's content is copied into the
    /// new back before returning. A no-op unless double buffered.
    fn swap(&mut self, copy_framebuffer: bool);
}
