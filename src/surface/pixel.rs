//! Pixel surfaces
//!
//! `Canvas16` stores RGB565 pixels. `Canvas8` stores palette indices into a
//! 256-entry RGB888 table held by the driver.

use super::{Canvas, Surface};
use crate::config::DisplayConfig;
use crate::core::{Pinout, Resolution};
use crate::driver::{Driver, InitParams, Mode};
use crate::error::Result;

/// Convert 24-bit RGB to an RGB565 pixel value
pub const fn color565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// The 3-3-2 palette loaded when a `Canvas8` starts
///
/// Red takes bits 5..=7, green bits 2..=4, blue bits 0..=1, and all 256
/// entries are filled. This differs from the stock driver table, which
/// used 2 bits of red and left entry 255 unset.
pub fn default_palette() -> [u32; 256] {
    let mut palette = [0u32; 256];
    for (i, entry) in palette.iter_mut().enumerate() {
        let r = ((i >> 5) & 7) as u32 * 255 / 7;
        let g = ((i >> 2) & 7) as u32 * 255 / 7;
        let b = (i & 3) as u32 * 255 / 3;
        *entry = (r << 16) | (g << 8) | b;
    }
    palette
}

fn pixel_params(
    pinout: Pinout,
    resolution: Resolution,
    mode: Mode,
    double_buffered: bool,
) -> InitParams {
    InitParams {
        width: resolution.width(),
        height: resolution.height(),
        mode,
        double_buffered,
        pinout,
    }
}

/// A 16-bit RGB565 canvas
#[derive(Debug)]
pub struct Canvas16<D: Driver> {
    surface: Surface<D>,
    resolution: Resolution,
}

impl<D: Driver> Canvas16<D> {
    pub fn new(driver: D, pinout: Pinout, resolution: Resolution, double_buffered: bool) -> Self {
        let params = pixel_params(pinout, resolution, Mode::Rgb565, double_buffered);
        Self {
            surface: Surface::new(driver, params),
            resolution,
        }
    }

    pub fn from_config(driver: D, config: &DisplayConfig) -> Self {
        Self::new(
            driver,
            config.pinout,
            config.resolution,
            config.double_buffered,
        )
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Start the output and clear to black
    pub fn start(&mut self) -> Result<()> {
        self.surface.start()?;
        self.fill(0);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.surface.stop();
    }

    pub fn is_running(&self) -> bool {
        self.surface.is_running()
    }

    /// See [`Surface::swap`]
    pub fn swap(&mut self, copy_framebuffer: bool) {
        self.surface.swap(copy_framebuffer);
    }

    /// Raw back buffer, row-major
    pub fn buffer(&self) -> Option<&[u16]> {
        self.surface.buffer()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut [u16]> {
        self.surface.buffer_mut()
    }

    pub fn surface(&self) -> &Surface<D> {
        &self.surface
    }

    pub fn driver(&self) -> &D {
        self.surface.driver()
    }
}

impl<D: Driver> Canvas for Canvas16<D> {
    type Pixel = u16;

    fn dimensions(&self) -> (u16, u16) {
        (self.surface.width(), self.surface.height())
    }

    fn pixel(&self, x: i32, y: i32) -> Option<u16> {
        self.surface.element(x, y)
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u16) {
        self.surface.set_element(x, y, value);
    }

    fn fill(&mut self, value: u16) {
        self.surface.fill_elements(value);
    }
}

/// An 8-bit paletted canvas
#[derive(Debug)]
pub struct Canvas8<D: Driver> {
    surface: Surface<D>,
    resolution: Resolution,
}

impl<D: Driver> Canvas8<D> {
    pub fn new(driver: D, pinout: Pinout, resolution: Resolution, double_buffered: bool) -> Self {
        let params = pixel_params(pinout, resolution, Mode::Palette, double_buffered);
        Self {
            surface: Surface::new(driver, params),
            resolution,
        }
    }

    pub fn from_config(driver: D, config: &DisplayConfig) -> Self {
        Self::new(
            driver,
            config.pinout,
            config.resolution,
            config.double_buffered,
        )
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Start the output, load the default palette and clear to index 0
    pub fn start(&mut self) -> Result<()> {
        self.surface.start()?;
        if let Some(palette) = self.surface.driver_mut().palette_mut() {
            *palette = default_palette();
        }
        self.fill(0);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.surface.stop();
    }

    pub fn is_running(&self) -> bool {
        self.surface.is_running()
    }

    /// See [`Surface::swap`]
    pub fn swap(&mut self, copy_framebuffer: bool) {
        self.surface.swap(copy_framebuffer);
    }

    /// Set a palette entry from components
    pub fn set_color(&mut self, idx: u8, r: u8, g: u8, b: u8) {
        let rgb = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
        self.set_color_rgb(idx, rgb);
    }

    /// Set a palette entry from `0x00RRGGBB`
    pub fn set_color_rgb(&mut self, idx: u8, rgb: u32) {
        if !self.surface.is_running() {
            return;
        }
        if let Some(palette) = self.surface.driver_mut().palette_mut() {
            palette[usize::from(idx)] = rgb & 0x00FF_FFFF;
        }
    }

    /// Read a palette entry
    pub fn color(&mut self, idx: u8) -> Option<u32> {
        if !self.surface.is_running() {
            return None;
        }
        self.surface
            .driver_mut()
            .palette_mut()
            .map(|p| p[usize::from(idx)])
    }

    pub fn buffer(&self) -> Option<&[u8]> {
        self.surface.buffer()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut [u8]> {
        self.surface.buffer_mut()
    }

    pub fn surface(&self) -> &Surface<D> {
        &self.surface
    }

    pub fn driver(&self) -> &D {
        self.surface.driver()
    }
}

impl<D: Driver> Canvas for Canvas8<D> {
    type Pixel = u8;

    fn dimensions(&self) -> (u16, u16) {
        (self.surface.width(), self.surface.height())
    }

    fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.surface.element(x, y)
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.surface.set_element(x, y, value);
    }

    fn fill(&mut self, value: u8) {
        self.surface.fill_elements(value);
    }
}
