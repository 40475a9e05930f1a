//! DVHSTX Display Surfaces
//!
//! Frame-buffer surfaces for HSTX digital video output. The video driver
//! (timing, pins, DMA) sits behind the `Driver` trait; this crate provides
//! the drawing surfaces on top of it:
//!
//! - `core`: resolutions, pinout, text attributes and cells
//! - `driver`: the driver contract plus simulated and recording drivers
//! - `surface`: surface lifecycle, buffer swapping, pixel canvases
//! - `console`: the 91x30 text console
//! - `config`: serializable display configuration

pub mod config;
pub mod console;
pub mod core;
pub mod driver;
pub mod error;
pub mod surface;

pub use config::DisplayConfig;
pub use console::TextConsole;
pub use error::{Error, Result};
pub use surface::{Canvas, Canvas16, Canvas8};
