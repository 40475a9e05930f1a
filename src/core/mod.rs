//! Display Core Module
//!
//! Plain value types shared by every surface:
//! - Resolutions and their output timing
//! - Pin assignment
//! - Text attributes and the packed character cell

mod attr;
mod cell;
mod pinout;
mod resolution;

pub use attr::{Attribute, Background, Intensity, TextColor};
pub use cell::Cell;
pub use pinout::Pinout;
pub use resolution::{OutputTiming, Resolution};
