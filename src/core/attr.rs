//! Text attributes
//!
//! An attribute is one byte split into three fields:
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//! [inten ][ background][foreground]
//! ```
//!
//! Fields are combined with `|`. Combining two values of the same field is
//! meaningless and yields an undefined, but harmless, color.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Foreground color (bits 0..=2)
///
/// The stock driver headers name seven foregrounds. `Cyan` fills the
/// remaining 3-bit value and is an extension; drivers render it like any
/// other RGB111 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TextColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
    Yellow = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

/// Background color (bits 3..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Background {
    Black = 0,
    Red = 1 << 3,
    Green = 2 << 3,
    Blue = 3 << 3,
    Yellow = 4 << 3,
    Magenta = 5 << 3,
    Cyan = 6 << 3,
    White = 7 << 3,
}

/// Foreground intensity (bits 6..=7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Intensity {
    #[default]
    Normal = 0,
    Low = 1 << 6,
    VeryLow = 1 << 7,
}

/// A packed foreground/background/intensity selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(u8);

impl Attribute {
    pub const FOREGROUND_MASK: u8 = 0b0000_0111;
    pub const BACKGROUND_MASK: u8 = 0b0011_1000;
    pub const INTENSITY_MASK: u8 = 0b1100_0000;

    /// White on black at normal intensity
    pub const DEFAULT: Attribute = Attribute(TextColor::White as u8);

    /// Compose an attribute from its three fields
    pub const fn new(fg: TextColor, bg: Background, intensity: Intensity) -> Self {
        Attribute(fg as u8 | bg as u8 | intensity as u8)
    }

    /// Wrap a raw attribute byte. Any value is accepted.
    pub const fn from_bits(bits: u8) -> Self {
        Attribute(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Attribute {
    fn from(bits: u8) -> Self {
        Attribute(bits)
    }
}

impl From<Attribute> for u8 {
    fn from(attr: Attribute) -> Self {
        attr.0
    }
}

impl From<TextColor> for Attribute {
    fn from(fg: TextColor) -> Self {
        Attribute(fg as u8)
    }
}

impl From<Background> for Attribute {
    fn from(bg: Background) -> Self {
        Attribute(bg as u8)
    }
}

impl From<Intensity> for Attribute {
    fn from(intensity: Intensity) -> Self {
        Attribute(intensity as u8)
    }
}

impl<T: Into<Attribute>> BitOr<T> for Attribute {
    type Output = Attribute;

    fn bitor(self, rhs: T) -> Attribute {
        Attribute(self.0 | rhs.into().0)
    }
}

impl<T: Into<Attribute>> BitOr<T> for TextColor {
    type Output = Attribute;

    fn bitor(self, rhs: T) -> Attribute {
        Attribute::from(self) | rhs
    }
}

impl<T: Into<Attribute>> BitOr<T> for Background {
    type Output = Attribute;

    fn bitor(self, rhs: T) -> Attribute {
        Attribute::from(self) | rhs
    }
}

impl<T: Into<Attribute>> BitOr<T> for Intensity {
    type Output = Attribute;

    fn bitor(self, rhs: T) -> Attribute {
        Attribute::from(self) | rhs
    }
}
