//! Console Cell
//!
//! A single character cell of the text grid. In the frame buffer a cell is
//! one `u16`: the character in the low byte, the attribute in the high byte.

use serde::{Deserialize, Serialize};

use super::attr::Attribute;

/// A character plus its display attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Character code. Glyphs exist for 32..=126; others are driver-defined.
    pub ch: u8,
    /// Display attribute
    pub attr: Attribute,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Attribute::DEFAULT)
    }
}

impl Cell {
    /// First character code with a glyph
    pub const FIRST_GLYPH: u8 = b' ';
    /// Last character code with a glyph
    pub const LAST_GLYPH: u8 = b'~';

    pub const fn new(ch: u8, attr: Attribute) -> Self {
        Self { ch, attr }
    }

    /// A space carrying `attr`, used to clear and scroll
    pub const fn blank(attr: Attribute) -> Self {
        Self { ch: b' ', attr }
    }

    /// Pack into the frame buffer layout
    pub const fn pack(self) -> u16 {
        self.ch as u16 | ((self.attr.bits() as u16) << 8)
    }

    /// Unpack from the frame buffer layout
    pub const fn unpack(value: u16) -> Self {
        Self {
            ch: (value & 0xFF) as u8,
            attr: Attribute::from_bits((value >> 8) as u8),
        }
    }

    /// Whether the driver has a glyph for this character
    pub fn has_glyph(&self) -> bool {
        (Self::FIRST_GLYPH..=Self::LAST_GLYPH).contains(&self.ch)
    }
}

impl From<Cell> for u16 {
    fn from(cell: Cell) -> Self {
        cell.pack()
    }
}

impl From<u16> for Cell {
    fn from(value: u16) -> Self {
        Cell::unpack(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Background, Intensity, TextColor};

    #[test]
    fn test_cell_default() {
        let cell = Cell::default();
        assert_eq!(cell.ch, b' ');
        assert_eq!(cell.attr, Attribute::DEFAULT);
    }

    #[test]
    fn test_pack_layout() {
        let attr = TextColor::Green | Background::Blue | Intensity::Low;
        let cell = Cell::new(b'A', attr);
        assert_eq!(cell.pack(), 0x41 | (u16::from(attr.bits()) << 8));
        assert_eq!(cell.pack() & 0xFF, 0x41);
        assert_eq!(cell.pack() >> 8, u16::from(attr.bits()));
        assert_eq!(Cell::unpack(cell.pack()), cell);
    }

    #[test]
    fn test_has_glyph() {
        assert!(Cell::new(b' ', Attribute::DEFAULT).has_glyph());
        assert!(Cell::new(b'~', Attribute::DEFAULT).has_glyph());
        assert!(!Cell::new(0x7F, Attribute::DEFAULT).has_glyph());
        assert!(!Cell::new(b'\n', Attribute::DEFAULT).has_glyph());
    }
}
