//! Console cursor state
//!
//! The logical column may sit one past the last column. That position means
//! "pending wrap": the glyph is drawn on the last column, but the next
//! printable character lands at the start of the next row.

/// Cursor position and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Column, 0..=cols
    pub x: usize,
    /// Row, 0..rows
    pub y: usize,
    /// Whether the block cursor is shown
    pub visible: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to (x, y), clamping x into 0..=cols and y into 0..rows
    pub fn set_position(&mut self, x: i32, y: i32, cols: usize, rows: usize) {
        self.x = usize::try_from(x).unwrap_or(0).min(cols);
        self.y = usize::try_from(y).unwrap_or(0).min(rows.saturating_sub(1));
    }

    /// Whether the next printable character must wrap first
    pub fn pending_wrap(&self, cols: usize) -> bool {
        self.x >= cols
    }

    /// Position of the block glyph. Never past the last column.
    pub fn glyph_position(&self, cols: usize) -> (u16, u16) {
        let x = self.x.min(cols.saturating_sub(1));
        (
            u16::try_from(x).unwrap_or(u16::MAX),
            u16::try_from(self.y).unwrap_or(u16::MAX),
        )
    }
}
