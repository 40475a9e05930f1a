//! Text console
//!
//! A fixed 91x30 grid of cells drawn by the driver at 1280x720 with an
//! 8-pixel-wide glyph. The console tracks a cursor and a current attribute
//! and implements teletype-style output: characters are written at the
//! cursor, the cursor wraps at the right edge and the grid scrolls at the
//! bottom.
//!
//! Recognized control bytes:
//! - `\r` returns to column 0
//! - `\n` moves down one row, scrolling at the bottom, column unchanged
//! - `\x08` moves left one column
//! - `\t` moves to the next multiple of 8, at most the pending-wrap column
//!
//! Every other byte is stored as a cell.

mod cursor;
mod snapshot;

use std::{fmt, io};

use crate::core::{Attribute, Background, Cell, Intensity, Pinout, TextColor};
use crate::driver::{Driver, InitParams, Mode};
use crate::error::{Error, Result};
use crate::surface::{Canvas, Surface};

pub use cursor::Cursor;
pub use snapshot::{ConsoleSnapshot, CursorSnapshot};

/// Columns of the text grid
pub const COLS: usize = 91;
/// Rows of the text grid
pub const ROWS: usize = 30;
/// Tab stop interval
pub const TAB_WIDTH: usize = 8;

/// A character-cell console on top of a text-mode surface
#[derive(Debug)]
pub struct TextConsole<D: Driver> {
    surface: Surface<D>,
    cursor: Cursor,
    attr: Attribute,
}

impl<D: Driver> TextConsole<D> {
    pub fn new(driver: D, pinout: Pinout) -> Self {
        let params = InitParams {
            width: COLS as u16,
            height: ROWS as u16,
            mode: Mode::TextRgb111,
            double_buffered: false,
            pinout,
        };
        Self {
            surface: Surface::new(driver, params),
            cursor: Cursor::new(),
            attr: Attribute::DEFAULT,
        }
    }

    /// Start the output and clear the grid with the current attribute
    pub fn start(&mut self) -> Result<()> {
        self.surface.start()?;
        self.clear();
        self.sync_cursor();
        Ok(())
    }

    pub fn stop(&mut self) {
        self.surface.stop();
    }

    pub fn is_running(&self) -> bool {
        self.surface.is_running()
    }

    /// Text mode is single buffered, so this returns immediately
    pub fn swap(&mut self, copy_framebuffer: bool) {
        self.surface.swap(copy_framebuffer);
    }

    pub fn cols(&self) -> usize {
        COLS
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Cursor column, 0..=91
    pub fn cursor_x(&self) -> usize {
        self.cursor.x
    }

    /// Cursor row, 0..=29
    pub fn cursor_y(&self) -> usize {
        self.cursor.y
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor.visible
    }

    /// Attribute used by subsequent writes, clears and scrolls
    pub fn attribute(&self) -> Attribute {
        self.attr
    }

    pub fn set_attribute(&mut self, attr: impl Into<Attribute>) {
        self.attr = attr.into();
    }

    pub fn set_color(&mut self, fg: TextColor, bg: Background, intensity: Intensity) {
        self.attr = Attribute::new(fg, bg, intensity);
    }

    pub fn driver(&self) -> &D {
        self.surface.driver()
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.surface.driver_mut()
    }

    /// Hide the block cursor
    pub fn hide_cursor(&mut self) {
        self.cursor.visible = false;
        self.surface.driver_mut().cursor_off();
    }

    /// Show the block cursor at the current position
    pub fn show_cursor(&mut self) {
        self.cursor.visible = true;
        self.sync_cursor();
    }

    /// Move the write position and the block cursor, if shown
    ///
    /// `x` is clamped to 0..=91 and `y` to 0..=29. At x = 91 the block is
    /// drawn on column 90 and the next character wraps to the next row.
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor.set_position(x, y, COLS, ROWS);
        self.sync_cursor();
    }

    /// Read back the cell at (x, y)
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= COLS || y >= ROWS {
            return None;
        }
        self.surface
            .buffer::<u16>()
            .and_then(|b| b.get(y * COLS + x))
            .map(|&v| Cell::unpack(v))
    }

    /// Set every cell to a space with the current attribute.
    /// The cursor does not move.
    pub fn clear(&mut self) {
        let blank = Cell::blank(self.attr).pack();
        self.surface.fill_elements(blank);
    }

    /// Write one byte at the cursor and advance
    ///
    /// Returns 1 when written and 0 when the console is not running.
    pub fn write_byte(&mut self, c: u8) -> usize {
        if !self.surface.is_running() {
            return 0;
        }
        match c {
            b'\r' => self.cursor.x = 0,
            b'\n' => self.line_feed(),
            0x08 => self.cursor.x = self.cursor.x.saturating_sub(1),
            b'\t' => self.cursor.x = ((self.cursor.x / TAB_WIDTH + 1) * TAB_WIDTH).min(COLS),
            _ => self.put(c),
        }
        self.sync_cursor();
        1
    }

    /// Write every byte of `s`, returning how many were written
    pub fn print(&mut self, s: &str) -> usize {
        s.bytes().map(|b| self.write_byte(b)).sum()
    }

    /// Capture the grid and cursor, if running
    pub fn snapshot(&self) -> Option<ConsoleSnapshot> {
        let buf = self.surface.buffer::<u16>()?;
        Some(ConsoleSnapshot::from_cells(
            COLS,
            ROWS,
            buf,
            &self.cursor,
            self.attr,
        ))
    }

    fn put(&mut self, c: u8) {
        if self.cursor.pending_wrap(COLS) {
            self.cursor.x = 0;
            self.line_feed();
        }

        let idx = self.cursor.y * COLS + self.cursor.x;
        let value = Cell::new(c, self.attr).pack();
        if let Some(slot) = self.surface.buffer_mut::<u16>().and_then(|b| b.get_mut(idx)) {
            *slot = value;
        }

        self.cursor.x += 1;
        if self.cursor.x == COLS {
            self.cursor.x = 0;
            self.line_feed();
        }
    }

    fn line_feed(&mut self) {
        if self.cursor.y + 1 >= ROWS {
            self.scroll_up();
            self.cursor.y = ROWS - 1;
        } else {
            self.cursor.y += 1;
        }
    }

    /// Drop row 0, move the rest up, blank the last row
    fn scroll_up(&mut self) {
        let blank = Cell::blank(self.attr).pack();
        if let Some(buf) = self.surface.buffer_mut::<u16>() {
            buf.copy_within(COLS.., 0);
            buf[(ROWS - 1) * COLS..].fill(blank);
        }
        tracing::trace!("Console scrolled");
    }

    fn sync_cursor(&mut self) {
        if self.cursor.visible {
            let (x, y) = self.cursor.glyph_position(COLS);
            self.surface.driver_mut().set_cursor(x, y);
        }
    }
}

impl<D: Driver> Canvas for TextConsole<D> {
    type Pixel = Cell;

    fn dimensions(&self) -> (u16, u16) {
        (COLS as u16, ROWS as u16)
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Cell> {
        self.surface.element::<u16>(x, y).map(Cell::unpack)
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: Cell) {
        self.surface.set_element(x, y, value.pack());
    }

    fn fill(&mut self, value: Cell) {
        self.surface.fill_elements(value.pack());
    }
}

impl<D: Driver> fmt::Write for TextConsole<D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if self.write_byte(b) == 0 {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

impl<D: Driver> io::Write for TextConsole<D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.is_running() {
            return Err(Error::NotStarted.into());
        }
        for &b in buf {
            self.write_byte(b);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
