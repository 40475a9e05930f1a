//! Console snapshots
//!
//! A snapshot captures the grid and cursor in a serializable form for tests
//! and the headless runner. The same byte stream always yields the same
//! snapshot.

use serde::{Deserialize, Serialize};

use super::cursor::Cursor;
use crate::core::{Attribute, Cell};
use crate::error::Result;

/// Placeholder for characters without a glyph
const NO_GLYPH: char = '?';

/// Grid content plus cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSnapshot {
    pub cols: usize,
    pub rows: usize,
    /// One string per row, exactly `cols` characters each
    pub lines: Vec<String>,
    /// Attribute byte of every cell, row-major
    pub attributes: Vec<Vec<u8>>,
    pub cursor: CursorSnapshot,
    /// Attribute used for the next write
    pub attribute: u8,
}

/// Snapshot of cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub x: usize,
    pub y: usize,
    pub visible: bool,
}

impl From<&Cursor> for CursorSnapshot {
    fn from(cursor: &Cursor) -> Self {
        Self {
            x: cursor.x,
            y: cursor.y,
            visible: cursor.visible,
        }
    }
}

impl ConsoleSnapshot {
    pub(crate) fn from_cells(
        cols: usize,
        rows: usize,
        cells: &[u16],
        cursor: &Cursor,
        attr: Attribute,
    ) -> Self {
        let mut lines = Vec::with_capacity(rows);
        let mut attributes = Vec::with_capacity(rows);
        for row in cells.chunks(cols).take(rows) {
            let cells: Vec<Cell> = row.iter().map(|&v| Cell::unpack(v)).collect();
            lines.push(
                cells
                    .iter()
                    .map(|c| {
                        if c.has_glyph() {
                            char::from(c.ch)
                        } else {
                            NO_GLYPH
                        }
                    })
                    .collect(),
            );
            attributes.push(cells.iter().map(|c| c.attr.bits()).collect());
        }

        Self {
            cols,
            rows,
            lines,
            attributes,
            cursor: cursor.into(),
            attribute: attr.bits(),
        }
    }

    /// Grid as plain text, trailing blanks trimmed from each row
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.trim_end_matches(' '));
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Background, TextColor};

    fn sample() -> ConsoleSnapshot {
        let attr = TextColor::Yellow | Background::Blue;
        let cells: Vec<u16> = [b'h', b'i', b' ', 0x01, b' ', b' ']
            .iter()
            .map(|&c| Cell::new(c, attr).pack())
            .collect();
        let cursor = Cursor {
            x: 2,
            y: 0,
            visible: true,
        };
        ConsoleSnapshot::from_cells(3, 2, &cells, &cursor, attr)
    }

    #[test]
    fn test_lines_and_attributes() {
        let snap = sample();
        assert_eq!(snap.lines, vec!["hi ".to_string(), "?  ".to_string()]);
        assert_eq!(snap.attributes[1], vec![0x1C, 0x1C, 0x1C]);
        assert_eq!(snap.cursor, CursorSnapshot { x: 2, y: 0, visible: true });
    }

    #[test]
    fn test_to_text_trims() {
        assert_eq!(sample().to_text(), "hi\n?\n");
    }

    #[test]
    fn test_json_round_trip() {
        let snap = sample();
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"lines\""));
        assert_eq!(ConsoleSnapshot::from_json(&json).unwrap(), snap);
    }
}
