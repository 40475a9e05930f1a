//! HSTX pin assignment

use std::fmt;

use serde::{Deserialize, Serialize};

/// Positive ("P") pin of each differential lane
///
/// Boards that route HSTX to a connector use GPIO 12..=19; check the
/// board schematic when there is no picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pinout {
    /// Clock lane
    pub clock: u8,
    /// Data lanes 0, 1, 2
    pub data: [u8; 3],
}

impl Pinout {
    pub const fn new(clock: u8, d0: u8, d1: u8, d2: u8) -> Self {
        Self {
            clock,
            data: [d0, d1, d2],
        }
    }

    /// All four pins in lane order: clock, data 0, data 1, data 2
    pub fn pins(&self) -> [u8; 4] {
        [self.clock, self.data[0], self.data[1], self.data[2]]
    }
}

impl Default for Pinout {
    fn default() -> Self {
        Self::new(12, 14, 16, 18)
    }
}

impl fmt::Display for Pinout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}}",
            self.clock, self.data[0], self.data[1], self.data[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pinout() {
        let pinout = Pinout::default();
        assert_eq!(pinout.pins(), [12, 14, 16, 18]);
        assert_eq!(pinout.to_string(), "{12, 14, 16, 18}");
    }
}
