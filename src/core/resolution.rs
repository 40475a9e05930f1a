//! Video resolutions
//!
//! Every pixel-mode resolution is scaled up by the driver onto one of a
//! handful of physical output modes. The table below is the single source
//! of truth for both the logical canvas size and the physical timing.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Available video resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// Aspect ratio 16:9, output 1280x720@50Hz
    #[serde(rename = "320x180")]
    R320x180,
    /// Aspect ratio 16:9, output 1280x720@50Hz
    #[default]
    #[serde(rename = "640x360")]
    R640x360,
    /// Aspect ratio 16:9, output 960x540@60Hz (sometimes supported)
    #[serde(rename = "480x270")]
    R480x270,
    /// Aspect ratio 16:9, output 800x450@60Hz (sometimes supported)
    #[serde(rename = "400x225")]
    R400x225,
    /// Aspect ratio 4:3, output 640x480@60Hz
    #[serde(rename = "320x240")]
    R320x240,
    /// Aspect ratio 4:3, output 640x480@60Hz
    #[serde(rename = "640x480")]
    R640x480,
    /// Aspect ratio 3:2, output 720x480@60Hz
    #[serde(rename = "360x240")]
    R360x240,
    /// Aspect ratio 9:5, output 720x400@70Hz
    #[serde(rename = "360x200")]
    R360x200,
    /// Aspect ratio 9:5, output 720x400@70Hz
    #[serde(rename = "720x400")]
    R720x400,
    /// Aspect ratio 5:4, output 720x576@60Hz
    #[serde(rename = "360x288")]
    R360x288,
    /// Aspect ratio 4:3, output 800x600@60Hz
    #[serde(rename = "400x300")]
    R400x300,
    /// Aspect ratio 4:3, output 1024x768@60Hz
    #[serde(rename = "512x384")]
    R512x384,
    /// Aspect ratio 5:3, output 800x480@60Hz (pixels aren't square on 16:9)
    #[serde(rename = "400x240")]
    R400x240,
}

/// Physical output timing a resolution is scaled onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTiming {
    pub width: u16,
    pub height: u16,
    pub refresh_hz: u16,
}

impl OutputTiming {
    /// The fixed output used by the text console
    pub const TEXT: OutputTiming = OutputTiming {
        width: 1280,
        height: 720,
        refresh_hz: 60,
    };

    /// Duration of one frame at this refresh rate
    pub fn frame_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.refresh_hz.max(1)))
    }
}

impl Resolution {
    /// All resolutions, in declaration order
    pub const ALL: [Resolution; 13] = [
        Resolution::R320x180,
        Resolution::R640x360,
        Resolution::R480x270,
        Resolution::R400x225,
        Resolution::R320x240,
        Resolution::R640x480,
        Resolution::R360x240,
        Resolution::R360x200,
        Resolution::R720x400,
        Resolution::R360x288,
        Resolution::R400x300,
        Resolution::R512x384,
        Resolution::R400x240,
    ];

    /// Logical (width, height) in pixels
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            Resolution::R320x180 => (320, 180),
            Resolution::R640x360 => (640, 360),
            Resolution::R480x270 => (480, 270),
            Resolution::R400x225 => (400, 225),
            Resolution::R320x240 => (320, 240),
            Resolution::R640x480 => (640, 480),
            Resolution::R360x240 => (360, 240),
            Resolution::R360x200 => (360, 200),
            Resolution::R720x400 => (720, 400),
            Resolution::R360x288 => (360, 288),
            Resolution::R400x300 => (400, 300),
            Resolution::R512x384 => (512, 384),
            Resolution::R400x240 => (400, 240),
        }
    }

    pub const fn width(self) -> u16 {
        self.dimensions().0
    }

    pub const fn height(self) -> u16 {
        self.dimensions().1
    }

    /// Physical output mode this resolution is scaled onto
    pub const fn timing(self) -> OutputTiming {
        let (width, height, refresh_hz) = match self {
            Resolution::R320x180 | Resolution::R640x360 => (1280, 720, 50),
            Resolution::R480x270 => (960, 540, 60),
            Resolution::R400x225 => (800, 450, 60),
            Resolution::R320x240 | Resolution::R640x480 => (640, 480, 60),
            Resolution::R360x240 => (720, 480, 60),
            Resolution::R360x200 | Resolution::R720x400 => (720, 400, 70),
            Resolution::R360x288 => (720, 576, 60),
            Resolution::R400x300 => (800, 600, 60),
            Resolution::R512x384 => (1024, 768, 60),
            Resolution::R400x240 => (800, 480, 60),
        };
        OutputTiming {
            width,
            height,
            refresh_hz,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{}x{}", w, h)
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidResolution(s.to_string()))?;
        let w: u16 = w
            .parse()
            .map_err(|_| Error::InvalidResolution(s.to_string()))?;
        let h: u16 = h
            .parse()
            .map_err(|_| Error::InvalidResolution(s.to_string()))?;
        Resolution::ALL
            .into_iter()
            .find(|r| r.dimensions() == (w, h))
            .ok_or_else(|| Error::InvalidResolution(s.to_string()))
    }
}
