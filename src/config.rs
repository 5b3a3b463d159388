//! Timing configuration for the reader.

use std::time::Duration;

/// Time a mechanical reader needs to move one character past the read head.
pub const MECHANICAL_DELAY: Duration = Duration::from_millis(100);

/// Time an optical reader needs to move one character past the read head.
pub const OPTICAL_DELAY: Duration = Duration::from_micros(1850);

/// The speed class of a single read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Mechanical,
    Optical,
}

impl From<bool> for Speed {
    /// Map the processor's input unit flag, `true` selecting the fast unit.
    fn from(fast: bool) -> Speed {
        if fast {
            Speed::Optical
        } else {
            Speed::Mechanical
        }
    }
}

/// Per-pulse delivery delays for each speed class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    pub mechanical: Duration,
    pub optical: Duration,
}

impl ReaderConfig {
    pub fn new(mechanical: Duration, optical: Duration) -> ReaderConfig {
        ReaderConfig { mechanical, optical }
    }

    /// The delay before a pulse requested at `speed` is delivered.
    pub fn delay(&self, speed: Speed) -> Duration {
        match speed {
            Speed::Mechanical => self.mechanical,
            Speed::Optical => self.optical,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig::new(MECHANICAL_DELAY, OPTICAL_DELAY)
    }
}
