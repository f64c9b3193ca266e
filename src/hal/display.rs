//! Speed readout.
//!
//! The OLED renderer is outside this crate; the readout goes to the log
//! stream and from there to the console.

use crate::config::DisplayUnit;
use crate::control::DisplayAdapter;
use crate::log_globals::LOG_STREAM;

/// Console speed display
pub struct ConsoleDisplay {
    unit: DisplayUnit,
}

impl ConsoleDisplay {
    pub fn new(unit: DisplayUnit) -> Self {
        Self { unit }
    }
}

impl DisplayAdapter for ConsoleDisplay {
    fn show(&mut self, value: f32) {
        let suffix = match self.unit {
            DisplayUnit::Rpm => "rpm",
            DisplayUnit::Hertz => "Hz",
        };
        crate::rt_info!(LOG_STREAM, super::now_us(), "speed {:.2} {}", value, suffix);
    }
}
