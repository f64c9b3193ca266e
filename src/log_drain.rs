//! Log output.
//!
//! Drains a [`LogStream`] into any `core::fmt::Write` sink. The firmware
//! points it at the ESP-IDF console (UART0 through stdout), the host
//! simulation at stdout.
//!
//! Output format: `[timestamp_us] LEVEL: message`

use core::fmt::Write;

use crate::logging::{LogEntry, LogLevel, LogStream};

/// Format log entry to a writer.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn write_log_entry<W: Write>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Drain settings.
#[derive(Debug, Clone, Copy)]
pub struct DrainConfig {
    /// Entries more verbose than this are discarded
    pub max_level: LogLevel,
    /// Upper bound of entries written per call (keeps the loop responsive)
    pub batch: usize,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            max_level: LogLevel::Info,
            batch: 16,
        }
    }
}

/// Write pending entries to `out`.
///
/// Reports and resets the dropped counter when messages were lost.
/// Returns the number of entries taken from the stream.
pub fn drain_to<W: Write, const N: usize>(
    stream: &LogStream<N>,
    out: &mut W,
    config: &DrainConfig,
) -> usize {
    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = writeln!(out, "[WARN] Dropped: {} log messages", dropped);
        stream.reset_dropped();
    }

    let mut taken = 0;
    while taken < config.batch {
        let Some(entry) = stream.drain() else {
            break;
        };
        taken += 1;

        if entry.level <= config.max_level {
            let _ = write_log_entry(out, &entry);
        }
    }
    taken
}
