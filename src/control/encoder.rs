//! Encoder count bookkeeping
//!
//! Quadrature decoding happens in the pulse counter peripheral, which sees
//! every edge of both channels however fast the shaft turns. Its counter is
//! only 16 bit and wraps to zero at the configured limits, so:
//! - [`PulseTotal`] folds the limit events (raised in the counter ISR) into
//!   a running 32-bit total
//! - [`DeltaTracker`] turns that total into the read/reset delta the
//!   controller consumes, without ever clearing the hardware counter

use core::sync::atomic::{AtomicI32, Ordering};

/// Running encoder total: limit wraps plus the live hardware count
pub struct PulseTotal {
    /// Sum of the limits the counter has reached and wrapped from
    wrapped: AtomicI32,
}

impl PulseTotal {
    pub const fn new() -> Self {
        Self {
            wrapped: AtomicI32::new(0),
        }
    }

    /// Counter reached `limit` and restarted from zero.
    ///
    /// Called from the counter ISR: one atomic add, nothing else.
    #[inline]
    pub fn on_limit(&self, limit: i16) {
        self.wrapped.fetch_add(limit as i32, Ordering::Relaxed);
    }

    /// Total count given the current hardware `counter` value
    #[inline]
    pub fn total(&self, counter: i16) -> i32 {
        self.wrapped
            .load(Ordering::Relaxed)
            .wrapping_add(counter as i32)
    }
}

impl Default for PulseTotal {
    fn default() -> Self {
        Self::new()
    }
}

/// Read/reset view over a monotonically updated total
///
/// A reset moves the baseline to the total returned by the last read, so
/// counts arriving between a read and its reset carry over to the next read.
/// A reset with no read pending discards everything up to `now`.
pub struct DeltaTracker {
    baseline: i32,
    last_read: Option<i32>,
}

impl DeltaTracker {
    /// Start counting from `total`
    pub fn new(total: i32) -> Self {
        Self {
            baseline: total,
            last_read: None,
        }
    }

    /// Counts since the baseline
    #[inline]
    pub fn delta(&mut self, total: i32) -> i32 {
        self.last_read = Some(total);
        total.wrapping_sub(self.baseline)
    }

    /// Consume the last read delta, or everything up to `total` if none
    #[inline]
    pub fn reset(&mut self, total: i32) {
        self.baseline = self.last_read.take().unwrap_or(total);
    }
}
