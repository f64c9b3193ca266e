//! Quadrature waveform sampler
//!
//! Two phase indices walk the same sine table a quarter cycle apart.
//! Runs in the periodic context: one call per tick, O(1), no blocking,
//! no allocation, no logging.

use super::table::SineTable;

/// One pair of DAC codes produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratureSample {
    /// Channel A (leads B by 90°)
    pub a: u16,
    /// Channel B
    pub b: u16,
}

/// Sink for the two analog channels
///
/// Implementations write the codes straight to hardware (or record them
/// on the host). Must not block.
pub trait QuadratureOutput {
    fn write(&mut self, a: u16, b: u16);
}

/// Waveform sampler
///
/// Sole owner and writer of the phase indices. Invariant after every call:
/// `(index_a - index_b) mod N == N/4`.
pub struct WaveformSampler<'a, const N: usize> {
    table: &'a SineTable<N>,
    /// Phase index of channel A
    index_a: usize,
    /// Phase index of channel B
    index_b: usize,
}

impl<'a, const N: usize> WaveformSampler<'a, N> {
    /// Create sampler with channel A a quarter cycle ahead of channel B
    pub fn new(table: &'a SineTable<N>) -> Self {
        Self {
            table,
            index_a: N / 4,
            index_b: 0,
        }
    }

    /// Advance both phases by one sample and return the new codes
    #[inline]
    pub fn tick(&mut self) -> QuadratureSample {
        self.index_a = (self.index_a + 1) % N;
        self.index_b = (self.index_b + 1) % N;

        QuadratureSample {
            a: self.table.get(self.index_a),
            b: self.table.get(self.index_b),
        }
    }

    /// Advance and write the codes to `out`
    #[inline]
    pub fn tick_into<O: QuadratureOutput>(&mut self, out: &mut O) {
        let sample = self.tick();
        out.write(sample.a, sample.b);
    }

    /// Current phase index of channel A
    #[inline]
    pub fn index_a(&self) -> usize {
        self.index_a
    }

    /// Current phase index of channel B
    #[inline]
    pub fn index_b(&self) -> usize {
        self.index_b
    }

    /// Phase lead of channel A over channel B, in samples
    #[inline]
    pub fn phase_offset(&self) -> usize {
        (self.index_a + N - self.index_b) % N
    }
}
