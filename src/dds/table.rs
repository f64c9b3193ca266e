//! Sine lookup table for the coil outputs
//!
//! One full period, shifted into the unsigned DAC range.
//! Built once at startup, read-only afterwards.

/// Quantized sine table of `N` samples
///
/// `table[i] = round((1 + sin(2π·i/N)) · (2^R - 1) / 2)`
///
/// Index 0 and N/2 sit on the vertical midpoint, N/4 on the peak,
/// 3N/4 on the trough. `N` should be a multiple of 4; otherwise the
/// quadrature offset used by the sampler is only approximate.
#[derive(Clone)]
pub struct SineTable<const N: usize> {
    samples: [u16; N],
    resolution_bits: u8,
}

impl<const N: usize> SineTable<N> {
    /// Build the table for a DAC of `resolution_bits` (1..=16)
    pub fn build(resolution_bits: u8) -> Self {
        let bits = resolution_bits.clamp(1, 16);
        let max_code = ((1u32 << bits) - 1) as f64;
        let half_span = max_code / 2.0;

        let mut samples = [0u16; N];
        for (i, sample) in samples.iter_mut().enumerate() {
            let angle = 2.0 * core::f64::consts::PI * i as f64 / N as f64;
            // libm::round rounds half away from zero
            let value = libm::round((1.0 + libm::sin(angle)) * half_span);
            *sample = value.clamp(0.0, max_code) as u16;
        }

        Self {
            samples,
            resolution_bits: bits,
        }
    }

    /// Number of samples (one period)
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false for a usable table
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Index distance of a quarter cycle (90°)
    #[inline]
    pub const fn quarter(&self) -> usize {
        N / 4
    }

    /// DAC resolution the table was built for
    #[inline]
    pub fn resolution_bits(&self) -> u8 {
        self.resolution_bits
    }

    /// Largest code the DAC accepts (2^R - 1)
    #[inline]
    pub fn max_code(&self) -> u16 {
        ((1u32 << self.resolution_bits) - 1) as u16
    }

    /// Sample at `index`
    ///
    /// Callers keep `index` in `[0, N)`; the sampler guarantees this by
    /// wrapping modulo N.
    #[inline]
    pub fn get(&self, index: usize) -> u16 {
        self.samples[index]
    }

    /// Whole table
    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }
}
