//! Frequency-dependent amplifier gain.
//!
//! Coil impedance rises with frequency, so the amplifier gain is raised
//! linearly with the target frequency to keep the current roughly flat.

/// Discrete gain setting sent to the amplifier (`0..gain_steps`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GainCode(pub u8);

impl GainCode {
    /// Raw code
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Gain code for `freq_hz`.
///
/// `floor((steps - 1) · freq / max_freq)`, clamped to `[0, steps - 1]`.
/// Monotonic non-decreasing in `freq_hz`. A NaN frequency maps to 0.
///
/// `steps` is the number of codes the amplifier accepts (1..=256).
pub fn gain_for_frequency(freq_hz: f32, max_freq_hz: f32, steps: u16) -> GainCode {
    let top = steps.clamp(1, 256) - 1;
    let raw = libm::floorf(top as f32 * freq_hz / max_freq_hz);

    // `as` saturates and maps NaN to 0
    let code = (raw as i32).clamp(0, top as i32);
    GainCode(code as u8)
}
