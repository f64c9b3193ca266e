//! Speed conversions between output RPM, stepper RPM and sine frequency.
//!
//! One sine period on the quadrature pair advances the rotor four full
//! steps, so `sine_hz = (360 / step_angle) · (stepper_rpm / 60) / 4`.

/// Sine frequency for a stepper shaft speed.
///
/// Evaluated as `steps_per_rev · rpm / 240` so exact inputs stay exact
/// (7.5°, 250 rpm → 50.0 Hz).
#[inline]
pub fn stepper_rpm_to_sine_hz(step_angle_deg: f32, stepper_rpm: f32) -> f32 {
    let steps_per_rev = 360.0 / step_angle_deg;
    steps_per_rev * stepper_rpm / 240.0
}

/// Sine frequency for an output shaft speed behind a gearbox.
#[inline]
pub fn output_rpm_to_sine_hz(step_angle_deg: f32, gear_ratio: f32, output_rpm: f32) -> f32 {
    stepper_rpm_to_sine_hz(step_angle_deg, output_rpm * gear_ratio)
}

/// Output shaft speed for a sine frequency (inverse of
/// [`output_rpm_to_sine_hz`]).
#[inline]
pub fn sine_hz_to_output_rpm(step_angle_deg: f32, gear_ratio: f32, sine_hz: f32) -> f32 {
    let steps_per_rev = 360.0 / step_angle_deg;
    sine_hz * 240.0 / steps_per_rev / gear_ratio
}

/// Output RPM for a continuous (potentiometer) reading.
///
/// Logarithmic taper: `rpm = k / (1 - log10(v / adc_max))`. Full scale gives
/// `k`, smaller readings fall off towards zero.
///
/// Returns `None` for a zero reading: the taper is singular there and the
/// caller selects its stop speed instead. Readings above `adc_max` count as
/// full scale.
pub fn continuous_reading_to_rpm(reading: u16, adc_max: u16, k: f32) -> Option<f32> {
    if reading == 0 || adc_max == 0 {
        return None;
    }

    let ratio = reading.min(adc_max) as f32 / adc_max as f32;
    // ratio in (0, 1] so log10 <= 0 and the denominator >= 1
    Some(k / (1.0 - libm::log10f(ratio)))
}
