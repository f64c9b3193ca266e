//! Module: config
//!
//! Purpose: Build-time configuration for the stepper drive.
//!
//! Architecture:
//! - Every tunable is a `const` on [`CONFIG`]; changing one means rebuilding
//! - Mechanical constants (step angle, gearing) and control limits live together
//!   so the controller and the firmware read the same numbers
//! - Invariants are checked at compile time, not at boot
//!
//! Safety: RT-safe. Plain constants, nothing mutable.

use crate::control::ControlMode;

/// Number of entries in the sine table (one full period).
///
/// Must be a multiple of 4 so the quarter-cycle offset is an exact index.
pub const SAMPLE_COUNT: usize = 600;

/// Which quantity the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayUnit {
    /// Output shaft speed in revolutions per minute.
    Rpm,
    /// Sine frequency on the coil outputs in Hz.
    Hertz,
}

/// Drive configuration
#[derive(Debug, Clone, Copy)]
pub struct DriveConfig {
    /// Table length N (mirrors [`SAMPLE_COUNT`])
    pub sample_count: usize,
    /// DAC resolution in bits
    pub dac_bits: u8,
    /// Motor full-step angle in degrees
    pub step_angle_deg: f32,
    /// Motor revolutions per output shaft revolution
    pub gear_ratio: f32,
    /// Output RPM selected when the preset toggle is off
    pub preset_rpm_left: f32,
    /// Output RPM selected when the preset toggle is on
    pub preset_rpm_right: f32,
    /// Lowest sine frequency in Hz
    pub min_freq_hz: f32,
    /// Highest sine frequency in Hz
    pub max_freq_hz: f32,
    /// Number of amplifier gain codes (RES)
    pub gain_steps: u16,
    /// Full-scale continuous reading
    pub adc_max: u16,
    /// Output RPM at full-scale continuous reading (K)
    pub continuous_rpm_scale: f32,
    /// Frequency change per encoder count in Hz
    pub encoder_step_hz: f32,
    /// Quantity sent to the display
    pub display_unit: DisplayUnit,
    /// Control mode at boot
    pub initial_mode: ControlMode,
    /// Minimum latch time of the mode button in microseconds
    pub mode_button_settle_us: i64,
    /// Control loop yield between polls in milliseconds
    pub control_interval_ms: u32,
}

/// The drive configuration baked into this build.
pub const CONFIG: DriveConfig = DriveConfig {
    sample_count: SAMPLE_COUNT,
    // ESP32 DAC channels are 8 bit
    dac_bits: 8,
    step_angle_deg: 7.5,
    gear_ratio: 7.342,
    preset_rpm_left: 33.333,
    preset_rpm_right: 45.0,
    min_freq_hz: 1.0,
    max_freq_hz: 100.0,
    // 7-bit digital potentiometer
    gain_steps: 128,
    // 12-bit ADC
    adc_max: 4095,
    continuous_rpm_scale: 60.0,
    encoder_step_hz: 0.05,
    display_unit: DisplayUnit::Rpm,
    initial_mode: ControlMode::Preset,
    mode_button_settle_us: 50_000,
    control_interval_ms: 5,
};

const _: () = {
    assert!(SAMPLE_COUNT % 4 == 0, "SAMPLE_COUNT must be a multiple of 4");
    assert!(CONFIG.sample_count == SAMPLE_COUNT);
    assert!(CONFIG.gain_steps >= 1 && CONFIG.gain_steps <= 256, "gain codes must fit in u8");
    assert!(CONFIG.dac_bits >= 1 && CONFIG.dac_bits <= 16, "DAC codes must fit in u16");
    assert!(CONFIG.adc_max > 0);
    assert!(CONFIG.min_freq_hz > 0.0 && CONFIG.min_freq_hz < CONFIG.max_freq_hz);
};
