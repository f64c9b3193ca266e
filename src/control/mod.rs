//! Frequency control pipeline.
//!
//! Pure logic, no hardware dependencies. Reads the active control input,
//! turns it into a clamped target frequency, and on change retargets the
//! sample period, the amplifier gain and the display. Fully testable on host.
//!
//! # Modes
//!
//! - **Preset**: toggle picks one of two precomputed speeds
//! - **Continuous**: potentiometer through a logarithmic taper
//! - **Incremental**: encoder counts nudge the current frequency
//!
//! # Rules
//!
//! - Only a changed frequency (exact inequality) reaches the scheduler,
//!   the gain driver and the display
//! - Retarget order: period → gain → display
//! - Peripheral failures are logged, never retried, never fatal

pub mod curve;
pub mod encoder;
pub mod mode_button;

pub use encoder::{DeltaTracker, PulseTotal};
pub use mode_button::{ButtonState, ModeButton};

use crate::config::{DisplayUnit, DriveConfig};
use crate::gain::{gain_for_frequency, GainCode};
use crate::log_globals::LOG_STREAM;
use crate::scheduler::{SamplePeriod, Scheduler};

/// Source of the target frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// Binary toggle between two preset speeds.
    Preset,
    /// Continuous reading through a logarithmic taper.
    Continuous,
    /// Encoder counts added to the current frequency.
    Incremental,
}

impl ControlMode {
    /// Mode selected by the next button press.
    #[inline]
    pub fn next(self) -> Self {
        match self {
            ControlMode::Preset => ControlMode::Continuous,
            ControlMode::Continuous => ControlMode::Incremental,
            ControlMode::Incremental => ControlMode::Preset,
        }
    }

    /// Short name for logs and displays.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Preset => "preset",
            ControlMode::Continuous => "continuous",
            ControlMode::Incremental => "incremental",
        }
    }
}

/// Raw control inputs.
pub trait ControlInput {
    /// Continuous reading in `[0, adc_max]`.
    fn read_continuous(&mut self) -> u16;

    /// Encoder counts accumulated since the last reset.
    fn read_incremental_delta(&mut self) -> i32;

    /// Zero the encoder accumulator.
    fn reset_incremental_delta(&mut self);

    /// Preset toggle position (`true` selects the right-hand preset).
    fn read_preset_toggle(&mut self) -> bool;

    /// Raw mode button level (`true` while held).
    fn read_mode_button(&mut self) -> bool;
}

/// Amplifier gain chip.
pub trait GainDriver {
    type Error: core::fmt::Debug;

    /// Write one gain code in a single bus transaction.
    fn set_gain(&mut self, code: GainCode) -> Result<(), Self::Error>;
}

/// Speed readout. Best effort, no acknowledgement.
pub trait DisplayAdapter {
    fn show(&mut self, value: f32);
}

/// Frequency controller
///
/// Single owner of the target frequency and the scheduler. The sampler state
/// lives in the scheduler's callback and is never touched here.
pub struct FrequencyController<S: Scheduler, G: GainDriver, D: DisplayAdapter> {
    scheduler: S,
    gain: G,
    display: D,

    // Build-time parameters
    sample_count: usize,
    step_angle_deg: f32,
    gear_ratio: f32,
    min_freq_hz: f32,
    max_freq_hz: f32,
    gain_steps: u16,
    adc_max: u16,
    continuous_rpm_scale: f32,
    encoder_step_hz: f32,
    display_unit: DisplayUnit,

    // Precomputed, pre-clamped presets
    preset_left_hz: f32,
    preset_right_hz: f32,

    // Control state
    frequency: f32,
    mode: ControlMode,
    mode_button: ModeButton,
    /// Encoder counts gathered outside Incremental mode are thrown away
    discard_delta: bool,
}

impl<S: Scheduler, G: GainDriver, D: DisplayAdapter> FrequencyController<S, G, D> {
    /// Create controller. Nothing is started until [`start`](Self::start).
    ///
    /// The initial frequency is the left preset.
    pub fn new(config: &DriveConfig, scheduler: S, gain: G, display: D) -> Self {
        let min = config.min_freq_hz;
        let max = config.max_freq_hz;
        let preset = |rpm: f32| {
            clamp_frequency(
                curve::output_rpm_to_sine_hz(config.step_angle_deg, config.gear_ratio, rpm),
                min,
                max,
            )
        };
        let preset_left_hz = preset(config.preset_rpm_left);
        let preset_right_hz = preset(config.preset_rpm_right);

        Self {
            scheduler,
            gain,
            display,
            sample_count: config.sample_count.max(1),
            step_angle_deg: config.step_angle_deg,
            gear_ratio: config.gear_ratio,
            min_freq_hz: min,
            max_freq_hz: max,
            gain_steps: config.gain_steps,
            adc_max: config.adc_max,
            continuous_rpm_scale: config.continuous_rpm_scale,
            encoder_step_hz: config.encoder_step_hz,
            display_unit: config.display_unit,
            preset_left_hz,
            preset_right_hz,
            frequency: preset_left_hz,
            mode: config.initial_mode,
            mode_button: ModeButton::new(config.mode_button_settle_us),
            discard_delta: config.initial_mode == ControlMode::Incremental,
        }
    }

    /// Start the sampler at the current frequency and push gain and display.
    pub fn start(&mut self, now_us: i64) {
        let period = self.period();
        if let Err(e) = self.scheduler.start(period) {
            crate::rt_error!(LOG_STREAM, now_us, "scheduler start failed: {:?}", e);
        }
        self.dispatch_gain(now_us);
        self.dispatch_display();

        crate::rt_info!(
            LOG_STREAM,
            now_us,
            "drive started: {} mode, {:.3} Hz, period {:.2} us",
            self.mode.as_str(),
            self.frequency,
            period.as_micros()
        );
    }

    /// One control loop iteration.
    ///
    /// Handles the mode button, computes the candidate for the active mode
    /// and retargets if it differs from the current frequency.
    ///
    /// # Returns
    /// `true` if the frequency changed
    pub fn poll<I: ControlInput>(&mut self, now_us: i64, input: &mut I) -> bool {
        if self.mode_button.update(now_us, input.read_mode_button()) {
            self.set_mode(now_us, self.mode.next());
        }

        let candidate = self.candidate(input);
        self.retarget(now_us, candidate)
    }

    /// Switch control mode.
    ///
    /// Entering Incremental discards encoder counts made meanwhile.
    pub fn set_mode(&mut self, now_us: i64, mode: ControlMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        if mode == ControlMode::Incremental {
            self.discard_delta = true;
        }
        crate::rt_info!(LOG_STREAM, now_us, "mode -> {}", mode.as_str());
    }

    /// Unclamped target for the active mode.
    fn candidate<I: ControlInput>(&mut self, input: &mut I) -> f32 {
        match self.mode {
            ControlMode::Preset => {
                if input.read_preset_toggle() {
                    self.preset_right_hz
                } else {
                    self.preset_left_hz
                }
            }
            ControlMode::Continuous => {
                let reading = input.read_continuous();
                match curve::continuous_reading_to_rpm(reading, self.adc_max, self.continuous_rpm_scale) {
                    Some(rpm) => curve::output_rpm_to_sine_hz(self.step_angle_deg, self.gear_ratio, rpm),
                    None => self.min_freq_hz,
                }
            }
            ControlMode::Incremental => {
                if self.discard_delta {
                    input.reset_incremental_delta();
                    self.discard_delta = false;
                    return self.frequency;
                }
                let delta = input.read_incremental_delta();
                input.reset_incremental_delta();
                self.frequency + delta as f32 * self.encoder_step_hz
            }
        }
    }

    /// Clamp `candidate` and, if it differs from the current frequency,
    /// run the retarget cascade: period, gain, display.
    ///
    /// # Returns
    /// `true` if the frequency changed
    pub fn retarget(&mut self, now_us: i64, candidate: f32) -> bool {
        let next = clamp_frequency(candidate, self.min_freq_hz, self.max_freq_hz);
        if next == self.frequency {
            return false;
        }
        self.frequency = next;

        let period = self.period();
        if let Err(e) = self.scheduler.reconfigure(period) {
            crate::rt_error!(LOG_STREAM, now_us, "scheduler reconfigure failed: {:?}", e);
        }
        let code = self.dispatch_gain(now_us);
        self.dispatch_display();

        crate::rt_debug!(
            LOG_STREAM,
            now_us,
            "retarget {:.3} Hz, period {:.2} us, gain {}",
            next,
            period.as_micros(),
            code.value()
        );
        true
    }

    fn dispatch_gain(&mut self, now_us: i64) -> GainCode {
        let code = self.gain_code();
        if let Err(e) = self.gain.set_gain(code) {
            crate::rt_warn!(LOG_STREAM, now_us, "gain write {} failed: {:?}", code.value(), e);
        }
        code
    }

    fn dispatch_display(&mut self) {
        let value = self.display_value();
        self.display.show(value);
    }

    /// Current target frequency in Hz.
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Active control mode.
    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Sample period for the current frequency.
    #[inline]
    pub fn period(&self) -> SamplePeriod {
        SamplePeriod::for_frequency(self.frequency, self.sample_count)
    }

    /// Gain code for the current frequency.
    #[inline]
    pub fn gain_code(&self) -> GainCode {
        gain_for_frequency(self.frequency, self.max_freq_hz, self.gain_steps)
    }

    /// Output shaft speed for the current frequency.
    #[inline]
    pub fn output_rpm(&self) -> f32 {
        curve::sine_hz_to_output_rpm(self.step_angle_deg, self.gear_ratio, self.frequency)
    }

    /// Value sent to the display, in the configured unit.
    #[inline]
    pub fn display_value(&self) -> f32 {
        match self.display_unit {
            DisplayUnit::Rpm => self.output_rpm(),
            DisplayUnit::Hertz => self.frequency,
        }
    }

    /// Preset frequencies (left, right) after clamping.
    #[inline]
    pub fn presets(&self) -> (f32, f32) {
        (self.preset_left_hz, self.preset_right_hz)
    }

    /// The scheduler (for inspection).
    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable scheduler access, e.g. to advance a simulated clock.
    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The gain driver (for inspection).
    #[inline]
    pub fn gain_driver(&self) -> &G {
        &self.gain
    }

    /// The display (for inspection).
    #[inline]
    pub fn display(&self) -> &D {
        &self.display
    }
}

/// Clamp to `[min, max]`; non-finite values fall to `min`.
#[inline]
pub fn clamp_frequency(candidate: f32, min: f32, max: f32) -> f32 {
    if candidate.is_finite() {
        candidate.clamp(min, max)
    } else {
        min
    }
}
