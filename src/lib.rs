//! # StepperSineDrive
//!
//! Bipolar stepper drive by direct digital synthesis: two DAC channels play
//! one sine table a quarter cycle apart, at a sample rate set by the target
//! rotational speed.
//!
//! ## Architecture
//!
//! Two execution contexts, one writer per piece of state:
//! - Periodic tick: [`WaveformSampler`] steps the phase indices and writes
//!   both channels. Owned by the [`Scheduler`]'s callback, nobody else
//!   touches it
//! - Control loop: [`FrequencyController`] reads the control input and, only
//!   when the clamped target changes, retargets period, gain and display
//!
//! No locks, no heap. Peripheral I/O lives in `hal` (ESP-IDF only).

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod dds;
pub mod gain;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod scheduler;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use config::{DisplayUnit, DriveConfig, CONFIG, SAMPLE_COUNT};
pub use control::{ControlInput, ControlMode, DisplayAdapter, FrequencyController, GainDriver};
pub use dds::{QuadratureOutput, QuadratureSample, SineTable, WaveformSampler};
pub use gain::{gain_for_frequency, GainCode};
pub use log_globals::LOG_STREAM;
pub use scheduler::{SamplePeriod, Scheduler, SimulatedScheduler};
