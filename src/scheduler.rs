//! Periodic sample scheduling.
//!
//! The scheduler owns the periodic callback (the sampler plus its output
//! pair) from construction on. The control loop only ever changes *when*
//! it fires.
//!
//! # Rules
//!
//! - `reconfigure` is called from the control loop only, never from the tick
//! - `reconfigure` fully stops the old period before the new one starts
//! - A short gap across a reconfigure is fine; a doubled or half tick is not

use core::convert::Infallible;
use core::time::Duration;

use crate::dds::{QuadratureOutput, WaveformSampler};

/// Interval between two sampler ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePeriod {
    micros: f32,
}

impl SamplePeriod {
    /// Period that plays one table of `sample_count` entries `freq_hz` times
    /// per second: `1e6 / (freq_hz · N)`.
    ///
    /// `freq_hz` must be finite and positive; the controller clamps it first.
    #[inline]
    pub fn for_frequency(freq_hz: f32, sample_count: usize) -> Self {
        Self {
            micros: 1_000_000.0 / (freq_hz * sample_count as f32),
        }
    }

    /// Period in microseconds.
    #[inline]
    pub fn as_micros(self) -> f32 {
        self.micros
    }

    /// Period rounded to the nearest nanosecond.
    #[inline]
    pub fn as_duration(self) -> Duration {
        Duration::from_nanos(libm::roundf(self.micros * 1000.0) as u64)
    }
}

/// Periodic task driving the sampler.
pub trait Scheduler {
    /// Failure to (re)program the underlying timer.
    type Error: core::fmt::Debug;

    /// Start ticking every `period`.
    fn start(&mut self, period: SamplePeriod) -> Result<(), Self::Error>;

    /// Stop ticking. No tick runs after this returns.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Move to a new period: stop, then start.
    fn reconfigure(&mut self, period: SamplePeriod) -> Result<(), Self::Error> {
        self.stop()?;
        self.start(period)
    }
}

/// Deterministic scheduler for the host.
///
/// Time is fed in explicitly with [`advance`](Self::advance); every whole
/// period elapsed produces one sampler tick into the owned output.
/// Stopping drops any partial period, so a reconfigure never yields an early
/// or duplicated tick.
pub struct SimulatedScheduler<'a, O: QuadratureOutput, const N: usize> {
    sampler: WaveformSampler<'a, N>,
    output: O,
    period: Option<SamplePeriod>,
    /// Microseconds since the last tick (or since start)
    pending_us: f64,
    ticks: u64,
    starts: u32,
    stops: u32,
}

impl<'a, O: QuadratureOutput, const N: usize> SimulatedScheduler<'a, O, N> {
    /// Create a stopped scheduler around `sampler` and `output`.
    pub fn new(sampler: WaveformSampler<'a, N>, output: O) -> Self {
        Self {
            sampler,
            output,
            period: None,
            pending_us: 0.0,
            ticks: 0,
            starts: 0,
            stops: 0,
        }
    }

    /// Let `micros` of time pass, ticking once per whole period.
    ///
    /// Returns the number of ticks fired. A zero, negative or non-finite
    /// period never ticks.
    pub fn advance(&mut self, micros: f64) -> u32 {
        let Some(period) = self.period else {
            return 0;
        };

        let period_us = period.as_micros() as f64;
        if !period_us.is_finite() || period_us <= 0.0 {
            return 0;
        }
        self.pending_us += micros;

        let mut fired = 0;
        while self.pending_us >= period_us {
            self.pending_us -= period_us;
            self.sampler.tick_into(&mut self.output);
            self.ticks += 1;
            fired += 1;
        }
        fired
    }

    /// Currently programmed period, `None` when stopped.
    #[inline]
    pub fn period(&self) -> Option<SamplePeriod> {
        self.period
    }

    /// Check if the scheduler is ticking.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    /// Total ticks since creation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of `start` calls (a reconfigure counts as one).
    #[inline]
    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// Number of `stop` calls (a reconfigure counts as one).
    #[inline]
    pub fn stops(&self) -> u32 {
        self.stops
    }

    /// The sampler driven by this scheduler.
    #[inline]
    pub fn sampler(&self) -> &WaveformSampler<'a, N> {
        &self.sampler
    }

    /// The output written on every tick.
    #[inline]
    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<'a, O: QuadratureOutput, const N: usize> Scheduler for SimulatedScheduler<'a, O, N> {
    type Error = Infallible;

    fn start(&mut self, period: SamplePeriod) -> Result<(), Self::Error> {
        // Restarting a running timer still begins a fresh period
        self.pending_us = 0.0;
        self.period = Some(period);
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.period = None;
        self.pending_us = 0.0;
        self.stops += 1;
        Ok(())
    }
}
