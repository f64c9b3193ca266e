//! Sample timer on a hardware general-purpose timer.
//!
//! The alarm ISR owns the sampler and the DAC pair. Retargeting stops the
//! counter, reprograms the alarm and restarts from zero, so the old period
//! never overlaps the new one.

use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::timer::{config::Config as TimerConfig, Timer, TimerDriver};

use super::HalError;
use crate::dds::{QuadratureOutput, WaveformSampler};
use crate::scheduler::{SamplePeriod, Scheduler};

/// Hardware-timed scheduler
pub struct SampleTimer {
    timer: TimerDriver<'static>,
    tick_hz: u64,
}

impl SampleTimer {
    /// Bind `sampler` and `output` to the alarm ISR of `timer`.
    ///
    /// The timer stays stopped until [`Scheduler::start`].
    pub fn new<T, O, const N: usize>(
        timer: impl Peripheral<P = T> + 'static,
        mut sampler: WaveformSampler<'static, N>,
        mut output: O,
    ) -> Result<Self, HalError>
    where
        T: Timer,
        O: QuadratureOutput + Send + 'static,
    {
        let mut timer = TimerDriver::new(timer, &TimerConfig::new().auto_reload(true))
            .map_err(HalError::Timer)?;
        let tick_hz = timer.tick_hz();

        // SAFETY: the callback runs in ISR context; tick_into is O(1), does
        // not block, allocate or log.
        unsafe {
            timer
                .subscribe(move || sampler.tick_into(&mut output))
                .map_err(HalError::Timer)?;
        }
        timer.enable_interrupt().map_err(HalError::Timer)?;

        Ok(Self { timer, tick_hz })
    }

    /// Alarm value for `period`, rounded, at least one timer tick
    fn alarm_ticks(&self, period: SamplePeriod) -> u64 {
        let nanos = period.as_duration().as_nanos();
        let ticks = (nanos * self.tick_hz as u128 + 500_000_000) / 1_000_000_000;
        u64::try_from(ticks).unwrap_or(u64::MAX).max(1)
    }
}

impl Scheduler for SampleTimer {
    type Error = HalError;

    fn start(&mut self, period: SamplePeriod) -> Result<(), HalError> {
        let ticks = self.alarm_ticks(period);
        self.timer.set_counter(0).map_err(HalError::Timer)?;
        self.timer.set_alarm(ticks).map_err(HalError::Timer)?;
        self.timer.enable_alarm(true).map_err(HalError::Timer)?;
        self.timer.enable(true).map_err(HalError::Timer)
    }

    fn stop(&mut self) -> Result<(), HalError> {
        self.timer.enable(false).map_err(HalError::Timer)?;
        self.timer.enable_alarm(false).map_err(HalError::Timer)
    }
}
