//! Recording doubles for the controller's collaborators

#![allow(dead_code)]

use std::convert::Infallible;

use stepper_sine_drive::{
    ControlInput, DisplayAdapter, GainCode, GainDriver, QuadratureOutput, SamplePeriod, Scheduler,
};

/// Scheduler call, in order of arrival
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerCall {
    Start(f32),
    Stop,
}

/// Scheduler that records calls instead of ticking
#[derive(Default)]
pub struct RecordingScheduler {
    pub calls: Vec<SchedulerCall>,
    pub fail: bool,
}

impl RecordingScheduler {
    /// Number of stop+start pairs seen
    pub fn reconfigures(&self) -> usize {
        self.calls
            .windows(2)
            .filter(|w| matches!(w, [SchedulerCall::Stop, SchedulerCall::Start(_)]))
            .count()
    }

    /// Period of the last start, in microseconds
    pub fn last_period(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            SchedulerCall::Start(p) => Some(*p),
            SchedulerCall::Stop => None,
        })
    }
}

#[derive(Debug)]
pub struct TimerFault;

impl Scheduler for RecordingScheduler {
    type Error = TimerFault;

    fn start(&mut self, period: SamplePeriod) -> Result<(), TimerFault> {
        self.calls.push(SchedulerCall::Start(period.as_micros()));
        if self.fail {
            Err(TimerFault)
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<(), TimerFault> {
        self.calls.push(SchedulerCall::Stop);
        Ok(())
    }
}

/// Gain driver that records every code written
#[derive(Default)]
pub struct RecordingGain {
    pub writes: Vec<u8>,
    pub fail: bool,
}

#[derive(Debug)]
pub struct BusNack;

impl GainDriver for RecordingGain {
    type Error = BusNack;

    fn set_gain(&mut self, code: GainCode) -> Result<(), BusNack> {
        self.writes.push(code.value());
        if self.fail {
            Err(BusNack)
        } else {
            Ok(())
        }
    }
}

/// Gain driver that never fails and keeps nothing
pub struct NullGain;

impl GainDriver for NullGain {
    type Error = Infallible;

    fn set_gain(&mut self, _code: GainCode) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Display that records every value shown
#[derive(Default)]
pub struct RecordingDisplay {
    pub values: Vec<f32>,
}

impl DisplayAdapter for RecordingDisplay {
    fn show(&mut self, value: f32) {
        self.values.push(value);
    }
}

/// Front panel driven by the test
#[derive(Default)]
pub struct ScriptedPanel {
    pub pot: u16,
    pub encoder: i32,
    pub toggle: bool,
    pub button: bool,
    pub delta_reads: u32,
    pub delta_resets: u32,
    pub pot_reads: u32,
}

impl ControlInput for ScriptedPanel {
    fn read_continuous(&mut self) -> u16 {
        self.pot_reads += 1;
        self.pot
    }

    fn read_incremental_delta(&mut self) -> i32 {
        self.delta_reads += 1;
        self.encoder
    }

    fn reset_incremental_delta(&mut self) {
        self.delta_resets += 1;
        self.encoder = 0;
    }

    fn read_preset_toggle(&mut self) -> bool {
        self.toggle
    }

    fn read_mode_button(&mut self) -> bool {
        self.button
    }
}

/// Output that keeps every pair written
#[derive(Default)]
pub struct RecordingOutput {
    pub samples: Vec<(u16, u16)>,
}

impl QuadratureOutput for RecordingOutput {
    fn write(&mut self, a: u16, b: u16) {
        self.samples.push((a, b));
    }
}
