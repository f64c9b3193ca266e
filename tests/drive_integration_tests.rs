//! Controller driving the simulated scheduler end to end

mod common;

use common::{NullGain, RecordingDisplay, RecordingOutput, ScriptedPanel};
use stepper_sine_drive::{
    ControlMode, FrequencyController, Scheduler, SimulatedScheduler, SineTable, WaveformSampler, CONFIG,
    SAMPLE_COUNT,
};

/// Control loop step
const STEP_US: i64 = 5_000;

type Drive<'a> =
    FrequencyController<SimulatedScheduler<'a, RecordingOutput, SAMPLE_COUNT>, NullGain, RecordingDisplay>;

fn drive(table: &SineTable<SAMPLE_COUNT>) -> Drive<'_> {
    let scheduler = SimulatedScheduler::new(WaveformSampler::new(table), RecordingOutput::default());
    FrequencyController::new(&CONFIG, scheduler, NullGain, RecordingDisplay::default())
}

/// Run the control loop for `iterations` steps; returns ticks fired.
fn run(c: &mut Drive<'_>, panel: &mut ScriptedPanel, now_us: &mut i64, iterations: u32) -> u64 {
    let before = c.scheduler().ticks();
    for _ in 0..iterations {
        c.poll(*now_us, panel);
        c.scheduler_mut().advance(STEP_US as f64);
        *now_us += STEP_US;
    }
    c.scheduler().ticks() - before
}

#[test]
fn test_nothing_plays_before_start() {
    let table = SineTable::<SAMPLE_COUNT>::build(CONFIG.dac_bits);
    let mut c = drive(&table);

    assert_eq!(c.scheduler_mut().advance(1_000_000.0), 0);
    assert!(!c.scheduler().is_running());
}

#[test]
fn test_tick_rate_follows_preset() {
    let table = SineTable::<SAMPLE_COUNT>::build(CONFIG.dac_bits);
    let mut c = drive(&table);
    let mut panel = ScriptedPanel::default();
    let mut now = 0;
    c.start(now);

    // One second at the left preset
    let ticks = run(&mut c, &mut panel, &mut now, 200);
    let expected = c.frequency() as f64 * SAMPLE_COUNT as f64;
    assert!((ticks as f64 - expected).abs() <= 2.0, "{} ticks, expected {}", ticks, expected);

    // One second at the right preset
    panel.toggle = true;
    let ticks = run(&mut c, &mut panel, &mut now, 200);
    let expected = c.frequency() as f64 * SAMPLE_COUNT as f64;
    assert!((ticks as f64 - expected).abs() <= 2.0, "{} ticks, expected {}", ticks, expected);

    assert_eq!(c.scheduler().starts(), 2);
    assert_eq!(c.scheduler().stops(), 1);
}

#[test]
fn test_waveform_continuous_across_retargets() {
    let table = SineTable::<SAMPLE_COUNT>::build(CONFIG.dac_bits);
    let mut c = drive(&table);
    let mut panel = ScriptedPanel::default();
    let mut now = 0;
    c.start(now);

    run(&mut c, &mut panel, &mut now, 30);
    panel.toggle = true;
    run(&mut c, &mut panel, &mut now, 30);

    c.set_mode(now, ControlMode::Continuous);
    for pot in [4095, 2000, 700, 0, 3000] {
        panel.pot = pot;
        run(&mut c, &mut panel, &mut now, 10);
    }

    c.set_mode(now, ControlMode::Incremental);
    for counts in [10, -25, 400] {
        panel.encoder = counts;
        run(&mut c, &mut panel, &mut now, 10);
    }

    // Every sample is the next table step: no index skipped or repeated,
    // channel A always a quarter cycle ahead of B
    let quarter = SAMPLE_COUNT / 4;
    let samples = &c.scheduler().output().samples;
    assert!(samples.len() > 1000);
    for (k, &(a, b)) in samples.iter().enumerate() {
        let step = k + 1;
        assert_eq!(b, table.get(step % SAMPLE_COUNT), "channel B at tick {}", step);
        assert_eq!(a, table.get((step + quarter) % SAMPLE_COUNT), "channel A at tick {}", step);
    }
    assert_eq!(c.scheduler().sampler().phase_offset(), quarter);
}

#[test]
fn test_stop_silences_output() {
    let table = SineTable::<SAMPLE_COUNT>::build(CONFIG.dac_bits);
    let mut c = drive(&table);
    let mut panel = ScriptedPanel::default();
    let mut now = 0;
    c.start(now);

    run(&mut c, &mut panel, &mut now, 10);
    c.scheduler_mut().stop().unwrap();
    let played = c.scheduler().output().samples.len();

    assert_eq!(c.scheduler_mut().advance(1_000_000.0), 0);
    assert_eq!(c.scheduler().output().samples.len(), played);
}

#[test]
fn test_display_tracks_every_change() {
    let table = SineTable::<SAMPLE_COUNT>::build(CONFIG.dac_bits);
    let mut c = drive(&table);
    let mut panel = ScriptedPanel::default();
    let mut now = 0;
    c.start(now);

    run(&mut c, &mut panel, &mut now, 5);
    panel.toggle = true;
    run(&mut c, &mut panel, &mut now, 5);
    panel.toggle = false;
    run(&mut c, &mut panel, &mut now, 5);

    let shown = &c.display().values;
    assert_eq!(shown.len(), 3);
    assert!((shown[0] - 33.333).abs() < 1e-3);
    assert!((shown[1] - 45.0).abs() < 1e-3);
    assert!((shown[2] - 33.333).abs() < 1e-3);
}
