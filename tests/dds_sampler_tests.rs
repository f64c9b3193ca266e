//! Waveform sampler tests

mod common;

use common::RecordingOutput;
use stepper_sine_drive::{SineTable, WaveformSampler};

#[test]
fn test_sampler_initial_quadrature() {
    let table = SineTable::<600>::build(12);
    let sampler = WaveformSampler::new(&table);

    assert_eq!(sampler.index_a(), 150);
    assert_eq!(sampler.index_b(), 0);
    assert_eq!(sampler.phase_offset(), 150);
}

#[test]
fn test_sampler_emits_table_values() {
    let table = SineTable::<600>::build(12);
    let mut sampler = WaveformSampler::new(&table);

    let sample = sampler.tick();
    assert_eq!(sampler.index_a(), 151);
    assert_eq!(sampler.index_b(), 1);
    assert_eq!(sample.a, table.get(151));
    assert_eq!(sample.b, table.get(1));
}

#[test]
fn test_sampler_quadrature_every_tick() {
    let table = SineTable::<600>::build(12);
    let mut sampler = WaveformSampler::new(&table);

    // Several full periods, including both wrap points
    for _ in 0..(600 * 3 + 17) {
        sampler.tick();
        assert!(sampler.index_a() < 600);
        assert!(sampler.index_b() < 600);
        assert_eq!(sampler.phase_offset(), 150);
    }
}

#[test]
fn test_sampler_wraps_without_reading_past_end() {
    let table = SineTable::<8>::build(8);
    let mut sampler = WaveformSampler::new(&table);

    let mut seen_a = Vec::new();
    for _ in 0..8 {
        sampler.tick();
        seen_a.push(sampler.index_a());
    }
    // A starts at 2: 3, 4, 5, 6, 7, 0, 1, 2
    assert_eq!(seen_a, vec![3, 4, 5, 6, 7, 0, 1, 2]);
}

#[test]
fn test_sampler_channel_a_leads_b() {
    let table = SineTable::<600>::build(12);
    let mut sampler = WaveformSampler::new(&table);
    let mut out = RecordingOutput::default();

    for _ in 0..600 {
        sampler.tick_into(&mut out);
    }

    // B reproduces A delayed by a quarter period
    for t in 150..600 {
        assert_eq!(out.samples[t].1, out.samples[t - 150].0);
    }
}

#[test]
fn test_sampler_period_is_table_length() {
    let table = SineTable::<600>::build(12);
    let mut sampler = WaveformSampler::new(&table);
    let mut out = RecordingOutput::default();

    for _ in 0..1200 {
        sampler.tick_into(&mut out);
    }
    for t in 0..600 {
        assert_eq!(out.samples[t], out.samples[t + 600]);
    }
}
