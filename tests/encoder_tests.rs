//! Encoder count bookkeeping tests
//!
//! `Counter` stands in for the pulse counter peripheral: every edge counts
//! and the value wraps to zero at the limits, reporting the limit it hit.

use stepper_sine_drive::control::{DeltaTracker, PulseTotal};

const HIGH: i16 = 100;
const LOW: i16 = -100;

struct Counter<'a> {
    value: i16,
    total: &'a PulseTotal,
}

impl Counter<'_> {
    /// Apply `edges` single steps (sign gives direction)
    fn step(&mut self, edges: i32) {
        let dir = edges.signum() as i16;
        for _ in 0..edges.abs() {
            self.value += dir;
            if self.value == HIGH || self.value == LOW {
                self.total.on_limit(self.value);
                self.value = 0;
            }
        }
    }

    fn total(&self) -> i32 {
        self.total.total(self.value)
    }
}

#[test]
fn test_total_follows_limit_wraps() {
    let total = PulseTotal::new();
    let mut counter = Counter { value: 0, total: &total };

    counter.step(350);
    assert_eq!(counter.value, 50);
    assert_eq!(counter.total(), 350);

    counter.step(-720);
    assert_eq!(counter.total(), -370);
}

#[test]
fn test_fast_turn_between_polls_fully_counted() {
    let total = PulseTotal::new();
    let mut counter = Counter { value: 0, total: &total };
    let mut tracker = DeltaTracker::new(counter.total());

    // Three edges per control iteration, eight iterations
    let mut consumed = 0;
    for _ in 0..8 {
        counter.step(3);
        let delta = tracker.delta(counter.total());
        assert_eq!(delta, 3, "every edge counts, direction kept");
        tracker.reset(counter.total());
        consumed += delta;
    }
    assert_eq!(consumed, 24);

    // Much faster than the poll rate, across several limit wraps
    counter.step(-437);
    assert_eq!(tracker.delta(counter.total()), -437);
}

#[test]
fn test_counts_between_read_and_reset_carry_over() {
    let total = PulseTotal::new();
    let mut counter = Counter { value: 0, total: &total };
    let mut tracker = DeltaTracker::new(counter.total());

    counter.step(10);
    assert_eq!(tracker.delta(counter.total()), 10);
    // Shaft keeps moving before the reset lands
    counter.step(4);
    tracker.reset(counter.total());

    assert_eq!(tracker.delta(counter.total()), 4);
}

#[test]
fn test_reset_without_read_discards_everything() {
    let total = PulseTotal::new();
    let mut counter = Counter { value: 0, total: &total };
    let mut tracker = DeltaTracker::new(counter.total());

    counter.step(250);
    tracker.reset(counter.total());
    assert_eq!(tracker.delta(counter.total()), 0);

    counter.step(-5);
    assert_eq!(tracker.delta(counter.total()), -5);
}

#[test]
fn test_delta_is_idempotent_until_reset() {
    let total = PulseTotal::new();
    let mut counter = Counter { value: 0, total: &total };
    let mut tracker = DeltaTracker::new(counter.total());

    counter.step(7);
    assert_eq!(tracker.delta(counter.total()), 7);
    assert_eq!(tracker.delta(counter.total()), 7);
    tracker.reset(counter.total());
    assert_eq!(tracker.delta(counter.total()), 0);
}
