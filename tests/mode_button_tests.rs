//! Mode button tests

use stepper_sine_drive::control::{ButtonState, ModeButton};

const SETTLE_US: i64 = 50_000;

/// Control loop period
const POLL_US: i64 = 5_000;

#[test]
fn test_button_initial_state() {
    let button = ModeButton::new(SETTLE_US);
    assert_eq!(button.state(), ButtonState::Idle);
}

#[test]
fn test_button_fires_once_per_press() {
    let mut button = ModeButton::new(SETTLE_US);

    assert!(button.update(0, true));
    assert_eq!(button.state(), ButtonState::Pressed);

    // Held: no repeat
    for t in 1..100 {
        assert!(!button.update(t * 1_000, true));
    }
}

#[test]
fn test_button_bounce_ignored() {
    let mut button = ModeButton::new(SETTLE_US);

    assert!(button.update(0, true));
    // Contacts chatter inside the settle window
    assert!(!button.update(1_000, false));
    assert!(!button.update(2_000, true));
    assert!(!button.update(3_000, false));
    assert_eq!(button.state(), ButtonState::Pressed);
}

#[test]
fn test_button_rearms_after_settled_release() {
    let mut button = ModeButton::new(SETTLE_US);

    assert!(button.update(0, true));
    assert!(!button.update(60_000, false));
    // Released, but not for the full settle interval yet
    assert_eq!(button.state(), ButtonState::Pressed);
    assert!(!button.update(90_000, false));
    assert_eq!(button.state(), ButtonState::Pressed);

    assert!(!button.update(110_000, false));
    assert_eq!(button.state(), ButtonState::Idle);

    // Second press is a new event
    assert!(button.update(120_000, true));
}

#[test]
fn test_long_hold_then_bouncy_release_is_one_press() {
    let mut button = ModeButton::new(SETTLE_US);

    assert!(button.update(0, true));
    let mut t = POLL_US;
    while t < 1_000_000 {
        assert!(!button.update(t, true));
        t += POLL_US;
    }

    // Release chatters long after the press
    let events: Vec<bool> = [(1_000_000, false), (1_005_000, true), (1_010_000, false)]
        .into_iter()
        .map(|(t, level)| button.update(t, level))
        .collect();
    assert_eq!(events, [false, false, false]);
    assert_eq!(button.state(), ButtonState::Pressed);

    // The settle interval counts from the last bounce
    assert!(!button.update(1_055_000, false));
    assert_eq!(button.state(), ButtonState::Pressed);
    assert!(!button.update(1_060_000, false));
    assert_eq!(button.state(), ButtonState::Idle);
}

#[test]
fn test_zero_settle_rearms_on_first_release() {
    let mut button = ModeButton::new(0);

    assert!(button.update(0, true));
    assert!(!button.update(1, false));
    assert_eq!(button.state(), ButtonState::Idle);
    assert!(button.update(2, true));
}
