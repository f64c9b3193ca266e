//! Mode button state machine
//!
//! Edge-triggered: one event per press, however long the button is held
//! and however much the contacts bounce. `Pressed` returns to `Idle` only
//! after the level has read released for the whole settle interval.

/// Button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Released, waiting for a press
    Idle,
    /// Press reported, waiting for a settled release
    Pressed,
}

/// Debounced mode button
pub struct ModeButton {
    state: ButtonState,
    /// Start of the current released run while `Pressed` (microseconds)
    released_since_us: Option<i64>,
    /// Time the level must stay released before a new press can fire
    settle_us: i64,
}

impl ModeButton {
    /// Create button in `Idle`
    ///
    /// # Arguments
    /// * `settle_us` - Released time needed to re-arm, absorbs contact bounce
    pub fn new(settle_us: i64) -> Self {
        Self {
            state: ButtonState::Idle,
            released_since_us: None,
            settle_us: settle_us.max(0),
        }
    }

    /// Get current state
    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Feed the raw button level
    ///
    /// # Arguments
    /// * `now_us` - Current time in microseconds
    /// * `pressed` - true while the button is held
    ///
    /// # Returns
    /// `true` exactly once per press, on the Idle → Pressed edge
    pub fn update(&mut self, now_us: i64, pressed: bool) -> bool {
        match (self.state, pressed) {
            (ButtonState::Idle, true) => {
                self.state = ButtonState::Pressed;
                self.released_since_us = None;
                true
            }
            (ButtonState::Pressed, true) => {
                // Bounce or still held: the released run starts over
                self.released_since_us = None;
                false
            }
            (ButtonState::Pressed, false) => {
                let since = *self.released_since_us.get_or_insert(now_us);
                if now_us.saturating_sub(since) >= self.settle_us {
                    self.state = ButtonState::Idle;
                    self.released_since_us = None;
                }
                false
            }
            (ButtonState::Idle, false) => false,
        }
    }
}
