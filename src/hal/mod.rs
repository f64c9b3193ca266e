//! Hardware Abstraction Layer for the stepper drive (ESP32, ESP-IDF).
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Drive logic stays in core modules, HAL is just I/O.
//!
//! | Adapter          | Peripheral                        | Core trait          |
//! |------------------|-----------------------------------|---------------------|
//! | `DacPair`        | DAC channel 0/1 (GPIO25, GPIO26)  | `QuadratureOutput`  |
//! | `SampleTimer`    | Group 0 timer 0, alarm ISR        | `Scheduler`         |
//! | `GainPot`        | I2C0 7-bit digital potentiometer  | `GainDriver`        |
//! | `PanelInput`     | ADC1 pot, PCNT0 encoder, GPIOs    | `ControlInput`      |
//! | `ConsoleDisplay` | log stream (OLED stand-in)        | `DisplayAdapter`    |

pub mod dac;
pub mod display;
pub mod gain_pot;
pub mod input;
pub mod timer;

pub use dac::DacPair;
pub use display::ConsoleDisplay;
pub use gain_pot::{GainPot, GAIN_POT_ADDR};
pub use input::{PanelInput, PanelPins};
pub use timer::SampleTimer;

use esp_idf_svc::sys::EspError;

/// Peripheral failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Peripheral singleton already taken
    Init(EspError),
    /// Sample timer programming failed
    Timer(EspError),
    /// DAC channel setup failed
    Dac(EspError),
    /// Gain chip bus transaction failed
    I2c(EspError),
    /// ADC setup or conversion failed
    Adc(EspError),
    /// GPIO setup failed
    Gpio(EspError),
    /// Encoder pulse counter setup failed
    Pcnt(EspError),
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Init(e) => write!(f, "peripheral init: {}", e),
            Self::Timer(e) => write!(f, "sample timer: {}", e),
            Self::Dac(e) => write!(f, "DAC: {}", e),
            Self::I2c(e) => write!(f, "I2C: {}", e),
            Self::Adc(e) => write!(f, "ADC: {}", e),
            Self::Gpio(e) => write!(f, "GPIO: {}", e),
            Self::Pcnt(e) => write!(f, "pulse counter: {}", e),
        }
    }
}

/// Microseconds since boot
#[inline]
pub fn now_us() -> i64 {
    // SAFETY: esp_timer_get_time is always safe to call
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}
