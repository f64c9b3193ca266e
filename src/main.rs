//! StepperSineDrive - Main entry point
//!
//! On the ESP32:
//! 1. Build the sine table once and pin it for the program lifetime
//! 2. Hand the sampler and the DAC pair to the sample timer ISR
//! 3. Wire the gain pot, panel inputs and display into the controller
//! 4. Run the control loop forever: poll, drain logs, yield
//!
//! On the host the same controller runs against the simulated scheduler
//! and a scripted front panel.

use core::fmt;

/// `fmt::Write` onto stdout (the ESP-IDF console on target)
struct ConsoleOut;

impl fmt::Write for ConsoleOut {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print!("{}", s);
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), stepper_sine_drive::hal::HalError> {
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::units::FromValueType;
    use esp_idf_svc::sys;

    use stepper_sine_drive::hal::{
        now_us, ConsoleDisplay, DacPair, GainPot, HalError, PanelInput, PanelPins, SampleTimer,
        GAIN_POT_ADDR,
    };
    use stepper_sine_drive::log_drain::{drain_to, DrainConfig};
    use stepper_sine_drive::{FrequencyController, SineTable, WaveformSampler, CONFIG, LOG_STREAM, SAMPLE_COUNT};

    sys::link_patches();
    println!("{}", env!("VERSION_STRING"));

    let peripherals = Peripherals::take().map_err(HalError::Init)?;
    let pins = peripherals.pins;

    // Built once, read-only for the rest of the program
    let table: &'static SineTable<SAMPLE_COUNT> = Box::leak(Box::new(SineTable::build(CONFIG.dac_bits)));
    let sampler = WaveformSampler::new(table);
    let dacs = DacPair::new()?;
    let timer = SampleTimer::new(peripherals.timer00, sampler, dacs)?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        pins.gpio21,
        pins.gpio22,
        &I2cConfig::new().baudrate(100.kHz().into()),
    )
    .map_err(HalError::I2c)?;
    let gain = GainPot::new(i2c, GAIN_POT_ADDR);

    let mut panel = PanelInput::new(peripherals.pcnt0, PanelPins {
        pot_channel: sys::adc_channel_t_ADC_CHANNEL_6,
        encoder_a: pins.gpio32.into(),
        encoder_b: pins.gpio33.into(),
        preset_toggle: pins.gpio27.into(),
        mode_button: pins.gpio14.into(),
    })?;

    let display = ConsoleDisplay::new(CONFIG.display_unit);
    let mut controller = FrequencyController::new(&CONFIG, timer, gain, display);
    controller.start(now_us());

    let drain = DrainConfig::default();
    let mut out = ConsoleOut;
    loop {
        controller.poll(now_us(), &mut panel);
        drain_to(&LOG_STREAM, &mut out, &drain);
        FreeRtos::delay_ms(CONFIG.control_interval_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    simulation::run();
}

/// Host run: scripted panel, simulated timer, everything printed.
#[cfg(not(target_os = "espidf"))]
mod simulation {
    use std::convert::Infallible;

    use stepper_sine_drive::log_drain::{drain_to, DrainConfig};
    use stepper_sine_drive::logging::LogLevel;
    use stepper_sine_drive::{
        ControlInput, DisplayAdapter, FrequencyController, GainCode, GainDriver, QuadratureOutput,
        Scheduler, SimulatedScheduler, SineTable, WaveformSampler, CONFIG, LOG_STREAM, SAMPLE_COUNT,
    };

    use super::ConsoleOut;

    /// Control loop period of the simulation
    const STEP_US: i64 = 5_000;

    #[derive(Default)]
    struct Panel {
        pot: u16,
        encoder: i32,
        toggle: bool,
        button: bool,
    }

    impl ControlInput for Panel {
        fn read_continuous(&mut self) -> u16 {
            self.pot
        }

        fn read_incremental_delta(&mut self) -> i32 {
            self.encoder
        }

        fn reset_incremental_delta(&mut self) {
            self.encoder = 0;
        }

        fn read_preset_toggle(&mut self) -> bool {
            self.toggle
        }

        fn read_mode_button(&mut self) -> bool {
            self.button
        }
    }

    /// Tracks the extremes seen on channel A
    #[derive(Default)]
    struct Scope {
        min: u16,
        max: u16,
        samples: u64,
    }

    impl QuadratureOutput for Scope {
        fn write(&mut self, a: u16, _b: u16) {
            if self.samples == 0 {
                self.min = a;
                self.max = a;
            }
            self.min = self.min.min(a);
            self.max = self.max.max(a);
            self.samples += 1;
        }
    }

    struct PrintGain;

    impl GainDriver for PrintGain {
        type Error = Infallible;

        fn set_gain(&mut self, code: GainCode) -> Result<(), Infallible> {
            println!("  gain   -> {}", code.value());
            Ok(())
        }
    }

    struct PrintDisplay;

    impl DisplayAdapter for PrintDisplay {
        fn show(&mut self, value: f32) {
            println!("  display -> {:.2}", value);
        }
    }

    pub fn run() {
        println!("{} (host simulation)", env!("VERSION_STRING"));

        let table = SineTable::<SAMPLE_COUNT>::build(CONFIG.dac_bits);
        let scheduler = SimulatedScheduler::new(WaveformSampler::new(&table), Scope::default());
        let mut controller = FrequencyController::new(&CONFIG, scheduler, PrintGain, PrintDisplay);
        let mut panel = Panel::default();
        let mut now_us = 0i64;

        controller.start(now_us);

        // (label, panel edit, control iterations)
        let script: [(&str, fn(&mut Panel), u32); 7] = [
            ("preset left", |_| {}, 20),
            ("preset right", |p| p.toggle = true, 20),
            ("press mode", |p| p.button = true, 2),
            ("release, pot at zero", |p| p.button = false, 20),
            ("pot at full scale", |p| p.pot = CONFIG.adc_max, 20),
            ("press mode", |p| p.button = true, 20),
            ("release, encoder +40", |p| {
                p.button = false;
                p.encoder = 40;
            }, 20),
        ];

        let drain = DrainConfig {
            max_level: LogLevel::Debug,
            ..DrainConfig::default()
        };
        let mut out = ConsoleOut;

        for (label, edit, iterations) in script {
            println!("== {}", label);
            edit(&mut panel);
            for _ in 0..iterations {
                controller.poll(now_us, &mut panel);
                controller.scheduler_mut().advance(STEP_US as f64);
                now_us += STEP_US;
            }
            while drain_to(&LOG_STREAM, &mut out, &drain) > 0 {}

            let scope = controller.scheduler().output();
            println!(
                "  {:.3} Hz, {:.2} rpm, {} ticks, channel A span {}..{}",
                controller.frequency(),
                controller.output_rpm(),
                scope.samples,
                scope.min,
                scope.max
            );
        }

        let _ = controller.scheduler_mut().stop();
    }
}
