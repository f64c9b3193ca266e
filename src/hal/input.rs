//! Front panel inputs.
//!
//! - Speed pot on an ADC1 channel (one-shot, 12 bit)
//! - Encoder A/B on a pulse counter unit in quadrature (x4) mode, so no
//!   edge is missed between control iterations
//! - Preset toggle and mode button, active low with pull-ups

use core::ptr;

use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, Input, PinDriver, Pull};
use esp_idf_svc::hal::pcnt::{
    Pcnt, PcntChannel, PcntChannelConfig, PcntControlMode, PcntCountMode, PcntDriver, PcntEvent,
    PcntEventType, PinIndex,
};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::{self, esp};

use super::HalError;
use crate::control::{ControlInput, DeltaTracker, PulseTotal};

/// Hardware counter wraps to zero at these limits
const COUNT_HIGH_LIMIT: i16 = 10_000;
const COUNT_LOW_LIMIT: i16 = -10_000;

/// Glitch filter in APB cycles (10 us at 80 MHz, register max 1023)
const COUNT_FILTER: u16 = 800;

/// Limit wraps of the encoder counter, fed by the counter ISR
static ENCODER_TOTAL: PulseTotal = PulseTotal::new();

/// Pin assignment
pub struct PanelPins {
    /// ADC1 channel of the speed pot (e.g. `adc_channel_t_ADC_CHANNEL_6` = GPIO34)
    pub pot_channel: sys::adc_channel_t,
    pub encoder_a: AnyIOPin,
    pub encoder_b: AnyIOPin,
    pub preset_toggle: AnyIOPin,
    pub mode_button: AnyIOPin,
}

/// Front panel
pub struct PanelInput {
    adc: sys::adc_oneshot_unit_handle_t,
    pot_channel: sys::adc_channel_t,
    /// Last good conversion, reused when a read fails
    last_pot: u16,
    encoder: PcntDriver<'static>,
    delta: DeltaTracker,
    preset_toggle: PinDriver<'static, AnyIOPin, Input>,
    mode_button: PinDriver<'static, AnyIOPin, Input>,
}

fn pulled_up(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>, HalError> {
    let mut driver = PinDriver::input(pin).map_err(HalError::Gpio)?;
    driver.set_pull(Pull::Up).map_err(HalError::Gpio)?;
    Ok(driver)
}

/// One counting channel: counts edges on `edge`, direction from `level`
fn quadrature_channel(
    unit: &mut PcntDriver<'static>,
    channel: PcntChannel,
    edge: PinIndex,
    level: PinIndex,
    pos_mode: PcntCountMode,
    neg_mode: PcntCountMode,
) -> Result<(), HalError> {
    unit.channel_config(
        channel,
        edge,
        level,
        &PcntChannelConfig {
            lctrl_mode: PcntControlMode::Reverse,
            hctrl_mode: PcntControlMode::Keep,
            pos_mode,
            neg_mode,
            counter_h_lim: COUNT_HIGH_LIMIT,
            counter_l_lim: COUNT_LOW_LIMIT,
        },
    )
    .map_err(HalError::Pcnt)
}

fn encoder_unit<P: Pcnt>(
    pcnt: impl Peripheral<P = P> + 'static,
    pin_a: AnyIOPin,
    pin_b: AnyIOPin,
) -> Result<PcntDriver<'static>, HalError> {
    let mut unit = PcntDriver::new(
        pcnt,
        Some(pin_a),
        Some(pin_b),
        Option::<AnyInputPin>::None,
        Option::<AnyInputPin>::None,
    )
    .map_err(HalError::Pcnt)?;

    // Both channels count, each on the other's level: every edge of A and B
    quadrature_channel(
        &mut unit,
        PcntChannel::Channel0,
        PinIndex::Pin0,
        PinIndex::Pin1,
        PcntCountMode::Decrement,
        PcntCountMode::Increment,
    )?;
    quadrature_channel(
        &mut unit,
        PcntChannel::Channel1,
        PinIndex::Pin1,
        PinIndex::Pin0,
        PcntCountMode::Increment,
        PcntCountMode::Decrement,
    )?;

    unit.set_filter_value(COUNT_FILTER).map_err(HalError::Pcnt)?;
    unit.filter_enable().map_err(HalError::Pcnt)?;

    // SAFETY: the callback runs in ISR context and only does atomic adds
    unsafe {
        unit.subscribe(|status| {
            let status = PcntEventType::from_repr_truncated(status);
            if status.contains(PcntEvent::HighLimit) {
                ENCODER_TOTAL.on_limit(COUNT_HIGH_LIMIT);
            }
            if status.contains(PcntEvent::LowLimit) {
                ENCODER_TOTAL.on_limit(COUNT_LOW_LIMIT);
            }
        })
        .map_err(HalError::Pcnt)?;
    }
    unit.event_enable(PcntEvent::HighLimit).map_err(HalError::Pcnt)?;
    unit.event_enable(PcntEvent::LowLimit).map_err(HalError::Pcnt)?;

    unit.counter_pause().map_err(HalError::Pcnt)?;
    unit.counter_clear().map_err(HalError::Pcnt)?;
    unit.counter_resume().map_err(HalError::Pcnt)?;
    Ok(unit)
}

impl PanelInput {
    /// Claim the ADC, the pulse counter unit and the panel pins
    pub fn new<P: Pcnt>(pcnt: impl Peripheral<P = P> + 'static, pins: PanelPins) -> Result<Self, HalError> {
        let mut adc: sys::adc_oneshot_unit_handle_t = ptr::null_mut();
        let unit_config = sys::adc_oneshot_unit_init_cfg_t {
            unit_id: sys::adc_unit_t_ADC_UNIT_1,
            ..Default::default()
        };
        // SAFETY: config and handle outlive the call
        esp!(unsafe { sys::adc_oneshot_new_unit(&unit_config, &mut adc) }).map_err(HalError::Adc)?;

        let channel_config = sys::adc_oneshot_chan_cfg_t {
            atten: sys::adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: adc is a valid unit handle
        esp!(unsafe { sys::adc_oneshot_config_channel(adc, pins.pot_channel, &channel_config) })
            .map_err(HalError::Adc)?;

        let encoder = encoder_unit(pcnt, pins.encoder_a, pins.encoder_b)?;
        let delta = DeltaTracker::new(ENCODER_TOTAL.total(0));

        Ok(Self {
            adc,
            pot_channel: pins.pot_channel,
            last_pot: 0,
            encoder,
            delta,
            preset_toggle: pulled_up(pins.preset_toggle)?,
            mode_button: pulled_up(pins.mode_button)?,
        })
    }
}

impl PanelInput {
    /// Running encoder total; a failed counter read counts as no movement
    fn encoder_total(&self) -> i32 {
        let counter = self.encoder.get_counter_value().unwrap_or(0);
        ENCODER_TOTAL.total(counter)
    }
}

impl ControlInput for PanelInput {
    fn read_continuous(&mut self) -> u16 {
        let mut raw: i32 = 0;
        // SAFETY: adc and channel were configured in new()
        let result = esp!(unsafe { sys::adc_oneshot_read(self.adc, self.pot_channel, &mut raw) });
        if result.is_ok() {
            self.last_pot = raw.clamp(0, u16::MAX as i32) as u16;
        }
        self.last_pot
    }

    fn read_incremental_delta(&mut self) -> i32 {
        let total = self.encoder_total();
        self.delta.delta(total)
    }

    fn reset_incremental_delta(&mut self) {
        let total = self.encoder_total();
        self.delta.reset(total);
    }

    fn read_preset_toggle(&mut self) -> bool {
        self.preset_toggle.is_low()
    }

    fn read_mode_button(&mut self) -> bool {
        self.mode_button.is_low()
    }
}

impl Drop for PanelInput {
    fn drop(&mut self) {
        // SAFETY: adc was created by adc_oneshot_new_unit
        unsafe {
            sys::adc_oneshot_del_unit(self.adc);
        }
    }
}
