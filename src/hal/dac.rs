//! DAC output pair for the two coil channels.
//!
//! ESP32 one-shot DAC driver, 8-bit. Channel A on DAC_CHAN_0 (GPIO25),
//! channel B on DAC_CHAN_1 (GPIO26).

use core::ptr;

use esp_idf_svc::sys::{self, esp};

use super::HalError;
use crate::dds::QuadratureOutput;

/// Both coil DAC channels
pub struct DacPair {
    chan_a: sys::dac_oneshot_handle_t,
    chan_b: sys::dac_oneshot_handle_t,
}

// SAFETY: the handles are only used by whoever owns the pair; after startup
// that is the sample timer ISR alone.
unsafe impl Send for DacPair {}

impl DacPair {
    /// Claim both DAC channels
    pub fn new() -> Result<Self, HalError> {
        let chan_a = new_channel(sys::dac_channel_t_DAC_CHAN_0)?;
        let chan_b = match new_channel(sys::dac_channel_t_DAC_CHAN_1) {
            Ok(handle) => handle,
            Err(e) => {
                // SAFETY: chan_a was created above and is not used afterwards
                unsafe { sys::dac_oneshot_del_channel(chan_a) };
                return Err(e);
            }
        };

        Ok(Self { chan_a, chan_b })
    }
}

fn new_channel(chan_id: sys::dac_channel_t) -> Result<sys::dac_oneshot_handle_t, HalError> {
    let config = sys::dac_oneshot_config_t { chan_id };
    let mut handle: sys::dac_oneshot_handle_t = ptr::null_mut();

    // SAFETY: config and handle outlive the call
    esp!(unsafe { sys::dac_oneshot_new_channel(&config, &mut handle) }).map_err(HalError::Dac)?;
    Ok(handle)
}

impl QuadratureOutput for DacPair {
    #[inline]
    fn write(&mut self, a: u16, b: u16) {
        // Table is built for 8 bits; saturate anything wider
        // SAFETY: handles are valid for the lifetime of self
        unsafe {
            sys::dac_oneshot_output_voltage(self.chan_a, a.min(u8::MAX as u16) as u8);
            sys::dac_oneshot_output_voltage(self.chan_b, b.min(u8::MAX as u16) as u8);
        }
    }
}

impl Drop for DacPair {
    fn drop(&mut self) {
        // SAFETY: handles were created by dac_oneshot_new_channel
        unsafe {
            sys::dac_oneshot_del_channel(self.chan_a);
            sys::dac_oneshot_del_channel(self.chan_b);
        }
    }
}
