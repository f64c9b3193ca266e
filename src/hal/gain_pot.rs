//! Amplifier gain via an I2C digital potentiometer
//!
//! MCP4018-style 7-bit rheostat: the wiper position is the only register,
//! written as one data byte after the address. One begin/write/end
//! transaction per gain change, no read-back.

use esp_idf_svc::hal::delay::TickType;
use esp_idf_svc::hal::i2c::I2cDriver;

use super::HalError;
use crate::control::GainDriver;
use crate::gain::GainCode;

/// Potentiometer I2C address (fixed by the part)
pub const GAIN_POT_ADDR: u8 = 0x2F;

/// Wiper register width
const WIPER_MASK: u8 = 0x7F;

/// Bus timeout per transaction; a stuck bus must not stall the control loop
const I2C_TIMEOUT_MS: u64 = 5;

/// Gain potentiometer driver
pub struct GainPot<'d> {
    i2c: I2cDriver<'d>,
    addr: u8,
}

impl<'d> GainPot<'d> {
    /// Create driver on an initialized I2C bus
    pub fn new(i2c: I2cDriver<'d>, addr: u8) -> Self {
        Self { i2c, addr }
    }
}

impl GainDriver for GainPot<'_> {
    type Error = HalError;

    fn set_gain(&mut self, code: GainCode) -> Result<(), HalError> {
        let wiper = code.value().min(WIPER_MASK);
        self.i2c
            .write(self.addr, &[wiper], TickType::new_millis(I2C_TIMEOUT_MS).into())
            .map_err(HalError::I2c)
    }
}
