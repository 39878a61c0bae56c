// https://github.com/m5stack/M5Core2/blob/master/src/AXP192.cpp
// X-Powers AXP192 data sheet, register description chapter
use bitflags::bitflags;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error, I2c};

use crate::BlockingRegisterDevice;

pub const AXP192_ADDRESS: u8 = 0x34;

const REG_POWER_STATUS: u8 = 0x00;
const REG_POWER_OUTPUT: u8 = 0x12;
const REG_DCDC1_VOLTAGE: u8 = 0x26;
const REG_DCDC3_VOLTAGE: u8 = 0x27;
const REG_LDO23_VOLTAGE: u8 = 0x28;
const REG_VBUS_IPSOUT: u8 = 0x30;
const REG_ADC_ENABLE_1: u8 = 0x82;
const REG_GPIO34_CONTROL: u8 = 0x95;
const REG_GPIO34_SIGNAL: u8 = 0x96;

/// GPIO4 drives the display reset line on the Core2
const GPIO4_LEVEL: u8 = 1 << 1;

/// ESP32 supply
pub const CORE2_ESP_VOLTAGE: u16 = 3350;
/// Display backlight
pub const CORE2_BACKLIGHT_VOLTAGE: u16 = 2800;
/// Display logic and SD card supply
pub const CORE2_PERIPHERAL_VOLTAGE: u16 = 3300;
/// Vibration motor, kept at the lowest level so it stays silent
pub const CORE2_VIBRATION_VOLTAGE: u16 = 2000;

bitflags! {
    /// Output enable bits of register 0x12
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct PowerOutput: u8 {
        const DCDC1 = 1 << 0;
        const DCDC3 = 1 << 1;
        const LDO2  = 1 << 2;
        const LDO3  = 1 << 3;
        const DCDC2 = 1 << 4;
        const EXTEN = 1 << 6;
    }
}

/// Errors that can occur when interacting with the AXP192
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PmuError {
    I2CError,
    VoltageOutOfRange(u16),
}

impl<E> From<E> for PmuError
where
    E: Error,
{
    fn from(_: E) -> Self {
        PmuError::I2CError
    }
}

/// DCDC1 and DCDC3: 700 mV to 3500 mV in 25 mV steps
fn dcdc_step(millivolts: u16) -> Result<u8, PmuError> {
    if !(700..=3500).contains(&millivolts) {
        return Err(PmuError::VoltageOutOfRange(millivolts));
    }
    Ok(((millivolts - 700) / 25) as u8)
}

/// LDO2 and LDO3: 1800 mV to 3300 mV in 100 mV steps
fn ldo_step(millivolts: u16) -> Result<u8, PmuError> {
    if !(1800..=3300).contains(&millivolts) {
        return Err(PmuError::VoltageOutOfRange(millivolts));
    }
    Ok(((millivolts - 1800) / 100) as u8)
}

#[derive(Debug)]
pub struct AXP192<I2C> {
    dev: BlockingRegisterDevice<I2C>,
}

impl<I2C> AXP192<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            dev: BlockingRegisterDevice::new(i2c, AXP192_ADDRESS),
        }
    }

    /// Powers the M5Stack Core2 display and touch panel and pulses the
    /// display reset line.
    pub fn init_core2<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PmuError> {
        // VBUS current limit off, hold voltage unchanged
        self.dev.update_register(REG_VBUS_IPSOUT, 0x04, 0x02)?;

        self.set_dcdc1_voltage(CORE2_ESP_VOLTAGE)?;
        self.set_dcdc3_voltage(CORE2_BACKLIGHT_VOLTAGE)?;
        self.set_ldo2_voltage(CORE2_PERIPHERAL_VOLTAGE)?;
        self.set_ldo3_voltage(CORE2_VIBRATION_VOLTAGE)?;

        self.enable_outputs(PowerOutput::LDO2 | PowerOutput::DCDC3)?;

        // GPIO4 as NMOS open drain output
        self.dev.update_register(REG_GPIO34_CONTROL, 0x72, 0x84)?;

        // all ADC channels on
        self.dev.write_register(&[REG_ADC_ENABLE_1, 0xFF])?;

        self.reset_display(delay)
    }

    pub fn get_power_status(&mut self) -> Result<u8, PmuError> {
        Ok(self.dev.read_register(REG_POWER_STATUS)?)
    }

    pub fn get_outputs(&mut self) -> Result<PowerOutput, PmuError> {
        let value = self.dev.read_register(REG_POWER_OUTPUT)?;
        Ok(PowerOutput::from_bits_truncate(value))
    }

    pub fn enable_outputs(&mut self, outputs: PowerOutput) -> Result<(), PmuError> {
        self.dev
            .update_register(REG_POWER_OUTPUT, 0xFF, outputs.bits())?;
        Ok(())
    }

    pub fn disable_outputs(&mut self, outputs: PowerOutput) -> Result<(), PmuError> {
        self.dev
            .update_register(REG_POWER_OUTPUT, !outputs.bits(), 0)?;
        Ok(())
    }

    pub fn set_dcdc1_voltage(&mut self, millivolts: u16) -> Result<(), PmuError> {
        let step = dcdc_step(millivolts)?;
        self.dev.update_register(REG_DCDC1_VOLTAGE, 0x80, step)?;
        Ok(())
    }

    /// DCDC3 feeds the backlight on the Core2
    pub fn set_dcdc3_voltage(&mut self, millivolts: u16) -> Result<(), PmuError> {
        let step = dcdc_step(millivolts)?;
        self.dev.update_register(REG_DCDC3_VOLTAGE, 0x80, step)?;
        Ok(())
    }

    pub fn set_ldo2_voltage(&mut self, millivolts: u16) -> Result<(), PmuError> {
        let step = ldo_step(millivolts)?;
        self.dev
            .update_register(REG_LDO23_VOLTAGE, 0x0F, step << 4)?;
        Ok(())
    }

    pub fn set_ldo3_voltage(&mut self, millivolts: u16) -> Result<(), PmuError> {
        let step = ldo_step(millivolts)?;
        self.dev.update_register(REG_LDO23_VOLTAGE, 0xF0, step)?;
        Ok(())
    }

    /// Drives the display reset line (GPIO4), `false` holds the display in reset
    pub fn set_display_reset(&mut self, released: bool) -> Result<(), PmuError> {
        let set = if released { GPIO4_LEVEL } else { 0 };
        self.dev
            .update_register(REG_GPIO34_SIGNAL, !GPIO4_LEVEL, set)?;
        Ok(())
    }

    pub fn reset_display<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PmuError> {
        self.set_display_reset(false)?;
        delay.delay_ms(100);
        self.set_display_reset(true)?;
        delay.delay_ms(100);
        Ok(())
    }
}
