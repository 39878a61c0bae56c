use core::fmt::{Display, Formatter};

// https://github.com/m5stack/M5Core2/blob/master/src/touch.cpp
// FocalTech FT6x36 application note, register map chapter
use embedded_hal::i2c::Error;
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub(crate) const FT6336U_ADDRESS: u8 = 0x38;

/// Register holding the number of touch points (low nibble)
pub(crate) const REG_TD_STATUS: u8 = 0x02;
/// Touch threshold
pub(crate) const REG_TH_GROUP: u8 = 0x80;
/// Report rate in active mode
pub(crate) const REG_PERIOD_ACTIVE: u8 = 0x88;
pub(crate) const REG_CHIP_ID: u8 = 0xA3;
pub(crate) const REG_G_MODE: u8 = 0xA4;
pub(crate) const REG_FIRMWARE_ID: u8 = 0xA6;
pub(crate) const REG_FOCALTECH_ID: u8 = 0xA8;

/// TD_STATUS followed by the four P1 coordinate registers
pub const RAW_TOUCH_EVENT_LEN: usize = 5;

/// Vendor ID reported by every FocalTech panel controller
pub const FOCALTECH_VENDOR_ID: u8 = 0x11;

#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Down = 0,
    Up = 1,
    Contact = 2,
    NoEvent = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipID {
    FT6206 = 0x06,
    FT6236 = 0x36,
    FT6336U = 0x64,
}

impl Display for ChipID {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ChipID::FT6206 => write!(f, "FT6206"),
            ChipID::FT6236 => write!(f, "FT6236"),
            ChipID::FT6336U => write!(f, "FT6336U"),
        }
    }
}

/// Interrupt mode of the INT line (G_MODE register)
#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    /// INT stays low while a finger is on the panel
    Polling = 0x00,
    /// INT pulses once per report
    Trigger = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchData {
    pub points: u8,
    pub event: Event,
    pub id: u8,
    pub x: u16,
    pub y: u16,
}

impl TouchData {
    /// Decodes TD_STATUS and the first touch point registers.
    ///
    /// Returns `None` when the controller reports no finger on the panel.
    pub fn from_registers(raw: &[u8; RAW_TOUCH_EVENT_LEN]) -> Option<Self> {
        let points = raw[0] & 0x0F;
        // Only one and two finger reports are valid, 0x0F shows up after reset
        if points == 0 || points > 2 {
            return None;
        }

        let event = Event::try_from(raw[1] >> 6).unwrap_or(Event::NoEvent);
        let x = (u16::from(raw[1] & 0x0F) << 8) | u16::from(raw[2]);
        let id = raw[3] >> 4;
        let y = (u16::from(raw[3] & 0x0F) << 8) | u16::from(raw[4]);

        Some(TouchData {
            points,
            event,
            id,
            x,
            y,
        })
    }
}

/// Errors that can occur when interacting with the FT6336U
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchSensorError {
    UnknownChip(u8),
    UnknownVendor(u8),
    I2CError,
}

impl<E> From<E> for TouchSensorError
where
    E: Error,
{
    fn from(_: E) -> Self {
        TouchSensorError::I2CError
    }
}

pub mod blocking;
