// https://github.com/Bodmer/TFT_eSPI/blob/master/Extensions/Touch.cpp
// For the XPT2046 control byte layout see table 6 of the data sheet:
// start bit, 3 channel select bits, mode bit, SER/DFR bit, 2 power down bits.
use bitflags::bitflags;

/// Differential 12-bit conversion of the X plate
pub(crate) const READ_X: u8 = 0xD0;
/// Differential 12-bit conversion of the Y plate
pub(crate) const READ_Y: u8 = 0x90;
/// Pressure measurement Z1
pub(crate) const READ_Z1: u8 = 0xB0;
/// Pressure measurement Z2
pub(crate) const READ_Z2: u8 = 0xC0;

/// Full scale of the 12-bit ADC
pub(crate) const ADC_MAX: i32 = 0x0FFF;

/// Largest difference between two raw samples of the same touch
pub const RAW_ERROR: u16 = 20;

/// Pressure reported by TFT_eSPI based sketches as a firm press
pub const DEFAULT_PRESSURE_THRESHOLD: u16 = 600;

/// Pressure thresholds below this are raised to it
pub const MIN_PRESSURE_THRESHOLD: u16 = 20;

/// Number of samples taken per touch read, one valid sample is enough
pub const SAMPLES_PER_READ: usize = 5;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct CalibrationFlags: u16 {
        /// Raw X drives the screen Y axis and vice versa
        const ROTATE   = 1 << 0;
        const INVERT_X = 1 << 1;
        const INVERT_Y = 1 << 2;
    }
}

/// Linear mapping from raw ADC readings to screen pixels.
///
/// Uses the five value layout produced by TFT_eSPI's `calibrateTouch`:
/// `[x_offset, x_range, y_offset, y_range, flags]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub x_offset: u16,
    pub x_range: u16,
    pub y_offset: u16,
    pub y_range: u16,
    pub flags: CalibrationFlags,
}

impl Calibration {
    pub const fn from_raw(data: [u16; 5]) -> Self {
        Self {
            x_offset: data[0],
            x_range: data[1],
            y_offset: data[2],
            y_range: data[3],
            flags: CalibrationFlags::from_bits_truncate(data[4]),
        }
    }

    /// Maps a raw sample to screen coordinates.
    ///
    /// Returns `None` if the point falls outside a `width` x `height` screen.
    pub fn convert(&self, raw_x: u16, raw_y: u16, width: u16, height: u16) -> Option<(u16, u16)> {
        let (first, second) = if self.flags.contains(CalibrationFlags::ROTATE) {
            (raw_y, raw_x)
        } else {
            (raw_x, raw_y)
        };

        let x_range = i32::from(self.x_range.max(1));
        let y_range = i32::from(self.y_range.max(1));

        let mut x = (i32::from(first) - i32::from(self.x_offset)) * i32::from(width) / x_range;
        let mut y = (i32::from(second) - i32::from(self.y_offset)) * i32::from(height) / y_range;

        if self.flags.contains(CalibrationFlags::INVERT_X) {
            x = i32::from(width) - x;
        }
        if self.flags.contains(CalibrationFlags::INVERT_Y) {
            y = i32::from(height) - y;
        }

        if x < 0 || y < 0 || x >= i32::from(width) || y >= i32::from(height) {
            return None;
        }
        Some((x as u16, y as u16))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::from_raw([300, 3600, 300, 3600, 0])
    }
}

/// Pressure from the two plate measurements, 0 when nothing touches the panel
pub fn pressure(z1: u16, z2: u16) -> u16 {
    let z = ADC_MAX + i32::from(z1) - i32::from(z2);
    if z >= ADC_MAX || z <= 0 {
        0
    } else {
        z as u16
    }
}

/// Errors that can occur when interacting with the XPT2046
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchSensorError {
    SpiError,
}

pub mod blocking;

#[cfg(test)]
mod tests {
    use super::*;

    /// Calibration of the 320x240 ILI9341 panel used with rotation 3
    const PANEL: Calibration = Calibration::from_raw([275, 3620, 264, 3532, 1]);

    #[test]
    fn test_calibration_from_raw() {
        assert_eq!(PANEL.x_offset, 275);
        assert_eq!(PANEL.x_range, 3620);
        assert_eq!(PANEL.y_offset, 264);
        assert_eq!(PANEL.y_range, 3532);
        assert_eq!(PANEL.flags, CalibrationFlags::ROTATE);
    }

    #[test]
    fn test_convert_rotated() {
        // raw y feeds the screen x axis when rotated
        assert_eq!(PANEL.convert(2000, 1000, 320, 240), Some((64, 117)));
    }

    #[test]
    fn test_convert_inverted() {
        let calibration = Calibration::from_raw([0, 4000, 0, 4000, 0b110]);
        assert_eq!(calibration.convert(1000, 3000, 400, 400), Some((300, 100)));
    }

    #[test]
    fn test_convert_outside_screen() {
        assert_eq!(PANEL.convert(2000, 100, 320, 240), None);
        assert_eq!(PANEL.convert(2000, 4095, 320, 240), None);
    }

    #[test]
    fn test_pressure() {
        assert_eq!(pressure(0, 4095), 0);
        assert_eq!(pressure(1000, 2000), 3095);
        assert_eq!(pressure(0, 0), 0);
    }
}
