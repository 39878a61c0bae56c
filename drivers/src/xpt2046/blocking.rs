use super::{
    pressure, Calibration, TouchSensorError, DEFAULT_PRESSURE_THRESHOLD, MIN_PRESSURE_THRESHOLD,
    RAW_ERROR, READ_X, READ_Y, READ_Z1, READ_Z2, SAMPLES_PER_READ,
};
use embedded_hal::spi::SpiDevice;

#[derive(Debug)]
pub struct XPT2046<SPI> {
    spi: SPI,
    calibration: Calibration,
    width: u16,
    height: u16,
    threshold: u16,
}

impl<SPI> XPT2046<SPI>
where
    SPI: SpiDevice,
{
    /// Create a new XPT2046 instance for a `width` x `height` screen
    pub fn new(spi: SPI, calibration: Calibration, width: u16, height: u16) -> Self {
        Self {
            spi,
            calibration,
            width,
            height,
            threshold: DEFAULT_PRESSURE_THRESHOLD,
        }
    }

    /// Minimum pressure for a sample to count as a touch
    pub fn with_pressure_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold.max(MIN_PRESSURE_THRESHOLD);
        self
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    /// Runs one conversion and returns the 12-bit result
    fn read_channel(&mut self, command: u8) -> Result<u16, TouchSensorError> {
        let mut buffer = [0u8; 3];
        self.spi
            .transfer(&mut buffer, &[command, 0, 0])
            .map_err(|_| TouchSensorError::SpiError)?;
        Ok(u16::from_be_bytes([buffer[1], buffer[2]]) >> 3)
    }

    pub fn read_raw_pressure(&mut self) -> Result<u16, TouchSensorError> {
        let z1 = self.read_channel(READ_Z1)?;
        let z2 = self.read_channel(READ_Z2)?;
        Ok(pressure(z1, z2))
    }

    pub fn read_raw_xy(&mut self) -> Result<(u16, u16), TouchSensorError> {
        let x = self.read_channel(READ_X)?;
        let y = self.read_channel(READ_Y)?;
        Ok((x, y))
    }

    /// A sample is valid when the pressure holds above the threshold over two
    /// position readings that agree within `RAW_ERROR`.
    fn valid_sample(&mut self) -> Result<Option<(u16, u16)>, TouchSensorError> {
        if self.read_raw_pressure()? <= self.threshold {
            return Ok(None);
        }
        let (x1, y1) = self.read_raw_xy()?;

        if self.read_raw_pressure()? <= self.threshold {
            return Ok(None);
        }
        let (x2, y2) = self.read_raw_xy()?;

        if x1.abs_diff(x2) > RAW_ERROR || y1.abs_diff(y2) > RAW_ERROR {
            return Ok(None);
        }
        Ok(Some((x1, y1)))
    }

    /// Screen coordinates of the current touch, `None` if the panel is not
    /// pressed or the point is outside the screen.
    pub fn get_touch(&mut self) -> Result<Option<(u16, u16)>, TouchSensorError> {
        let mut raw = None;
        for _ in 0..SAMPLES_PER_READ {
            if let Some(sample) = self.valid_sample()? {
                raw = Some(sample);
            }
        }

        Ok(raw.and_then(|(x, y)| self.calibration.convert(x, y, self.width, self.height)))
    }

    /// Gives the SPI device back
    pub fn release(self) -> SPI {
        self.spi
    }
}
