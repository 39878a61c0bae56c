use super::{
    ChipID, InterruptMode, TouchData, TouchSensorError, FOCALTECH_VENDOR_ID, FT6336U_ADDRESS,
    RAW_TOUCH_EVENT_LEN, REG_CHIP_ID, REG_FIRMWARE_ID, REG_FOCALTECH_ID, REG_G_MODE,
    REG_PERIOD_ACTIVE, REG_TD_STATUS, REG_TH_GROUP,
};
use crate::BlockingRegisterDevice;
use embedded_hal::i2c::I2c;

/// Touch threshold used by the M5Stack Core2 board support
pub const DEFAULT_THRESHOLD: u8 = 0x28;

#[derive(Debug)]
pub struct FT6336U<I2C> {
    dev: BlockingRegisterDevice<I2C>,
}

impl<I2C> FT6336U<I2C>
where
    I2C: I2c,
{
    /// Create a new FT6336U instance
    pub fn new(i2c: I2C) -> Self {
        Self {
            dev: BlockingRegisterDevice::new(i2c, FT6336U_ADDRESS),
        }
    }

    /// Verify the controller answers and configure polling mode
    pub fn begin(&mut self) -> Result<ChipID, TouchSensorError> {
        let vendor = self.dev.read_register(REG_FOCALTECH_ID)?;
        if vendor != FOCALTECH_VENDOR_ID {
            return Err(TouchSensorError::UnknownVendor(vendor));
        }

        let chip_id = self.get_chip_id()?;

        self.set_interrupt_mode(InterruptMode::Polling)?;
        self.set_threshold(DEFAULT_THRESHOLD)?;

        Ok(chip_id)
    }

    pub fn get_chip_id(&mut self) -> Result<ChipID, TouchSensorError> {
        let result = self.dev.read_register(REG_CHIP_ID)?;
        ChipID::try_from(result).map_err(|_| TouchSensorError::UnknownChip(result))
    }

    pub fn get_firmware_version(&mut self) -> Result<u8, TouchSensorError> {
        let result = self.dev.read_register(REG_FIRMWARE_ID)?;
        Ok(result)
    }

    pub fn get_threshold(&mut self) -> Result<u8, TouchSensorError> {
        let result = self.dev.read_register(REG_TH_GROUP)?;
        Ok(result)
    }

    /// Sets the touch detection threshold, lower is more sensitive
    pub fn set_threshold(&mut self, threshold: u8) -> Result<(), TouchSensorError> {
        self.dev.write_register(&[REG_TH_GROUP, threshold])?;
        Ok(())
    }

    pub fn set_interrupt_mode(&mut self, mode: InterruptMode) -> Result<(), TouchSensorError> {
        self.dev.write_register(&[REG_G_MODE, mode.into()])?;
        Ok(())
    }

    /// Sets the report period in active mode, in milliseconds (clamped to 4..=14)
    pub fn set_active_period(&mut self, mut period: u8) -> Result<(), TouchSensorError> {
        period = period.clamp(4, 14);
        self.dev.write_register(&[REG_PERIOD_ACTIVE, period])?;
        Ok(())
    }

    /// Number of fingers currently on the panel
    pub fn touch_count(&mut self) -> Result<u8, TouchSensorError> {
        let result = self.dev.read_register(REG_TD_STATUS)?;
        let points = result & 0x0F;
        // 0x0F is reported before the first scan completes
        Ok(if points > 2 { 0 } else { points })
    }

    pub fn is_pressed(&mut self) -> Result<bool, TouchSensorError> {
        Ok(self.touch_count()? > 0)
    }

    /// Reads the first touch point, `None` when nothing touches the panel
    pub fn read_touch(&mut self) -> Result<Option<TouchData>, TouchSensorError> {
        let mut buffer = [0u8; RAW_TOUCH_EVENT_LEN];
        self.dev.read_register_buffer(REG_TD_STATUS, &mut buffer)?;
        Ok(TouchData::from_registers(&buffer))
    }

    /// Gives the I2C bus back
    pub fn release(self) -> I2C {
        self.dev.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ft6336u::Event;
    use alloc::vec;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = FT6336U_ADDRESS;

    #[test]
    fn test_begin_configures_polling_mode() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![REG_FOCALTECH_ID], vec![0x11]),
            I2cTransaction::write_read(ADDR, vec![REG_CHIP_ID], vec![0x64]),
            I2cTransaction::write(ADDR, vec![REG_G_MODE, 0x00]),
            I2cTransaction::write(ADDR, vec![REG_TH_GROUP, DEFAULT_THRESHOLD]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut touch = FT6336U::new(i2c.clone());

        assert_eq!(touch.begin(), Ok(ChipID::FT6336U));

        i2c.done();
    }

    #[test]
    fn test_begin_rejects_foreign_vendor() {
        let expectations = [I2cTransaction::write_read(
            ADDR,
            vec![REG_FOCALTECH_ID],
            vec![0x42],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let mut touch = FT6336U::new(i2c.clone());

        assert_eq!(touch.begin(), Err(TouchSensorError::UnknownVendor(0x42)));

        i2c.done();
    }

    #[test]
    fn test_touch_count_ignores_reset_value() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![REG_TD_STATUS], vec![0x0F]),
            I2cTransaction::write_read(ADDR, vec![REG_TD_STATUS], vec![0x01]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut touch = FT6336U::new(i2c.clone());

        assert_eq!(touch.is_pressed(), Ok(false));
        assert_eq!(touch.is_pressed(), Ok(true));

        i2c.done();
    }

    #[test]
    fn test_read_touch() {
        let expectations = [I2cTransaction::write_read(
            ADDR,
            vec![REG_TD_STATUS],
            vec![0x01, 0x80, 0xA0, 0x00, 0x78],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let mut touch = FT6336U::new(i2c.clone());

        let data = touch.read_touch().expect("read failed").expect("no touch");
        assert_eq!(data.event, Event::Contact);
        assert_eq!(data.x, 160);
        assert_eq!(data.y, 120);

        i2c.done();
    }

    #[test]
    fn test_bus_error_maps_to_i2c_error() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![REG_TD_STATUS], vec![0x00])
                .with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut touch = FT6336U::new(i2c.clone());

        assert_eq!(touch.touch_count(), Err(TouchSensorError::I2CError));

        i2c.done();
    }

    #[test]
    fn test_active_period_is_clamped() {
        let expectations = [I2cTransaction::write(ADDR, vec![REG_PERIOD_ACTIVE, 14])];
        let mut i2c = I2cMock::new(&expectations);
        let mut touch = FT6336U::new(i2c.clone());

        touch.set_active_period(60).expect("write failed");

        i2c.done();
    }
}
