#![no_std]
//! Touch and power management drivers for the boards the touch counter runs on.
//!
//! All drivers are written against the blocking `embedded-hal` 1.0 traits so
//! they can be shared between boards and tested on the host with mocks.

use embedded_hal::i2c::I2c;

/// AXP192 power management IC driver (M5Stack Core2).
pub mod axp192;

/// FT6336U capacitive touch controller driver.
pub mod ft6336u;

/// XPT2046 resistive touch controller driver.
pub mod xpt2046;

#[cfg(test)]
extern crate alloc;

/// Byte-wide register access on top of an I2C bus.
#[derive(Debug)]
pub(crate) struct BlockingRegisterDevice<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> BlockingRegisterDevice<I2C>
where
    I2C: I2c,
{
    pub(crate) fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Writes `buffer`, the first byte being the register address.
    pub(crate) fn write_register(&mut self, buffer: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, buffer)
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buffer)?;
        Ok(buffer[0])
    }

    /// Reads `buffer.len()` consecutive registers starting at `register`.
    pub(crate) fn read_register_buffer(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.address, &[register], buffer)
    }

    /// Read-modify-write: keeps the bits in `keep`, then ORs in `set`.
    pub(crate) fn update_register(
        &mut self,
        register: u8,
        keep: u8,
        set: u8,
    ) -> Result<(), I2C::Error> {
        let value = self.read_register(register)?;
        self.write_register(&[register, (value & keep) | set])
    }

    pub(crate) fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::BlockingRegisterDevice;
    use alloc::vec;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_update_register_keeps_masked_bits() {
        let expectations = [
            I2cTransaction::write_read(0x34, vec![0x12], vec![0b1010_0101]),
            I2cTransaction::write(0x34, vec![0x12, 0b1010_0110]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut dev = BlockingRegisterDevice::new(i2c.clone(), 0x34);

        dev.update_register(0x12, 0b1111_0000, 0b0000_0110)
            .expect("update failed");

        i2c.done();
    }

    #[test]
    fn test_read_register_buffer() {
        let expectations = [I2cTransaction::write_read(
            0x38,
            vec![0x02],
            vec![0x01, 0x02, 0x03],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let mut dev = BlockingRegisterDevice::new(i2c.clone(), 0x38);

        let mut buffer = [0u8; 3];
        dev.read_register_buffer(0x02, &mut buffer)
            .expect("read failed");
        assert_eq!(buffer, [0x01, 0x02, 0x03]);

        i2c.done();
    }
}
