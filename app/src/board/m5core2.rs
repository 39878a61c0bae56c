//! M5Stack Core2 bring-up
//!
//! The ILI9342C sits on SPI2, the FT6336U touch controller and the AXP192
//! PMU share the internal I2C bus. The display has no reset GPIO; the PMU
//! drives its reset line and powers the backlight, so the PMU is brought up
//! before the display.

use core::cell::RefCell;

use drivers::axp192::AXP192;
use drivers::ft6336u::blocking::FT6336U;
use embedded_hal_bus::i2c::RefCellDevice;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::delay::Delay;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::peripherals::{GPIO15, GPIO18, GPIO23, GPIO5, SPI2};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::Blocking;
use log::info;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9342CRgb565;
use mipidsi::options::{ColorInversion, ColorOrder};
use mipidsi::{Builder, Display, NoResetPin};
use static_cell::StaticCell;

use super::{BoardPeripherals, DISPLAY_HEIGHT, DISPLAY_WIDTH};

type SharedI2c = RefCellDevice<'static, I2c<'static, Blocking>>;

/// Type alias for the ILI9342C display instance, reset is handled by the PMU
pub type BoardDisplay = Display<
    SpiInterface<'static, ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, NoDelay>, Output<'static>>,
    ILI9342CRgb565,
    NoResetPin,
>;

/// Type alias for the FT6336U touch controller on the shared I2C bus
pub type BoardTouch = FT6336U<SharedI2c>;

/// Initializes power, display and touch of the Core2.
///
/// Order matters: the AXP192 switches on the display supply and backlight
/// and pulses the display reset line before the ILI9342C init sequence runs.
///
/// # Panics
///
/// Panics if any peripheral fails to initialize.
pub fn initialize_board(p: BoardPeripherals) -> (BoardDisplay, BoardTouch) {
    let mut delay = Delay::new();

    let i2c = I2c::new(
        p.i2c0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("Failed to create I2C bus")
    .with_sda(p.gpio21)
    .with_scl(p.gpio22);

    static I2C_BUS: StaticCell<RefCell<I2c<'static, Blocking>>> = StaticCell::new();
    let i2c_bus: &'static RefCell<I2c<'static, Blocking>> = I2C_BUS.init(RefCell::new(i2c));

    let mut pmu = AXP192::new(RefCellDevice::new(i2c_bus));
    pmu.init_core2(&mut delay)
        .expect("Failed to initialize AXP192");
    let status = pmu.get_power_status().expect("Failed to read power status");
    info!("AXP192 power status: 0x{status:02X}");

    let display = initialize_display(
        p.spi2,
        p.gpio18,
        p.gpio23,
        p.gpio5,
        p.gpio15,
        &mut delay,
    );

    let mut touch = FT6336U::new(RefCellDevice::new(i2c_bus));
    let chip_id = touch.begin().expect("Failed to begin touchpad");
    info!("Touchpad chip ID: {chip_id}");
    let firmware = touch
        .get_firmware_version()
        .expect("Failed to get firmware version");
    info!("Touchpad firmware: 0x{firmware:02X}");

    (display, touch)
}

fn initialize_display(
    spi: SPI2<'static>,
    sck: GPIO18<'static>,
    mosi: GPIO23<'static>,
    cs: GPIO5<'static>,
    dc: GPIO15<'static>,
    delay: &mut Delay,
) -> BoardDisplay {
    let dc = Output::new(dc, Level::Low, OutputConfig::default());
    let cs = Output::new(cs, Level::High, OutputConfig::default());

    let spi = Spi::new(
        spi,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(40))
            .with_mode(Mode::_0),
    )
    .expect("Failed to create SPI bus")
    .with_sck(sck)
    .with_mosi(mosi);

    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).expect("Failed to create SPI device");

    static DISPLAY_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let buffer = DISPLAY_BUFFER.init([0_u8; 512]);

    let di = SpiInterface::new(spi_device, dc, buffer);

    Builder::new(ILI9342CRgb565, di)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .color_order(ColorOrder::Bgr)
        .invert_colors(ColorInversion::Inverted)
        .init(delay)
        .expect("Failed to initialize display")
}
