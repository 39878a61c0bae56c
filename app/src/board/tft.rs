//! Generic ESP32 + ILI9341 module bring-up
//!
//! Display and XPT2046 touch controller share SPI2 with separate chip-select
//! lines. The XPT2046 only tolerates a slow clock, so each device reapplies
//! its own bus configuration before every transaction.

use core::cell::RefCell;

use drivers::xpt2046::blocking::XPT2046;
use drivers::xpt2046::{Calibration, DEFAULT_PRESSURE_THRESHOLD};
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};
use embedded_hal_bus::spi::{NoDelay, RefCellDevice};
use esp_hal::delay::Delay;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::Blocking;
use log::{info, warn};
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9341Rgb565;
use mipidsi::options::{ColorOrder, Orientation, Rotation};
use mipidsi::{Builder, Display};
use static_cell::StaticCell;

use super::{BoardPeripherals, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Raw ADC bounds and orientation flags measured for this panel
const TOUCH_CALIBRATION: Calibration = Calibration::from_raw([275, 3620, 264, 3532, 1]);

const DISPLAY_SPI_FREQUENCY: Rate = Rate::from_mhz(40);
const TOUCH_SPI_FREQUENCY: Rate = Rate::from_khz(2500);

type SpiBus = Spi<'static, Blocking>;
type SharedSpi = RefCellDevice<'static, SpiBus, Output<'static>, NoDelay>;

/// A device on the shared SPI bus that runs at its own clock.
pub struct ReclockedDevice {
    bus: &'static RefCell<SpiBus>,
    config: SpiConfig,
    device: SharedSpi,
}

impl ReclockedDevice {
    fn new(bus: &'static RefCell<SpiBus>, cs: Output<'static>, frequency: Rate) -> Self {
        Self {
            bus,
            config: SpiConfig::default()
                .with_frequency(frequency)
                .with_mode(Mode::_0),
            device: RefCellDevice::new_no_delay(bus, cs).expect("Failed to create SPI device"),
        }
    }
}

impl ErrorType for ReclockedDevice {
    type Error = <SharedSpi as ErrorType>::Error;
}

impl SpiDevice for ReclockedDevice {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if let Err(e) = self.bus.borrow_mut().apply_config(&self.config) {
            warn!("SPI reconfigure failed: {e:?}");
        }
        self.device.transaction(operations)
    }
}

/// Type alias for the ILI9341 display instance on the shared SPI bus
pub type BoardDisplay = Display<
    SpiInterface<'static, ReclockedDevice, Output<'static>>,
    ILI9341Rgb565,
    Output<'static>,
>;

/// Type alias for the XPT2046 touch controller on the shared SPI bus
pub type BoardTouch = XPT2046<ReclockedDevice>;

/// Initializes the ILI9341 display and the XPT2046 touch controller.
///
/// The display is rotated by 270 degrees into landscape, and the touch
/// calibration maps raw samples into that orientation.
///
/// # Panics
///
/// Panics if any peripheral fails to initialize.
pub fn initialize_board(p: BoardPeripherals) -> (BoardDisplay, BoardTouch) {
    let dc = Output::new(p.gpio2, Level::Low, OutputConfig::default());
    let reset = Output::new(p.gpio4, Level::High, OutputConfig::default());
    let display_cs = Output::new(p.gpio15, Level::High, OutputConfig::default());
    let touch_cs = Output::new(p.gpio21, Level::High, OutputConfig::default());

    let spi = Spi::new(
        p.spi2,
        SpiConfig::default()
            .with_frequency(DISPLAY_SPI_FREQUENCY)
            .with_mode(Mode::_0),
    )
    .expect("Failed to create SPI bus")
    .with_sck(p.gpio18)
    .with_mosi(p.gpio23)
    .with_miso(p.gpio19);

    static SPI_BUS: StaticCell<RefCell<SpiBus>> = StaticCell::new();
    let spi_bus: &'static RefCell<SpiBus> = SPI_BUS.init(RefCell::new(spi));

    static DISPLAY_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let buffer = DISPLAY_BUFFER.init([0_u8; 512]);

    let di = SpiInterface::new(
        ReclockedDevice::new(spi_bus, display_cs, DISPLAY_SPI_FREQUENCY),
        dc,
        buffer,
    );

    // panel is 240x320 portrait, rotated into landscape
    let display = Builder::new(ILI9341Rgb565, di)
        .reset_pin(reset)
        .display_size(DISPLAY_HEIGHT, DISPLAY_WIDTH)
        .orientation(Orientation::new().rotate(Rotation::Deg270))
        .color_order(ColorOrder::Bgr)
        .init(&mut Delay::new())
        .expect("Failed to initialize display");

    let touch = XPT2046::new(
        ReclockedDevice::new(spi_bus, touch_cs, TOUCH_SPI_FREQUENCY),
        TOUCH_CALIBRATION,
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
    )
    .with_pressure_threshold(DEFAULT_PRESSURE_THRESHOLD);
    info!("Touchpad: XPT2046, pressure threshold {DEFAULT_PRESSURE_THRESHOLD}");

    (display, touch)
}
