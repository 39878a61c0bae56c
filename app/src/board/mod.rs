//! Board support
//!
//! Exactly one board module is compiled in, selected by cargo feature:
//!
//! - **board-m5core2**: M5Stack Core2, ILI9342C display and FT6336U capacitive
//!   touch, powered through the AXP192 PMU
//! - **board-tft**: ESP32 with an ILI9341 module and an XPT2046 resistive
//!   touch controller on the same SPI bus
//!
//! Both modules export the same items: `BoardDisplay`, `BoardTouch` and
//! `initialize_board`.

#[cfg(all(feature = "board-m5core2", feature = "board-tft"))]
compile_error!("features `board-m5core2` and `board-tft` are mutually exclusive");

#[cfg(not(any(feature = "board-m5core2", feature = "board-tft")))]
compile_error!("select a board with either the `board-m5core2` or the `board-tft` feature");

#[cfg(feature = "board-m5core2")]
mod m5core2;
#[cfg(feature = "board-m5core2")]
pub use m5core2::{initialize_board, BoardDisplay, BoardTouch};

#[cfg(feature = "board-tft")]
mod tft;
#[cfg(feature = "board-tft")]
pub use tft::{initialize_board, BoardDisplay, BoardTouch};

/// Display resolution width in pixels, landscape
pub const DISPLAY_WIDTH: u16 = 320;
/// Display resolution height in pixels
pub const DISPLAY_HEIGHT: u16 = 240;

/// Pins and peripherals a board module takes over during bring-up.
pub struct BoardPeripherals {
    pub spi2: esp_hal::peripherals::SPI2<'static>,
    pub i2c0: esp_hal::peripherals::I2C0<'static>,
    pub gpio2: esp_hal::peripherals::GPIO2<'static>,
    pub gpio4: esp_hal::peripherals::GPIO4<'static>,
    pub gpio5: esp_hal::peripherals::GPIO5<'static>,
    pub gpio15: esp_hal::peripherals::GPIO15<'static>,
    pub gpio18: esp_hal::peripherals::GPIO18<'static>,
    pub gpio19: esp_hal::peripherals::GPIO19<'static>,
    pub gpio21: esp_hal::peripherals::GPIO21<'static>,
    pub gpio22: esp_hal::peripherals::GPIO22<'static>,
    pub gpio23: esp_hal::peripherals::GPIO23<'static>,
}
