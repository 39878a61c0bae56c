#![no_std]
#![no_main]

use alloc::boxed::Box;
use alloc::rc::Rc;
use board::{initialize_board, BoardPeripherals, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_embassy::main;
use log::info;
use slint::platform::software_renderer::{MinimalSoftwareWindow, RepaintBufferType};
use slint::{ComponentHandle, PhysicalSize};
use slint_generated::AppWindow;
use ui_port::{Backend, TickClock, TouchReader};

extern crate alloc;

mod board;
mod render_loop;
mod ui;

esp_bootloader_esp_idf::esp_app_desc!();

#[main]
async fn main(_spawner: Spawner) {
    // Initialize peripherals
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::_240MHz));

    esp_alloc::heap_allocator!(size: 72 * 1024);

    esp_println::logger::init_logger_from_env();
    info!("Hello Rust! (Slint)");
    info!("I am the touch counter");

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);
    info!("Embassy initialized!");

    let (display, touch) = initialize_board(BoardPeripherals {
        spi2: peripherals.SPI2,
        i2c0: peripherals.I2C0,
        gpio2: peripherals.GPIO2,
        gpio4: peripherals.GPIO4,
        gpio5: peripherals.GPIO5,
        gpio15: peripherals.GPIO15,
        gpio18: peripherals.GPIO18,
        gpio19: peripherals.GPIO19,
        gpio21: peripherals.GPIO21,
        gpio22: peripherals.GPIO22,
        gpio23: peripherals.GPIO23,
    });

    let window = MinimalSoftwareWindow::new(RepaintBufferType::ReusedBuffer);
    window.set_size(PhysicalSize::new(DISPLAY_WIDTH.into(), DISPLAY_HEIGHT.into()));
    let clock = Rc::new(TickClock::new());

    // Set the platform for Slint
    let backend = Box::new(Backend::new(window.clone(), clock.clone()));
    slint::platform::set_platform(backend).expect("set_platform failed");

    // Initialize UI
    let app_window = AppWindow::new().expect("UI init failed");
    ui::attach_click_counter(&app_window);
    app_window.show().expect("UI show failed");

    info!("Setup done");

    render_loop::run(window, clock, display, TouchReader::new(touch)).await
}
