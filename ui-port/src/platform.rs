use alloc::rc::Rc;
use log::info;
use slint::{
    platform::{software_renderer::MinimalSoftwareWindow, Platform, WindowAdapter},
    PlatformError,
};

use crate::clock::TickClock;

pub struct Backend {
    window: Rc<MinimalSoftwareWindow>,
    clock: Rc<TickClock>,
}

impl Backend {
    pub fn new(window: Rc<MinimalSoftwareWindow>, clock: Rc<TickClock>) -> Self {
        Self { window, clock }
    }
}

impl Platform for Backend {
    fn create_window_adapter(&self) -> Result<Rc<dyn WindowAdapter>, PlatformError> {
        let window = self.window.clone();
        info!("Creating window adapter");
        Ok(window)
    }

    fn duration_since_start(&self) -> core::time::Duration {
        self.clock.now()
    }

    fn debug_log(&self, arguments: core::fmt::Arguments) {
        info!("{}", arguments);
    }
}
