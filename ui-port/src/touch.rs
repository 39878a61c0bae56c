//! Touch-read adapter.
//!
//! Polls the touch controller once per call and reports a level state. No
//! debouncing or gesture detection happens here; Slint's input handling gets
//! the raw snapshot as pointer events through [`PointerTracker`].

use drivers::ft6336u::blocking::FT6336U;
use drivers::xpt2046::blocking::XPT2046;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use log::{debug, warn};
use slint::platform::{PointerEventButton, WindowEvent};
use slint::LogicalPosition;

/// Point reported by a touch controller, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressPoint {
    pub x: i32,
    pub y: i32,
}

impl PressPoint {
    /// Reported when nothing touches the panel
    pub const NONE: PressPoint = PressPoint { x: -1, y: -1 };

    pub fn is_valid(&self) -> bool {
        self.x != -1 && self.y != -1
    }
}

/// A touch controller that can be polled for its current press point.
pub trait TouchPanel {
    type Error: core::fmt::Debug;

    /// Current press point, [`PressPoint::NONE`] when the panel is not touched.
    fn press_point(&mut self) -> Result<PressPoint, Self::Error>;
}

impl<I2C> TouchPanel for FT6336U<I2C>
where
    I2C: I2c,
{
    type Error = drivers::ft6336u::TouchSensorError;

    fn press_point(&mut self) -> Result<PressPoint, Self::Error> {
        if !self.is_pressed()? {
            return Ok(PressPoint::NONE);
        }
        Ok(self
            .read_touch()?
            .map_or(PressPoint::NONE, |data| PressPoint {
                x: i32::from(data.x),
                y: i32::from(data.y),
            }))
    }
}

impl<SPI> TouchPanel for XPT2046<SPI>
where
    SPI: SpiDevice,
{
    type Error = drivers::xpt2046::TouchSensorError;

    fn press_point(&mut self) -> Result<PressPoint, Self::Error> {
        Ok(self
            .get_touch()?
            .map_or(PressPoint::NONE, |(x, y)| PressPoint {
                x: i32::from(x),
                y: i32::from(y),
            }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
    Released,
    Pressed { x: i32, y: i32 },
}

pub struct TouchReader<P> {
    panel: P,
}

impl<P> TouchReader<P>
where
    P: TouchPanel,
{
    pub fn new(panel: P) -> Self {
        Self { panel }
    }

    /// Snapshot of the panel. Bus errors read as released.
    pub fn read(&mut self) -> TouchState {
        match self.panel.press_point() {
            Ok(point) if point.is_valid() => {
                debug!("touch x {} y {}", point.x, point.y);
                TouchState::Pressed {
                    x: point.x,
                    y: point.y,
                }
            }
            Ok(_) => TouchState::Released,
            Err(e) => {
                warn!("touch read error: {:?}", e);
                TouchState::Released
            }
        }
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }
}

/// Turns successive touch states into Slint pointer events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<LogicalPosition>,
}

impl PointerTracker {
    pub fn next_event(&mut self, state: TouchState) -> Option<WindowEvent> {
        let button = PointerEventButton::Left;
        match state {
            TouchState::Pressed { x, y } => {
                let position = LogicalPosition::new(x as f32, y as f32);
                match self.last.replace(position) {
                    None => Some(WindowEvent::PointerPressed { position, button }),
                    Some(previous) if previous != position => {
                        Some(WindowEvent::PointerMoved { position })
                    }
                    Some(_) => None,
                }
            }
            TouchState::Released => self
                .last
                .take()
                .map(|position| WindowEvent::PointerReleased { position, button }),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.last.is_some()
    }
}
