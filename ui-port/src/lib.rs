#![no_std]
//! Glue between the Slint software renderer and the board peripherals.
//!
//! - [`flush`]: pushes rendered pixel bands to the display controller
//! - [`touch`]: polls the touch controller and turns samples into pointer events
//! - [`clock`]: virtual clock advanced by the main loop
//! - [`platform`]: the Slint platform backend
//! - [`counter`]: click counter behind the demo button

pub mod clock;
pub mod counter;
pub mod flush;
pub mod platform;
pub mod touch;

pub use clock::TickClock;
pub use counter::ClickCounter;
pub use flush::{Area, DisplayFlusher, FlushTarget};
pub use platform::Backend;
pub use touch::{PointerTracker, PressPoint, TouchPanel, TouchReader, TouchState};

extern crate alloc;
