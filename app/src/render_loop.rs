use alloc::rc::Rc;
use embassy_time::Timer;
use log::warn;
use slint::platform::software_renderer::{MinimalSoftwareWindow, Rgb565Pixel};
use slint::platform::WindowEvent;
use static_cell::StaticCell;
use ui_port::flush::SCRATCH_ROWS;
use ui_port::{DisplayFlusher, FlushTarget, PointerTracker, TickClock, TouchPanel, TouchReader};

use crate::board::DISPLAY_WIDTH;

/// Pause between two loop iterations
const LOOP_DELAY_MS: u64 = 5;

const SCRATCH_LEN: usize = DISPLAY_WIDTH as usize * SCRATCH_ROWS;

/// Drives the UI forever: advances the clock, feeds touch input to the
/// window and redraws whatever Slint marked dirty.
pub async fn run<D, P>(
    window: Rc<MinimalSoftwareWindow>,
    clock: Rc<TickClock>,
    display: D,
    mut touch: TouchReader<P>,
) -> !
where
    D: FlushTarget,
    P: TouchPanel,
{
    static SCRATCH: StaticCell<[Rgb565Pixel; SCRATCH_LEN]> = StaticCell::new();
    let scratch = SCRATCH.init([Rgb565Pixel(0); SCRATCH_LEN]);

    let mut flusher = DisplayFlusher::new(display, scratch);
    let mut tracker = PointerTracker::default();

    loop {
        clock.tick();

        // Update timers and animations
        slint::platform::update_timers_and_animations();

        if let Some(event) = tracker.next_event(touch.read()) {
            let released = matches!(event, WindowEvent::PointerReleased { .. });
            dispatch(&window, event);
            // no hover on a touch screen
            if released {
                dispatch(&window, WindowEvent::PointerExited);
            }
        }

        window.draw_if_needed(|renderer| {
            renderer.render_by_line(&mut flusher);
            flusher.flush();
        });

        Timer::after_millis(LOOP_DELAY_MS).await;
    }
}

fn dispatch(window: &MinimalSoftwareWindow, event: WindowEvent) {
    if let Err(e) = window.try_dispatch_event(event) {
        warn!("event dispatch failed: {e:?}");
    }
}
