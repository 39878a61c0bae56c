//! Display flush adapter.
//!
//! Slint renders dirty lines one at a time. Lines sharing the same horizontal
//! range are collected into a band in the scratch buffer and written to the
//! display as one rectangle, so the controller's address window is set once
//! per band instead of once per line.

use core::ops::Range;

use embedded_graphics_core::pixelcolor::raw::RawU16;
use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_hal::digital::OutputPin;
use log::{debug, warn};
use mipidsi::interface::{Interface, InterfacePixelFormat};
use mipidsi::models::Model;
use mipidsi::Display;
use slint::platform::software_renderer::{LineBufferProvider, Rgb565Pixel};

/// Number of display rows the scratch buffer holds
pub const SCRATCH_ROWS: usize = 10;

/// Rectangular region with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Area {
    pub fn width(&self) -> usize {
        usize::from(self.x2 - self.x1) + 1
    }

    pub fn height(&self) -> usize {
        usize::from(self.y2 - self.y1) + 1
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// The one-line area covering `range` on `line`
    fn line(line: usize, range: &Range<usize>) -> Self {
        Self {
            x1: range.start as u16,
            y1: line as u16,
            x2: (range.end - 1) as u16,
            y2: line as u16,
        }
    }
}

/// A display that can take a rectangle of pixels in one transaction.
pub trait FlushTarget {
    type Error: core::fmt::Debug;

    /// Sets the address window to `area` and streams `pixels` in raster order.
    /// `pixels` holds exactly `area.pixel_count()` entries.
    fn write_area(&mut self, area: &Area, pixels: &[Rgb565Pixel]) -> Result<(), Self::Error>;
}

impl<DI, M, RST> FlushTarget for Display<DI, M, RST>
where
    DI: Interface,
    M: Model<ColorFormat = Rgb565>,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    type Error = DI::Error;

    fn write_area(&mut self, area: &Area, pixels: &[Rgb565Pixel]) -> Result<(), Self::Error> {
        self.set_pixels(
            area.x1,
            area.y1,
            area.x2,
            area.y2,
            pixels.iter().map(|p| RawU16::new(p.0).into()),
        )
    }
}

pub struct DisplayFlusher<'a, T> {
    target: T,
    scratch: &'a mut [Rgb565Pixel],
    pending: Option<Area>,
}

impl<'a, T> DisplayFlusher<'a, T>
where
    T: FlushTarget,
{
    /// `scratch` must hold at least one full display row.
    pub fn new(target: T, scratch: &'a mut [Rgb565Pixel]) -> Self {
        Self {
            target,
            scratch,
            pending: None,
        }
    }

    /// Whether `line`/`range` extends the pending band by one row.
    fn extends_pending(&self, line: usize, range: &Range<usize>) -> bool {
        match self.pending {
            Some(area) => {
                usize::from(area.x1) == range.start
                    && area.width() == range.len()
                    && usize::from(area.y2) + 1 == line
                    && (area.height() + 1) * area.width() <= self.scratch.len()
            }
            None => false,
        }
    }

    /// Writes the pending band to the display. The scratch buffer is free
    /// again once this returns.
    pub fn flush(&mut self) {
        let Some(area) = self.pending.take() else {
            return;
        };

        debug!(
            "flush area: ({}, {}) ({}, {})",
            area.x1, area.y1, area.x2, area.y2
        );

        let pixels = &self.scratch[..area.pixel_count()];
        if let Err(e) = self.target.write_area(&area, pixels) {
            warn!("flush of {:?} failed: {:?}", area, e);
        }
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

impl<T> LineBufferProvider for &mut DisplayFlusher<'_, T>
where
    T: FlushTarget,
{
    type TargetPixel = Rgb565Pixel;

    fn process_line(
        &mut self,
        line: usize,
        range: Range<usize>,
        render_fn: impl FnOnce(&mut [Self::TargetPixel]),
    ) {
        if range.is_empty() {
            return;
        }

        if !self.extends_pending(line, &range) {
            self.flush();
        }

        let offset = self.pending.map_or(0, |area| area.pixel_count());
        render_fn(&mut self.scratch[offset..offset + range.len()]);

        self.pending = Some(match self.pending {
            Some(area) => Area {
                y2: line as u16,
                ..area
            },
            None => Area::line(line, &range),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Records every window and the pixels streamed into it
    #[derive(Default)]
    struct RecordingTarget {
        writes: Vec<(Area, Vec<u16>)>,
        fail: bool,
    }

    impl FlushTarget for RecordingTarget {
        type Error = ();

        fn write_area(&mut self, area: &Area, pixels: &[Rgb565Pixel]) -> Result<(), ()> {
            assert_eq!(pixels.len(), area.pixel_count());
            if self.fail {
                return Err(());
            }
            self.writes
                .push((*area, pixels.iter().map(|p| p.0).collect()));
            Ok(())
        }
    }

    /// Renders `line` filling each pixel with `line * 1000 + x`
    fn render_line(flusher: &mut DisplayFlusher<'_, RecordingTarget>, line: usize, range: Range<usize>) {
        let start = range.start;
        let mut provider = &mut *flusher;
        provider.process_line(line, range, |buffer| {
            for (i, pixel) in buffer.iter_mut().enumerate() {
                *pixel = Rgb565Pixel((line * 1000 + start + i) as u16);
            }
        });
    }

    #[test]
    fn test_area_dimensions() {
        let area = Area {
            x1: 10,
            y1: 20,
            x2: 19,
            y2: 24,
        };
        assert_eq!(area.width(), 10);
        assert_eq!(area.height(), 5);
        assert_eq!(area.pixel_count(), 50);

        let single = Area {
            x1: 3,
            y1: 3,
            x2: 3,
            y2: 3,
        };
        assert_eq!(single.width(), 1);
        assert_eq!(single.height(), 1);
    }

    #[test]
    fn test_contiguous_lines_form_one_window() {
        let mut scratch = vec![Rgb565Pixel(0); 320 * SCRATCH_ROWS];
        let mut flusher = DisplayFlusher::new(RecordingTarget::default(), &mut scratch);

        for line in 5..8 {
            render_line(&mut flusher, line, 100..150);
        }
        assert!(flusher.target_mut().writes.is_empty());
        flusher.flush();

        let writes = &flusher.target_mut().writes;
        assert_eq!(writes.len(), 1);
        let (area, pixels) = &writes[0];
        assert_eq!(
            *area,
            Area {
                x1: 100,
                y1: 5,
                x2: 149,
                y2: 7
            }
        );
        assert_eq!(pixels.len(), 150);
        // raster order: row 5 first, then 6, then 7
        assert_eq!(pixels[0], 5100);
        assert_eq!(pixels[49], 5149);
        assert_eq!(pixels[50], 6100);
        assert_eq!(pixels[149], 7149);
    }

    #[test]
    fn test_band_splits_when_scratch_is_full() {
        let mut scratch = vec![Rgb565Pixel(0); 320 * SCRATCH_ROWS];
        let mut flusher = DisplayFlusher::new(RecordingTarget::default(), &mut scratch);

        for line in 0..25 {
            render_line(&mut flusher, line, 0..320);
        }
        flusher.flush();

        let areas: Vec<Area> = flusher.target_mut().writes.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            areas,
            vec![
                Area { x1: 0, y1: 0, x2: 319, y2: 9 },
                Area { x1: 0, y1: 10, x2: 319, y2: 19 },
                Area { x1: 0, y1: 20, x2: 319, y2: 24 },
            ]
        );
    }

    #[test]
    fn test_range_change_flushes_pending_band() {
        let mut scratch = vec![Rgb565Pixel(0); 320 * SCRATCH_ROWS];
        let mut flusher = DisplayFlusher::new(RecordingTarget::default(), &mut scratch);

        render_line(&mut flusher, 0, 0..10);
        render_line(&mut flusher, 1, 0..10);
        render_line(&mut flusher, 2, 5..10);
        // gap in lines
        render_line(&mut flusher, 7, 5..10);
        flusher.flush();

        let areas: Vec<Area> = flusher.target_mut().writes.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            areas,
            vec![
                Area { x1: 0, y1: 0, x2: 9, y2: 1 },
                Area { x1: 5, y1: 2, x2: 9, y2: 2 },
                Area { x1: 5, y1: 7, x2: 9, y2: 7 },
            ]
        );
        assert_eq!(flusher.target_mut().writes[2].1, vec![7005, 7006, 7007, 7008, 7009]);
    }

    #[test]
    fn test_flush_without_pending_band_is_a_no_op() {
        let mut scratch = vec![Rgb565Pixel(0); 320];
        let mut flusher = DisplayFlusher::new(RecordingTarget::default(), &mut scratch);

        flusher.flush();
        render_line(&mut flusher, 3, 4..4);
        flusher.flush();

        assert!(flusher.target_mut().writes.is_empty());
    }

    #[test]
    fn test_write_error_releases_scratch() {
        let mut scratch = vec![Rgb565Pixel(0); 320 * SCRATCH_ROWS];
        let target = RecordingTarget {
            fail: true,
            ..Default::default()
        };
        let mut flusher = DisplayFlusher::new(target, &mut scratch);

        render_line(&mut flusher, 0, 0..320);
        flusher.flush();

        flusher.target_mut().fail = false;
        render_line(&mut flusher, 1, 0..320);
        flusher.flush();

        let areas: Vec<Area> = flusher.target_mut().writes.iter().map(|(a, _)| *a).collect();
        assert_eq!(areas, vec![Area { x1: 0, y1: 1, x2: 319, y2: 1 }]);
    }
}
