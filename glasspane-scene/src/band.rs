//! Draw target over one band of the partial render buffer
//!
//! A band covers a horizontal strip of a dirty area. Drawing outside the
//! strip is discarded, so widgets can be drawn whole into every band they
//! touch.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use glasspane_core::engine::Area;

/// Row-major RGB565 strip covering `area`
pub struct Band<'a> {
    pixels: &'a mut [u16],
    area: Area,
}

impl<'a> Band<'a> {
    /// Wrap the first `area.pixel_count()` entries of `buffer`
    ///
    /// Returns `None` if the buffer is too short.
    pub fn new(buffer: &'a mut [u16], area: Area) -> Option<Self> {
        let count = area.pixel_count();
        let pixels = buffer.get_mut(..count)?;
        Some(Self { pixels, area })
    }

    /// Area the band covers
    pub fn area(&self) -> Area {
        self.area
    }

    /// Rendered pixels
    pub fn pixels(&self) -> &[u16] {
        self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < self.area.x1 || x > self.area.x2 || y < self.area.y1 || y > self.area.y2 {
            return None;
        }
        let stride = self.area.width() as usize;
        Some((y - self.area.y1) as usize * stride + (x - self.area.x1) as usize)
    }
}

impl Dimensions for Band<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.area.x1, self.area.y1),
            Size::new(self.area.width(), self.area.height()),
        )
    }
}

impl DrawTarget for Band<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point.x, point.y) {
                self.pixels[i] = color.into_storage();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let target = Area::new(
            area.top_left.x,
            area.top_left.y,
            bottom_right.x,
            bottom_right.y,
        );
        let Some(visible) = target.intersect(&self.area) else {
            return Ok(());
        };

        let raw = color.into_storage();
        let run = visible.width() as usize;
        for y in visible.y1..=visible.y2 {
            if let Some(start) = self.index(visible.x1, y) {
                self.pixels[start..start + run].fill(raw);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.into_storage());
        Ok(())
    }
}
