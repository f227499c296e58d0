//! RAM pick buffer
//!
//! Row-major RGB565 framebuffer with fallible allocation. Drawing outside
//! the buffer is clipped silently.

use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use vistouch_hal::PickSurface;

use crate::backend::DisplayError;

/// Offscreen RGB565 framebuffer
#[derive(Clone)]
pub struct PickBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl PickBuffer {
    /// Allocate a buffer cleared to zero
    ///
    /// Fails instead of aborting when the heap cannot hold the pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidDimensions);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(DisplayError::InvalidDimensions)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| DisplayError::AllocationFailed)?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel words, row-major
    pub fn as_raw(&self) -> &[u16] {
        &self.pixels
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl OriginDimensions for PickBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PickBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index(point) {
                self.pixels[index] = color.into_storage();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let raw = color.into_storage();
        let width = self.width as usize;

        for y in area.rows() {
            let row = y as usize * width;
            let columns = area.columns();
            let start = row + columns.start as usize;
            let end = row + columns.end as usize;
            self.pixels[start..end].fill(raw);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.into_storage());
        Ok(())
    }
}

impl PickSurface for PickBuffer {
    fn read_pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point)
            .map(|index| Rgb565::from(RawU16::new(self.pixels[index])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use vistouch_hal::PickColor;

    #[test]
    fn test_rejects_zero_size() {
        assert_eq!(
            PickBuffer::new(0, 10).err(),
            Some(DisplayError::InvalidDimensions)
        );
        assert_eq!(
            PickBuffer::new(10, 0).err(),
            Some(DisplayError::InvalidDimensions)
        );
    }

    #[test]
    fn test_new_buffer_reads_none() {
        let buffer = PickBuffer::new(8, 4).unwrap();
        assert_eq!(buffer.size(), Size::new(8, 4));
        assert_eq!(buffer.as_raw().len(), 32);
        assert_eq!(buffer.read_pick(Point::new(3, 2)), PickColor::NONE);
    }

    #[test]
    fn test_out_of_bounds_reads_none() {
        let mut buffer = PickBuffer::new(4, 4).unwrap();
        buffer.clear(PickColor::new(9).to_rgb565()).unwrap();
        assert_eq!(buffer.read_pixel(Point::new(-1, 0)), None);
        assert_eq!(buffer.read_pixel(Point::new(4, 0)), None);
        assert_eq!(buffer.read_pick(Point::new(0, 4)), PickColor::NONE);
        assert_eq!(buffer.read_pick(Point::new(3, 3)), PickColor::new(9));
    }

    #[test]
    fn test_fill_solid_clips() {
        let mut buffer = PickBuffer::new(10, 10).unwrap();
        let color = PickColor::new(7).to_rgb565();

        // Rectangle hangs off the bottom-right corner
        Rectangle::new(Point::new(6, 6), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut buffer)
            .unwrap();

        assert_eq!(buffer.read_pick(Point::new(9, 9)), PickColor::new(7));
        assert_eq!(buffer.read_pick(Point::new(6, 6)), PickColor::new(7));
        assert_eq!(buffer.read_pick(Point::new(5, 6)), PickColor::NONE);
    }

    #[test]
    fn test_fill_solid_negative_origin() {
        let mut buffer = PickBuffer::new(10, 10).unwrap();
        buffer
            .fill_solid(
                &Rectangle::new(Point::new(-5, -5), Size::new(7, 7)),
                PickColor::new(3).to_rgb565(),
            )
            .unwrap();

        assert_eq!(buffer.read_pick(Point::new(0, 0)), PickColor::new(3));
        assert_eq!(buffer.read_pick(Point::new(1, 1)), PickColor::new(3));
        assert_eq!(buffer.read_pick(Point::new(2, 2)), PickColor::NONE);
    }

    #[test]
    fn test_clear_pick_resets() {
        let mut buffer = PickBuffer::new(3, 3).unwrap();
        buffer.clear(PickColor::new(1).to_rgb565()).unwrap();
        buffer.clear_pick().unwrap();
        assert!(buffer.as_raw().iter().all(|&raw| raw == 0));
    }
}
