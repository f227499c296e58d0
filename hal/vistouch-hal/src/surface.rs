//! Picking surface abstraction
//!
//! The picking pass draws through `embedded-graphics`, so a surface is any
//! RGB565 draw target that can also hand a pixel back.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::pick::PickColor;

/// Offscreen RGB565 draw target with read-back
///
/// Implementations are usually a plain framebuffer in RAM. A hardware
/// sprite that supports pixel reads works as well.
pub trait PickSurface: DrawTarget<Color = Rgb565> {
    /// Read one pixel
    ///
    /// Returns `None` when the point lies outside the surface.
    fn read_pixel(&self, point: Point) -> Option<Rgb565>;

    /// Read the pick code at a point
    ///
    /// Points outside the surface read as [`PickColor::NONE`].
    fn read_pick(&self, point: Point) -> PickColor {
        self.read_pixel(point)
            .map(PickColor::from_rgb565)
            .unwrap_or(PickColor::NONE)
    }

    /// Reset every pixel to the background code
    fn clear_pick(&mut self) -> Result<(), Self::Error> {
        self.clear(PickColor::NONE.to_rgb565())
    }
}
