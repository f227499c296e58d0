//! Pick color codes
//!
//! Every touchable object on a page gets a unique color code. The picking
//! pass paints objects in that code and the code found under the finger
//! identifies the topmost object.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};

/// Identifier color painted into the picking surface
///
/// Code 0 is reserved for "nothing here" and is never handed out to an
/// object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PickColor(u16);

impl PickColor {
    /// Background code, never assigned to an object
    pub const NONE: Self = Self(0);

    /// Create a pick color from its raw code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Raw code
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Check if this is the background code
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Color to paint with on an RGB565 surface
    pub fn to_rgb565(self) -> Rgb565 {
        Rgb565::from(RawU16::new(self.0))
    }

    /// Recover the code from a pixel read back from the surface
    pub fn from_rgb565(color: Rgb565) -> Self {
        Self(color.into_storage())
    }
}

impl From<u16> for PickColor {
    fn from(code: u16) -> Self {
        Self(code)
    }
}
