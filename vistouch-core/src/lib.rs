//! Vistouch core
//!
//! Scene graph and touch gesture engine for small displays. Objects are
//! identified under the finger by painting the active page into an
//! offscreen surface in per-object pick colors and reading back one pixel.
//!
//! - [`scene`]: pages of z-ordered shapes, drawn with `embedded-graphics`
//! - [`pick`]: pick color allocation and the offscreen picking pass
//! - [`touch`]: processes binding touch types to objects, and the
//!   per-tick classifier
//! - [`staging`]: working copies committed on demand or per batch
//! - [`engine`]: the [`VisualTouch`] facade tying it all together
//!
//! This crate is `no_std` and needs a global allocator.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod engine;
pub mod pick;
pub mod scene;
pub mod staging;
pub mod touch;

pub use config::{ConfigError, EngineConfig, PickDepth};
pub use engine::{InitError, VisualTouch};
pub use scene::{Scene, SceneError};
pub use staging::PageNum;
pub use touch::{ProcessError, ProcessSpec, TouchType};
pub use vistouch_display::PickBuffer;
pub use vistouch_hal::{PickColor, PickSurface, TouchFrame, TouchSensor};
