//! Offscreen surfaces for Vistouch
//!
//! This crate provides:
//! - `PickBuffer`, a RAM framebuffer that implements both `DrawTarget` and
//!   `PickSurface`, used as the offscreen picking surface
//! - `DisplayError` for surface construction failures
//!
//! # Architecture
//!
//! The picking pass needs a surface it can draw into and read back from.
//! Real panels rarely allow cheap reads, so the engine keeps its own
//! buffer in RAM. The same buffer type also serves as a stand-in panel in
//! host tests, since it is an ordinary RGB565 `DrawTarget`.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod buffer;

// Re-export key types
pub use backend::DisplayError;
pub use buffer::PickBuffer;
