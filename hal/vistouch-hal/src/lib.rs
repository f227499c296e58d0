//! Vistouch Hardware Abstraction Layer
//!
//! This crate defines the collaborator interfaces the gesture engine needs
//! from the outside world. A touch driver reports one frame of finger state
//! per tick, and an offscreen surface stores pick colors that the engine
//! samples at the touch point.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (vistouch-core, etc.)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  vistouch-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ touch driver  │       │ vistouch-     │
//! │ (board code)  │       │ display       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`touch::TouchSensor`] - Per-tick finger state source
//! - [`surface::PickSurface`] - Offscreen draw target that can be read back

#![no_std]
#![deny(unsafe_code)]

pub mod pick;
pub mod surface;
pub mod touch;

// Re-export key types at crate root for convenience
pub use pick::PickColor;
pub use surface::PickSurface;
pub use touch::{TouchFrame, TouchSensor};
