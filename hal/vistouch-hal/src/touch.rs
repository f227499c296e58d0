//! Touch input abstractions
//!
//! A touch driver tracks the finger between ticks and reports level and
//! edge predicates in a [`TouchFrame`]. Edge predicates are true for exactly
//! one tick; level predicates stay true while the condition lasts.

use embedded_graphics::prelude::Point;

/// Snapshot of the finger state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchFrame {
    /// Cursor X in surface coordinates
    pub x: i32,
    /// Cursor Y in surface coordinates
    pub y: i32,

    /// Finger is down
    pub is_pressed: bool,
    /// Finger is up
    pub is_released: bool,
    /// Finger has been down long enough to count as holding
    pub is_holding: bool,
    /// Finger is moving slowly while down
    pub is_dragging: bool,
    /// Finger is moving fast while down
    pub is_flicking: bool,

    /// Finger went down this tick
    pub was_pressed: bool,
    /// Finger went up this tick
    pub was_released: bool,
    /// Hold threshold was crossed this tick
    pub was_hold: bool,
    /// A drag started this tick
    pub was_drag_start: bool,
    /// A drag ended this tick
    pub was_dragged: bool,
    /// A flick started this tick
    pub was_flick_start: bool,
    /// A flick ended this tick
    pub was_flicked: bool,
    /// A short tap completed this tick
    pub was_clicked: bool,

    /// Taps counted in the current multi-click window
    pub click_count: u8,
}

impl TouchFrame {
    /// Idle frame with the cursor at a point
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_released: true,
            ..Self::default()
        }
    }

    /// Frame for the tick the finger lands at a point
    pub fn pressed_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_pressed: true,
            was_pressed: true,
            ..Self::default()
        }
    }

    /// Frame for a tick the finger stays down at a point
    pub fn holding_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_pressed: true,
            ..Self::default()
        }
    }

    /// Frame for the tick the finger lifts at a point
    pub fn released_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_released: true,
            was_released: true,
            ..Self::default()
        }
    }

    /// Cursor position
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if this tick carries a press or release edge
    pub fn has_phase_edge(&self) -> bool {
        self.was_pressed || self.was_released
    }
}

/// Touch sensor trait
///
/// Implemented by board code on top of the real touch controller driver.
/// The engine polls once per tick.
pub trait TouchSensor {
    /// Read the finger state for this tick
    fn poll(&mut self) -> TouchFrame;

    /// Check if the sensor is initialized and delivering frames
    fn is_enabled(&self) -> bool {
        true
    }
}
