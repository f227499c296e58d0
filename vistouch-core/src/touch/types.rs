//! Gesture types
//!
//! Sixteen touch types in seven families. Declaration order is the
//! tie-break within a family when several processes match at once.

use vistouch_hal::TouchFrame;

/// Gesture sub-state a process reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TouchType {
    /// Finger landed
    Press = 0,
    /// Finger is down
    Pressing = 1,
    /// Touch finished after a press
    Pressed = 2,
    /// Finger lifted
    Release = 3,
    /// Finger is up
    Releasing = 4,
    /// Hold threshold crossed
    Hold = 5,
    /// Holding without dragging
    Holding = 6,
    /// Hold ended
    Held = 7,
    /// Drag started
    Drag = 8,
    /// Dragging
    Dragging = 9,
    /// Drag ended
    Dragged = 10,
    /// Flick started
    Flick = 11,
    /// Flicking
    Flicking = 12,
    /// Flick ended
    Flicked = 13,
    /// Short tap
    Clicked = 14,
    /// Tap count reached a threshold
    MultiClicked = 15,
}

/// Gesture family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureFamily {
    Press,
    Release,
    Hold,
    Flick,
    Drag,
    Click,
    MultiClick,
}

impl GestureFamily {
    /// Resolution rank, lower wins
    ///
    /// Flick > Drag > Hold > Click/MultiClick > Press > Release.
    pub const fn rank(self) -> u8 {
        match self {
            GestureFamily::Flick => 0,
            GestureFamily::Drag => 1,
            GestureFamily::Hold => 2,
            GestureFamily::Click | GestureFamily::MultiClick => 3,
            GestureFamily::Press => 4,
            GestureFamily::Release => 5,
        }
    }
}

/// Touch phase of a tick, decided by its press or release edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchPhase {
    Press,
    Release,
}

impl TouchPhase {
    /// Phase of a frame, `None` without a press or release edge
    pub fn of(frame: &TouchFrame) -> Option<Self> {
        if !frame.has_phase_edge() {
            return None;
        }
        if frame.was_pressed {
            Some(TouchPhase::Press)
        } else {
            Some(TouchPhase::Release)
        }
    }
}

impl TouchType {
    /// All types in declaration order
    pub const ALL: [TouchType; 16] = [
        TouchType::Press,
        TouchType::Pressing,
        TouchType::Pressed,
        TouchType::Release,
        TouchType::Releasing,
        TouchType::Hold,
        TouchType::Holding,
        TouchType::Held,
        TouchType::Drag,
        TouchType::Dragging,
        TouchType::Dragged,
        TouchType::Flick,
        TouchType::Flicking,
        TouchType::Flicked,
        TouchType::Clicked,
        TouchType::MultiClicked,
    ];

    /// Family this type belongs to
    pub const fn family(self) -> GestureFamily {
        use TouchType::*;
        match self {
            Press | Pressing | Pressed => GestureFamily::Press,
            Release | Releasing => GestureFamily::Release,
            Hold | Holding | Held => GestureFamily::Hold,
            Drag | Dragging | Dragged => GestureFamily::Drag,
            Flick | Flicking | Flicked => GestureFamily::Flick,
            Clicked => GestureFamily::Click,
            MultiClicked => GestureFamily::MultiClick,
        }
    }

    /// Resolution key, lower wins
    pub const fn priority(self) -> (u8, u8) {
        (self.family().rank(), self as u8)
    }

    /// Check if over-border modifiers apply to this type
    pub const fn is_swipe(self) -> bool {
        matches!(
            self,
            TouchType::Dragging | TouchType::Dragged | TouchType::Flicking | TouchType::Flicked
        )
    }

    /// Check if the type is live during a phase
    ///
    /// Press ticks enable the Press, Hold, Drag, Flick, Click and
    /// MultiClick families. Release ticks enable Release, Click,
    /// MultiClick, Flicked and Dragged.
    pub const fn enabled_in(self, phase: TouchPhase) -> bool {
        match phase {
            TouchPhase::Press => !matches!(self.family(), GestureFamily::Release),
            TouchPhase::Release => matches!(
                self,
                TouchType::Release
                    | TouchType::Releasing
                    | TouchType::Clicked
                    | TouchType::MultiClicked
                    | TouchType::Flicked
                    | TouchType::Dragged
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        for (index, touch_type) in TouchType::ALL.iter().enumerate() {
            assert_eq!(*touch_type as usize, index);
        }
    }

    #[test]
    fn test_family_priority() {
        assert!(TouchType::Flicked.priority() < TouchType::Dragging.priority());
        assert!(TouchType::Drag.priority() < TouchType::Hold.priority());
        assert!(TouchType::Held.priority() < TouchType::Clicked.priority());
        assert!(TouchType::MultiClicked.priority() < TouchType::Press.priority());
        assert!(TouchType::Pressed.priority() < TouchType::Release.priority());
        // Within a family, declaration order
        assert!(TouchType::Press.priority() < TouchType::Pressing.priority());
        // Click and MultiClick share a rank
        assert!(TouchType::Clicked.priority() < TouchType::MultiClicked.priority());
    }

    #[test]
    fn test_phase_enables() {
        assert!(TouchType::Press.enabled_in(TouchPhase::Press));
        assert!(TouchType::Flick.enabled_in(TouchPhase::Press));
        assert!(!TouchType::Release.enabled_in(TouchPhase::Press));

        assert!(TouchType::Release.enabled_in(TouchPhase::Release));
        assert!(TouchType::Flicked.enabled_in(TouchPhase::Release));
        assert!(TouchType::Clicked.enabled_in(TouchPhase::Release));
        assert!(!TouchType::Flick.enabled_in(TouchPhase::Release));
        assert!(!TouchType::Press.enabled_in(TouchPhase::Release));
        assert!(!TouchType::Hold.enabled_in(TouchPhase::Release));
    }

    #[test]
    fn test_phase_of_frame() {
        assert_eq!(TouchPhase::of(&TouchFrame::pressed_at(0, 0)), Some(TouchPhase::Press));
        assert_eq!(TouchPhase::of(&TouchFrame::released_at(0, 0)), Some(TouchPhase::Release));
        assert_eq!(TouchPhase::of(&TouchFrame::holding_at(0, 0)), None);
    }

    #[test]
    fn test_swipe_types() {
        let swipes: usize = TouchType::ALL.iter().filter(|t| t.is_swipe()).count();
        assert_eq!(swipes, 4);
        assert!(!TouchType::Flick.is_swipe());
    }
}
