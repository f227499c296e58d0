//! Gesture classifier and priority resolver
//!
//! Matches enabled processes against the sampled pick color and the
//! touch frame, then picks one winner by family priority. Owns the only
//! cross-frame gesture memory: whether the previous winner was holding.

use vistouch_hal::{PickColor, TouchFrame};

use super::enabled::EnabledSet;
use super::registry::{Process, ProcessPage};
use super::types::{GestureFamily, TouchType};
use crate::scene::Name;

/// Classifier state carried between ticks
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    /// Name of the last winner, empty when nothing matched
    current: Name,
    /// Previous winner was in the Hold family
    was_holding: bool,
    /// Current winner matched outside its object
    over_border: bool,
    /// Previous classifying tick matched outside the object
    was_over_border: bool,
}

/// Winning process of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement<'a> {
    pub process: &'a Process,
    /// Matched through the over-border rule rather than the sampled color
    pub over_border: bool,
}

impl<'a> Judgement<'a> {
    /// Whether the match counts as a hit for the caller
    pub fn is_hit(&self) -> bool {
        !self.over_border || self.process.return_current_over
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the current winner, `""` when nothing matched
    pub fn current_process(&self) -> &str {
        &self.current
    }

    /// Check if the current winner matched outside its object
    pub fn is_over_border(&self) -> bool {
        self.over_border
    }

    /// Check if the previous classifying tick matched outside the object
    pub fn was_over_border(&self) -> bool {
        self.was_over_border
    }

    /// Check if the previous winner was holding
    pub fn was_holding(&self) -> bool {
        self.was_holding
    }

    /// Forget the current winner
    pub fn clear(&mut self) {
        self.current.clear();
        self.over_border = false;
    }

    /// Check if a process's gesture is happening in this frame
    pub fn is_valid(&self, process: &Process, frame: &TouchFrame) -> bool {
        use TouchType::*;
        match process.touch_type {
            Press => frame.was_pressed,
            Pressing => frame.is_pressed,
            // Same edge as Release; kept as observed on devices
            Pressed => frame.was_released,
            Release => frame.was_released,
            Releasing => frame.is_released,
            Hold => frame.was_hold,
            Holding => frame.is_holding && !frame.is_dragging,
            Held => self.was_holding && !frame.was_dragged,
            Drag => frame.was_drag_start,
            Dragging => frame.is_dragging,
            Dragged => frame.was_dragged,
            Flick => frame.was_flick_start,
            Flicking => frame.is_flicking,
            Flicked => frame.was_flicked,
            Clicked => frame.was_clicked,
            MultiClicked => frame.click_count >= process.multi_click_count,
        }
    }

    /// Pick this tick's winner
    ///
    /// A process is a candidate when it is enabled, its color equals the
    /// sampled color (or it is an over-border swipe bound to `anchor`, the
    /// color under the finger at the press edge) and its gesture is valid.
    /// The winner has the lowest [`TouchType::priority`]; equal priorities
    /// keep page order.
    pub fn judge<'p>(
        &mut self,
        page: &'p ProcessPage,
        enabled: &EnabledSet,
        sampled: PickColor,
        anchor: PickColor,
        frame: &TouchFrame,
    ) -> Option<Judgement<'p>> {
        self.was_over_border = self.over_border;

        let winner = enabled
            .iter()
            .filter_map(|num| page.process_by_num(num))
            .filter_map(|p| {
                let over_border = if !sampled.is_none() && p.color == sampled {
                    false
                } else if p.enable_over_border && !anchor.is_none() && p.color == anchor {
                    true
                } else {
                    return None;
                };
                self.is_valid(p, frame).then_some(Judgement {
                    process: p,
                    over_border,
                })
            })
            .min_by_key(|j| j.process.touch_type.priority());

        match winner {
            Some(judgement) => {
                self.current.clone_from(&judgement.process.name);
                self.over_border = judgement.over_border;
                self.was_holding = judgement.process.touch_type.family() == GestureFamily::Hold;
                trace!(
                    "classify: {} wins as {}",
                    judgement.process.name.as_str(),
                    judgement.process.touch_type
                );
            }
            None => {
                self.clear();
                self.was_holding = false;
            }
        }
        winner
    }
}
