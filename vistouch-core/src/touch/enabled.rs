//! Enabled-process set
//!
//! Processes of the active page that may match on the current tick.
//! Rebuilt every tick from the touch phase, then pruned by the gesture
//! exclusion rules.

use alloc::vec::Vec;

use super::registry::{ProcessNum, ProcessPage};
use super::types::{GestureFamily, TouchPhase, TouchType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledSet {
    entries: Vec<(ProcessNum, TouchType)>,
}

impl EnabledSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the set with the page's processes that are live in a phase
    pub fn enable_phase(&mut self, page: &ProcessPage, phase: TouchPhase) {
        self.entries.clear();
        self.entries.extend(
            page.processes()
                .iter()
                .filter(|p| p.touch_type.enabled_in(phase))
                .map(|p| (p.num, p.touch_type)),
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn disable_type(&mut self, touch_type: TouchType) {
        self.entries.retain(|(_, t)| *t != touch_type);
    }

    pub fn disable_family(&mut self, family: GestureFamily) {
        self.entries.retain(|(_, t)| t.family() != family);
    }

    pub fn disable_process(&mut self, num: ProcessNum) {
        self.entries.retain(|(n, _)| *n != num);
    }

    pub fn contains(&self, num: ProcessNum) -> bool {
        self.entries.iter().any(|(n, _)| *n == num)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enabled process numbers, in page order
    ///
    /// Page order is the tie-break when equal priorities match.
    pub fn iter(&self) -> impl Iterator<Item = ProcessNum> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }
}
