//! Frame orchestrator
//!
//! Runs once per input tick:
//!
//! 1. Take the active page's committed processes
//! 2. Enable processes for the press or release phase, or stop when the
//!    tick has neither edge
//! 3. Suppress conflicting gesture families
//! 4. Render the pick surface and sample the touch point
//! 5. Classify and publish the winner
//!
//! Suppression edges are latched for the whole touch session, from one
//! press edge to the next, so a flick seen mid-session still blocks
//! Click on the release tick.

use vistouch_hal::{PickColor, PickSurface, TouchFrame};

use super::classifier::Classifier;
use super::enabled::EnabledSet;
use super::registry::ProcessPage;
use super::types::{GestureFamily, TouchPhase};
use crate::pick::{PickColorTable, PickRenderer};
use crate::scene::Page;

/// Suppression edges seen during the current touch session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionLatch {
    pub flick_started: bool,
    pub held: bool,
    pub drag_started: bool,
}

impl SessionLatch {
    /// Record a frame, starting a new session on a press edge
    pub fn observe(&mut self, frame: &TouchFrame) {
        if frame.was_pressed {
            *self = Self::default();
        }
        self.flick_started |= frame.was_flick_start;
        self.held |= frame.was_hold;
        self.drag_started |= frame.was_drag_start;
    }

    /// Remove families that conflict with what the session has done
    ///
    /// A flick excludes Hold, Drag, Click and MultiClick. Otherwise a hold
    /// excludes Flick, Click and MultiClick, and also Hold once a drag
    /// started.
    pub fn suppress(&self, enabled: &mut EnabledSet) {
        if self.flick_started {
            enabled.disable_family(GestureFamily::Hold);
            enabled.disable_family(GestureFamily::Drag);
            enabled.disable_family(GestureFamily::Click);
            enabled.disable_family(GestureFamily::MultiClick);
        } else if self.held {
            enabled.disable_family(GestureFamily::Flick);
            enabled.disable_family(GestureFamily::Click);
            enabled.disable_family(GestureFamily::MultiClick);
            if self.drag_started {
                enabled.disable_family(GestureFamily::Hold);
            }
        }
    }
}

/// Per-tick driver tying the enabled set, renderer and classifier together
#[derive(Debug, Clone, Default)]
pub struct FrameOrchestrator {
    enabled: EnabledSet,
    classifier: Classifier,
    latch: SessionLatch,
    /// Pick color under the finger at the session's press edge
    anchor: PickColor,
}

impl FrameOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick
    ///
    /// Returns true when a process matched and counts as a hit. Missing
    /// pages, ticks without a phase edge, an empty enabled set and a pick
    /// surface failure all count as no match and clear the current name.
    pub fn tick<S: PickSurface>(
        &mut self,
        processes: Option<&ProcessPage>,
        page: Option<&Page>,
        renderer: &mut PickRenderer<S>,
        colors: &mut PickColorTable,
        frame: &TouchFrame,
    ) -> bool {
        self.latch.observe(frame);
        // A new session never inherits the previous press target
        if frame.was_pressed {
            self.anchor = PickColor::NONE;
        }

        let (Some(processes), Some(page)) = (processes, page) else {
            self.idle();
            return false;
        };
        let Some(phase) = TouchPhase::of(frame) else {
            self.idle();
            return false;
        };

        self.enabled.enable_phase(processes, phase);
        self.latch.suppress(&mut self.enabled);
        trace!("tick: {} phase, {} enabled", phase, self.enabled.len());
        if self.enabled.is_empty() {
            self.classifier.clear();
            return false;
        }

        let sampled = match renderer.pick(page, colors, frame.point()) {
            Ok(color) => color,
            Err(_) => {
                error!("tick: pick surface failed");
                self.classifier.clear();
                return false;
            }
        };
        if phase == TouchPhase::Press {
            self.anchor = sampled;
        }

        let judgement = self
            .classifier
            .judge(processes, &self.enabled, sampled, self.anchor, frame);
        match judgement {
            Some(judgement) => {
                debug!(
                    "tick: {} ({})",
                    judgement.process.name.as_str(),
                    judgement.process.touch_type
                );
                judgement.is_hit()
            }
            None => false,
        }
    }

    /// Forget the enabled set and the current winner
    pub fn idle(&mut self) {
        self.enabled.clear();
        self.classifier.clear();
    }

    /// Name of the current winner, `""` when nothing matched
    pub fn current_process(&self) -> &str {
        self.classifier.current_process()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Processes enabled on the last tick
    pub fn enabled(&self) -> &EnabledSet {
        &self.enabled
    }

    pub fn latch(&self) -> &SessionLatch {
        &self.latch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickDepth;
    use crate::scene::{RectArgs, Scene};
    use crate::touch::registry::{ProcessRegistry, ProcessSpec};
    use crate::touch::types::TouchType;
    use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
    use vistouch_display::PickBuffer;

    struct Rig {
        scene: Scene,
        colors: PickColorTable,
        registry: ProcessRegistry,
        renderer: PickRenderer<PickBuffer>,
        orchestrator: FrameOrchestrator,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = Scene::new();
            scene.add_page(Some("home"), None).unwrap();
            scene
                .set_fill_rect_object(Some("btn"), RectArgs::new(10, 10, 40, 40, Rgb565::RED), 0)
                .unwrap();
            let mut registry = ProcessRegistry::new();
            registry.change_edit_page(0);
            Self {
                scene,
                colors: PickColorTable::new(PickDepth::Bits16),
                registry,
                renderer: PickRenderer::new(PickBuffer::new(64, 64).unwrap()),
                orchestrator: FrameOrchestrator::new(),
            }
        }

        fn bind(&mut self, name: &str, touch_type: TouchType) {
            let spec = ProcessSpec::new(name, "btn", touch_type);
            self.registry
                .create_process(&self.scene, &mut self.colors, spec)
                .unwrap();
        }

        fn tick(&mut self, frame: TouchFrame) -> bool {
            self.orchestrator.tick(
                self.registry.page(0),
                self.scene.page(0),
                &mut self.renderer,
                &mut self.colors,
                &frame,
            )
        }
    }

    #[test]
    fn test_no_edge_no_classification() {
        let mut rig = Rig::new();
        rig.bind("pressing", TouchType::Pressing);

        assert!(rig.tick(TouchFrame::pressed_at(20, 20)));
        assert_eq!(rig.orchestrator.current_process(), "pressing");

        // Finger still down but no edge: nothing is classified
        assert!(!rig.tick(TouchFrame::holding_at(20, 20)));
        assert_eq!(rig.orchestrator.current_process(), "");
    }

    #[test]
    fn test_missing_pages() {
        let mut rig = Rig::new();
        let frame = TouchFrame::pressed_at(20, 20);
        assert!(!rig.orchestrator.tick(
            None,
            rig.scene.page(0),
            &mut rig.renderer,
            &mut rig.colors,
            &frame
        ));
    }

    #[test]
    fn test_flick_latched_until_next_press() {
        let mut rig = Rig::new();
        rig.bind("click", TouchType::Clicked);

        rig.tick(TouchFrame::pressed_at(20, 20));
        let mut flicking = TouchFrame::holding_at(20, 20);
        flicking.was_flick_start = true;
        rig.tick(flicking);

        let mut release = TouchFrame::released_at(20, 20);
        release.was_clicked = true;
        assert!(!rig.tick(release));
        assert!(rig.orchestrator.enabled().is_empty());

        // New session clears the latch
        rig.tick(TouchFrame::pressed_at(20, 20));
        assert!(rig.tick(release));
        assert_eq!(rig.orchestrator.current_process(), "click");
    }

    #[test]
    fn test_hold_then_drag_suppresses_hold() {
        let mut latch = SessionLatch::default();
        let mut frame = TouchFrame::pressed_at(0, 0);
        latch.observe(&frame);
        frame.was_pressed = false;
        frame.was_hold = true;
        latch.observe(&frame);
        frame.was_hold = false;
        frame.was_drag_start = true;
        latch.observe(&frame);
        assert_eq!(
            latch,
            SessionLatch {
                flick_started: false,
                held: true,
                drag_started: true,
            }
        );
    }

    #[test]
    fn test_new_press_clears_anchor() {
        let mut rig = Rig::new();
        let spec = ProcessSpec::new("swipe", "btn", TouchType::Flicked).over_border(true, false);
        rig.registry
            .create_process(&rig.scene, &mut rig.colors, spec)
            .unwrap();

        rig.tick(TouchFrame::pressed_at(20, 20));

        // Next press lands off the button while its process page is missing
        let frame = TouchFrame::pressed_at(60, 60);
        assert!(!rig.orchestrator.tick(
            None,
            rig.scene.page(0),
            &mut rig.renderer,
            &mut rig.colors,
            &frame
        ));

        let mut release = TouchFrame::released_at(60, 60);
        release.was_flicked = true;
        assert!(!rig.tick(release));
        assert_eq!(rig.orchestrator.current_process(), "");
    }

    #[test]
    fn test_miss_outside_object() {
        let mut rig = Rig::new();
        rig.bind("press", TouchType::Press);
        assert!(!rig.tick(TouchFrame::pressed_at(60, 60)));
        assert!(rig.tick(TouchFrame::pressed_at(30, 30)));
    }
}
