//! Engine facade
//!
//! [`VisualTouch`] owns the scene, the pick color table, the process
//! registry, the offscreen picking surface and the per-tick state, and
//! exposes the operations an application calls.
//!
//! # Example
//!
//! ```
//! use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
//! use vistouch_core::config::EngineConfig;
//! use vistouch_core::scene::RectArgs;
//! use vistouch_core::{TouchFrame, VisualTouch};
//!
//! let mut ui = VisualTouch::new(&EngineConfig::default()).unwrap();
//! ui.add_page(Some("home"), None).unwrap();
//! ui.scene_mut()
//!     .set_fill_rect_object(Some("ok"), RectArgs::new(10, 10, 80, 40, Rgb565::GREEN), 0)
//!     .unwrap();
//! ui.set_press_process("ok-press", "ok").unwrap();
//! ui.set_process_page(0);
//!
//! assert!(ui.update(&TouchFrame::pressed_at(20, 20)));
//! assert_eq!(ui.current_process(), "ok-press");
//! ```

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, Point};
use vistouch_display::{DisplayError, PickBuffer};
use vistouch_hal::{PickColor, PickSurface, TouchFrame, TouchSensor};

use crate::config::{ConfigError, EngineConfig};
use crate::pick::{PickColorTable, PickRenderer};
use crate::scene::{DrawError, ImageLoader, NoImages, ObjectNum, Scene, SceneError};
use crate::staging::PageNum;
use crate::touch::{
    FrameOrchestrator, ProcessError, ProcessNum, ProcessRegistry, ProcessSpec, TouchType,
};

/// Construction errors
///
/// Fatal for the picking capability. Reported once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Configuration rejected
    Config(ConfigError),
    /// Picking surface could not be allocated
    Surface(DisplayError),
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

impl From<DisplayError> for InitError {
    fn from(e: DisplayError) -> Self {
        InitError::Surface(e)
    }
}

/// Scene graph plus touch gesture engine
pub struct VisualTouch<S = PickBuffer> {
    scene: Scene,
    colors: PickColorTable,
    registry: ProcessRegistry,
    renderer: PickRenderer<S>,
    orchestrator: FrameOrchestrator,
    /// Page whose processes are active, `None` follows the drawing page
    process_page: Option<PageNum>,
}

impl VisualTouch<PickBuffer> {
    /// Create an engine with a RAM picking surface sized by the config
    pub fn new(config: &EngineConfig) -> Result<Self, InitError> {
        config.validate()?;
        let surface = PickBuffer::new(config.pick_width as u32, config.pick_height as u32)
            .map_err(|e| {
                error!("init: pick surface allocation failed: {}", e);
                e
            })?;
        Self::with_surface(config, surface)
    }
}

impl<S: PickSurface> VisualTouch<S> {
    /// Create an engine around an existing picking surface
    pub fn with_surface(config: &EngineConfig, surface: S) -> Result<Self, InitError> {
        config.validate()?;

        let mut engine = Self {
            scene: Scene::new(),
            colors: PickColorTable::new(config.pick_depth),
            registry: ProcessRegistry::new(),
            renderer: PickRenderer::new(surface),
            orchestrator: FrameOrchestrator::new(),
            process_page: None,
        };
        if config.batch_by_default {
            engine.begin_edit();
        }
        info!(
            "init: {}x{} pick surface, depth {}",
            config.pick_width,
            config.pick_height,
            config.pick_depth
        );
        Ok(engine)
    }

    // ---- Components ----

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scene mutators
    ///
    /// Deleting objects here leaves their processes in place until
    /// [`VisualTouch::defrag_processes`] runs.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    pub fn colors(&self) -> &PickColorTable {
        &self.colors
    }

    /// Picking surface, valid only right after a tick
    pub fn pick_surface(&self) -> &S {
        self.renderer.surface()
    }

    // ---- Editing ----

    /// Add a scene page and make it the editing page for objects and processes
    pub fn add_page(
        &mut self,
        name: Option<&str>,
        num: Option<PageNum>,
    ) -> Result<PageNum, SceneError> {
        let num = self.scene.add_page(name, num)?;
        self.registry.change_edit_page(num);
        Ok(num)
    }

    /// Delete a scene page with its processes and pick colors
    pub fn delete_page(&mut self, num: PageNum) -> Result<(), SceneError> {
        self.scene.delete_page(num)?;
        self.registry.delete_page(num);
        let freed = self.colors.drop_page(num);
        if self.process_page == Some(num) {
            self.process_page = None;
        }
        info!("engine: deleted page {}, freed {} colors", num, freed);
        Ok(())
    }

    /// Load a page for editing in both the scene and the registry
    pub fn change_edit_page(&mut self, num: PageNum) -> Result<(), SceneError> {
        self.scene.change_edit_page(num)?;
        self.registry.change_edit_page(num);
        Ok(())
    }

    /// Load a page's processes for editing
    pub fn change_process_edit_page(&mut self, num: PageNum) {
        self.registry.change_edit_page(num);
    }

    /// Commit the scene and registry editing pages
    pub fn commit(&mut self) {
        self.scene.commit();
        self.registry.commit();
    }

    /// Start batching scene and process edits
    pub fn begin_edit(&mut self) {
        self.scene.begin_edit();
        self.registry.begin_edit();
    }

    /// Stop batching and commit
    pub fn end_edit(&mut self) {
        self.scene.end_edit();
        self.registry.end_edit();
    }

    // ---- Processes ----

    /// Bind a touch type to an object on the process editing page
    pub fn create_process(&mut self, spec: ProcessSpec<'_>) -> Result<ProcessNum, ProcessError> {
        self.registry.create_process(&self.scene, &mut self.colors, spec)
    }

    /// Remove a process from the editing page
    pub fn delete_process(&mut self, name: &str) -> Result<ProcessNum, ProcessError> {
        self.registry.delete_process(name)
    }

    /// Check if the process editing page has a process
    pub fn contains_process(&self, name: &str) -> bool {
        self.registry.contains_process(name)
    }

    /// Drop processes and pick colors of deleted objects
    ///
    /// `None` cleans every page. Returns the number of processes removed.
    pub fn defrag_processes(&mut self, page: Option<PageNum>) -> usize {
        self.registry.defrag_processes(&self.scene, &mut self.colors, page)
    }

    /// Bind a swipe type with over-border modifiers
    fn create_swipe(
        &mut self,
        name: &str,
        object: &str,
        touch_type: TouchType,
        enable_over_border: bool,
        return_current_over: bool,
    ) -> Result<ProcessNum, ProcessError> {
        self.create_process(
            ProcessSpec::new(name, object, touch_type)
                .over_border(enable_over_border, return_current_over),
        )
    }

    pub fn set_dragging_process(
        &mut self,
        name: &str,
        object: &str,
        enable_over_border: bool,
        return_current_over: bool,
    ) -> Result<ProcessNum, ProcessError> {
        self.create_swipe(
            name,
            object,
            TouchType::Dragging,
            enable_over_border,
            return_current_over,
        )
    }

    pub fn set_dragged_process(
        &mut self,
        name: &str,
        object: &str,
        enable_over_border: bool,
        return_current_over: bool,
    ) -> Result<ProcessNum, ProcessError> {
        self.create_swipe(
            name,
            object,
            TouchType::Dragged,
            enable_over_border,
            return_current_over,
        )
    }

    pub fn set_flicking_process(
        &mut self,
        name: &str,
        object: &str,
        enable_over_border: bool,
        return_current_over: bool,
    ) -> Result<ProcessNum, ProcessError> {
        self.create_swipe(
            name,
            object,
            TouchType::Flicking,
            enable_over_border,
            return_current_over,
        )
    }

    pub fn set_flicked_process(
        &mut self,
        name: &str,
        object: &str,
        enable_over_border: bool,
        return_current_over: bool,
    ) -> Result<ProcessNum, ProcessError> {
        self.create_swipe(
            name,
            object,
            TouchType::Flicked,
            enable_over_border,
            return_current_over,
        )
    }

    /// Bind a multi-click with a tap threshold of at least one
    pub fn set_multi_clicked_process(
        &mut self,
        name: &str,
        object: &str,
        click_count: u8,
    ) -> Result<ProcessNum, ProcessError> {
        self.create_process(
            ProcessSpec::new(name, object, TouchType::MultiClicked).clicks(click_count),
        )
    }

    // ---- Ticks ----

    /// Select the page whose processes are matched
    pub fn set_process_page(&mut self, num: PageNum) {
        self.process_page = Some(num);
    }

    /// Follow the drawing page again
    pub fn clear_process_page(&mut self) {
        self.process_page = None;
    }

    /// Page matched on the next tick
    pub fn active_page(&self) -> Option<PageNum> {
        self.process_page.or(self.scene.drawing_page())
    }

    /// Run one input tick
    ///
    /// Returns true when a process matched. The winner's name is then
    /// available from [`VisualTouch::current_process`].
    pub fn update(&mut self, frame: &TouchFrame) -> bool {
        let active = self.active_page();
        let processes = active.and_then(|num| self.registry.page(num));
        let page = active.and_then(|num| self.scene.page(num));
        self.orchestrator
            .tick(processes, page, &mut self.renderer, &mut self.colors, frame)
    }

    /// Poll a sensor and run one tick
    ///
    /// A disabled sensor counts as an idle tick: no match and no current name.
    pub fn update_from<T: TouchSensor>(&mut self, sensor: &mut T) -> bool {
        if !sensor.is_enabled() {
            self.orchestrator.idle();
            return false;
        }
        let frame = sensor.poll();
        self.update(&frame)
    }

    /// Name of the last winner, `""` when nothing matched
    pub fn current_process(&self) -> &str {
        self.orchestrator.current_process()
    }

    /// Check if the current winner matched outside its object
    pub fn is_over_border(&self) -> bool {
        self.orchestrator.classifier().is_over_border()
    }

    /// Check if the previous classifying tick matched outside its object
    pub fn was_over_border(&self) -> bool {
        self.orchestrator.classifier().was_over_border()
    }

    /// Topmost touchable object of the active page at a point
    pub fn object_at(&mut self, x: i32, y: i32) -> Option<ObjectNum> {
        let active = self.active_page()?;
        let page = self.scene.page(active)?;
        match self.renderer.pick(page, &mut self.colors, Point::new(x, y)) {
            Ok(color) => self.colors.object_for(active, color),
            Err(_) => {
                error!("object_at: pick surface failed");
                None
            }
        }
    }

    /// Stable pick color of an object
    pub fn color_for(&mut self, page: PageNum, object: ObjectNum, create: bool) -> PickColor {
        self.colors.color_for(page, object, create)
    }

    // ---- Drawing ----

    /// Render a page for display and make it the drawing page
    pub fn draw_page<D>(&mut self, target: &mut D, name: &str) -> Result<(), DrawError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.scene.draw_page(target, name, &mut NoImages)
    }

    /// Render a page with an image loader
    pub fn draw_page_with<D, L>(
        &mut self,
        target: &mut D,
        name: &str,
        images: &mut L,
    ) -> Result<(), DrawError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        L: ImageLoader,
    {
        self.scene.draw_page(target, name, images)
    }
}

macro_rules! process_setters {
    ($( $(#[$doc:meta])* $fn_name:ident => $touch_type:ident; )*) => {
        impl<S: PickSurface> VisualTouch<S> {
            $(
                $(#[$doc])*
                pub fn $fn_name(
                    &mut self,
                    name: &str,
                    object: &str,
                ) -> Result<ProcessNum, ProcessError> {
                    self.create_process(ProcessSpec::new(name, object, TouchType::$touch_type))
                }
            )*
        }
    };
}

process_setters! {
    /// Fire when the finger lands on the object
    set_press_process => Press;
    /// Fire while the finger is down on the object
    set_pressing_process => Pressing;
    set_pressed_process => Pressed;
    /// Fire when the finger lifts from the object
    set_release_process => Release;
    set_releasing_process => Releasing;
    /// Fire when a hold starts on the object
    set_hold_process => Hold;
    set_holding_process => Holding;
    set_held_process => Held;
    /// Fire when a drag starts on the object
    set_drag_process => Drag;
    /// Fire when a flick starts on the object
    set_flick_process => Flick;
    /// Fire on a short tap
    set_clicked_process => Clicked;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickDepth;
    use crate::scene::RectArgs;
    use embedded_graphics::pixelcolor::RgbColor;

    fn engine() -> VisualTouch {
        let mut ui = VisualTouch::new(&EngineConfig::with_surface(100, 100)).unwrap();
        ui.add_page(Some("home"), None).unwrap();
        ui.scene_mut()
            .set_fill_rect_object(Some("btn"), RectArgs::new(10, 10, 30, 30, Rgb565::RED), 0)
            .unwrap();
        ui
    }

    struct Script {
        frames: [TouchFrame; 2],
        next: usize,
    }

    impl TouchSensor for Script {
        fn poll(&mut self) -> TouchFrame {
            let frame = self.frames[self.next % 2];
            self.next += 1;
            frame
        }
    }

    struct Offline;

    impl TouchSensor for Offline {
        fn poll(&mut self) -> TouchFrame {
            TouchFrame::pressed_at(20, 20)
        }

        fn is_enabled(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_init_errors() {
        assert_eq!(
            VisualTouch::new(&EngineConfig::with_surface(0, 10)).err(),
            Some(InitError::Config(ConfigError::InvalidSurface))
        );
    }

    #[test]
    fn test_drawing_page_is_default_process_page() {
        let mut ui = engine();
        ui.set_press_process("p", "btn").unwrap();
        assert_eq!(ui.active_page(), None);
        assert!(!ui.update(&TouchFrame::pressed_at(20, 20)));

        let mut screen = PickBuffer::new(100, 100).unwrap();
        ui.draw_page(&mut screen, "home").unwrap();
        assert_eq!(ui.active_page(), Some(0));
        assert!(ui.update(&TouchFrame::pressed_at(20, 20)));
    }

    #[test]
    fn test_explicit_process_page_wins() {
        let mut ui = engine();
        ui.set_press_process("p", "btn").unwrap();
        ui.add_page(Some("other"), None).unwrap();

        let mut screen = PickBuffer::new(100, 100).unwrap();
        ui.draw_page(&mut screen, "other").unwrap();
        ui.set_process_page(0);
        assert!(ui.update(&TouchFrame::pressed_at(20, 20)));

        ui.clear_process_page();
        assert!(!ui.update(&TouchFrame::pressed_at(20, 20)));
    }

    #[test]
    fn test_batch_by_default() {
        let config = EngineConfig {
            batch_by_default: true,
            ..EngineConfig::with_surface(100, 100)
        };
        let mut ui = VisualTouch::new(&config).unwrap();
        ui.add_page(Some("home"), None).unwrap();
        ui.scene_mut()
            .set_fill_rect_object(Some("btn"), RectArgs::new(10, 10, 30, 30, Rgb565::RED), 0)
            .unwrap();
        ui.set_press_process("p", "btn").unwrap();
        ui.set_process_page(0);

        // Nothing committed yet
        assert!(!ui.update(&TouchFrame::pressed_at(20, 20)));
        ui.end_edit();
        assert!(ui.update(&TouchFrame::pressed_at(20, 20)));
    }

    #[test]
    fn test_update_from_sensor() {
        let mut ui = engine();
        ui.set_release_process("r", "btn").unwrap();
        ui.set_process_page(0);

        let mut sensor = Script {
            frames: [TouchFrame::pressed_at(20, 20), TouchFrame::released_at(20, 20)],
            next: 0,
        };
        assert!(!ui.update_from(&mut sensor));
        assert!(ui.update_from(&mut sensor));
        assert_eq!(ui.current_process(), "r");

        // A disabled sensor also drops the previous winner
        assert!(!ui.update_from(&mut Offline));
        assert_eq!(ui.current_process(), "");
    }

    #[test]
    fn test_object_at() {
        let mut ui = engine();
        assert_eq!(ui.object_at(20, 20), None);

        ui.set_process_page(0);
        let btn = ui.scene().object("btn").unwrap().num;
        assert_eq!(ui.object_at(20, 20), Some(btn));
        assert_eq!(ui.object_at(80, 80), None);

        ui.scene_mut().set_untouchable("btn", true).unwrap();
        assert_eq!(ui.object_at(20, 20), None);
    }

    #[test]
    fn test_delete_page_drops_processes_and_colors() {
        let mut ui = engine();
        ui.set_press_process("p", "btn").unwrap();
        ui.set_process_page(0);
        assert!(ui.update(&TouchFrame::pressed_at(20, 20)));

        ui.delete_page(0).unwrap();
        assert!(ui.scene().page(0).is_none());
        assert!(ui.registry().page(0).is_none());
        assert!(ui.colors().page_nums().is_empty());
        assert_eq!(ui.active_page(), None);
        assert!(!ui.update(&TouchFrame::pressed_at(20, 20)));

        assert_eq!(ui.delete_page(0), Err(SceneError::PageNotFound));
    }

    #[test]
    fn test_pick_depth_limits_processes() {
        let config = EngineConfig {
            pick_depth: PickDepth::Bits8,
            ..EngineConfig::with_surface(16, 16)
        };
        let mut ui = VisualTouch::new(&config).unwrap();
        ui.add_page(None, None).unwrap();
        ui.scene_mut().begin_edit();
        for _ in 0..256 {
            ui.scene_mut()
                .set_fill_rect_object(None, RectArgs::new(0, 0, 1, 1, Rgb565::RED), 0)
                .unwrap();
        }
        ui.scene_mut().end_edit();

        for n in 1..=255u16 {
            let object = crate::scene::page::numbered_name("obj-", n as i64);
            let process = crate::scene::page::numbered_name("p", n as i64);
            ui.set_press_process(&process, &object).unwrap();
        }
        assert_eq!(
            ui.set_press_process("last", "obj-256"),
            Err(ProcessError::ColorsExhausted)
        );
    }

    #[test]
    fn test_swipe_setters_keep_modifiers() {
        let mut ui = engine();
        ui.set_flicked_process("f", "btn", true, false).unwrap();
        ui.set_dragging_process("d", "btn", true, true).unwrap();
        let page = ui.registry().page(0).unwrap();
        assert!(page.process("f").unwrap().enable_over_border);
        assert!(!page.process("f").unwrap().return_current_over);
        assert!(page.process("d").unwrap().return_current_over);
    }
}
