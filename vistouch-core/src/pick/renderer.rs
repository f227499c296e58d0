//! Offscreen picking renderer
//!
//! Paints a page in pick colors, in the same order as the visible render,
//! so the pixel under the finger belongs to the topmost touchable object.
//! The surface holds transient state and is only meaningful right after
//! [`PickRenderer::render`].

use embedded_graphics::prelude::Point;
use vistouch_hal::{PickColor, PickSurface};

use super::colors::PickColorTable;
use crate::scene::{Ink, NoImages, Page};

/// Owner of the offscreen picking surface
pub struct PickRenderer<S> {
    surface: S,
}

impl<S: PickSurface> PickRenderer<S> {
    /// Wrap an allocated surface
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Repaint the surface with a page's pick colors
    ///
    /// Untouchable objects are skipped. Objects without a color get one.
    pub fn render(&mut self, page: &Page, colors: &mut PickColorTable) -> Result<(), S::Error> {
        self.surface.clear_pick()?;
        for object in page.paint_order() {
            if object.untouchable || !object.shape.is_pickable() {
                continue;
            }
            let color = colors.color_for(page.num, object.num, true);
            if color.is_none() {
                continue;
            }
            object
                .shape
                .paint(&mut self.surface, Ink::Pick(color.to_rgb565()), &mut NoImages)?;
        }
        Ok(())
    }

    /// Read the pick color at a point
    pub fn sample(&self, at: Point) -> PickColor {
        self.surface.read_pick(at)
    }

    /// Render a page and sample one point
    pub fn pick(
        &mut self,
        page: &Page,
        colors: &mut PickColorTable,
        at: Point,
    ) -> Result<PickColor, S::Error> {
        self.render(page, colors)?;
        Ok(self.sample(at))
    }

    /// Underlying surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give the surface back
    pub fn into_inner(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickDepth;
    use crate::scene::{CircleArgs, RectArgs, Scene, Shape, TextArgs};
    use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
    use vistouch_display::PickBuffer;

    fn renderer() -> PickRenderer<PickBuffer> {
        PickRenderer::new(PickBuffer::new(100, 100).unwrap())
    }

    fn two_buttons() -> Scene {
        let mut scene = Scene::new();
        scene.add_page(Some("home"), None).unwrap();
        scene
            .set_fill_rect_object(Some("btn1"), RectArgs::new(10, 10, 50, 50, Rgb565::RED), 0)
            .unwrap();
        scene
            .set_fill_rect_object(Some("btn2"), RectArgs::new(30, 30, 50, 50, Rgb565::BLUE), 1)
            .unwrap();
        scene
    }

    #[test]
    fn test_topmost_wins() {
        let scene = two_buttons();
        let page = scene.page(0).unwrap();
        let mut colors = PickColorTable::new(PickDepth::Bits16);
        let mut renderer = renderer();

        let overlap = renderer.pick(page, &mut colors, Point::new(40, 40)).unwrap();
        let btn2 = page.object("btn2").unwrap().num;
        assert_eq!(colors.object_for(0, overlap), Some(btn2));

        // Only btn1 covers this corner
        let btn1 = page.object("btn1").unwrap().num;
        let corner = renderer.sample(Point::new(15, 15));
        assert_eq!(colors.object_for(0, corner), Some(btn1));
        assert_eq!(renderer.sample(Point::new(95, 5)), PickColor::NONE);
    }

    #[test]
    fn test_untouchable_is_transparent() {
        let mut scene = two_buttons();
        scene.set_untouchable("btn2", true).unwrap();
        let page = scene.page(0).unwrap();
        let mut colors = PickColorTable::new(PickDepth::Bits16);
        let mut renderer = renderer();

        let hit = renderer.pick(page, &mut colors, Point::new(40, 40)).unwrap();
        assert_eq!(colors.object_for(0, hit), Some(page.object("btn1").unwrap().num));
        // No color handed to the untouchable object
        assert_eq!(colors.len(0), 1);
    }

    #[test]
    fn test_text_does_not_occlude() {
        let mut scene = two_buttons();
        let label = Shape::DrawString(TextArgs::new("GO", 40, 40, Rgb565::WHITE));
        scene.set_object(Some("label"), label, 9).unwrap();
        let page = scene.page(0).unwrap();
        let mut colors = PickColorTable::new(PickDepth::Bits16);
        let mut renderer = renderer();

        let hit = renderer.pick(page, &mut colors, Point::new(41, 41)).unwrap();
        assert_eq!(colors.object_for(0, hit), Some(page.object("btn2").unwrap().num));
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut scene = Scene::new();
        scene.add_page(None, None).unwrap();
        scene
            .set_fill_circle_object(Some("dot"), CircleArgs::new(50, 50, 5, Rgb565::RED), 0)
            .unwrap();
        let mut colors = PickColorTable::new(PickDepth::Bits16);
        let mut renderer = renderer();

        let at = Point::new(50, 50);
        let hit = renderer.pick(scene.page(0).unwrap(), &mut colors, at).unwrap();
        assert!(!hit.is_none());

        scene.delete_object("dot").unwrap();
        let hit = renderer.pick(scene.page(0).unwrap(), &mut colors, at).unwrap();
        assert!(hit.is_none());
    }
}
