//! Scene graph store
//!
//! Pages of z-ordered objects, edited through a staging copy. All
//! mutators work on the editing page and leave state untouched on error.

use core::fmt::Write;

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::DrawTarget;

use super::page::{make_name, numbered_name, Name, ObjectData, ObjectNum, Page, ZIndex};
use super::paint::{ImageLoader, Ink};
use super::shape::*;
use crate::staging::{PageNum, Staging};

/// Scene graph errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneError {
    /// Operation needs an editing page and none is loaded
    NoEditingPage,
    /// Referenced page does not exist
    PageNotFound,
    /// Page number already in use
    DuplicatePageNum,
    /// Page name already in use
    DuplicatePageName,
    /// Referenced object does not exist on the editing page
    ObjectNotFound,
    /// Object name already in use on the page
    DuplicateObjectName,
    /// Name does not fit in a [`Name`](super::page::Name)
    NameTooLong,
    /// Target index is past the end of the object list
    IndexOutOfRange,
}

/// Errors from [`Scene::draw_page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError<E> {
    /// No committed page has that name
    PageNotFound,
    /// Draw target failed
    Target(E),
}

/// Scene graph with staging and commit
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pages: Staging<Page>,
    /// Page last passed to `draw_page`
    drawing_page: Option<PageNum>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            pages: Staging::new(),
            drawing_page: None,
        }
    }

    // ---- Pages ----

    /// Add a page and make it the editing page
    ///
    /// Without a number the next free one is used, starting at 0. Without a
    /// name the page is called `page-N`.
    pub fn add_page(
        &mut self,
        name: Option<&str>,
        num: Option<PageNum>,
    ) -> Result<PageNum, SceneError> {
        let num = match num {
            Some(num) if num < 0 => return Err(SceneError::PageNotFound),
            Some(num) => num,
            None => self.next_page_num(),
        };
        if self.pages.contains(num) {
            warn!("scene: page {} already exists", num);
            return Err(SceneError::DuplicatePageNum);
        }

        let name = match name {
            Some(name) => make_name(name).ok_or(SceneError::NameTooLong)?,
            None => self.unused_page_name(num),
        };
        if self.find_page_by_name(&name).is_some() {
            warn!("scene: page name {} already exists", name.as_str());
            return Err(SceneError::DuplicatePageName);
        }

        debug!("scene: add page {} '{}'", num, name.as_str());
        self.pages.stage(Page::new(num, name));
        Ok(num)
    }

    /// Commit pending edits and load a page for editing
    ///
    /// An unknown number loads a fresh empty page named `page-N`, with a
    /// `-K` suffix when that name is taken.
    pub fn change_edit_page(&mut self, num: PageNum) -> Result<(), SceneError> {
        if num < 0 {
            return Err(SceneError::PageNotFound);
        }
        let fresh_name = (!self.pages.contains(num)).then(|| self.unused_page_name(num));
        self.pages.load(num);
        if let (Some(name), Some(page)) = (fresh_name, self.pages.editing_mut()) {
            page.name = name;
        }
        Ok(())
    }

    /// Write the editing page back to the committed set
    pub fn commit(&mut self) -> bool {
        let committed = self.pages.commit();
        if committed {
            debug!("scene: commit page {}", self.pages.editing_num().unwrap_or(-1));
        }
        committed
    }

    /// Start a batch of edits
    pub fn begin_edit(&mut self) {
        self.pages.begin_batch();
    }

    /// Finish a batch of edits and commit
    pub fn end_edit(&mut self) -> bool {
        self.pages.end_batch()
    }

    /// Check if edits are being batched
    pub fn is_batching(&self) -> bool {
        self.pages.is_batching()
    }

    /// Delete a page, committed and staged
    pub fn delete_page(&mut self, num: PageNum) -> Result<(), SceneError> {
        if !self.pages.remove(num) {
            return Err(SceneError::PageNotFound);
        }
        if self.drawing_page == Some(num) {
            self.drawing_page = None;
        }
        info!("scene: deleted page {}", num);
        Ok(())
    }

    /// Committed page by number
    pub fn page(&self, num: PageNum) -> Option<&Page> {
        self.pages.get(num)
    }

    /// Latest version of a page, including uncommitted edits
    pub fn latest_page(&self, num: PageNum) -> Option<&Page> {
        self.pages.latest(num)
    }

    /// Committed pages
    pub fn pages(&self) -> &[Page] {
        self.pages.committed()
    }

    /// Page being edited
    pub fn editing_page(&self) -> Option<&Page> {
        self.pages.editing()
    }

    /// Number of the page being edited
    pub fn editing_page_num(&self) -> Option<PageNum> {
        self.pages.editing_num()
    }

    /// Look up a page number by name, committed or staged
    pub fn find_page_by_name(&self, name: &str) -> Option<PageNum> {
        self.pages
            .page_nums()
            .into_iter()
            .find(|&num| self.pages.latest(num).is_some_and(|p| p.name == name))
    }

    /// Check if a page exists, committed or staged
    pub fn contains_page(&self, num: PageNum) -> bool {
        self.pages.contains(num)
    }

    /// Page last drawn with [`Scene::draw_page`]
    pub fn drawing_page(&self) -> Option<PageNum> {
        self.drawing_page
    }

    /// `page-N`, or `page-N-K` with the smallest free `K`
    fn unused_page_name(&self, num: PageNum) -> Name {
        let base = numbered_name("page-", num as i64);
        let mut suffix = 0i64;
        let mut name = base.clone();
        while self.find_page_by_name(&name).is_some() {
            suffix += 1;
            name = base.clone();
            // Base is at most 16 bytes, the suffix always fits
            let _ = write!(name, "-{}", suffix);
        }
        name
    }

    fn next_page_num(&self) -> PageNum {
        self.pages
            .page_nums()
            .into_iter()
            .max()
            .map_or(0, |max| max + 1)
    }

    // ---- Objects ----

    /// Object on the editing page
    pub fn object(&self, name: &str) -> Option<&ObjectData> {
        self.pages.editing().and_then(|page| page.object(name))
    }

    /// Check if the editing page has an object
    pub fn contains_object(&self, name: &str) -> bool {
        self.object(name).is_some()
    }

    /// Check if a page has an object, including uncommitted edits
    pub fn contains_object_in_page(&self, num: PageNum, name: &str) -> bool {
        self.pages
            .latest(num)
            .is_some_and(|page| page.object(name).is_some())
    }

    /// Create or overwrite an object on the editing page
    ///
    /// A name that already exists replaces that object's shape and z-index
    /// and keeps its number. Without a name a new `obj-N` is created.
    pub fn set_object(
        &mut self,
        name: Option<&str>,
        shape: Shape,
        z_index: ZIndex,
    ) -> Result<ObjectNum, SceneError> {
        let name = match name {
            Some(name) => Some(make_name(name).ok_or(SceneError::NameTooLong)?),
            None => None,
        };
        let page = self.pages.editing_mut().ok_or(SceneError::NoEditingPage)?;

        let num = match name.as_deref().and_then(|name| page.position(name)) {
            Some(index) => page.overwrite(index, shape, z_index),
            None => page.push_object(name, shape, z_index),
        };
        self.pages.touch();
        Ok(num)
    }

    /// Remove an object from the editing page
    ///
    /// Processes and pick colors bound to it stay until defragmentation.
    pub fn delete_object(&mut self, name: &str) -> Result<ObjectNum, SceneError> {
        let page = self.pages.editing_mut().ok_or(SceneError::NoEditingPage)?;
        let index = page.position(name).ok_or(SceneError::ObjectNotFound)?;
        let removed = page.remove_at(index);
        self.pages.touch();
        debug!("scene: deleted object {}", name);
        Ok(removed.num)
    }

    /// Move an object to a new position in the page's object list
    ///
    /// Only the tie-break between equal z-index changes.
    pub fn move_object(&mut self, name: &str, new_index: usize) -> Result<(), SceneError> {
        let page = self.pages.editing_mut().ok_or(SceneError::NoEditingPage)?;
        let index = page.position(name).ok_or(SceneError::ObjectNotFound)?;
        if new_index >= page.objects().len() {
            return Err(SceneError::IndexOutOfRange);
        }
        let object = page.remove_at(index);
        page.insert_at(new_index, object);
        self.pages.touch();
        Ok(())
    }

    /// Mark an object as drawn but not touchable
    pub fn set_untouchable(&mut self, name: &str, untouchable: bool) -> Result<(), SceneError> {
        let page = self.pages.editing_mut().ok_or(SceneError::NoEditingPage)?;
        let object = page.object_mut(name).ok_or(SceneError::ObjectNotFound)?;
        object.untouchable = untouchable;
        self.pages.touch();
        Ok(())
    }

    /// Rename an object on the editing page
    pub fn rename_object(&mut self, name: &str, new_name: &str) -> Result<(), SceneError> {
        let new_name = make_name(new_name).ok_or(SceneError::NameTooLong)?;
        let page = self.pages.editing_mut().ok_or(SceneError::NoEditingPage)?;
        if page.object(&new_name).is_some() {
            return Err(SceneError::DuplicateObjectName);
        }
        let object = page.object_mut(name).ok_or(SceneError::ObjectNotFound)?;
        object.name = new_name;
        self.pages.touch();
        Ok(())
    }

    // ---- Drawing ----

    /// Render a committed page for display
    ///
    /// Clears the target to black, then paints objects in ascending z-index
    /// with insertion order breaking ties. Records the page as the drawing
    /// page.
    pub fn draw_page<D, L>(
        &mut self,
        target: &mut D,
        name: &str,
        images: &mut L,
    ) -> Result<(), DrawError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        L: ImageLoader,
    {
        let page = self
            .pages
            .committed()
            .iter()
            .find(|p| p.name == name)
            .ok_or(DrawError::PageNotFound)?;

        target.clear(Rgb565::BLACK).map_err(DrawError::Target)?;
        for object in page.paint_order() {
            object
                .shape
                .paint(target, Ink::Own, images)
                .map_err(DrawError::Target)?;
        }

        self.drawing_page = Some(page.num);
        Ok(())
    }
}

macro_rules! shape_setters {
    ($( $(#[$doc:meta])* $fn_name:ident => $variant:ident($args:ty); )*) => {
        impl Scene {
            $(
                $(#[$doc])*
                pub fn $fn_name(
                    &mut self,
                    name: Option<&str>,
                    args: $args,
                    z_index: ZIndex,
                ) -> Result<ObjectNum, SceneError> {
                    self.set_object(name, Shape::$variant(args), z_index)
                }
            )*
        }
    };
}

shape_setters! {
    /// Create or overwrite a single pixel
    set_draw_pixel_object => DrawPixel(PixelArgs);
    /// Create or overwrite a line
    set_draw_line_object => DrawLine(LineArgs);
    /// Create or overwrite a quadratic Bézier curve
    set_draw_bezier_object => DrawBezier(BezierArgs);
    /// Create or overwrite a thick line
    set_draw_wide_line_object => DrawWideLine(WideLineArgs);
    /// Create or overwrite a rectangle outline
    set_draw_rect_object => DrawRect(RectArgs);
    /// Create or overwrite a rounded rectangle outline
    set_draw_round_rect_object => DrawRoundRect(RoundRectArgs);
    /// Create or overwrite a triangle outline
    set_draw_triangle_object => DrawTriangle(TriangleArgs);
    /// Create or overwrite a circle outline
    set_draw_circle_object => DrawCircle(CircleArgs);
    /// Create or overwrite an ellipse outline
    set_draw_ellipse_object => DrawEllipse(EllipseArgs);
    /// Create or overwrite a ring segment outline
    set_draw_arc_object => DrawArc(ArcArgs);
    /// Create or overwrite an elliptical ring segment outline
    set_draw_ellipse_arc_object => DrawEllipseArc(EllipseArcArgs);
    /// Create or overwrite a filled rectangle
    set_fill_rect_object => FillRect(RectArgs);
    /// Create or overwrite a filled rounded rectangle
    set_fill_round_rect_object => FillRoundRect(RoundRectArgs);
    /// Create or overwrite a filled triangle
    set_fill_triangle_object => FillTriangle(TriangleArgs);
    /// Create or overwrite a filled circle
    set_fill_circle_object => FillCircle(CircleArgs);
    /// Create or overwrite a filled ellipse
    set_fill_ellipse_object => FillEllipse(EllipseArgs);
    /// Create or overwrite a filled ring segment
    set_fill_arc_object => FillArc(ArcArgs);
    /// Create or overwrite a filled elliptical ring segment
    set_fill_ellipse_arc_object => FillEllipseArc(EllipseArcArgs);
    /// Create or overwrite a JPEG image
    set_draw_jpg_file_object => DrawJpgFile(JpegArgs);
    /// Create or overwrite a PNG image
    set_draw_png_file_object => DrawPngFile(PngArgs);
    /// Create or overwrite a text string
    set_draw_string_object => DrawString(TextArgs);
    set_clip_arc_object => ClipArc(ArcArgs);
    set_clip_ellipse_arc_object => ClipEllipseArc(EllipseArcArgs);
    set_clip_rect_object => ClipRect(RectArgs);
    set_clip_round_rect_object => ClipRoundRect(RoundRectArgs);
    set_clip_circle_object => ClipCircle(CircleArgs);
    set_clip_ellipse_object => ClipEllipse(EllipseArgs);
    set_clip_triangle_object => ClipTriangle(TriangleArgs);
    /// Create or overwrite a flex container placeholder
    set_flex_box_object => FlexBox(FlexBoxArgs);
    /// Create or overwrite a table container placeholder
    set_table_box_object => TableBox(TableBoxArgs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::paint::NoImages;
    use embedded_graphics::prelude::Point;
    use vistouch_display::PickBuffer;
    use vistouch_hal::PickSurface;

    fn rect(x: i32, color: Rgb565) -> RectArgs {
        RectArgs::new(x, 0, 10, 10, color)
    }

    fn scene_with_home() -> Scene {
        let mut scene = Scene::new();
        scene.add_page(Some("home"), None).unwrap();
        scene
    }

    #[test]
    fn test_add_page_auto_numbers() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_page(Some("home"), None), Ok(0));
        assert_eq!(scene.add_page(None, None), Ok(1));
        assert_eq!(scene.add_page(None, Some(10)), Ok(10));
        assert_eq!(scene.add_page(None, None), Ok(11));

        assert_eq!(scene.find_page_by_name("page-1"), Some(1));
        assert_eq!(scene.editing_page_num(), Some(11));
        assert_eq!(scene.pages().len(), 4);
    }

    #[test]
    fn test_fresh_edit_page_gets_unused_name() {
        let mut scene = Scene::new();
        scene.add_page(Some("page-5"), None).unwrap();
        scene.add_page(Some("page-5-1"), None).unwrap();

        scene.change_edit_page(5).unwrap();
        assert_eq!(scene.editing_page().unwrap().name, "page-5-2");
        scene.commit();
        assert_eq!(scene.find_page_by_name("page-5"), Some(0));
        assert_eq!(scene.find_page_by_name("page-5-2"), Some(5));

        // Generated names also skip taken ones
        scene.add_page(Some("page-7"), Some(6)).unwrap();
        assert_eq!(scene.add_page(None, Some(7)), Ok(7));
        assert_eq!(scene.find_page_by_name("page-7-1"), Some(7));

        // Existing pages keep their names
        scene.change_edit_page(0).unwrap();
        assert_eq!(scene.editing_page().unwrap().name, "page-5");
    }

    #[test]
    fn test_add_page_rejects_duplicates() {
        let mut scene = scene_with_home();
        assert_eq!(scene.add_page(None, Some(0)), Err(SceneError::DuplicatePageNum));
        assert_eq!(scene.add_page(Some("home"), None), Err(SceneError::DuplicatePageName));
        assert_eq!(scene.pages().len(), 1);
    }

    #[test]
    fn test_object_needs_editing_page() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.set_fill_rect_object(None, rect(0, Rgb565::RED), 0),
            Err(SceneError::NoEditingPage)
        );
        assert_eq!(scene.delete_object("obj-1"), Err(SceneError::NoEditingPage));
    }

    #[test]
    fn test_set_object_overwrites_by_name() {
        let mut scene = scene_with_home();
        let num = scene
            .set_fill_rect_object(Some("btn"), rect(0, Rgb565::RED), 0)
            .unwrap();
        let again = scene
            .set_fill_rect_object(Some("btn"), rect(20, Rgb565::BLUE), 3)
            .unwrap();
        assert_eq!(num, again);

        let page = scene.page(0).unwrap();
        assert_eq!(page.objects().len(), 1);
        assert_eq!(page.objects()[0].z_index, 3);
        assert_eq!(
            page.objects()[0].shape,
            Shape::FillRect(rect(20, Rgb565::BLUE))
        );
    }

    #[test]
    fn test_batch_hides_edits_until_end() {
        let mut scene = scene_with_home();
        scene.begin_edit();
        scene
            .set_fill_rect_object(Some("btn"), rect(0, Rgb565::RED), 0)
            .unwrap();
        assert!(scene.page(0).unwrap().objects().is_empty());
        assert!(scene.contains_object_in_page(0, "btn"));

        assert!(scene.end_edit());
        assert_eq!(scene.page(0).unwrap().objects().len(), 1);
    }

    #[test]
    fn test_delete_and_move_object() {
        let mut scene = scene_with_home();
        scene.set_fill_rect_object(Some("a"), rect(0, Rgb565::RED), 0).unwrap();
        scene.set_fill_rect_object(Some("b"), rect(0, Rgb565::RED), 0).unwrap();
        scene.set_fill_rect_object(Some("c"), rect(0, Rgb565::RED), 0).unwrap();

        scene.move_object("c", 0).unwrap();
        let names: alloc::vec::Vec<&str> = scene
            .page(0)
            .unwrap()
            .objects()
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, ["c", "a", "b"]);

        assert_eq!(scene.move_object("a", 3), Err(SceneError::IndexOutOfRange));
        assert_eq!(scene.delete_object("a"), Ok(1));
        assert_eq!(scene.delete_object("a"), Err(SceneError::ObjectNotFound));
        assert!(!scene.contains_object("a"));
    }

    #[test]
    fn test_change_edit_page_fresh() {
        let mut scene = scene_with_home();
        scene.change_edit_page(5).unwrap();
        assert_eq!(scene.editing_page().unwrap().name, "page-5");
        // Fresh pages are committed on their first edit
        assert!(scene.page(5).is_none());
        scene.set_fill_rect_object(None, rect(0, Rgb565::RED), 0).unwrap();
        assert!(scene.page(5).is_some());
    }

    #[test]
    fn test_delete_page() {
        let mut scene = scene_with_home();
        assert_eq!(scene.delete_page(0), Ok(()));
        assert_eq!(scene.delete_page(0), Err(SceneError::PageNotFound));
        assert!(scene.editing_page().is_none());
    }

    #[test]
    fn test_draw_page_occlusion() {
        let mut scene = scene_with_home();
        scene
            .set_fill_rect_object(Some("top"), rect(0, Rgb565::RED), 1)
            .unwrap();
        scene
            .set_fill_rect_object(Some("bottom"), rect(0, Rgb565::BLUE), 0)
            .unwrap();

        let mut screen = PickBuffer::new(32, 32).unwrap();
        scene.draw_page(&mut screen, "home", &mut NoImages).unwrap();
        assert_eq!(screen.read_pixel(Point::new(5, 5)), Some(Rgb565::RED));
        assert_eq!(scene.drawing_page(), Some(0));

        assert_eq!(
            scene.draw_page(&mut screen, "missing", &mut NoImages),
            Err(DrawError::PageNotFound)
        );
    }

    #[test]
    fn test_untouchable_flag() {
        let mut scene = scene_with_home();
        scene.set_fill_rect_object(Some("bg"), rect(0, Rgb565::RED), 0).unwrap();
        scene.set_untouchable("bg", true).unwrap();
        assert!(scene.object("bg").unwrap().untouchable);
        assert_eq!(scene.set_untouchable("nope", true), Err(SceneError::ObjectNotFound));
    }

    #[test]
    fn test_rename_object() {
        let mut scene = scene_with_home();
        scene.set_fill_rect_object(Some("a"), rect(0, Rgb565::RED), 0).unwrap();
        scene.set_fill_rect_object(Some("b"), rect(0, Rgb565::RED), 0).unwrap();

        assert_eq!(scene.rename_object("a", "b"), Err(SceneError::DuplicateObjectName));
        scene.rename_object("a", "ok").unwrap();
        assert!(scene.contains_object("ok"));
        assert!(!scene.contains_object("a"));
    }
}
