//! Pick color allocator
//!
//! Per page, maps object numbers to unique non-zero codes. A code stays
//! with its object until defragmentation frees it, after which the
//! smallest free code is handed to the next object that asks.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use vistouch_hal::PickColor;

use crate::config::PickDepth;
use crate::scene::ObjectNum;
use crate::staging::PageNum;

/// Pick colors for every page
#[derive(Debug, Clone, Default)]
pub struct PickColorTable {
    depth: PickDepth,
    /// Per page, sorted by color code
    pages: BTreeMap<PageNum, Vec<(ObjectNum, PickColor)>>,
}

impl PickColorTable {
    /// Create an empty table for a color range
    pub fn new(depth: PickDepth) -> Self {
        Self {
            depth,
            pages: BTreeMap::new(),
        }
    }

    /// Stable pick color for an object
    ///
    /// Unknown objects get the smallest unused code when `create` is set,
    /// otherwise [`PickColor::NONE`]. Also returns `NONE` when the page has
    /// used up the color range.
    pub fn color_for(&mut self, page: PageNum, object: ObjectNum, create: bool) -> PickColor {
        if let Some(color) = self.get(page, object) {
            return color;
        }
        if !create {
            return PickColor::NONE;
        }

        let max = self.depth.max_code();
        let entries = self.pages.entry(page).or_default();

        // Entries are sorted by code, so the first gap is the smallest free one
        let mut index = 0;
        let mut code: u16 = 1;
        while let Some((_, color)) = entries.get(index) {
            if color.code() != code {
                break;
            }
            index += 1;
            if code == max {
                warn!("pick: page {} out of colors", page);
                return PickColor::NONE;
            }
            code += 1;
        }

        let color = PickColor::new(code);
        entries.insert(index, (object, color));
        trace!("pick: page {} object {} -> {}", page, object, code);
        color
    }

    /// Pick color without allocating
    pub fn get(&self, page: PageNum, object: ObjectNum) -> Option<PickColor> {
        self.pages
            .get(&page)?
            .iter()
            .find(|(num, _)| *num == object)
            .map(|(_, color)| *color)
    }

    /// Object owning a color on a page
    pub fn object_for(&self, page: PageNum, color: PickColor) -> Option<ObjectNum> {
        if color.is_none() {
            return None;
        }
        self.pages
            .get(&page)?
            .iter()
            .find(|(_, c)| *c == color)
            .map(|(num, _)| *num)
    }

    /// Free every color whose object no longer exists
    ///
    /// Returns how many entries were dropped.
    pub fn defrag<F>(&mut self, page: PageNum, mut exists: F) -> usize
    where
        F: FnMut(ObjectNum) -> bool,
    {
        let Some(entries) = self.pages.get_mut(&page) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|(num, _)| exists(*num));
        let dropped = before - entries.len();
        if entries.is_empty() {
            self.pages.remove(&page);
        }
        dropped
    }

    /// Drop all colors of a page
    pub fn drop_page(&mut self, page: PageNum) -> usize {
        self.pages.remove(&page).map_or(0, |entries| entries.len())
    }

    /// Pages with at least one color
    pub fn page_nums(&self) -> Vec<PageNum> {
        self.pages.keys().copied().collect()
    }

    /// Allocated colors on a page, sorted by code
    pub fn colors(&self, page: PageNum) -> impl Iterator<Item = (ObjectNum, PickColor)> + '_ {
        self.pages
            .get(&page)
            .into_iter()
            .flat_map(|entries| entries.iter().copied())
    }

    /// Number of colors allocated on a page
    pub fn len(&self, page: PageNum) -> usize {
        self.pages.get(&page).map_or(0, Vec::len)
    }

    /// Color range in use
    pub fn depth(&self) -> PickDepth {
        self.depth
    }
}
