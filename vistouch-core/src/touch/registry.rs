//! Gesture process registry
//!
//! Per page, named processes bind one touch type to one scene object.
//! Processes are edited through the same staging discipline as scene
//! pages and only committed processes take part in classification.

use alloc::vec::Vec;

use vistouch_hal::PickColor;

use super::types::TouchType;
use crate::pick::PickColorTable;
use crate::scene::{make_name, Name, ObjectNum, Scene};
use crate::staging::{PageNum, PageRecord, Staging};

/// Process number, unique within a page
pub type ProcessNum = u16;

/// Process registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessError {
    /// Operation needs an editing page and none is loaded
    NoEditingPage,
    /// Scene has no page with the editing page's number
    PageNotFound,
    /// Target object does not exist
    ObjectNotFound,
    /// Target object is marked untouchable
    ObjectUntouchable,
    /// Object already has a process of this type
    DuplicateBinding,
    /// Process name already in use on the page
    DuplicateProcessName,
    /// No process with that name
    ProcessNotFound,
    /// Name does not fit in a [`Name`]
    NameTooLong,
    /// Multi-click threshold must be at least one
    InvalidClickCount,
    /// Page ran out of pick colors
    ColorsExhausted,
}

/// Named binding of a touch type to an object
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Process {
    pub num: ProcessNum,
    pub name: Name,
    /// Target object number
    pub object: ObjectNum,
    pub touch_type: TouchType,
    /// Keep matching after the finger leaves the object (swipe types only)
    pub enable_over_border: bool,
    /// Report an over-border match as a hit (swipe types only)
    pub return_current_over: bool,
    /// Tap threshold (multi-click only)
    pub multi_click_count: u8,
    /// Target's pick color at bind time
    pub color: PickColor,
}

/// Processes of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPage {
    pub num: PageNum,
    processes: Vec<Process>,
    last_process_num: ProcessNum,
}

impl ProcessPage {
    /// Processes in creation order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Look up a process by name
    pub fn process(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == name)
    }

    /// Look up a process by number
    pub fn process_by_num(&self, num: ProcessNum) -> Option<&Process> {
        self.processes.iter().find(|p| p.num == num)
    }

    /// Process already bound to an object and type
    pub fn binding(&self, object: ObjectNum, touch_type: TouchType) -> Option<&Process> {
        self.processes
            .iter()
            .find(|p| p.object == object && p.touch_type == touch_type)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    fn next_process_num(&mut self) -> ProcessNum {
        loop {
            self.last_process_num = self.last_process_num.wrapping_add(1);
            let num = self.last_process_num;
            if num != 0 && self.process_by_num(num).is_none() {
                return num;
            }
        }
    }
}

impl PageRecord for ProcessPage {
    fn page_num(&self) -> PageNum {
        self.num
    }

    fn blank(num: PageNum) -> Self {
        Self {
            num,
            processes: Vec::new(),
            last_process_num: 0,
        }
    }
}

/// Arguments for [`ProcessRegistry::create_process`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec<'a> {
    pub name: &'a str,
    pub object: &'a str,
    pub touch_type: TouchType,
    pub enable_over_border: bool,
    pub return_current_over: bool,
    pub multi_click_count: u8,
}

impl<'a> ProcessSpec<'a> {
    /// Bind a touch type to an object
    pub fn new(name: &'a str, object: &'a str, touch_type: TouchType) -> Self {
        Self {
            name,
            object,
            touch_type,
            enable_over_border: false,
            return_current_over: false,
            multi_click_count: 0,
        }
    }

    /// Set the over-border modifiers
    pub fn over_border(mut self, enable: bool, return_current: bool) -> Self {
        self.enable_over_border = enable;
        self.return_current_over = return_current;
        self
    }

    /// Set the multi-click threshold
    pub fn clicks(mut self, count: u8) -> Self {
        self.multi_click_count = count;
        self
    }
}

/// Per-page process collections with staging and commit
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    pages: Staging<ProcessPage>,
}

impl ProcessRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            pages: Staging::new(),
        }
    }

    /// Commit pending edits and load a page's processes for editing
    pub fn change_edit_page(&mut self, num: PageNum) {
        self.pages.load(num);
    }

    /// Forget a page's processes, committed and editing alike
    pub fn delete_page(&mut self, num: PageNum) -> bool {
        let removed = self.pages.remove(num);
        if removed {
            debug!("process: deleted page {}", num);
        }
        removed
    }

    /// Write the editing page back
    pub fn commit(&mut self) -> bool {
        let committed = self.pages.commit();
        if committed {
            debug!("process: commit page {}", self.pages.editing_num().unwrap_or(-1));
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

    /// Committed processes of a page
    pub fn page(&self, num: PageNum) -> Option<&ProcessPage> {
        self.pages.get(num)
    }

    /// Processes being edited
    pub fn editing_page(&self) -> Option<&ProcessPage> {
        self.pages.editing()
    }

    /// Number of the page being edited
    pub fn editing_page_num(&self) -> Option<PageNum> {
        self.pages.editing_num()
    }

    /// Check if the editing page has a process
    pub fn contains_process(&self, name: &str) -> bool {
        self.pages
            .editing()
            .is_some_and(|page| page.process(name).is_some())
    }

    /// Name of the process bound to an object and type on the editing page
    pub fn find_binding(&self, scene: &Scene, object: &str, touch_type: TouchType) -> Option<&str> {
        let page = self.pages.editing()?;
        let object = scene.latest_page(page.num)?.object(object)?;
        page.binding(object.num, touch_type).map(|p| p.name.as_str())
    }

    /// Bind a touch type to an object on the editing page
    ///
    /// Checks, in order: the object exists and is touchable, the object
    /// has no process of this type yet, the name is unused. The object's
    /// pick color is allocated if needed and copied into the process.
    pub fn create_process(
        &mut self,
        scene: &Scene,
        colors: &mut PickColorTable,
        spec: ProcessSpec<'_>,
    ) -> Result<ProcessNum, ProcessError> {
        let name = make_name(spec.name).ok_or(ProcessError::NameTooLong)?;
        if spec.touch_type == TouchType::MultiClicked && spec.multi_click_count == 0 {
            return Err(ProcessError::InvalidClickCount);
        }
        let page_num = self.pages.editing_num().ok_or(ProcessError::NoEditingPage)?;

        let object = scene
            .latest_page(page_num)
            .ok_or(ProcessError::PageNotFound)?
            .object(spec.object)
            .ok_or(ProcessError::ObjectNotFound)?;
        if object.untouchable {
            warn!("process: object {} is untouchable", spec.object);
            return Err(ProcessError::ObjectUntouchable);
        }

        let page = self.pages.editing_mut().ok_or(ProcessError::NoEditingPage)?;
        if let Some(existing) = page.binding(object.num, spec.touch_type) {
            warn!(
                "process: {} already binds {} as {}",
                existing.name.as_str(),
                spec.object,
                spec.touch_type
            );
            return Err(ProcessError::DuplicateBinding);
        }
        if page.process(spec.name).is_some() {
            warn!("process: name {} already used", spec.name);
            return Err(ProcessError::DuplicateProcessName);
        }

        let color = colors.color_for(page_num, object.num, true);
        if color.is_none() {
            return Err(ProcessError::ColorsExhausted);
        }

        let swipe = spec.touch_type.is_swipe();
        let num = page.next_process_num();
        page.processes.push(Process {
            num,
            name,
            object: object.num,
            touch_type: spec.touch_type,
            enable_over_border: swipe && spec.enable_over_border,
            return_current_over: swipe && spec.return_current_over,
            multi_click_count: spec.multi_click_count,
            color,
        });
        self.pages.touch();

        debug!("process: {} -> {} as {}", spec.name, spec.object, spec.touch_type);
        Ok(num)
    }

    /// Remove a process from the editing page
    pub fn delete_process(&mut self, name: &str) -> Result<ProcessNum, ProcessError> {
        let page = self.pages.editing_mut().ok_or(ProcessError::NoEditingPage)?;
        let index = page
            .processes
            .iter()
            .position(|p| p.name == name)
            .ok_or(ProcessError::ProcessNotFound)?;
        let removed = page.processes.remove(index);
        self.pages.touch();
        Ok(removed.num)
    }

    /// Drop processes and pick colors whose object no longer exists
    ///
    /// With `None` every known page is cleaned. A page missing from the
    /// scene loses all of its processes and colors. Returns the number of
    /// processes removed.
    pub fn defrag_processes(
        &mut self,
        scene: &Scene,
        colors: &mut PickColorTable,
        page: Option<PageNum>,
    ) -> usize {
        let targets = match page {
            Some(num) => alloc::vec![num],
            None => {
                let mut nums = self.pages.page_nums();
                for num in colors.page_nums() {
                    if !nums.contains(&num) {
                        nums.push(num);
                    }
                }
                nums
            }
        };

        let mut removed = 0;
        for num in targets {
            let scene_page = scene.latest_page(num);
            let exists = |object: ObjectNum| scene_page.is_some_and(|p| p.contains_num(object));

            let mut dropped = 0;
            self.pages.for_each_copy_mut(num, |page| {
                let before = page.processes.len();
                page.processes.retain(|p| exists(p.object));
                dropped = dropped.max(before - page.processes.len());
            });
            let freed = colors.defrag(num, exists);

            if dropped > 0 || freed > 0 {
                info!(
                    "process: defrag page {} removed {} processes, {} colors",
                    num,
                    dropped,
                    freed
                );
            }
            removed += dropped;
        }
        removed
    }
}
