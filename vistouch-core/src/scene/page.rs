//! Pages and objects

use alloc::vec::Vec;
use core::fmt::Write;

use heapless::String;

use super::shape::Shape;
use crate::config::MAX_NAME_LEN;
use crate::staging::{PageNum, PageRecord};

/// Page, object and process name
pub type Name = String<MAX_NAME_LEN>;

/// Object number, unique within a page
pub type ObjectNum = u16;

/// Paint order, lower values are drawn first
pub type ZIndex = u8;

/// Copy a name into bounded storage
///
/// Returns `None` if it does not fit.
pub fn make_name(text: &str) -> Option<Name> {
    let mut name = Name::new();
    name.push_str(text).ok()?;
    Some(name)
}

/// Build a name from a prefix and a number
pub(crate) fn numbered_name(prefix: &str, num: i64) -> Name {
    let mut name = Name::new();
    // Prefixes are short literals, the number always fits
    let _ = write!(name, "{}{}", prefix, num);
    name
}

/// One drawable object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    pub num: ObjectNum,
    pub name: Name,
    pub shape: Shape,
    pub z_index: ZIndex,
    /// Drawn, but never picked and never bound to a process
    pub untouchable: bool,
}

/// Named, numbered collection of objects
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub num: PageNum,
    pub name: Name,
    /// Insertion order, the tie-break for equal z-index
    objects: Vec<ObjectData>,
    /// Last object number handed out
    last_object_num: ObjectNum,
}

impl Page {
    /// Create an empty page
    pub fn new(num: PageNum, name: Name) -> Self {
        Self {
            num,
            name,
            objects: Vec::new(),
            last_object_num: 0,
        }
    }

    /// Objects in insertion order
    pub fn objects(&self) -> &[ObjectData] {
        &self.objects
    }

    /// Look up an object by name
    pub fn object(&self, name: &str) -> Option<&ObjectData> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Look up an object by number
    pub fn object_by_num(&self, num: ObjectNum) -> Option<&ObjectData> {
        self.objects.iter().find(|o| o.num == num)
    }

    /// Check if an object number is still present
    pub fn contains_num(&self, num: ObjectNum) -> bool {
        self.object_by_num(num).is_some()
    }

    /// Objects sorted by z-index, stable for equal z-index
    pub fn paint_order(&self) -> Vec<&ObjectData> {
        let mut ordered: Vec<&ObjectData> = self.objects.iter().collect();
        ordered.sort_by_key(|o| o.z_index);
        ordered
    }

    pub(crate) fn object_mut(&mut self, name: &str) -> Option<&mut ObjectData> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    /// Append a new object with the next number
    ///
    /// Without a name the object is called `obj-N`, skipping any `N` whose
    /// name is taken.
    pub(crate) fn push_object(
        &mut self,
        name: Option<Name>,
        shape: Shape,
        z_index: ZIndex,
    ) -> ObjectNum {
        let num = self.next_object_num();
        let name = match name {
            Some(name) => name,
            None => self.generated_name(num),
        };
        self.objects.push(ObjectData {
            num,
            name,
            shape,
            z_index,
            untouchable: false,
        });
        num
    }

    /// Replace an object's shape and z-index, keeping its identity
    pub(crate) fn overwrite(&mut self, index: usize, shape: Shape, z_index: ZIndex) -> ObjectNum {
        let object = &mut self.objects[index];
        object.shape = shape;
        object.z_index = z_index;
        object.num
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> ObjectData {
        self.objects.remove(index)
    }

    pub(crate) fn insert_at(&mut self, index: usize, object: ObjectData) {
        self.objects.insert(index, object);
    }

    fn next_object_num(&mut self) -> ObjectNum {
        loop {
            self.last_object_num = self.last_object_num.wrapping_add(1);
            if self.last_object_num != 0 && !self.contains_num(self.last_object_num) {
                return self.last_object_num;
            }
        }
    }

    fn generated_name(&self, num: ObjectNum) -> Name {
        let mut n = num as i64;
        loop {
            let name = numbered_name("obj-", n);
            if self.object(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}

impl PageRecord for Page {
    fn page_num(&self) -> PageNum {
        self.num
    }

    fn blank(num: PageNum) -> Self {
        Page::new(num, numbered_name("page-", num as i64))
    }
}
