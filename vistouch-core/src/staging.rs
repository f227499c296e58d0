//! Staging and commit
//!
//! Pages are edited through a working copy. Readers such as the picking
//! pass only see committed pages, so a half-finished batch of edits is
//! never observed mid-tick.
//!
//! Outside a batch every mutation commits right away. Between
//! [`Staging::begin_batch`] and [`Staging::end_batch`] commits are deferred
//! until the batch ends or the editing page changes.

use alloc::vec::Vec;

/// Page number type shared by scene pages and process pages
///
/// Negative values never name a real page.
pub type PageNum = i32;

/// A record that can be staged by page number
pub trait PageRecord: Clone {
    /// Page number this record belongs to
    fn page_num(&self) -> PageNum;

    /// Fresh empty record for a page number that has none yet
    fn blank(num: PageNum) -> Self;
}

/// Committed records plus one working copy
#[derive(Debug, Clone)]
pub struct Staging<P> {
    /// Authoritative records, in creation order
    committed: Vec<P>,
    /// Working copy of the page being edited
    editing: Option<P>,
    /// Defer automatic commits
    batch: bool,
}

impl<P: PageRecord> Default for Staging<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PageRecord> Staging<P> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            committed: Vec::new(),
            editing: None,
            batch: false,
        }
    }

    /// Committed records
    pub fn committed(&self) -> &[P] {
        &self.committed
    }

    /// Committed record for a page number
    pub fn get(&self, num: PageNum) -> Option<&P> {
        self.committed.iter().find(|p| p.page_num() == num)
    }

    /// Latest version of a page, preferring uncommitted edits
    pub fn latest(&self, num: PageNum) -> Option<&P> {
        match &self.editing {
            Some(page) if page.page_num() == num => Some(page),
            _ => self.get(num),
        }
    }

    /// Working copy, if a page is being edited
    pub fn editing(&self) -> Option<&P> {
        self.editing.as_ref()
    }

    /// Mutable working copy
    ///
    /// Call [`Staging::touch`] after mutating it.
    pub fn editing_mut(&mut self) -> Option<&mut P> {
        self.editing.as_mut()
    }

    /// Page number of the working copy
    pub fn editing_num(&self) -> Option<PageNum> {
        self.editing.as_ref().map(PageRecord::page_num)
    }

    /// Check if a page number is known, committed or staged
    pub fn contains(&self, num: PageNum) -> bool {
        self.latest(num).is_some()
    }

    /// Commit pending edits, then load a page into the working copy
    ///
    /// An unknown page number loads a blank record.
    pub fn load(&mut self, num: PageNum) {
        self.commit();
        let page = self.get(num).cloned().unwrap_or_else(|| P::blank(num));
        self.editing = Some(page);
    }

    /// Commit pending edits, then put a new record in the working copy
    pub fn stage(&mut self, page: P) {
        self.commit();
        self.editing = Some(page);
        self.touch();
    }

    /// Write the working copy back, replacing by page number or appending
    ///
    /// Returns false when there is nothing to commit.
    pub fn commit(&mut self) -> bool {
        let Some(page) = &self.editing else {
            return false;
        };
        let num = page.page_num();
        match self.committed.iter_mut().find(|p| p.page_num() == num) {
            Some(slot) => *slot = page.clone(),
            None => self.committed.push(page.clone()),
        }
        true
    }

    /// Note a mutation of the working copy
    ///
    /// Commits immediately unless a batch is open.
    pub fn touch(&mut self) {
        if !self.batch {
            self.commit();
        }
    }

    /// Start deferring commits
    pub fn begin_batch(&mut self) {
        self.batch = true;
    }

    /// Stop deferring commits and commit pending edits
    pub fn end_batch(&mut self) -> bool {
        self.batch = false;
        self.commit()
    }

    /// Check if commits are deferred
    pub fn is_batching(&self) -> bool {
        self.batch
    }

    /// Remove a page from both the committed set and the working copy
    ///
    /// Returns false if the page was not known.
    pub fn remove(&mut self, num: PageNum) -> bool {
        let before = self.committed.len();
        self.committed.retain(|p| p.page_num() != num);
        let mut removed = self.committed.len() != before;

        if self.editing_num() == Some(num) {
            self.editing = None;
            removed = true;
        }
        removed
    }

    /// Apply a change to every copy of a page, committed and staged
    pub fn for_each_copy_mut<F>(&mut self, num: PageNum, mut f: F)
    where
        F: FnMut(&mut P),
    {
        for page in self.committed.iter_mut().filter(|p| p.page_num() == num) {
            f(page);
        }
        if let Some(page) = self.editing.as_mut().filter(|p| p.page_num() == num) {
            f(page);
        }
    }

    /// Page numbers known to the store, committed first
    pub fn page_nums(&self) -> Vec<PageNum> {
        let mut nums: Vec<PageNum> = self.committed.iter().map(PageRecord::page_num).collect();
        if let Some(num) = self.editing_num() {
            if !nums.contains(&num) {
                nums.push(num);
            }
        }
        nums
    }
}
