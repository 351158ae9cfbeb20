//! # List View Model
//!
//! Pages, summaries and search results derived from an owned [`Snapshot`].
//! Nothing here mutates records; the snapshot is only replaced wholesale or
//! patched by removing a record.

use crate::model::{ClientId, ClientRecord};

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound of numbered links in a page bar.
pub const MAX_PAGE_LINKS: usize = 5;

/// Versioned copy of every record, newest first.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<ClientRecord>,
    version: u64,
}

impl Snapshot {
    #[must_use]
    pub fn new(records: Vec<ClientRecord>) -> Self {
        Self { records, version: 0 }
    }

    #[must_use]
    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bumped on every replace and on every successful removal.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn get(&self, id: &ClientId) -> Option<&ClientRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn replace(&mut self, records: Vec<ClientRecord>) {
        self.records = records;
        self.version += 1;
    }

    pub fn remove(&mut self, id: &ClientId) -> Option<ClientRecord> {
        let index = self.records.iter().position(|record| &record.id == id)?;
        self.version += 1;
        Some(self.records.remove(index))
    }
}

/// One entry of a page bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Bounds for "Showing `from` to `to` of `total` results". All zero when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

impl std::fmt::Display for PageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {} to {} of {} results", self.from, self.to, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct ListView {
    snapshot: Snapshot,
    page_size: usize,
    page: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListView {
    /// A `page_size` of zero is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self { snapshot: Snapshot::default(), page_size: page_size.max(1), page: 1 }
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.snapshot.len()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_items().div_ceil(self.page_size)
    }

    /// Always within `[1, total_pages]`; reads 1 when there are no records.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.page
    }

    /// Moves to `page`, clamped into range. Returns the page actually selected.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages().max(1));
        self.page
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn replace(&mut self, records: Vec<ClientRecord>) {
        self.snapshot.replace(records);
        self.set_page(self.page);
    }

    pub fn remove(&mut self, id: &ClientId) -> Option<ClientRecord> {
        let removed = self.snapshot.remove(id);
        self.set_page(self.page);
        removed
    }

    /// Records on the current page, in snapshot order.
    #[must_use]
    pub fn page(&self) -> &[ClientRecord] {
        let records = self.snapshot.records();
        let start = ((self.page - 1) * self.page_size).min(records.len());
        let end = (start + self.page_size).min(records.len());
        &records[start..end]
    }

    #[must_use]
    pub fn summary(&self) -> PageSummary {
        let total = self.total_items();
        if total == 0 {
            return PageSummary { from: 0, to: 0, total };
        }
        let from = (self.page - 1) * self.page_size + 1;
        let to = (self.page * self.page_size).min(total);
        PageSummary { from, to, total }
    }

    /// Every record whose name, email or phone contains `query`, ignoring case.
    ///
    /// A blank query returns the whole snapshot. Results are not paginated.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ClientRecord> {
        let needle = query.trim().to_lowercase();
        let records = self.snapshot.records().iter();
        if needle.is_empty() {
            return records.collect();
        }
        records.filter(|record| record.matches(&needle)).collect()
    }

    #[must_use]
    pub fn page_links(&self) -> Vec<PageLink> {
        page_links(self.page, self.total_pages())
    }
}

/// Numbered links around `current`, at most [`MAX_PAGE_LINKS`] of them, with the
/// first and last page pinned and a [`PageLink::Gap`] wherever pages are skipped.
/// Empty when there is at most one page.
#[must_use]
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    if total <= MAX_PAGE_LINKS {
        return (1..=total).map(PageLink::Page).collect();
    }

    let half = MAX_PAGE_LINKS / 2;
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(half).max(1);
    let end = (start + MAX_PAGE_LINKS - 1).min(total);
    if end - start < MAX_PAGE_LINKS - 1 {
        start = end.saturating_sub(MAX_PAGE_LINKS - 1).max(1);
    }

    let mut links = Vec::with_capacity(MAX_PAGE_LINKS + 4);
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total {
        if end < total - 1 {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total));
    }
    links
}
