use std::ops::Range;

/// Page sizes offered by the page-size toggle
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Page cursor over a filtered row set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Zero-based current page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `total` rows; never less than one
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Pull the cursor back inside the last page after the row set shrank
    pub fn clamp(&mut self, total: usize) {
        let last = self.page_count(total) - 1;
        if self.page > last {
            self.page = last;
        }
    }

    pub fn first(&mut self) {
        self.page = 0;
    }

    pub fn last(&mut self, total: usize) {
        self.page = self.page_count(total) - 1;
    }

    pub fn next(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Switch to the next entry of [`PAGE_SIZES`]
    pub fn cycle_page_size(&mut self) {
        let next = PAGE_SIZES
            .iter()
            .copied()
            .find(|s| *s > self.page_size)
            .unwrap_or(PAGE_SIZES[0]);
        self.set_page_size(next);
    }

    /// Index range of the current page within `total` rows
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    /// e.g. "Showing 26-50 of 132"
    pub fn summary(&self, total: usize) -> String {
        let range = self.range(total);
        if range.is_empty() {
            format!("Showing 0 of {}", total)
        } else {
            format!("Showing {}-{} of {}", range.start + 1, range.end, total)
        }
    }
}
