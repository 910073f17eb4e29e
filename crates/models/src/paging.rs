use serde::Serialize;

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    /// 1-based index of this page
    pub page_index: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedList<T> {
    pub fn new(items: Vec<T>, total_items: u64, page_index: u64, page_size: u64) -> Self {
        let total_pages = total_pages(total_items, page_size);

        Self {
            items,
            page_index,
            total_pages,
            has_previous_page: page_index > 1,
            has_next_page: page_index < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Normalises a requested page number; missing or zero means the first page
pub fn page_or_first(page: Option<u64>) -> u64 {
    page.filter(|&p| p > 0).unwrap_or(1)
}

/// Pins a requested page to the pages that exist; an empty result set still
/// has a first page
pub fn clamp_page(page: u64, total_items: u64, page_size: u64) -> u64 {
    page.clamp(1, total_pages(total_items, page_size).max(1))
}
