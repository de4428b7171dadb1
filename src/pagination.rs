//! Paginator: `(ordered records, page, page_size) -> PageResult`.

use serde::{Deserialize, Serialize};

/// Number of pages needed for `count` items. Never 0, so pagination
/// controls stay stable on an empty result.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// One page of an ordered result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    /// The requested page clamped into `[1, total_pages]`.
    pub current_page: usize,
    pub page_size: usize,
}

impl<T> PageResult<T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based position of the first item on this page, 0 when empty.
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.current_page - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last item on this page, 0 when empty.
    pub fn last_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_item_number() + self.items.len() - 1
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}

/// Slice one page out of `records`.
///
/// `page` is clamped into `[1, total_pages]` before slicing, and a
/// `page_size` of 0 is treated as 1. Never fails.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> PageResult<T> {
    let page_size = page_size.max(1);
    let total_items = records.len();
    let total_pages = total_pages(total_items, page_size);
    let current_page = page.clamp(1, total_pages);

    let start = (current_page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    PageResult {
        items: records[start..end].to_vec(),
        total_items,
        total_pages,
        current_page,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_make_three_pages() {
        let records: Vec<u32> = (1..=25).collect();
        let page = paginate(&records, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.first_item_number(), 21);
        assert_eq!(page.last_item_number(), 25);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let records: Vec<u32> = Vec::new();
        let page = paginate(&records, 4, 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.first_item_number(), 0);
    }

    #[test]
    fn stale_page_is_clamped() {
        let records: Vec<u32> = (1..=12).collect();
        let page = paginate(&records, 9, 5);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items, vec![11, 12]);

        let page = paginate(&records, 0, 5);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_page() {
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn map_keeps_metadata() {
        let page = paginate(&[1, 2, 3], 1, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
    }
}
