//! Paging over lists that were fetched whole from the backend.
//!
//! Most `/api/*` list endpoints return every document at once, so pages are
//! cut locally. Page numbers are 1-based and out-of-range requests clamp to
//! the nearest valid page.

use std::collections::BTreeSet;

/// Default page size for admin tables and the catalog grid.
pub const DEFAULT_PER_PAGE: usize = 12;

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page, 1-based.
    pub page: usize,
    pub per_page: usize,
    /// Number of items across all pages.
    pub total: usize,
    /// Always at least 1, even for an empty list.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cut `page` out of `all`.
    ///
    /// `per_page` of zero falls back to [`DEFAULT_PER_PAGE`].
    #[must_use]
    pub fn paginate(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
        let total = all.len();
        let total_pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);

        let items = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn prev_page(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    #[must_use]
    pub const fn next_page(&self) -> usize {
        if self.has_next() { self.page + 1 } else { self.page }
    }

    /// 1-based index of the first item shown, 0 when empty.
    #[must_use]
    pub const fn first_index(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item shown, 0 when empty.
    #[must_use]
    pub fn last_index(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }

    /// Page links around the current page.
    #[must_use]
    pub fn links(&self, radius: usize) -> Vec<PageLink> {
        page_window(self.page, self.total_pages, radius)
    }

    /// Convert items while keeping the paging numbers.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// An entry in a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, current: bool },
    /// Elided run of pages (`…`).
    Gap,
}

impl PageLink {
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        matches!(self, Self::Gap)
    }

    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Page { current: true, .. })
    }

    /// Page number, 0 for a gap.
    #[must_use]
    pub const fn number(&self) -> usize {
        match self {
            Self::Page { number, .. } => *number,
            Self::Gap => 0,
        }
    }
}

/// Links for a pagination bar: first, last, and `current ± radius`.
///
/// A single missing page between two shown pages is filled in rather than
/// replaced by a gap.
#[must_use]
pub fn page_window(current: usize, total_pages: usize, radius: usize) -> Vec<PageLink> {
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);

    let mut shown = BTreeSet::from([1, total_pages]);
    let low = current.saturating_sub(radius).max(1);
    let high = current.saturating_add(radius).min(total_pages);
    shown.extend(low..=high);

    let mut links = Vec::with_capacity(shown.len() + 2);
    let mut prev: Option<usize> = None;
    for number in shown {
        if let Some(prev) = prev {
            match number - prev {
                1 => {}
                2 => links.push(PageLink::Page {
                    number: prev + 1,
                    current: prev + 1 == current,
                }),
                _ => links.push(PageLink::Gap),
            }
        }
        links.push(PageLink::Page {
            number,
            current: number == current,
        });
        prev = Some(number);
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(links: &[PageLink]) -> Vec<usize> {
        links.iter().map(PageLink::number).collect()
    }

    #[test]
    fn test_paginate_middle_page() {
        let page = Page::paginate((1..=25).collect(), 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev() && page.has_next());
        assert_eq!((page.first_index(), page.last_index()), (11, 20));
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let last = Page::paginate((1..=25).collect::<Vec<u32>>(), 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_next());
        assert_eq!(last.next_page(), 3);

        let first = Page::paginate((1..=25).collect::<Vec<u32>>(), 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.prev_page(), 1);
    }

    #[test]
    fn test_paginate_empty_list() {
        let page: Page<u8> = Page::paginate(Vec::new(), 3, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!((page.first_index(), page.last_index()), (0, 0));
    }

    #[test]
    fn test_window_with_gaps() {
        let links = page_window(10, 20, 2);
        assert_eq!(numbers(&links), vec![1, 0, 8, 9, 10, 11, 12, 0, 20]);
        assert!(links[4].is_current());
        assert!(links[1].is_gap());
    }

    #[test]
    fn test_window_fills_single_hole() {
        assert_eq!(numbers(&page_window(4, 7, 1)), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_window_small_totals() {
        assert_eq!(
            page_window(1, 1, 2),
            vec![PageLink::Page { number: 1, current: true }]
        );
        assert_eq!(numbers(&page_window(1, 0, 2)), vec![1]);
        assert_eq!(numbers(&page_window(5, 3, 1)), vec![1, 2, 3]);
    }
}
