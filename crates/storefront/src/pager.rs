//! Render-ready pagination bar for catalog and news pages.

use zeal_core::pagination::{Page, PageLink};

const PAGER_RADIUS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerLink {
    pub label: String,
    /// `None` for gaps and the current page.
    pub href: Option<String>,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub links: Vec<PagerLink>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub total_pages: usize,
}

impl Pager {
    /// Build the bar for `page`, linking each page number through `href`.
    pub fn new<T>(page: &Page<T>, href: impl Fn(usize) -> String) -> Self {
        let links = page
            .links(PAGER_RADIUS)
            .into_iter()
            .map(|link| match link {
                PageLink::Gap => PagerLink {
                    label: "…".to_owned(),
                    href: None,
                    current: false,
                },
                PageLink::Page { number, current } => PagerLink {
                    label: number.to_string(),
                    href: (!current).then(|| href(number)),
                    current,
                },
            })
            .collect();

        Self {
            links,
            prev: page.has_prev().then(|| href(page.prev_page())),
            next: page.has_next().then(|| href(page.next_page())),
            total_pages: page.total_pages,
        }
    }

    /// Whether there is more than one page to show.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_and_neighbours() {
        let page = Page::paginate((1..=50).collect::<Vec<_>>(), 3, 10);
        let pager = Pager::new(&page, |n| format!("/news?page={n}"));
        assert_eq!(pager.prev.as_deref(), Some("/news?page=2"));
        assert_eq!(pager.next.as_deref(), Some("/news?page=4"));
        let current: Vec<_> = pager.links.iter().filter(|l| l.current).collect();
        assert_eq!(current.len(), 1);
        assert!(current.first().is_some_and(|l| l.href.is_none() && l.label == "3"));
        assert!(pager.is_visible());
    }

    #[test]
    fn test_single_page_hidden() {
        let page = Page::paginate(vec![1, 2], 1, 10);
        let pager = Pager::new(&page, |n| format!("?page={n}"));
        assert!(!pager.is_visible());
        assert!(pager.prev.is_none() && pager.next.is_none());
    }
}
