//! Data table component types.
//!
//! List pages describe their table with a [`DataTableConfig`] and carry the
//! current search, sort, filters and page in a [`TableState`]. The shared
//! templates under `templates/components/` render the toolbar, the sortable
//! header and the pager from these.

use url::form_urlencoded;
use zeal_core::listing::SortDirection;
use zeal_core::pagination::{Page, PageLink};

/// Pages shown on each side of the current one in the pager.
const PAGER_RADIUS: usize = 2;

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl TableColumn {
    #[must_use]
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: true,
        }
    }

    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
        }
    }
}

/// Option for a select filter.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Select filter shown in the toolbar.
#[derive(Debug, Clone)]
pub struct TableFilter {
    /// Query parameter name.
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
    /// Currently selected value; empty for "all".
    pub selected: String,
}

impl TableFilter {
    #[must_use]
    pub fn select(key: &'static str, label: &'static str, options: Vec<FilterOption>) -> Self {
        Self {
            key,
            label,
            options,
            selected: String::new(),
        }
    }

    /// Build options from `(value, label)` pairs such as a status enum's `ALL`.
    #[must_use]
    pub fn from_pairs<I, V, L>(key: &'static str, label: &'static str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let options = pairs
            .into_iter()
            .map(|(value, label)| FilterOption::new(value, label))
            .collect();
        Self::select(key, label, options)
    }

    #[must_use]
    pub fn with_selected(mut self, selected: Option<&str>) -> Self {
        self.selected = selected.unwrap_or_default().to_string();
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    pub table_id: &'static str,
    pub columns: Vec<TableColumn>,
    pub filters: Vec<TableFilter>,
    pub search_placeholder: &'static str,
    pub empty_title: &'static str,
    pub empty_description: Option<&'static str>,
    /// Link to the create form, if the resource can be created here.
    pub new_href: Option<&'static str>,
}

impl DataTableConfig {
    #[must_use]
    pub const fn new(table_id: &'static str) -> Self {
        Self {
            table_id,
            columns: Vec::new(),
            filters: Vec::new(),
            search_placeholder: "Tìm kiếm...",
            empty_title: "Không có dữ liệu",
            empty_description: None,
            new_href: None,
        }
    }

    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub const fn search_placeholder(mut self, placeholder: &'static str) -> Self {
        self.search_placeholder = placeholder;
        self
    }

    #[must_use]
    pub const fn empty_state(
        mut self,
        title: &'static str,
        description: Option<&'static str>,
    ) -> Self {
        self.empty_title = title;
        self.empty_description = description;
        self
    }

    #[must_use]
    pub const fn new_href(mut self, href: &'static str) -> Self {
        self.new_href = Some(href);
        self
    }

    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }
}

/// Search, sort and filters currently applied to a list page.
#[derive(Debug, Clone)]
pub struct TableState {
    pub path: &'static str,
    pub search: String,
    pub sort: Option<String>,
    pub dir: SortDirection,
    pub filters: Vec<(&'static str, String)>,
}

impl TableState {
    #[must_use]
    pub fn new(path: &'static str, search: Option<&str>) -> Self {
        Self {
            path,
            search: search.map(str::trim).unwrap_or_default().to_string(),
            sort: None,
            dir: SortDirection::Asc,
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn sorted(mut self, sort: Option<&str>, dir: SortDirection) -> Self {
        self.sort = sort.map(str::to_string).filter(|s| !s.is_empty());
        self.dir = dir;
        self
    }

    /// Keep a non-blank filter value in generated links.
    #[must_use]
    pub fn filtered(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.filters.push((key, value.to_string()));
        }
        self
    }

    fn href(&self, sort: Option<(&str, SortDirection)>, page: Option<usize>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            query.append_pair("q", &self.search);
        }
        for (key, value) in &self.filters {
            query.append_pair(key, value);
        }
        if let Some((key, dir)) = sort {
            query.append_pair("sort", key);
            query.append_pair("dir", dir.as_str());
        }
        if let Some(page) = page.filter(|p| *p > 1) {
            query.append_pair("page", &page.to_string());
        }
        let query = query.finish();
        if query.is_empty() {
            self.path.to_string()
        } else {
            format!("{}?{query}", self.path)
        }
    }

    /// Link that sorts by `key`, flipping direction when already sorted by it.
    #[must_use]
    pub fn sort_href(&self, key: &str) -> String {
        let dir = if self.sort.as_deref() == Some(key) {
            self.dir.toggled()
        } else {
            SortDirection::Asc
        };
        self.href(Some((key, dir)), None)
    }

    /// Arrow for the column currently sorted by.
    #[must_use]
    pub fn sort_indicator(&self, key: &str) -> &'static str {
        match (self.sort.as_deref() == Some(key), self.dir) {
            (false, _) => "",
            (true, SortDirection::Asc) => "▲",
            (true, SortDirection::Desc) => "▼",
        }
    }

    /// Link to `page` keeping search, filters and sort.
    #[must_use]
    pub fn page_href(&self, page: usize) -> String {
        let sort = self.sort.as_deref().map(|key| (key, self.dir));
        self.href(sort, Some(page))
    }
}

/// One entry of the pager bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerLink {
    pub label: String,
    /// `None` for the gap marker and the current page.
    pub href: Option<String>,
    pub current: bool,
}

/// Render-ready pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub links: Vec<PagerLink>,
    pub prev: Option<String>,
    pub next: Option<String>,
    /// e.g. `13-24 / 40`
    pub summary: String,
    pub total: usize,
}

impl Pager {
    #[must_use]
    pub fn new<T>(page: &Page<T>, state: &TableState) -> Self {
        let links = page
            .links(PAGER_RADIUS)
            .into_iter()
            .map(|link| match link {
                PageLink::Gap => PagerLink {
                    label: "…".to_string(),
                    href: None,
                    current: false,
                },
                PageLink::Page { number, current } => PagerLink {
                    label: number.to_string(),
                    href: (!current).then(|| state.page_href(number)),
                    current,
                },
            })
            .collect();

        let summary = if page.total == 0 {
            "0 / 0".to_string()
        } else {
            format!("{}-{} / {}", page.first_index(), page.last_index(), page.total)
        };

        Self {
            links,
            prev: page.has_prev().then(|| state.page_href(page.prev_page())),
            next: page.has_next().then(|| state.page_href(page.next_page())),
            summary,
            total: page.total,
        }
    }

    /// Whether there is more than one page to move between.
    #[must_use]
    pub fn is_multi_page(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TableState {
        TableState::new("/orders", Some(" áo thun "))
            .filtered("shipping", Some("pending"))
            .filtered("payment", Some(""))
    }

    #[test]
    fn test_sort_href_toggles_current_column() {
        let state = state().sorted(Some("total"), SortDirection::Asc);
        assert_eq!(
            state.sort_href("total"),
            "/orders?q=%C3%A1o+thun&shipping=pending&sort=total&dir=desc"
        );
        assert_eq!(
            state.sort_href("created"),
            "/orders?q=%C3%A1o+thun&shipping=pending&sort=created&dir=asc"
        );
        assert_eq!(state.sort_indicator("total"), "▲");
        assert_eq!(state.sort_indicator("created"), "");
    }

    #[test]
    fn test_page_href_keeps_state_and_drops_page_one() {
        let state = TableState::new("/coupons", None);
        assert_eq!(state.page_href(1), "/coupons");
        assert_eq!(state.page_href(3), "/coupons?page=3");
    }

    #[test]
    fn test_pager_marks_current_page() {
        let page = Page::paginate((1..=40).collect::<Vec<_>>(), 2, 12);
        let pager = Pager::new(&page, &TableState::new("/products", None));

        assert_eq!(pager.summary, "13-24 / 40");
        assert_eq!(pager.prev.as_deref(), Some("/products"));
        assert_eq!(pager.next.as_deref(), Some("/products?page=3"));
        let current: Vec<_> = pager.links.iter().filter(|l| l.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].label, "2");
        assert!(current[0].href.is_none());
    }

    #[test]
    fn test_filter_from_pairs() {
        let filter = TableFilter::from_pairs("role", "Vai trò", [("admin", "Quản trị")])
            .with_selected(Some("admin"));
        assert_eq!(filter.options.len(), 1);
        assert_eq!(filter.selected, "admin");
    }
}
