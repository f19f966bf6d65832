//! Lead listing state: query parameters, pagination, and fetch sequencing.
//!
//! [`LeadBrowser`] owns the current query and the rows it produced. Fetches
//! are asynchronous and may complete out of order, so every fetch carries a
//! [`FetchId`] and only the newest request's outcome is applied.

use std::str::FromStr;

use crate::api::types::{Lead, LeadPage};

/// Rows shown per page. The backend accepts exactly these sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerPage {
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PerPage {
    pub fn as_u32(self) -> u32 {
        match self {
            PerPage::Ten => 10,
            PerPage::Twenty => 20,
            PerPage::Fifty => 50,
        }
    }

    /// Next size, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            PerPage::Ten => PerPage::Twenty,
            PerPage::Twenty => PerPage::Fifty,
            PerPage::Fifty => PerPage::Ten,
        }
    }
}

impl FromStr for PerPage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "10" => Ok(Self::Ten),
            "20" => Ok(Self::Twenty),
            "50" => Ok(Self::Fifty),
            _ => Err(format!("Unknown page size: {value} (expected 10, 20 or 50)")),
        }
    }
}

/// Column the listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Name,
    Email,
    Phone,
    Status,
}

impl SortBy {
    /// Value sent in the `sortBy` query parameter.
    pub fn wire_name(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Email => "email",
            SortBy::Phone => "phone",
            SortBy::Status => "status",
        }
    }

    /// Next column, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            SortBy::Name => SortBy::Email,
            SortBy::Email => SortBy::Phone,
            SortBy::Phone => SortBy::Status,
            SortBy::Status => SortBy::Name,
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "status" => Ok(Self::Status),
            _ => Err(format!(
                "Unknown sort column: {value} (expected name, email, phone or status)"
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Value sent in the `sortOrder` query parameter.
    pub fn wire_name(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {value} (expected asc or desc)")),
        }
    }
}

/// Complete query for one page of the leads listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: PerPage,
    /// Free-text filter over name, email and phone. Empty means no filter.
    pub search: String,
    /// Restrict to a single status id, if set.
    pub status: Option<u64>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: PerPage::default(),
            search: String::new(),
            status: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ListQuery {
    /// Query-string pairs understood by the leads index endpoint.
    ///
    /// `search` and `status` are omitted entirely when unset; the rest are
    /// always sent.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("perPage", self.per_page.as_u32().to_string()),
            ("sortBy", self.sort_by.wire_name().to_string()),
            ("sortOrder", self.sort_order.wire_name().to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

/// Partial update to a [`ListQuery`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct QueryPatch {
    pub per_page: Option<PerPage>,
    pub search: Option<String>,
    /// `Some(None)` clears the status filter.
    pub status: Option<Option<u64>>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl QueryPatch {
    /// Applies the patch. Returns true if anything actually changed.
    fn apply(self, query: &mut ListQuery) -> bool {
        let mut changed = false;

        if let Some(per_page) = self.per_page
            && per_page != query.per_page
        {
            query.per_page = per_page;
            changed = true;
        }
        if let Some(search) = self.search
            && search != query.search
        {
            query.search = search;
            changed = true;
        }
        if let Some(status) = self.status
            && status != query.status
        {
            query.status = status;
            changed = true;
        }
        if let Some(sort_by) = self.sort_by
            && sort_by != query.sort_by
        {
            query.sort_by = sort_by;
            changed = true;
        }
        if let Some(sort_order) = self.sort_order
            && sort_order != query.sort_order
        {
            query.sort_order = sort_order;
            changed = true;
        }

        changed
    }
}

/// Identifies one fetch so late results can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchId(u64);

/// Tracks the newest in-flight fetch. Older fetches are superseded, not
/// cancelled: their results are simply dropped on arrival.
#[derive(Debug, Default)]
struct FetchSeq {
    next: u64,
    active: Option<FetchId>,
}

impl FetchSeq {
    /// Starts a new fetch, superseding any active one.
    fn begin(&mut self) -> FetchId {
        let id = FetchId(self.next);
        self.next += 1;
        self.active = Some(id);
        id
    }

    /// Clears the active fetch if `id` is still the newest one.
    /// Returns false for superseded fetches.
    fn finish_if_active(&mut self, id: FetchId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

/// A fetch the caller must run; the id labels its eventual result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStart {
    pub id: FetchId,
    pub query: ListQuery,
}

/// Pageable, filterable view over the leads collection.
#[derive(Debug)]
pub struct LeadBrowser {
    query: ListQuery,
    rows: Vec<Lead>,
    total_pages: u32,
    loading: bool,
    seq: FetchSeq,
}

impl Default for LeadBrowser {
    fn default() -> Self {
        Self {
            query: ListQuery::default(),
            rows: Vec::new(),
            total_pages: 1,
            loading: false,
            seq: FetchSeq::default(),
        }
    }
}

impl LeadBrowser {
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn rows(&self) -> &[Lead] {
        &self.rows
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts a fetch for the current query, superseding any in-flight one.
    pub fn refetch(&mut self) -> FetchStart {
        self.loading = true;
        FetchStart {
            id: self.seq.begin(),
            query: self.query.clone(),
        }
    }

    /// Applies a filter patch and refetches.
    ///
    /// Any real change jumps back to page 1; filtered results rarely line up
    /// with the old page. A no-op patch keeps the page and acts as a refresh.
    pub fn set_filter(&mut self, patch: QueryPatch) -> FetchStart {
        if patch.apply(&mut self.query) {
            self.query.page = 1;
        }
        self.refetch()
    }

    /// Moves to another page. Out-of-range targets and the current page are
    /// ignored.
    pub fn set_page(&mut self, page: u32) -> Option<FetchStart> {
        if page < 1 || page > self.total_pages || page == self.query.page {
            return None;
        }
        self.query.page = page;
        Some(self.refetch())
    }

    pub fn next_page(&mut self) -> Option<FetchStart> {
        self.set_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> Option<FetchStart> {
        self.set_page(self.query.page.saturating_sub(1))
    }

    /// Applies a completed fetch. Superseded results are dropped entirely.
    ///
    /// When the backend reports fewer pages than the query asked for (rows
    /// deleted, filter narrowed), the page is clamped and a follow-up fetch
    /// for the clamped page is returned.
    pub fn apply_page(&mut self, id: FetchId, page: LeadPage) -> Option<FetchStart> {
        if !self.seq.finish_if_active(id) {
            return None;
        }

        self.loading = false;
        self.rows = page.data;
        self.total_pages = page.last_page.max(1);

        if self.query.page > self.total_pages {
            self.query.page = self.total_pages;
            return Some(self.refetch());
        }
        None
    }

    /// Notes a failed fetch. Superseded errors are dropped; current rows are
    /// kept so the user still sees the last good data.
    ///
    /// Returns true when the error belongs to the newest fetch and should be
    /// surfaced.
    pub fn apply_error(&mut self, id: FetchId) -> bool {
        if !self.seq.finish_if_active(id) {
            return false;
        }
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: u64, name: &str) -> Lead {
        Lead {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            phone: None,
            lead_status_id: None,
            status: None,
        }
    }

    fn page_of(rows: Vec<Lead>, last_page: u32) -> LeadPage {
        LeadPage {
            data: rows,
            last_page,
        }
    }

    /// A fresh browser shows page 1 of 1 with nothing loaded.
    #[test]
    fn test_default_browser() {
        let browser = LeadBrowser::default();
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.total_pages(), 1);
        assert!(browser.rows().is_empty());
        assert!(!browser.is_loading());
    }

    /// refetch marks the browser loading and hands out distinct ids.
    #[test]
    fn test_refetch_marks_loading() {
        let mut browser = LeadBrowser::default();

        let first = browser.refetch();
        assert!(browser.is_loading());

        let second = browser.refetch();
        assert_ne!(first.id, second.id);
    }

    /// Changing a filter resets to page 1.
    #[test]
    fn test_filter_change_resets_page() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();
        browser.apply_page(start.id, page_of(vec![lead(1, "ada")], 5));
        browser.set_page(3);

        browser.set_filter(QueryPatch {
            search: Some("smith".to_string()),
            ..QueryPatch::default()
        });

        assert_eq!(browser.page(), 1);
        assert_eq!(browser.query().search, "smith");
    }

    /// A patch that changes nothing keeps the page but still refetches.
    #[test]
    fn test_noop_filter_keeps_page() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();
        browser.apply_page(start.id, page_of(vec![lead(1, "ada")], 5));
        browser.set_page(3);
        let before = browser.page();

        let start = browser.set_filter(QueryPatch::default());
        assert_eq!(browser.page(), before);
        assert_eq!(start.query.page, before);
        assert!(browser.is_loading());
    }

    /// set_page rejects out-of-range targets and the current page.
    #[test]
    fn test_set_page_bounds() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();
        browser.apply_page(start.id, page_of(vec![lead(1, "ada")], 3));

        assert!(browser.set_page(0).is_none());
        assert!(browser.set_page(4).is_none());
        assert!(browser.set_page(1).is_none()); // already there

        let start = browser.set_page(2).unwrap();
        assert_eq!(start.query.page, 2);
        assert_eq!(browser.page(), 2);
    }

    /// prev_page at the first page does nothing.
    #[test]
    fn test_prev_page_at_first() {
        let mut browser = LeadBrowser::default();
        assert!(browser.prev_page().is_none());
    }

    /// A completed fetch replaces rows and updates the page count.
    #[test]
    fn test_apply_page_replaces_rows() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();

        let follow_up = browser.apply_page(start.id, page_of(vec![lead(1, "ada"), lead(2, "bob")], 7));

        assert!(follow_up.is_none());
        assert!(!browser.is_loading());
        assert_eq!(browser.rows().len(), 2);
        assert_eq!(browser.total_pages(), 7);
    }

    /// A superseded fetch result is dropped: newer fetch stays in flight.
    #[test]
    fn test_stale_page_is_dropped() {
        let mut browser = LeadBrowser::default();
        let old = browser.refetch();
        let new = browser.refetch();

        let follow_up = browser.apply_page(old.id, page_of(vec![lead(1, "stale")], 9));
        assert!(follow_up.is_none());
        assert!(browser.rows().is_empty());
        assert!(browser.is_loading());
        assert_eq!(browser.total_pages(), 1);

        browser.apply_page(new.id, page_of(vec![lead(2, "fresh")], 2));
        assert_eq!(browser.rows()[0].name, "fresh");
        assert_eq!(browser.total_pages(), 2);
        assert!(!browser.is_loading());
    }

    /// When the result shows fewer pages than requested, clamp and refetch.
    #[test]
    fn test_apply_page_clamps_and_refetches() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();
        browser.apply_page(start.id, page_of(vec![lead(1, "ada")], 5));

        let start = browser.set_page(5).unwrap();
        // Rows were deleted meanwhile; the collection now has 2 pages.
        let follow_up = browser
            .apply_page(start.id, page_of(vec![], 2))
            .expect("page beyond the new total must trigger a follow-up fetch");

        assert_eq!(browser.page(), 2);
        assert_eq!(follow_up.query.page, 2);
        assert!(browser.is_loading());
    }

    /// A backend page count of zero still leaves one (empty) page.
    #[test]
    fn test_empty_collection_has_one_page() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();

        browser.apply_page(start.id, page_of(vec![], 0));

        assert_eq!(browser.total_pages(), 1);
        assert_eq!(browser.page(), 1);
    }

    /// Errors keep the previous rows visible.
    #[test]
    fn test_apply_error_keeps_rows() {
        let mut browser = LeadBrowser::default();
        let start = browser.refetch();
        browser.apply_page(start.id, page_of(vec![lead(1, "ada")], 1));

        let start = browser.refetch();
        assert!(browser.apply_error(start.id));
        assert!(!browser.is_loading());
        assert_eq!(browser.rows().len(), 1);
    }

    /// Superseded errors are not surfaced.
    #[test]
    fn test_stale_error_is_dropped() {
        let mut browser = LeadBrowser::default();
        let old = browser.refetch();
        let _new = browser.refetch();

        assert!(!browser.apply_error(old.id));
        assert!(browser.is_loading());
    }

    /// Patch application reports whether anything changed.
    #[test]
    fn test_query_patch_change_detection() {
        let mut query = ListQuery::default();

        assert!(!QueryPatch::default().apply(&mut query));
        assert!(
            !QueryPatch {
                search: Some(String::new()),
                ..QueryPatch::default()
            }
            .apply(&mut query)
        );

        assert!(
            QueryPatch {
                status: Some(Some(3)),
                ..QueryPatch::default()
            }
            .apply(&mut query)
        );
        assert_eq!(query.status, Some(3));

        assert!(
            QueryPatch {
                status: Some(None),
                ..QueryPatch::default()
            }
            .apply(&mut query)
        );
        assert_eq!(query.status, None);
    }

    /// Wire pairs: optional parameters are omitted when unset.
    #[test]
    fn test_query_pairs_defaults() {
        let query = ListQuery::default();
        let pairs = query.to_query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("perPage", "10".to_string()),
                ("sortBy", "name".to_string()),
                ("sortOrder", "asc".to_string()),
            ]
        );
    }

    /// Wire pairs: search and status appear once set.
    #[test]
    fn test_query_pairs_with_filters() {
        let query = ListQuery {
            page: 2,
            per_page: PerPage::Fifty,
            search: "smith".to_string(),
            status: Some(4),
            sort_by: SortBy::Email,
            sort_order: SortOrder::Desc,
        };
        let pairs = query.to_query_pairs();

        assert!(pairs.contains(&("page", "2".to_string())));
        assert!(pairs.contains(&("perPage", "50".to_string())));
        assert!(pairs.contains(&("sortBy", "email".to_string())));
        assert!(pairs.contains(&("sortOrder", "desc".to_string())));
        assert!(pairs.contains(&("search", "smith".to_string())));
        assert!(pairs.contains(&("status", "4".to_string())));
    }

    /// Cycling helpers wrap around.
    #[test]
    fn test_cycles_wrap() {
        assert_eq!(PerPage::Fifty.cycle(), PerPage::Ten);
        assert_eq!(SortBy::Status.cycle(), SortBy::Name);
        assert_eq!(SortOrder::Desc.toggle(), SortOrder::Asc);
    }

    /// FromStr parses the CLI spellings.
    #[test]
    fn test_from_str() {
        assert_eq!("20".parse::<PerPage>().unwrap(), PerPage::Twenty);
        assert!("15".parse::<PerPage>().is_err());
        assert_eq!("status".parse::<SortBy>().unwrap(), SortBy::Status);
        assert!("id".parse::<SortBy>().is_err());
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("down".parse::<SortOrder>().is_err());
    }
}
