use crate::filters::{filter_properties, PropertyFilters};
use crate::models::Property;
use crate::pagination::{page_count, paginate};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Page size used when none is configured
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;
/// How long a fetch stays fresh when none is configured
pub const DEFAULT_CACHE_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// Everything the store knows about the listings it has fetched.
///
/// Only the reducer mutates this; readers get clones.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertiesState {
    /// Unfiltered records from the last successful fetch, in source order
    pub properties: Vec<Property>,
    /// The visible page after filtering and pagination
    pub filtered_properties: Vec<Property>,
    /// Total reported by the source; may exceed `properties.len()`
    pub all_properties_count: usize,
    pub loading: bool,
    pub filtering: bool,
    pub error: Option<String>,
    /// 1-based
    pub current_page: usize,
    pub items_per_page: usize,
    /// Set when the visible page is exactly full. This is a heuristic: it
    /// stays true on a full last page.
    pub has_more: bool,
    pub filters: PropertyFilters,
    /// True while `filtered_properties` still reflects the filters in place
    /// before the last `SetFilters`. Cleared by any recompute of the page.
    pub filters_pending: bool,
    /// Length of the full filtered list behind the visible page
    pub filtered_count: usize,
    pub last_fetch_time: Option<DateTime<Utc>>,
    pub cache_expiry: Duration,
    default_items_per_page: usize,
}

impl Default for PropertiesState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE, DEFAULT_CACHE_EXPIRY)
    }
}

impl PropertiesState {
    pub fn new(items_per_page: usize, cache_expiry: Duration) -> Self {
        Self {
            properties: Vec::new(),
            filtered_properties: Vec::new(),
            all_properties_count: 0,
            loading: false,
            filtering: false,
            error: None,
            current_page: 1,
            items_per_page,
            has_more: false,
            filters: PropertyFilters::default(),
            filters_pending: false,
            filtered_count: 0,
            last_fetch_time: None,
            cache_expiry,
            default_items_per_page: items_per_page,
        }
    }

    /// Start from an already known list, showing its first page.
    pub fn seeded(
        properties: Vec<Property>,
        items_per_page: usize,
        cache_expiry: Duration,
    ) -> Self {
        let mut state = Self::new(items_per_page, cache_expiry);
        state.all_properties_count = properties.len();
        state.properties = properties;
        state.refresh_visible_page();
        state
    }

    /// Fresh state with the same configured page size and cache expiry
    pub(crate) fn reset(&self) -> Self {
        Self::new(self.default_items_per_page, self.cache_expiry)
    }

    /// Re-run filter and pagination over the full record list.
    ///
    /// The page then reflects the current filters, so nothing is pending.
    pub(crate) fn refresh_visible_page(&mut self) {
        let filtered = filter_properties(&self.properties, &self.filters);
        self.show_page_of(&filtered);
        self.filters_pending = false;
    }

    /// Show the current page of an already filtered list.
    pub(crate) fn show_page_of(&mut self, filtered: &[Property]) {
        self.filtered_count = filtered.len();
        self.filtered_properties =
            paginate(filtered, self.current_page, self.items_per_page).to_vec();
        self.has_more = self.filtered_properties.len() == self.items_per_page;
    }

    /// Pages over the unfiltered list, matching what pagination controls show
    pub fn total_pages(&self) -> usize {
        page_count(self.properties.len(), self.items_per_page)
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Pages over the filtered list
    pub fn filtered_total_pages(&self) -> usize {
        page_count(self.filtered_count, self.items_per_page)
    }

    /// Exact "another page exists" signal, unlike `has_more`
    pub fn has_next_page(&self) -> bool {
        self.current_page.saturating_mul(self.items_per_page) < self.filtered_count
    }

    /// Whether a fetch at `now` may reuse the records already held
    pub fn is_cache_valid(&self, now: DateTime<Utc>) -> bool {
        let Some(fetched_at) = self.last_fetch_time else {
            return false;
        };
        match (now - fetched_at).to_std() {
            Ok(age) => age < self.cache_expiry,
            // fetched_at lies in the future; treat as just fetched
            Err(_) => true,
        }
    }
}
