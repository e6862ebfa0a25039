use crate::filters::PropertyFilters;
use crate::models::Property;
use chrono::{DateTime, Utc};

/// Every transition the properties reducer understands.
///
/// Any action may be dispatched from any state.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    FetchStart,
    FetchSuccess {
        properties: Vec<Property>,
        count: usize,
        fetched_at: DateTime<Utc>,
    },
    FetchError(String),
    /// Replaces the filter set and rewinds to page 1. The visible page stays
    /// stale until a matching `ApplyFiltersSuccess` arrives.
    SetFilters(PropertyFilters),
    ApplyFiltersStart,
    /// Carries the full filtered list; the reducer paginates it.
    ApplyFiltersSuccess(Vec<Property>),
    ClearFilters,
    SetPage(usize),
    SetItemsPerPage(usize),
    /// Forgets the last fetch time so the cache reads as stale.
    Refresh,
    ClearError,
    ResetState,
}

impl PropertiesAction {
    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchStart => "FETCH_START",
            Self::FetchSuccess { .. } => "FETCH_SUCCESS",
            Self::FetchError(_) => "FETCH_ERROR",
            Self::SetFilters(_) => "SET_FILTERS",
            Self::ApplyFiltersStart => "APPLY_FILTERS_START",
            Self::ApplyFiltersSuccess(_) => "APPLY_FILTERS_SUCCESS",
            Self::ClearFilters => "CLEAR_FILTERS",
            Self::SetPage(_) => "SET_PAGE",
            Self::SetItemsPerPage(_) => "SET_ITEMS_PER_PAGE",
            Self::Refresh => "REFRESH",
            Self::ClearError => "CLEAR_ERROR",
            Self::ResetState => "RESET_STATE",
        }
    }
}
