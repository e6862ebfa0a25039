use super::actions::PropertiesAction;
use super::state::PropertiesState;
use crate::filters::PropertyFilters;

/// Pure transition function: consume a state and an action, return the next state.
pub fn reduce(mut state: PropertiesState, action: PropertiesAction) -> PropertiesState {
    state.apply(action);
    state
}

impl PropertiesState {
    /// Apply one action in place. Never fails; every action is valid in every state.
    pub fn apply(&mut self, action: PropertiesAction) {
        match action {
            PropertiesAction::FetchStart => {
                self.loading = true;
                self.error = None;
            }
            PropertiesAction::FetchSuccess {
                properties,
                count,
                fetched_at,
            } => {
                self.properties = properties;
                self.refresh_visible_page();
                self.all_properties_count = count;
                self.loading = false;
                self.error = None;
                self.last_fetch_time = Some(fetched_at);
            }
            PropertiesAction::FetchError(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            PropertiesAction::SetFilters(filters) => {
                self.filters = filters;
                self.current_page = 1;
                self.filters_pending = true;
            }
            PropertiesAction::ApplyFiltersStart => {
                self.filtering = true;
                self.error = None;
            }
            PropertiesAction::ApplyFiltersSuccess(filtered) => {
                self.show_page_of(&filtered);
                self.filtering = false;
                self.filters_pending = false;
            }
            PropertiesAction::ClearFilters => {
                self.filters = PropertyFilters::default();
                self.current_page = 1;
                // a superseded apply never reports back
                self.filtering = false;
                self.refresh_visible_page();
            }
            PropertiesAction::SetPage(page) => {
                self.current_page = page;
                self.refresh_visible_page();
            }
            PropertiesAction::SetItemsPerPage(items_per_page) => {
                self.items_per_page = items_per_page;
                self.refresh_visible_page();
            }
            PropertiesAction::Refresh => {
                self.last_fetch_time = None;
            }
            PropertiesAction::ClearError => {
                self.error = None;
            }
            PropertiesAction::ResetState => {
                *self = self.reset();
            }
        }
    }
}
