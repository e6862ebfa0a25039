pub mod actions;
pub mod reducer;
pub mod state;

pub use actions::PropertiesAction;
pub use reducer::reduce;
pub use state::{PropertiesState, DEFAULT_CACHE_EXPIRY, DEFAULT_ITEMS_PER_PAGE};
