//! Client-side store for real-estate listings: fetch from a backend, filter,
//! paginate and cache, all through a single reducer.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod sources;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use controller::{ControllerOptions, PropertiesController};
pub use error::SourceError;
pub use filters::{filter_properties, matches, PropertyFilters};
pub use models::{Location, Price, Property, PropertyStatus};
pub use pagination::paginate;
pub use sources::{FetchPage, PropertySource};
pub use store::{reduce, PropertiesAction, PropertiesState};
