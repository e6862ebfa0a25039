pub mod file;
pub mod memory;
pub mod rest;
pub mod sample;
pub mod traits;
pub mod types;

pub use file::JsonFileSource;
pub use memory::MemorySource;
pub use rest::RestSource;
pub use sample::sample_properties;
pub use traits::PropertySource;
pub use types::{FetchPage, DEFAULT_FETCH_LIMIT};
