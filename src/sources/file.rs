use crate::error::SourceError;
use crate::models::Property;
use crate::sources::traits::PropertySource;
use crate::sources::types::{ensure_unique_ids, FetchPage};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Reads a JSON array of listings from disk on every fetch.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PropertySource for JsonFileSource {
    async fn fetch(&self, limit: usize) -> Result<FetchPage, SourceError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let mut records: Vec<Property> = serde_json::from_str(&json)?;
        ensure_unique_ids(&records)?;

        let count = records.len();
        records.truncate(limit);
        info!("Loaded {} of {} listings from {}", records.len(), count, self.path.display());

        Ok(FetchPage::new(records, count))
    }

    fn source_name(&self) -> &'static str {
        "json-file"
    }
}
