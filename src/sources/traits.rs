use crate::error::SourceError;
use crate::sources::types::FetchPage;
use async_trait::async_trait;

/// Common trait for everything that can hand the store a batch of listings.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch at most `limit` records plus the source's total count
    async fn fetch(&self, limit: usize) -> Result<FetchPage, SourceError>;

    /// Get the name of the source, for logging
    fn source_name(&self) -> &'static str;
}
