use crate::error::SourceError;
use crate::models::Property;
use crate::sources::traits::PropertySource;
use crate::sources::types::{ensure_unique_ids, FetchPage};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Table queried when none is configured
pub const DEFAULT_TABLE: &str = "properties";

/// Reads listings from the hosted backend's REST table endpoint.
pub struct RestSource {
    client: Client,
    base_url: String,
    table: String,
}

impl RestSource {
    /// Create a source for `table` under `base_url`, authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| SourceError::Other(format!("invalid API key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SourceError::Other(format!("invalid API key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("prefer", HeaderValue::from_static("count=exact"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
        })
    }

    /// URL for one capped, newest-first read of the table
    fn table_url(&self, limit: usize) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=created_at.desc&limit={}",
            self.base_url, self.table, limit
        )
    }
}

/// Total row count from a `Content-Range` header such as `0-9/42`.
///
/// Returns `None` when the total is unknown (`*`) or the header is malformed.
pub fn parse_content_range(value: &str) -> Option<usize> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[async_trait]
impl PropertySource for RestSource {
    async fn fetch(&self, limit: usize) -> Result<FetchPage, SourceError> {
        let url = self.table_url(limit);
        debug!("Fetching URL: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Listings backend returned status: {}", status);
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);

        let body = response.text().await?;
        debug!("Downloaded {} bytes of listings", body.len());

        let records: Vec<Property> = serde_json::from_str(&body)?;
        ensure_unique_ids(&records)?;

        let count = total.unwrap_or(records.len());
        info!("Fetched {} of {} listings from {}", records.len(), count, self.table);

        Ok(FetchPage::new(records, count))
    }

    fn source_name(&self) -> &'static str {
        "rest"
    }
}
