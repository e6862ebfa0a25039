use crate::error::SourceError;
use crate::models::Property;
use crate::sources::traits::PropertySource;
use crate::sources::types::{ensure_unique_ids, FetchPage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Serves listings held in memory. Used for seeded demos and tests.
pub struct MemorySource {
    records: Mutex<Vec<Property>>,
    reported_count: Option<usize>,
    failure: Mutex<Option<String>>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(records: Vec<Property>) -> Self {
        Self {
            records: Mutex::new(records),
            reported_count: None,
            failure: Mutex::new(None),
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Report `count` as the source total instead of the record count
    pub fn with_count(mut self, count: usize) -> Self {
        self.reported_count = Some(count);
        self
    }

    /// Sleep this long before answering each fetch
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every following fetch fail with `message`, or succeed again with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *lock(&self.failure) = message.map(str::to_string);
    }

    /// Swap the served records
    pub fn set_records(&self, records: Vec<Property>) {
        *lock(&self.records) = records;
    }

    /// Number of fetches served so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

// A poisoned lock only means a test panicked mid-update; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl PropertySource for MemorySource {
    async fn fetch(&self, limit: usize) -> Result<FetchPage, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Memory fetch #{} (limit {})", call, limit);

        // answer with what was held when the request arrived
        let records = lock(&self.records).clone();
        let failure = lock(&self.failure).clone();

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = failure {
            return Err(SourceError::Other(message));
        }
        ensure_unique_ids(&records)?;

        let count = self.reported_count.unwrap_or(records.len());
        let page = records.into_iter().take(limit).collect();
        Ok(FetchPage::new(page, count))
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}
