//! Binds the properties reducer to a [`PropertySource`].
//!
//! The controller owns one [`PropertiesState`], applies every action under a
//! single async lock, and drives the delayed filter application on a spawned
//! task. Fetches and filter applications carry a generation token; results
//! from a superseded or closed generation are dropped instead of applied.

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::filters::{filter_properties, PropertyFilters};
use crate::models::Property;
use crate::sources::{PropertySource, DEFAULT_FETCH_LIMIT};
use crate::store::{
    PropertiesAction, PropertiesState, DEFAULT_CACHE_EXPIRY, DEFAULT_ITEMS_PER_PAGE,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message stored when a source fails without saying why
pub const FETCH_ERROR_FALLBACK: &str = "Failed to fetch properties";

/// Tuning for a [`PropertiesController`]
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub fetch_limit: usize,
    pub items_per_page: usize,
    pub cache_expiry: Duration,
    /// Fetch on [`PropertiesController::start`] when the cache is stale
    pub auto_fetch: bool,
    /// Wait between `SetFilters` and `ApplyFiltersStart`
    pub filter_debounce: Duration,
    /// Wait between `ApplyFiltersStart` and `ApplyFiltersSuccess`
    pub filter_delay: Duration,
    /// Records shown before the first fetch
    pub initial_properties: Vec<Property>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            fetch_limit: DEFAULT_FETCH_LIMIT,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            cache_expiry: DEFAULT_CACHE_EXPIRY,
            auto_fetch: true,
            filter_debounce: Duration::from_millis(100),
            filter_delay: Duration::from_millis(300),
            initial_properties: Vec::new(),
        }
    }
}

impl From<&StoreConfig> for ControllerOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            fetch_limit: config.fetch_limit,
            items_per_page: config.items_per_page,
            cache_expiry: Duration::from_millis(config.cache_expiry_ms),
            auto_fetch: config.auto_fetch,
            filter_debounce: Duration::from_millis(config.filter_debounce_ms),
            filter_delay: Duration::from_millis(config.filter_delay_ms),
            initial_properties: Vec::new(),
        }
    }
}

/// Imperative front end over the properties reducer.
pub struct PropertiesController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<PropertiesState>,
    source: Arc<dyn PropertySource>,
    clock: Arc<dyn Clock>,
    fetch_limit: usize,
    auto_fetch: bool,
    filter_debounce: Duration,
    filter_delay: Duration,
    fetch_generation: AtomicU64,
    filter_generation: AtomicU64,
    filter_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl PropertiesController {
    pub fn new(source: Arc<dyn PropertySource>, options: ControllerOptions) -> Self {
        Self::with_clock(source, options, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn PropertySource>,
        options: ControllerOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = if options.initial_properties.is_empty() {
            PropertiesState::new(options.items_per_page, options.cache_expiry)
        } else {
            PropertiesState::seeded(
                options.initial_properties,
                options.items_per_page,
                options.cache_expiry,
            )
        };

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                source,
                clock,
                fetch_limit: options.fetch_limit,
                auto_fetch: options.auto_fetch,
                filter_debounce: options.filter_debounce,
                filter_delay: options.filter_delay,
                fetch_generation: AtomicU64::new(0),
                filter_generation: AtomicU64::new(0),
                filter_task: std::sync::Mutex::new(None),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Fetch once if auto-fetch is on and the cache is stale.
    pub async fn start(&self) {
        if self.inner.auto_fetch && !self.is_cache_valid().await {
            self.fetch_properties().await;
        }
    }

    /// Load listings from the source unless the cache is still fresh.
    ///
    /// A call made while another fetch is in flight does nothing.
    pub async fn fetch_properties(&self) {
        self.inner.fetch(false).await;
    }

    /// Drop the cache and fetch again, superseding any fetch in flight.
    pub async fn refresh(&self) {
        self.inner.dispatch(PropertiesAction::Refresh).await;
        self.inner.fetch(true).await;
    }

    /// Replace the filters and apply them after the configured delays.
    ///
    /// Until the apply lands, `filters_pending` is set and the visible page
    /// still reflects the previous filters.
    pub async fn set_filters(&self, filters: PropertyFilters) {
        // token order must match the order the filters land in the state
        let token = {
            let mut state = self.inner.state.lock().await;
            let token = self.inner.supersede_filters();
            Inner::apply(&mut state, PropertiesAction::SetFilters(filters));
            token
        };

        if self.inner.is_closed() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.apply_filters(token).await });

        let mut slot = lock_task(&self.inner.filter_task);
        if self.inner.filter_generation.load(Ordering::SeqCst) != token {
            // a newer change already owns the slot
            task.abort();
            return;
        }
        *slot = Some(task);
    }

    /// Replace the filters and recompute the visible page right away.
    pub async fn set_filters_now(&self, filters: PropertyFilters) {
        let mut state = self.inner.state.lock().await;
        self.inner.supersede_filters();
        Inner::apply(&mut state, PropertiesAction::SetFilters(filters));
        let filtered = filter_properties(&state.properties, &state.filters);
        Inner::apply(&mut state, PropertiesAction::ApplyFiltersSuccess(filtered));
    }

    /// Wait for a pending delayed filter application, if any.
    pub async fn settle(&self) {
        let task = lock_task(&self.inner.filter_task).take();
        if let Some(task) = task {
            // an aborted task just means a newer change took over
            let _ = task.await;
        }
    }

    pub async fn clear_filters(&self) {
        self.inner.supersede_filters();
        self.inner.dispatch(PropertiesAction::ClearFilters).await;
    }

    pub async fn set_page(&self, page: usize) {
        self.inner.dispatch(PropertiesAction::SetPage(page)).await;
    }

    pub async fn set_items_per_page(&self, items_per_page: usize) {
        self.inner
            .dispatch(PropertiesAction::SetItemsPerPage(items_per_page))
            .await;
    }

    pub async fn clear_error(&self) {
        self.inner.dispatch(PropertiesAction::ClearError).await;
    }

    /// Back to the initial empty state; pending fetches and filter
    /// applications are discarded.
    pub async fn reset(&self) {
        self.inner.fetch_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.supersede_filters();
        self.inner.dispatch(PropertiesAction::ResetState).await;
    }

    /// Stop applying anything still in flight. Later fetches are no-ops.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> PropertiesState {
        self.inner.state.lock().await.clone()
    }

    /// The visible page
    pub async fn visible_properties(&self) -> Vec<Property> {
        self.inner.state.lock().await.filtered_properties.clone()
    }

    pub async fn is_cache_valid(&self) -> bool {
        let now = self.inner.clock.now();
        self.inner.state.lock().await.is_cache_valid(now)
    }

    pub async fn total_pages(&self) -> usize {
        self.inner.state.lock().await.total_pages()
    }

    pub async fn can_go_next(&self) -> bool {
        self.inner.state.lock().await.can_go_next()
    }

    pub async fn can_go_previous(&self) -> bool {
        self.inner.state.lock().await.can_go_previous()
    }

    pub fn source_name(&self) -> &'static str {
        self.inner.source.source_name()
    }
}

impl Drop for PropertiesController {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl Inner {
    fn apply(state: &mut PropertiesState, action: PropertiesAction) {
        debug!(action = action.name(), "dispatch");
        state.apply(action);
    }

    async fn dispatch(&self, action: PropertiesAction) {
        let mut state = self.state.lock().await;
        Self::apply(&mut state, action);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.fetch_generation.fetch_add(1, Ordering::SeqCst);
        self.supersede_filters();
    }

    /// Invalidate any pending filter application and return the new token.
    ///
    /// The generation only moves while the task slot is held, so a handle
    /// stored under a matching generation always belongs to the newest change.
    fn supersede_filters(&self) -> u64 {
        let mut slot = lock_task(&self.filter_task);
        let token = self.filter_generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = slot.take() {
            task.abort();
        }
        token
    }

    fn is_current_filter(&self, token: u64) -> bool {
        !self.is_closed() && self.filter_generation.load(Ordering::SeqCst) == token
    }

    fn is_current_fetch(&self, token: u64) -> bool {
        !self.is_closed() && self.fetch_generation.load(Ordering::SeqCst) == token
    }

    async fn fetch(&self, force: bool) {
        if self.is_closed() {
            return;
        }

        let token = {
            let mut state = self.state.lock().await;
            if state.is_cache_valid(self.clock.now()) && !state.properties.is_empty() {
                debug!("Cache still valid, skipping fetch");
                return;
            }
            if state.loading && !force {
                debug!("Fetch already in flight, skipping");
                return;
            }
            let token = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;
            Self::apply(&mut state, PropertiesAction::FetchStart);
            token
        };

        info!(
            "Fetching up to {} listings from {}",
            self.fetch_limit,
            self.source.source_name()
        );
        let result = self.source.fetch(self.fetch_limit).await;

        let mut state = self.state.lock().await;
        if !self.is_current_fetch(token) {
            debug!("Discarding superseded fetch result");
            return;
        }

        match result {
            Ok(page) => {
                info!("Fetched {} listings ({} at source)", page.records.len(), page.count);
                Self::apply(
                    &mut state,
                    PropertiesAction::FetchSuccess {
                        properties: page.records,
                        count: page.count,
                        fetched_at: self.clock.now(),
                    },
                );
            }
            Err(err) => {
                warn!("Fetch from {} failed: {}", self.source.source_name(), err);
                let message = err.to_string();
                let message = if message.is_empty() {
                    FETCH_ERROR_FALLBACK.to_string()
                } else {
                    message
                };
                Self::apply(&mut state, PropertiesAction::FetchError(message));
            }
        }
    }

    async fn apply_filters(&self, token: u64) {
        tokio::time::sleep(self.filter_debounce).await;
        {
            let mut state = self.state.lock().await;
            if !self.is_current_filter(token) {
                return;
            }
            Self::apply(&mut state, PropertiesAction::ApplyFiltersStart);
        }

        tokio::time::sleep(self.filter_delay).await;

        let mut state = self.state.lock().await;
        if !self.is_current_filter(token) {
            return;
        }
        let filtered = filter_properties(&state.properties, &state.filters);
        debug!("{} of {} listings match filters", filtered.len(), state.properties.len());
        Self::apply(&mut state, PropertiesAction::ApplyFiltersSuccess(filtered));
    }
}

fn lock_task(
    slot: &std::sync::Mutex<Option<JoinHandle<()>>>,
) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
