use crate::sources::rest::DEFAULT_TABLE;
use crate::sources::DEFAULT_FETCH_LIMIT;
use crate::store::{DEFAULT_CACHE_EXPIRY, DEFAULT_ITEMS_PER_PAGE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime settings for the listings store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the hosted backend; no REST source without it
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    /// JSON file of listings to use instead of the backend
    pub seed_file: Option<PathBuf>,
    pub fetch_limit: usize,
    pub items_per_page: usize,
    pub cache_expiry_ms: u64,
    pub auto_fetch: bool,
    pub filter_debounce_ms: u64,
    pub filter_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            seed_file: None,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            cache_expiry_ms: DEFAULT_CACHE_EXPIRY.as_millis() as u64,
            auto_fetch: true,
            filter_debounce_ms: 100,
            filter_delay_ms: 300,
        }
    }
}

impl StoreConfig {
    /// Read `LISTINGS_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("LISTINGS_API_URL") {
            config.api_url = Some(url);
        }
        if let Some(key) = lookup("LISTINGS_API_KEY") {
            config.api_key = Some(key);
        }
        if let Some(table) = lookup("LISTINGS_TABLE") {
            config.table = table;
        }
        if let Some(path) = lookup("LISTINGS_SEED_FILE") {
            config.seed_file = Some(PathBuf::from(path));
        }
        if let Some(limit) = parse_var(&lookup, "LISTINGS_FETCH_LIMIT")? {
            config.fetch_limit = limit;
        }
        if let Some(per_page) = parse_var(&lookup, "LISTINGS_ITEMS_PER_PAGE")? {
            config.items_per_page = per_page;
        }
        if let Some(expiry) = parse_var(&lookup, "LISTINGS_CACHE_EXPIRY_MS")? {
            config.cache_expiry_ms = expiry;
        }
        if let Some(value) = lookup("LISTINGS_AUTO_FETCH") {
            config.auto_fetch = parse_bool(&value)
                .with_context(|| format!("invalid LISTINGS_AUTO_FETCH: {value}"))?;
        }
        if let Some(debounce) = parse_var(&lookup, "LISTINGS_FILTER_DEBOUNCE_MS")? {
            config.filter_debounce_ms = debounce;
        }
        if let Some(delay) = parse_var(&lookup, "LISTINGS_FILTER_DELAY_MS")? {
            config.filter_delay_ms = delay;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.items_per_page == 0 {
            anyhow::bail!("items_per_page must be at least 1");
        }
        if self.fetch_limit == 0 {
            anyhow::bail!("fetch_limit must be at least 1");
        }
        if self.api_url.is_some() && self.api_key.is_none() {
            anyhow::bail!("LISTINGS_API_KEY is required when LISTINGS_API_URL is set");
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("invalid {key}: {raw}")))
        .transpose()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
