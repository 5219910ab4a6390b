use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::store::KeyValueStore;

/// Cache with implicit daily expiry.
///
/// Entries are stored under `"{base}:{YYYY-MM-DD}"` where the date is the
/// current UTC day. At most one live entry exists per base key and day;
/// entries from previous days are never read again and are only removed by
/// an explicit [`DailyCache::clear_all_for_base`].
pub struct DailyCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl DailyCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Today's UTC date as `YYYY-MM-DD`.
    ///
    /// UTC, not local time, so every client rolls over at the same instant
    /// as the server's daily dump.
    pub fn day_key(&self) -> String {
        self.clock.now().format("%Y-%m-%d").to_string()
    }

    /// Effective store key for a base key on the current day.
    pub fn key_for(&self, base: &str) -> String {
        format!("{}:{}", base, self.day_key())
    }

    /// Read and deserialize an entry. Absent keys, malformed payloads, and
    /// unreadable stores all degrade to `None`.
    pub fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key = key, error = %e, "Discarding malformed cache entry");
                None
            }
        }
    }

    /// Serialize and store an entry. Best effort: serialization failures and
    /// store failures (quota, I/O) are logged and swallowed, never surfaced.
    pub fn write_entry<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &raw) {
            warn!(key = key, error = %e, "Failed to write cache entry");
        }
    }

    /// Return today's cached value for `base`, or run `fetch` and cache its
    /// result under today's key.
    ///
    /// With `force_refresh` the cached value is ignored and overwritten.
    /// Fetch errors propagate untouched and nothing is cached on failure.
    pub async fn fetch_with_cache<T, F, Fut>(
        &self,
        base: &str,
        force_refresh: bool,
        fetch: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = self.key_for(base);

        if !force_refresh {
            if let Some(cached) = self.read_entry(&key) {
                debug!(key = %key, "Cache hit");
                return Ok(cached);
            }
        }

        let value = fetch().await?;
        self.write_entry(&key, &value);
        Ok(value)
    }

    /// Remove today's entry for `base`. Entries from other days are kept.
    pub fn clear(&self, base: &str) {
        self.store.remove(&self.key_for(base));
    }

    /// Remove every entry for `base` regardless of day. Full invalidation,
    /// independent of the current date.
    pub fn clear_all_for_base(&self, base: &str) {
        let prefix = format!("{}:", base);
        for key in self.store.keys() {
            if key.starts_with(&prefix) {
                self.store.remove(&key);
            }
        }
    }
}
