//! In-memory forecast cache with per-entry expiry
//!
//! Keyed by a digest of the address so arbitrary user input never becomes a
//! raw map key. Expired entries are dropped on read and by a periodic sweep.

use crate::models::DisplayPeriod;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Cache key for an address: `weather_` followed by the hex MD5 digest
#[must_use]
pub fn cache_key(address: &str) -> String {
    format!("weather_{:x}", md5::compute(address.as_bytes()))
}

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Vec<DisplayPeriod>,
    expires_at: Instant,
}

/// Process-wide cache shared by every request; clones share storage
#[derive(Debug, Clone, Default)]
pub struct ForecastCache {
    entries: Arc<DashMap<String, StoredEntry>>,
}

impl ForecastCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for `key` if present and not yet expired
    #[instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&self, key: &str) -> Option<Vec<DisplayPeriod>> {
        let now = Instant::now();
        let fresh = match self.entries.get(key) {
            None => {
                debug!("Key not found");
                return None;
            }
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => None,
        };

        if fresh.is_some() {
            debug!("Key found and still fresh");
        } else {
            debug!("Key found but expired");
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        fresh
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry
    #[instrument(name = "put_cache", level = "debug", skip(self, value), fields(periods = value.len()))]
    pub fn put(&self, key: &str, value: Vec<DisplayPeriod>, ttl: Duration) {
        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            warn!("TTL overflow, not caching");
            return;
        };
        self.entries
            .insert(key.to_string(), StoredEntry { value, expires_at });
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        before.saturating_sub(self.entries.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Periodically purge expired entries on the current runtime
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!("Swept {} expired cache entries", purged);
                }
            }
        })
    }
}
